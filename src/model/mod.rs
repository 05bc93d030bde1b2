// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model: typed ids, edge identity, and activity payloads.

pub mod activity;
pub mod edge;
pub mod ids;

pub use activity::{parse_recent_contacts, ActivityData, ActivityDataError, ContactVisit};
pub use edge::{Edge, EdgeKey, ParseEdgeKeyError};
pub use ids::{ContactId, ExitId, FlowId, Id, IdError, NodeId, TargetId};
