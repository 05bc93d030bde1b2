// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wirework, a connection engine for flow-diagram canvases.
//!
//! Renders and maintains directed edges between node elements on an
//! absolutely positioned surface, and lets a user rewire them by dragging.
//! The engine is single-threaded and host-driven: the surrounding editor
//! injects a [`surface::Surface`], forwards pointer and hover events, and
//! pumps time through [`engine::ConnectionEngine::advance`] and
//! [`engine::ConnectionEngine::frame`].

pub mod batch;
pub mod drag;
pub mod engine;
pub mod events;
pub mod geometry;
pub mod model;
pub mod overlay;
pub mod registry;
pub mod render;
pub mod sched;
pub mod surface;

pub use engine::ConnectionEngine;
pub use events::ConnectionEvent;
