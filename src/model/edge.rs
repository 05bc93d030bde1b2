// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use crate::surface::{ArrowHandle, GroupHandle, OverlayHandle, PathHandle};

use super::ids::{ExitId, IdError, TargetId};

/// Identity of an edge: the ordered `(source, target)` pair.
///
/// The canonical text form is `source:target`, which is also the key shape
/// used by externally supplied activity data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    source: ExitId,
    target: TargetId,
}

impl EdgeKey {
    pub fn new(source: ExitId, target: TargetId) -> Self {
        Self { source, target }
    }

    pub fn source(&self) -> &ExitId {
        &self.source
    }

    pub fn target(&self) -> &TargetId {
        &self.target
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEdgeKeyError {
    MissingSeparator,
    Segment(IdError),
}

impl fmt::Display for ParseEdgeKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => f.write_str("edge key must be 'source:target'"),
            Self::Segment(err) => write!(f, "invalid edge key segment: {err}"),
        }
    }
}

impl std::error::Error for ParseEdgeKeyError {}

impl FromStr for EdgeKey {
    type Err = ParseEdgeKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (source, target) = s.split_once(':').ok_or(ParseEdgeKeyError::MissingSeparator)?;
        let source = ExitId::new(source).map_err(ParseEdgeKeyError::Segment)?;
        let target = TargetId::new(target).map_err(ParseEdgeKeyError::Segment)?;
        Ok(Self { source, target })
    }
}

/// A rendered connection plus the surface handles that draw it.
///
/// The registry owns edges; every structural removal must detach `group`
/// before the entry is dropped so no handle dangles on the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    key: EdgeKey,
    scope: String,
    group: GroupHandle,
    path: PathHandle,
    arrow: ArrowHandle,
    overlay: Option<OverlayHandle>,
}

impl Edge {
    pub fn new(
        key: EdgeKey,
        scope: impl Into<String>,
        group: GroupHandle,
        path: PathHandle,
        arrow: ArrowHandle,
    ) -> Self {
        Self {
            key,
            scope: scope.into(),
            group,
            path,
            arrow,
            overlay: None,
        }
    }

    pub fn key(&self) -> &EdgeKey {
        &self.key
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn group(&self) -> GroupHandle {
        self.group
    }

    pub fn path(&self) -> PathHandle {
        self.path
    }

    pub fn arrow(&self) -> ArrowHandle {
        self.arrow
    }

    pub fn overlay(&self) -> Option<OverlayHandle> {
        self.overlay
    }

    pub fn set_overlay(&mut self, overlay: Option<OverlayHandle>) {
        self.overlay = overlay;
    }
}
