// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Writes routed paths and arrowheads to the surface.
//!
//! Repaints are frame-coalesced: callers mark a [`DirtySet`] and request a
//! frame; the engine performs one write pass per tick regardless of how many
//! marks preceded it. An edge whose endpoint is missing from the surface is
//! skipped silently; the registry's removal path owns stale-edge cleanup.

use std::collections::BTreeSet;

use crate::geometry::{arrow_transform, best_target_face, flowchart_path};
use crate::model::Edge;
use crate::registry::ConnectionRegistry;
use crate::surface::Surface;

/// Straight run leaving the source before any turn.
pub const START_STUB: f64 = 12.0;
/// Straight run entering the target from above.
pub const END_STUB: f64 = 12.0;
/// Radius of the quadratic jog corners.
pub const CORNER_RADIUS: f64 = 5.0;

/// Which edges the next frame must repaint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DirtySet {
    #[default]
    Clean,
    /// Edges touching any of these element ids (source or target side).
    Ids(BTreeSet<String>),
    All,
}

impl DirtySet {
    pub fn mark_all(&mut self) {
        *self = Self::All;
    }

    pub fn mark_ids<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        match self {
            Self::All => {}
            Self::Ids(existing) => existing.extend(ids),
            Self::Clean => *self = Self::Ids(ids.into_iter().collect()),
        }
    }

    pub fn take(&mut self) -> DirtySet {
        std::mem::take(self)
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean)
    }

    fn covers(&self, edge: &Edge) -> bool {
        match self {
            Self::Clean => false,
            Self::All => true,
            Self::Ids(ids) => {
                ids.contains(edge.key().source().as_str())
                    || ids.contains(edge.key().target().as_str())
            }
        }
    }
}

/// Recomputes and writes one edge's path and arrow.
pub fn update_path(surface: &mut dyn Surface, edge: &Edge) {
    let container = surface.container_rect();
    let Some(source_rect) = surface.element_rect(edge.key().source().as_str()) else {
        return;
    };
    let Some(target_rect) = surface.element_rect(edge.key().target().as_str()) else {
        return;
    };

    let start = source_rect.relative_to(&container).bottom_center();
    let end = best_target_face(&target_rect, &container, start);
    let path = flowchart_path(start, end, START_STUB, END_STUB, CORNER_RADIUS);

    surface.set_path_data(edge.path(), &path.to_svg());
    let transform = arrow_transform(end, end.x - start.x, end.y - start.y);
    surface.set_arrow_transform(edge.arrow(), &transform);
}

/// One frame's write pass over the registry.
pub fn repaint(surface: &mut dyn Surface, registry: &ConnectionRegistry, dirty: &DirtySet) {
    if dirty.is_clean() {
        return;
    }
    for edge in registry.iter() {
        if dirty.covers(edge) {
            update_path(surface, edge);
        }
    }
}
