// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The injected rendering-surface capability.
//!
//! The engine never touches a document or an SVG tree directly; every read
//! (bounding rects, hit tests) and write (path data, classes, overlays) goes
//! through this trait. Hosts adapt it to whatever actually draws; tests use
//! the recording double in [`test_utils`].

pub mod test_utils;

use crate::geometry::{Point, Rect};

/// Highlight class applied to a hovered candidate the drag may connect to.
pub const CLASS_VALID_TARGET: &str = "valid";
/// Highlight class applied to a hovered candidate the drag must not connect to.
pub const CLASS_INVALID_TARGET: &str = "invalid";
/// Styling class for an edge whose removal is pending confirmation.
pub const CLASS_REMOVING: &str = "removing";

macro_rules! handle_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);
    };
}

handle_type!(
    /// An edge's SVG group element.
    GroupHandle
);
handle_type!(
    /// A path element (edge path or temporary drag line).
    PathHandle
);
handle_type!(
    /// An edge's arrowhead element.
    ArrowHandle
);
handle_type!(
    /// An activity count badge.
    OverlayHandle
);

/// The three elements allocated for one rendered edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeHandles {
    pub group: GroupHandle,
    pub path: PathHandle,
    pub arrow: ArrowHandle,
}

/// What the recent-contacts popup currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupContent<'a> {
    Loading,
    Empty,
    Contacts(&'a [PopupRow]),
}

/// One rendered contact row: who, what they said, and a relative time label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupRow {
    pub contact_id: String,
    pub title: String,
    pub detail: Option<String>,
    pub when: Option<String>,
}

/// Read/write access to the host's rendering surface.
///
/// Rect queries return coordinates in the same frame as `container_rect`;
/// the engine resolves everything container-relative before doing geometry.
/// Missing elements are `None`, never an error: endpoints routinely vanish
/// between a mutation and the frame that repaints it.
pub trait Surface {
    fn container_rect(&self) -> Rect;
    fn element_rect(&self, element_id: &str) -> Option<Rect>;

    /// Returns the topmost candidate whose bounds contain `point`.
    ///
    /// Z-order is a host concern; the engine only supplies the candidate set
    /// (the elements currently registered as target-capable).
    fn topmost_at(&self, point: Point, candidates: &[&str]) -> Option<String>;

    fn create_edge_group(&mut self, edge_id: &str, scope: &str) -> EdgeHandles;
    fn remove_group(&mut self, group: GroupHandle);
    fn set_path_data(&mut self, path: PathHandle, d: &str);
    fn set_arrow_transform(&mut self, arrow: ArrowHandle, transform: &str);
    fn set_group_class(&mut self, group: GroupHandle, class: &str, enabled: bool);

    fn create_drag_line(&mut self) -> PathHandle;
    fn remove_drag_line(&mut self, line: PathHandle);
    fn set_element_class(&mut self, element_id: &str, class: &str, enabled: bool);

    fn create_overlay(&mut self, edge_id: &str) -> OverlayHandle;
    fn set_overlay(&mut self, overlay: OverlayHandle, label: &str, position: Point);
    fn remove_overlay(&mut self, overlay: OverlayHandle);

    fn show_popup(&mut self, position: Point, content: PopupContent<'_>);
    fn hide_popup(&mut self);
}
