// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! A recording [`Surface`] double for unit and integration tests.
//!
//! Elements are placed with explicit rects; later placements are topmost.
//! Every write is counted so tests can assert frame coalescing.

use std::collections::{BTreeMap, BTreeSet};

use crate::geometry::{Point, Rect};

use super::{
    ArrowHandle, EdgeHandles, GroupHandle, OverlayHandle, PathHandle, PopupContent, PopupRow,
    Surface,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShownPopup {
    Loading,
    Empty,
    Contacts(Vec<PopupRow>),
}

#[derive(Debug, Default)]
pub struct TestSurface {
    container: Rect,
    rects: BTreeMap<String, Rect>,
    z_order: Vec<String>,
    next_handle: u64,
    live_groups: BTreeMap<GroupHandle, String>,
    path_data: BTreeMap<PathHandle, String>,
    arrow_transforms: BTreeMap<ArrowHandle, String>,
    element_classes: BTreeMap<String, BTreeSet<String>>,
    group_classes: BTreeMap<GroupHandle, BTreeSet<String>>,
    drag_lines: BTreeSet<PathHandle>,
    overlays: BTreeMap<OverlayHandle, (String, String, Point)>,
    popup: Option<(Point, ShownPopup)>,
    write_count: usize,
}

impl TestSurface {
    pub fn new(container: Rect) -> Self {
        Self { container, ..Self::default() }
    }

    /// Places (or moves) an element; the most recent placement is topmost.
    pub fn place_element(&mut self, element_id: &str, rect: Rect) {
        self.rects.insert(element_id.to_owned(), rect);
        self.z_order.retain(|id| id != element_id);
        self.z_order.push(element_id.to_owned());
    }

    pub fn remove_element(&mut self, element_id: &str) {
        self.rects.remove(element_id);
        self.z_order.retain(|id| id != element_id);
    }

    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Number of surface writes since construction; frame-coalescing tests
    /// snapshot this before and after pumping the engine.
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    pub fn live_group_count(&self) -> usize {
        self.live_groups.len()
    }

    pub fn live_group_edge_ids(&self) -> Vec<&str> {
        self.live_groups.values().map(String::as_str).collect()
    }

    pub fn path_data(&self, path: PathHandle) -> Option<&str> {
        self.path_data.get(&path).map(String::as_str)
    }

    pub fn arrow_transform(&self, arrow: ArrowHandle) -> Option<&str> {
        self.arrow_transforms.get(&arrow).map(String::as_str)
    }

    pub fn element_has_class(&self, element_id: &str, class: &str) -> bool {
        self.element_classes
            .get(element_id)
            .is_some_and(|classes| classes.contains(class))
    }

    pub fn group_has_class(&self, group: GroupHandle, class: &str) -> bool {
        self.group_classes.get(&group).is_some_and(|classes| classes.contains(class))
    }

    pub fn drag_line_active(&self) -> bool {
        !self.drag_lines.is_empty()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    pub fn overlay_label(&self, overlay: OverlayHandle) -> Option<&str> {
        self.overlays.get(&overlay).map(|(_, label, _)| label.as_str())
    }

    pub fn overlay_position(&self, overlay: OverlayHandle) -> Option<Point> {
        self.overlays.get(&overlay).map(|(_, _, position)| *position)
    }

    pub fn popup(&self) -> Option<&(Point, ShownPopup)> {
        self.popup.as_ref()
    }
}

impl Surface for TestSurface {
    fn container_rect(&self) -> Rect {
        self.container
    }

    fn element_rect(&self, element_id: &str) -> Option<Rect> {
        self.rects.get(element_id).copied()
    }

    fn topmost_at(&self, point: Point, candidates: &[&str]) -> Option<String> {
        self.z_order.iter().rev().find_map(|id| {
            if !candidates.contains(&id.as_str()) {
                return None;
            }
            let rect = self.rects.get(id)?.relative_to(&self.container);
            rect.contains(point).then(|| id.clone())
        })
    }

    fn create_edge_group(&mut self, edge_id: &str, _scope: &str) -> EdgeHandles {
        self.write_count += 1;
        let group = GroupHandle(self.next());
        let path = PathHandle(self.next());
        let arrow = ArrowHandle(self.next());
        self.live_groups.insert(group, edge_id.to_owned());
        EdgeHandles { group, path, arrow }
    }

    fn remove_group(&mut self, group: GroupHandle) {
        self.write_count += 1;
        self.live_groups.remove(&group);
        self.group_classes.remove(&group);
    }

    fn set_path_data(&mut self, path: PathHandle, d: &str) {
        self.write_count += 1;
        self.path_data.insert(path, d.to_owned());
    }

    fn set_arrow_transform(&mut self, arrow: ArrowHandle, transform: &str) {
        self.write_count += 1;
        self.arrow_transforms.insert(arrow, transform.to_owned());
    }

    fn set_group_class(&mut self, group: GroupHandle, class: &str, enabled: bool) {
        self.write_count += 1;
        let classes = self.group_classes.entry(group).or_default();
        if enabled {
            classes.insert(class.to_owned());
        } else {
            classes.remove(class);
        }
    }

    fn create_drag_line(&mut self) -> PathHandle {
        self.write_count += 1;
        let line = PathHandle(self.next());
        self.drag_lines.insert(line);
        line
    }

    fn remove_drag_line(&mut self, line: PathHandle) {
        self.write_count += 1;
        self.drag_lines.remove(&line);
        self.path_data.remove(&line);
    }

    fn set_element_class(&mut self, element_id: &str, class: &str, enabled: bool) {
        self.write_count += 1;
        let classes = self.element_classes.entry(element_id.to_owned()).or_default();
        if enabled {
            classes.insert(class.to_owned());
        } else {
            classes.remove(class);
        }
    }

    fn create_overlay(&mut self, edge_id: &str) -> OverlayHandle {
        self.write_count += 1;
        let overlay = OverlayHandle(self.next());
        self.overlays
            .insert(overlay, (edge_id.to_owned(), String::new(), Point::default()));
        overlay
    }

    fn set_overlay(&mut self, overlay: OverlayHandle, label: &str, position: Point) {
        self.write_count += 1;
        if let Some(entry) = self.overlays.get_mut(&overlay) {
            entry.1 = label.to_owned();
            entry.2 = position;
        }
    }

    fn remove_overlay(&mut self, overlay: OverlayHandle) {
        self.write_count += 1;
        self.overlays.remove(&overlay);
    }

    fn show_popup(&mut self, position: Point, content: PopupContent<'_>) {
        self.write_count += 1;
        let shown = match content {
            PopupContent::Loading => ShownPopup::Loading,
            PopupContent::Empty => ShownPopup::Empty,
            PopupContent::Contacts(rows) => ShownPopup::Contacts(rows.to_vec()),
        };
        self.popup = Some((position, shown));
    }

    fn hide_popup(&mut self) {
        self.write_count += 1;
        self.popup = None;
    }
}
