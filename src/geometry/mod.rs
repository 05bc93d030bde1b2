// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pure geometry: anchor selection, orthogonal path routing, arrow placement.
//!
//! Everything here takes concrete coordinates already resolved against a
//! common container-relative frame and is deterministic given its inputs, so
//! the renderer can be unit tested without a live surface.

pub mod route;

pub use route::{
    arrow_transform, best_target_face, flowchart_path, line_path, FlowPath, PathSeg,
};

/// A point in container-relative pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned rectangle, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Bottom-center anchor, where every routed path leaves its source.
    pub fn bottom_center(&self) -> Point {
        Point::new(self.center_x(), self.bottom())
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Re-expresses `self` relative to `container`'s origin.
    pub fn relative_to(&self, container: &Rect) -> Rect {
        Rect::new(self.x - container.x, self.y - container.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect};

    #[test]
    fn rect_anchors() {
        let rect = Rect::new(10.0, 20.0, 100.0, 40.0);
        assert_eq!(rect.bottom_center(), Point::new(60.0, 60.0));
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 60.0);
    }

    #[test]
    fn rect_contains_edges_inclusive() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(!rect.contains(Point::new(10.1, 5.0)));
    }

    #[test]
    fn rect_relative_to_container() {
        let container = Rect::new(100.0, 50.0, 500.0, 500.0);
        let rect = Rect::new(130.0, 80.0, 20.0, 20.0);
        assert_eq!(rect.relative_to(&container), Rect::new(30.0, 30.0, 20.0, 20.0));
    }
}
