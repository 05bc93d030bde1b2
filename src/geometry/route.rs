// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write as _;

use smallvec::SmallVec;

use super::{Point, Rect};

/// Picks the target-side attachment point for an edge arriving from `source`.
///
/// Candidates are the midpoints of the target's top, left, and right faces.
/// The bottom face is never offered: in a top-down flow layout edges always
/// approach from above or the side. The candidate nearest to the source wins;
/// ties keep the first minimum in declaration order (top, left, right).
pub fn best_target_face(target: &Rect, container: &Rect, source: Point) -> Point {
    let rel = target.relative_to(container);
    let candidates = [
        Point::new(rel.center_x(), rel.y),
        Point::new(rel.x, rel.center_y()),
        Point::new(rel.right(), rel.center_y()),
    ];

    let mut best = candidates[0];
    let mut best_distance = best.distance_to(source);
    for candidate in &candidates[1..] {
        let distance = candidate.distance_to(source);
        if distance < best_distance {
            best = *candidate;
            best_distance = distance;
        }
    }
    best
}

/// One segment of a routed path, in SVG path-data terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSeg {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { ctrl: Point, end: Point },
}

impl PathSeg {
    fn endpoint(&self) -> Point {
        match self {
            Self::MoveTo(p) | Self::LineTo(p) => *p,
            Self::QuadTo { end, .. } => *end,
        }
    }
}

/// A routed path: typed segments plus the SVG `d` serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowPath {
    segments: SmallVec<[PathSeg; 8]>,
}

impl FlowPath {
    fn new(segments: SmallVec<[PathSeg; 8]>) -> Self {
        debug_assert!(matches!(segments.first(), Some(PathSeg::MoveTo(_))));
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSeg] {
        &self.segments
    }

    pub fn start(&self) -> Point {
        self.segments.first().expect("path has segments").endpoint()
    }

    pub fn end(&self) -> Point {
        self.segments.last().expect("path has segments").endpoint()
    }

    pub fn to_svg(&self) -> String {
        let mut d = String::with_capacity(self.segments.len() * 16);
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 {
                d.push(' ');
            }
            match segment {
                PathSeg::MoveTo(p) => {
                    let _ = write!(d, "M {} {}", p.x, p.y);
                }
                PathSeg::LineTo(p) => {
                    let _ = write!(d, "L {} {}", p.x, p.y);
                }
                PathSeg::QuadTo { ctrl, end } => {
                    let _ = write!(d, "Q {} {} {} {}", ctrl.x, ctrl.y, end.x, end.y);
                }
            }
        }
        d
    }
}

/// Routes an orthogonal flowchart path from `start` down into `end`.
///
/// The shape is: a straight stub down from `start` by `start_stub`, a
/// horizontal jog at the midpoint height with quadratic-curve corners of
/// `corner_radius`, and a straight stub into `end` from above by `end_stub`.
///
/// The jog is emitted only when `|dx| > 2 * corner_radius`; below that the
/// routing degenerates to a nearly straight vertical run. The threshold and
/// midpoint behavior are load-bearing for downstream visuals and must not
/// change (see the endpoint property tests).
pub fn flowchart_path(
    start: Point,
    end: Point,
    start_stub: f64,
    end_stub: f64,
    corner_radius: f64,
) -> FlowPath {
    let stub_y = start.y + start_stub;
    let entry_y = end.y - end_stub;
    let dx = end.x - start.x;

    let mut segments = SmallVec::<[PathSeg; 8]>::new();
    segments.push(PathSeg::MoveTo(start));
    segments.push(PathSeg::LineTo(Point::new(start.x, stub_y)));

    if dx.abs() > corner_radius * 2.0 {
        let mid_y = (stub_y + entry_y) / 2.0;
        let toward = dx.signum();
        segments.push(PathSeg::LineTo(Point::new(start.x, mid_y - corner_radius)));
        segments.push(PathSeg::QuadTo {
            ctrl: Point::new(start.x, mid_y),
            end: Point::new(start.x + corner_radius * toward, mid_y),
        });
        segments.push(PathSeg::LineTo(Point::new(end.x - corner_radius * toward, mid_y)));
        segments.push(PathSeg::QuadTo {
            ctrl: Point::new(end.x, mid_y),
            end: Point::new(end.x, mid_y + corner_radius),
        });
    }

    segments.push(PathSeg::LineTo(Point::new(end.x, entry_y)));
    segments.push(PathSeg::LineTo(end));
    FlowPath::new(segments)
}

/// A straight two-point path, used for the temporary drag line.
pub fn line_path(from: Point, to: Point) -> FlowPath {
    let mut segments = SmallVec::<[PathSeg; 8]>::new();
    segments.push(PathSeg::MoveTo(from));
    segments.push(PathSeg::LineTo(to));
    FlowPath::new(segments)
}

/// Positions the fixed triangular arrowhead at `end`.
///
/// Three orientations only: up by default, left or right when the horizontal
/// displacement between start and end dominates the vertical one.
pub fn arrow_transform(end: Point, dx: f64, dy: f64) -> String {
    let rotation = if dx.abs() > dy.abs() {
        if dx > 0.0 {
            90.0
        } else {
            -90.0
        }
    } else {
        0.0
    };
    format!("translate({} {}) rotate({})", end.x, end.y, rotation)
}
