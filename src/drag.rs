// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The pointer-driven connect gesture.
//!
//! Idle -> Dragging on pointer-down over an enabled source; back to Idle on
//! pointer-up, always. The machine emits intent only (DragStart, DragAbort,
//! Detach, Connect); it never mutates the registry itself, so drag connects
//! and programmatic connects share one commit path in the engine.

use std::collections::BTreeMap;

use crate::events::ConnectionEvent;
use crate::geometry::{line_path, Point};
use crate::model::{ExitId, NodeId, TargetId};
use crate::registry::ConnectionRegistry;
use crate::surface::{PathHandle, Surface, CLASS_INVALID_TARGET, CLASS_VALID_TARGET};

/// Source capability: which node owns the exit, which scope its edges carry,
/// and whether dragging is currently enabled (the editor disables exits while
/// their node is being edited).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    node: NodeId,
    scope: String,
    enabled: bool,
}

impl SourceSpec {
    pub fn new(node: NodeId, scope: impl Into<String>) -> Self {
        Self { node, scope: scope.into(), enabled: true }
    }

    pub fn node(&self) -> &NodeId {
        &self.node
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Hovered {
    target: TargetId,
    valid: bool,
}

impl Hovered {
    fn class(&self) -> &'static str {
        if self.valid {
            CLASS_VALID_TARGET
        } else {
            CLASS_INVALID_TARGET
        }
    }
}

/// Transient gesture state; exists only between pointer-down and pointer-up.
#[derive(Debug, Clone, PartialEq)]
struct DragSession {
    source: ExitId,
    source_node: NodeId,
    scope: String,
    anchor: Point,
    line: PathHandle,
    hovered: Option<Hovered>,
}

#[derive(Debug, Default)]
pub struct DragMachine {
    session: Option<DragSession>,
}

impl DragMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a gesture if `element_id` is a registered, enabled source.
    ///
    /// Downs on capability-less elements, and renewed downs while a session
    /// is already live, are no-ops; a second pointer must never corrupt the
    /// session in flight.
    pub fn pointer_down(
        &mut self,
        surface: &mut dyn Surface,
        sources: &BTreeMap<ExitId, SourceSpec>,
        element_id: &str,
        point: Point,
    ) -> Vec<ConnectionEvent> {
        if self.session.is_some() {
            return Vec::new();
        }
        let Some((source, spec)) = sources.get_key_value(element_id) else {
            return Vec::new();
        };
        if !spec.enabled() {
            return Vec::new();
        }

        // Anchor at the source's bottom-center; fall back to the pointer if
        // the element vanished between the event and this lookup.
        let container = surface.container_rect();
        let anchor = surface
            .element_rect(element_id)
            .map(|rect| rect.relative_to(&container).bottom_center())
            .unwrap_or(point);

        let line = surface.create_drag_line();
        surface.set_path_data(line, &line_path(anchor, point).to_svg());

        self.session = Some(DragSession {
            source: source.clone(),
            source_node: spec.node().clone(),
            scope: spec.scope().to_owned(),
            anchor,
            line,
            hovered: None,
        });
        vec![ConnectionEvent::DragStart { source: source.clone() }]
    }

    /// Updates the temporary line and the hovered candidate's highlight.
    pub fn pointer_move(
        &mut self,
        surface: &mut dyn Surface,
        targets: &BTreeMap<TargetId, NodeId>,
        point: Point,
    ) {
        let Some(session) = &mut self.session else {
            return;
        };

        surface.set_path_data(session.line, &line_path(session.anchor, point).to_svg());

        let candidates = targets.keys().map(|id| id.as_str()).collect::<Vec<_>>();
        let hovered = surface.topmost_at(point, &candidates).and_then(|id| {
            let (target, node) = targets.get_key_value(id.as_str())?;
            Some(Hovered {
                valid: *node != session.source_node,
                target: target.clone(),
            })
        });

        if session.hovered == hovered {
            return;
        }
        if let Some(old) = session.hovered.take() {
            surface.set_element_class(old.target.as_str(), old.class(), false);
        }
        if let Some(new) = &hovered {
            surface.set_element_class(new.target.as_str(), new.class(), true);
        }
        session.hovered = hovered;
    }

    /// Ends the gesture. Cleanup (line, highlight, session) happens first and
    /// unconditionally; then either DragAbort, or Detach-then-Connect when a
    /// valid candidate is under the pointer.
    pub fn pointer_up(
        &mut self,
        surface: &mut dyn Surface,
        registry: &ConnectionRegistry,
        _point: Point,
    ) -> Vec<ConnectionEvent> {
        let Some(session) = self.session.take() else {
            return Vec::new();
        };

        surface.remove_drag_line(session.line);
        if let Some(hovered) = &session.hovered {
            surface.set_element_class(hovered.target.as_str(), hovered.class(), false);
        }

        match session.hovered {
            Some(hovered) if hovered.valid => {
                let mut events = Vec::with_capacity(2);
                if let Some(existing) = registry.edge_from(&session.source) {
                    events.push(ConnectionEvent::Detach {
                        source: session.source.clone(),
                        target: existing.key().target().clone(),
                    });
                }
                events.push(ConnectionEvent::Connect {
                    scope: session.scope,
                    source: session.source,
                    target: hovered.target,
                });
                events
            }
            _ => vec![ConnectionEvent::DragAbort { source: session.source }],
        }
    }
}
