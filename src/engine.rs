// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The connection engine facade.
//!
//! Owns every subsystem and the injected surface, and exposes the boundary
//! the surrounding editor talks to: capability registration, connects,
//! removals, repaints, activity data, pointer and hover events.
//!
//! Time is host-driven: pump `advance(now_ms)` for due tasks (debounce
//! windows, popup delays) and `frame()` once per render tick. Connection
//! mutations, whether from a drag gesture or a programmatic call, travel
//! the same path: a `Connect` event feeds the debounced batcher, which
//! commits to the registry when the window fires.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::batch::{PendingConnection, PendingConnections};
use crate::drag::{DragMachine, SourceSpec};
use crate::events::{ConnectionEvent, EventBus, Observer};
use crate::geometry::Point;
use crate::model::{ActivityData, ContactId, EdgeKey, ExitId, FlowId, NodeId, TargetId};
use crate::overlay::fetch::{ContactFetch, FetchOutcome, NullFetcher};
use crate::overlay::ActivityOverlays;
use crate::registry::ConnectionRegistry;
use crate::render::{repaint, DirtySet};
use crate::sched::{Scheduler, Task, TimeMs};
use crate::surface::{Surface, CLASS_REMOVING};

pub struct ConnectionEngine<S: Surface> {
    surface: S,
    registry: ConnectionRegistry,
    scheduler: Scheduler,
    drag: DragMachine,
    pending: PendingConnections,
    overlays: ActivityOverlays,
    bus: EventBus,
    fetcher: Box<dyn ContactFetch>,
    // Epoch millis for relative-time labels; `now` stays monotonic.
    wall_clock: Box<dyn Fn() -> i64>,
    sources: BTreeMap<ExitId, SourceSpec>,
    targets: BTreeMap<TargetId, NodeId>,
    dirty: DirtySet,
    simulation_active: bool,
    now: TimeMs,
}

impl<S: Surface> ConnectionEngine<S> {
    pub fn new(flow: FlowId, surface: S) -> Self {
        Self {
            surface,
            registry: ConnectionRegistry::new(),
            scheduler: Scheduler::new(),
            drag: DragMachine::new(),
            pending: PendingConnections::new(),
            overlays: ActivityOverlays::new(flow),
            bus: EventBus::new(),
            fetcher: Box::new(NullFetcher),
            wall_clock: Box::new(system_wall_clock),
            sources: BTreeMap::new(),
            targets: BTreeMap::new(),
            dirty: DirtySet::default(),
            simulation_active: false,
            now: 0,
        }
    }

    /// Replaces the fetch boundary (defaults to a fetcher that never fetches).
    pub fn set_fetcher(&mut self, fetcher: Box<dyn ContactFetch>) {
        self.fetcher = fetcher;
    }

    /// Replaces the wall-clock source for relative-time labels (defaults to
    /// the system clock). The monotonic time fed to [`advance`] is unrelated.
    ///
    /// [`advance`]: ConnectionEngine::advance
    pub fn set_wall_clock(&mut self, clock: Box<dyn Fn() -> i64>) {
        self.wall_clock = clock;
    }

    pub fn subscribe(&mut self, observer: Observer) {
        self.bus.subscribe(observer);
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn dragging(&self) -> bool {
        self.drag.dragging()
    }

    // ---- capability registration ------------------------------------------

    /// Marks `exit` as a connectable source owned by `node`; its edges carry
    /// `scope`.
    pub fn make_source(&mut self, exit: ExitId, node: NodeId, scope: impl Into<String>) {
        self.sources.insert(exit, SourceSpec::new(node, scope));
    }

    /// Marks `target` as a connectable target owned by `node`.
    pub fn make_target(&mut self, target: TargetId, node: NodeId) {
        self.targets.insert(target, node);
    }

    /// Enables or disables dragging from `exit` (used while its node is being
    /// edited). Unknown exits are ignored.
    pub fn set_source_enabled(&mut self, exit: &ExitId, enabled: bool) {
        if let Some(spec) = self.sources.get_mut(exit) {
            spec.set_enabled(enabled);
        }
    }

    // ---- connection mutations ---------------------------------------------

    /// Requests a connection; commits after the debounce window through the
    /// same event path drag connects take.
    pub fn connect(&mut self, scope: impl Into<String>, from: ExitId, to: TargetId) {
        self.apply_events(vec![ConnectionEvent::Connect {
            scope: scope.into(),
            source: from,
            target: to,
        }]);
    }

    /// Removes the outgoing edge of `exit`, if any.
    pub fn remove_exit_connection(&mut self, exit: &ExitId) -> bool {
        self.registry.remove_from_source(&mut self.surface, exit)
    }

    /// Removes every edge into or out of elements owned by `node`.
    pub fn remove_node_connections(&mut self, node: &NodeId) {
        let exits = self
            .sources
            .iter()
            .filter(|(_, spec)| spec.node() == node)
            .map(|(exit, _)| exit.clone())
            .collect::<Vec<_>>();
        for exit in exits {
            self.registry.remove_from_source(&mut self.surface, &exit);
        }

        let targets = self
            .targets
            .iter()
            .filter(|(_, owner)| *owner == node)
            .map(|(target, _)| target.clone())
            .collect::<Vec<_>>();
        for target in targets {
            self.registry.remove_into_target(&mut self.surface, &target);
        }
    }

    /// Removes every edge pointing into `target` (the element disappeared
    /// independently of whole-node removal).
    pub fn remove_target_connections(&mut self, target: &TargetId) -> usize {
        self.registry.remove_into_target(&mut self.surface, target)
    }

    /// Toggles the pending-delete styling on `exit`'s edge.
    pub fn set_connection_removing_state(&mut self, exit: &ExitId, removing: bool) {
        if let Some(edge) = self.registry.edge_from(exit) {
            self.surface.set_group_class(edge.group(), CLASS_REMOVING, removing);
        }
    }

    // ---- repaint scheduling -----------------------------------------------

    /// Marks the edges touching `ids` for repaint on the next frame.
    pub fn revalidate<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.dirty.mark_ids(ids);
        self.scheduler.request_frame();
    }

    pub fn repaint_everything(&mut self) {
        self.dirty.mark_all();
        self.scheduler.request_frame();
    }

    /// One render tick: performs the coalesced write pass, if any was
    /// requested since the last tick.
    pub fn frame(&mut self) {
        if !self.scheduler.take_frame() {
            return;
        }
        let dirty = self.dirty.take();
        repaint(&mut self.surface, &self.registry, &dirty);
        // Badges hang off source anchors, so they move with their nodes.
        self.overlays.refresh_badges(&mut self.surface, &mut self.registry);
    }

    /// Advances host time and runs every due task.
    pub fn advance(&mut self, now: TimeMs) {
        self.now = now;
        for task in self.scheduler.take_due(now) {
            match task {
                Task::CommitPending => {
                    let committed = self.pending.commit(&mut self.surface, &mut self.registry);
                    if committed > 0 {
                        self.dirty.mark_all();
                        self.scheduler.request_frame();
                    }
                }
                Task::ShowPopup(key) => {
                    let wall_now = (self.wall_clock)();
                    self.overlays
                        .show_due(&mut self.surface, key, wall_now, self.simulation_active)
                }
                Task::HidePopup => self.overlays.hide_due(&mut self.surface),
            }
        }
    }

    // ---- pointer gestures -------------------------------------------------

    pub fn pointer_down(&mut self, element_id: &str, point: Point) {
        let events = self
            .drag
            .pointer_down(&mut self.surface, &self.sources, element_id, point);
        self.apply_events(events);
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.drag.pointer_move(&mut self.surface, &self.targets, point);
    }

    pub fn pointer_up(&mut self, point: Point) {
        let events = self.drag.pointer_up(&mut self.surface, &self.registry, point);
        self.apply_events(events);
    }

    // ---- activity overlays ------------------------------------------------

    pub fn set_activity_data(&mut self, data: Option<ActivityData>) {
        self.overlays.set_activity_data(
            &mut self.surface,
            &mut self.registry,
            &mut self.scheduler,
            self.fetcher.as_mut(),
            data,
        );
    }

    /// Suppresses the recent-contacts popup while the simulator overlay is up.
    pub fn set_simulation_active(&mut self, active: bool) {
        self.simulation_active = active;
    }

    pub fn badge_entered(&mut self, key: EdgeKey) {
        self.overlays
            .badge_entered(&mut self.scheduler, self.fetcher.as_mut(), key, self.now);
    }

    pub fn badge_left(&mut self) {
        self.overlays.badge_left(&mut self.scheduler, self.now);
    }

    pub fn popup_entered(&mut self) {
        self.overlays.popup_entered(&mut self.scheduler);
    }

    pub fn popup_left(&mut self) {
        self.overlays.popup_left(&mut self.scheduler, self.now);
    }

    pub fn contact_clicked(&mut self, contact: ContactId) {
        let events = self
            .overlays
            .contact_clicked(&mut self.surface, &mut self.scheduler, contact);
        self.apply_events(events);
    }

    /// Delivers a fetch outcome from the injected fetcher's outcome channel.
    pub fn fetch_completed(&mut self, outcome: FetchOutcome) {
        let wall_now = (self.wall_clock)();
        self.overlays.fetch_completed(&mut self.surface, outcome, wall_now);
    }

    // ---- internals --------------------------------------------------------

    // Connect events feed the batcher before observers hear them; everything
    // else is notification only.
    fn apply_events(&mut self, events: Vec<ConnectionEvent>) {
        for event in events {
            if let ConnectionEvent::Connect { scope, source, target } = &event {
                self.pending.push(
                    &mut self.scheduler,
                    self.now,
                    PendingConnection::new(scope.clone(), source.clone(), target.clone()),
                );
            }
            self.bus.emit(&event);
        }
    }
}

fn system_wall_clock() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}

impl<S: Surface> Drop for ConnectionEngine<S> {
    fn drop(&mut self) {
        // Scheduled tasks must not outlive their owner.
        self.pending.clear(&mut self.scheduler);
        self.scheduler.clear();
    }
}
