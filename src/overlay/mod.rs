// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Activity overlays: per-edge count badges and the recent-contacts popup.
//!
//! All of this is derived display state. Counts come from externally supplied
//! activity data and are recomputed whenever that reference changes; a reset
//! (including to `None`) clears every badge, invalidates the contacts cache,
//! and aborts everything in flight by bumping the data generation.

pub mod fetch;
pub mod popup;

use std::collections::{BTreeMap, BTreeSet};

use crate::events::ConnectionEvent;
use crate::geometry::Point;
use crate::model::{ActivityData, ContactId, ContactVisit, EdgeKey, FlowId};
use crate::registry::ConnectionRegistry;
use crate::sched::{Scheduler, Task, TaskId, TimeMs};
use crate::surface::{PopupContent, Surface};

use fetch::{ContactFetch, FetchError, FetchOutcome, FetchRequest};
use popup::{build_rows, format_count};

/// Badges sit this far below the source's bottom-center anchor.
pub const BADGE_OFFSET_Y: f64 = 12.0;
/// The popup opens this far below its badge.
pub const POPUP_OFFSET_Y: f64 = 8.0;
/// Hovering a badge opens the popup after this delay.
pub const POPUP_SHOW_DELAY_MS: TimeMs = 200;
/// Leaving the badge or popup closes it after this grace delay.
pub const POPUP_HIDE_GRACE_MS: TimeMs = 300;

#[derive(Debug)]
pub struct ActivityOverlays {
    flow: FlowId,
    data: Option<ActivityData>,
    generation: u64,
    cache: BTreeMap<EdgeKey, Vec<ContactVisit>>,
    in_flight: BTreeSet<EdgeKey>,
    show_task: Option<(TaskId, EdgeKey)>,
    hide_task: Option<TaskId>,
    showing: Option<EdgeKey>,
}

impl ActivityOverlays {
    pub fn new(flow: FlowId) -> Self {
        Self {
            flow,
            data: None,
            generation: 0,
            cache: BTreeMap::new(),
            in_flight: BTreeSet::new(),
            show_task: None,
            hide_task: None,
            showing: None,
        }
    }

    /// The current data generation; fetch outcomes from older generations are
    /// discarded on arrival.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cached(&self, key: &EdgeKey) -> Option<&[ContactVisit]> {
        self.cache.get(key).map(Vec::as_slice)
    }

    pub fn is_in_flight(&self, key: &EdgeKey) -> bool {
        self.in_flight.contains(key)
    }

    pub fn showing(&self) -> Option<&EdgeKey> {
        self.showing.as_ref()
    }

    /// Replaces or clears the usage data and rebuilds every badge.
    pub fn set_activity_data(
        &mut self,
        surface: &mut dyn Surface,
        registry: &mut ConnectionRegistry,
        scheduler: &mut Scheduler,
        fetcher: &mut dyn ContactFetch,
        data: Option<ActivityData>,
    ) {
        self.generation += 1;
        fetcher.abort_all();
        self.in_flight.clear();
        self.cache.clear();
        self.close_popup(surface, scheduler);
        self.data = data;
        self.refresh_badges(surface, registry);
    }

    /// Re-derives badge labels and positions from the registry and the
    /// surface's current rects. Runs on data changes and on every repaint
    /// frame (badges track their source element).
    pub fn refresh_badges(&self, surface: &mut dyn Surface, registry: &mut ConnectionRegistry) {
        for edge in registry.iter_mut() {
            let count = self
                .data
                .as_ref()
                .map(|data| data.count(edge.key()))
                .unwrap_or(0);
            let position = badge_position(surface, edge.key());

            match (count, position) {
                (1.., Some(position)) => {
                    let overlay = match edge.overlay() {
                        Some(overlay) => overlay,
                        None => {
                            let overlay = surface.create_overlay(&edge.key().to_string());
                            edge.set_overlay(Some(overlay));
                            overlay
                        }
                    };
                    surface.set_overlay(overlay, &format_count(count), position);
                }
                _ => {
                    if let Some(overlay) = edge.overlay() {
                        surface.remove_overlay(overlay);
                        edge.set_overlay(None);
                    }
                }
            }
        }
    }

    /// Hover entered a badge: fetch unless cached or in flight, and schedule
    /// the popup to open.
    pub fn badge_entered(
        &mut self,
        scheduler: &mut Scheduler,
        fetcher: &mut dyn ContactFetch,
        key: EdgeKey,
        now: TimeMs,
    ) {
        if !self.cache.contains_key(&key) && self.in_flight.insert(key.clone()) {
            fetcher.start(FetchRequest {
                generation: self.generation,
                flow: self.flow.clone(),
                key: key.clone(),
            });
        }

        if let Some(hide) = self.hide_task.take() {
            scheduler.cancel(hide);
        }
        if self.showing.as_ref() == Some(&key) {
            return;
        }
        if let Some((show, _)) = self.show_task.take() {
            scheduler.cancel(show);
        }
        let task = scheduler.schedule(now + POPUP_SHOW_DELAY_MS, Task::ShowPopup(key.clone()));
        self.show_task = Some((task, key));
    }

    /// Hover left the badge: drop a pending open, start the hide grace.
    pub fn badge_left(&mut self, scheduler: &mut Scheduler, now: TimeMs) {
        if let Some((show, _)) = self.show_task.take() {
            scheduler.cancel(show);
        }
        if self.showing.is_some() && self.hide_task.is_none() {
            self.hide_task = Some(scheduler.schedule(now + POPUP_HIDE_GRACE_MS, Task::HidePopup));
        }
    }

    /// Moving into the popup cancels the pending close.
    pub fn popup_entered(&mut self, scheduler: &mut Scheduler) {
        if let Some(hide) = self.hide_task.take() {
            scheduler.cancel(hide);
        }
    }

    pub fn popup_left(&mut self, scheduler: &mut Scheduler, now: TimeMs) {
        if self.showing.is_none() {
            return;
        }
        if let Some(hide) = self.hide_task.take() {
            scheduler.cancel(hide);
        }
        self.hide_task = Some(scheduler.schedule(now + POPUP_HIDE_GRACE_MS, Task::HidePopup));
    }

    /// Runs when a scheduled `ShowPopup` fires.
    ///
    /// `wall_now_ms` is epoch milliseconds, not the monotonic scheduler
    /// clock: relative-time labels compare it against server timestamps.
    pub fn show_due(
        &mut self,
        surface: &mut dyn Surface,
        key: EdgeKey,
        wall_now_ms: i64,
        simulation_active: bool,
    ) {
        self.show_task = None;
        if simulation_active {
            return;
        }
        let Some(badge) = badge_position(surface, &key) else {
            return;
        };
        self.showing = Some(key.clone());
        let position = Point::new(badge.x, badge.y + POPUP_OFFSET_Y);
        self.render_popup(surface, &key, position, wall_now_ms);
    }

    /// Runs when a scheduled `HidePopup` fires.
    pub fn hide_due(&mut self, surface: &mut dyn Surface) {
        self.hide_task = None;
        if self.showing.take().is_some() {
            surface.hide_popup();
        }
    }

    /// A contact row was clicked: close immediately, emit the notification.
    pub fn contact_clicked(
        &mut self,
        surface: &mut dyn Surface,
        scheduler: &mut Scheduler,
        contact: ContactId,
    ) -> Vec<ConnectionEvent> {
        let Some(edge) = self.showing.clone() else {
            return Vec::new();
        };
        self.close_popup(surface, scheduler);
        vec![ConnectionEvent::ContactClicked { edge, contact }]
    }

    /// Accepts a fetch outcome; stale generations and aborts are discarded.
    pub fn fetch_completed(
        &mut self,
        surface: &mut dyn Surface,
        outcome: FetchOutcome,
        wall_now_ms: i64,
    ) {
        if outcome.generation != self.generation {
            return;
        }
        self.in_flight.remove(&outcome.key);

        match outcome.result {
            Ok(visits) => {
                self.cache.insert(outcome.key.clone(), visits);
            }
            Err(FetchError::Aborted) => return,
            Err(FetchError::Failed(msg)) => {
                // Key stays uncached; the popup shows the empty state and a
                // later hover retries.
                log::warn!("recent contacts for {} unavailable: {msg}", outcome.key);
            }
        }

        if self.showing.as_ref() == Some(&outcome.key) {
            if let Some(badge) = badge_position(surface, &outcome.key) {
                let position = Point::new(badge.x, badge.y + POPUP_OFFSET_Y);
                self.render_popup(surface, &outcome.key, position, wall_now_ms);
            }
        }
    }

    fn render_popup(
        &self,
        surface: &mut dyn Surface,
        key: &EdgeKey,
        position: Point,
        wall_now_ms: i64,
    ) {
        match self.cache.get(key) {
            Some(visits) if visits.is_empty() => surface.show_popup(position, PopupContent::Empty),
            Some(visits) => {
                let rows = build_rows(wall_now_ms, visits);
                surface.show_popup(position, PopupContent::Contacts(&rows));
            }
            None if self.in_flight.contains(key) => {
                surface.show_popup(position, PopupContent::Loading)
            }
            None => surface.show_popup(position, PopupContent::Empty),
        }
    }

    fn close_popup(&mut self, surface: &mut dyn Surface, scheduler: &mut Scheduler) {
        if let Some((show, _)) = self.show_task.take() {
            scheduler.cancel(show);
        }
        if let Some(hide) = self.hide_task.take() {
            scheduler.cancel(hide);
        }
        if self.showing.take().is_some() {
            surface.hide_popup();
        }
    }
}

/// A badge hangs at a fixed offset below its source's bottom-center.
fn badge_position(surface: &dyn Surface, key: &EdgeKey) -> Option<Point> {
    let container = surface.container_rect();
    let rect = surface.element_rect(key.source().as_str())?;
    let anchor = rect.relative_to(&container).bottom_center();
    Some(Point::new(anchor.x, anchor.y + BADGE_OFFSET_Y))
}

#[cfg(test)]
mod tests;
