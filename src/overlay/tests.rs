// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use crate::events::ConnectionEvent;
use crate::geometry::{Point, Rect};
use crate::model::{ActivityData, ContactId, ContactVisit, EdgeKey, ExitId, FlowId, TargetId};
use crate::registry::ConnectionRegistry;
use crate::sched::{Scheduler, Task};
use crate::surface::test_utils::{ShownPopup, TestSurface};

use super::fetch::{FetchError, FetchOutcome, RecordingFetcher};
use super::{ActivityOverlays, POPUP_HIDE_GRACE_MS, POPUP_SHOW_DELAY_MS};

/// Wall clock used for relative-time labels; unrelated to the scheduler
/// times the tests pump.
const WALL_MS: i64 = 1_787_000_000_000;

struct Fixture {
    surface: TestSurface,
    registry: ConnectionRegistry,
    scheduler: Scheduler,
    fetcher: RecordingFetcher,
    overlays: ActivityOverlays,
    key: EdgeKey,
}

// One edge e1 -> n1, with the source placed so its badge lands at (100, 112).
fn fixture() -> Fixture {
    let mut surface = TestSurface::new(Rect::new(0.0, 0.0, 1000.0, 1000.0));
    surface.place_element("e1", Rect::new(90.0, 80.0, 20.0, 20.0));
    surface.place_element("n1", Rect::new(50.0, 280.0, 100.0, 40.0));

    let mut registry = ConnectionRegistry::new();
    let key = registry.create(
        &mut surface,
        "flow",
        ExitId::new("e1").expect("exit id"),
        TargetId::new("n1").expect("target id"),
    );

    Fixture {
        surface,
        registry,
        scheduler: Scheduler::new(),
        fetcher: RecordingFetcher::new(),
        overlays: ActivityOverlays::new(FlowId::new("f1").expect("flow id")),
        key,
    }
}

fn activity(key: &EdgeKey, count: u64) -> ActivityData {
    let mut segments = BTreeMap::new();
    segments.insert(key.clone(), count);
    ActivityData::new(segments)
}

fn visit(id: &str) -> ContactVisit {
    ContactVisit::new(
        ContactId::new(id).expect("contact id"),
        None,
        None,
        Some(WALL_MS),
    )
}

impl Fixture {
    fn set_data(&mut self, data: Option<ActivityData>) {
        self.overlays.set_activity_data(
            &mut self.surface,
            &mut self.registry,
            &mut self.scheduler,
            &mut self.fetcher,
            data,
        );
    }

    fn hover_badge(&mut self, now: u64) {
        let key = self.key.clone();
        self.overlays
            .badge_entered(&mut self.scheduler, &mut self.fetcher, key, now);
    }

    fn pump(&mut self, now: u64, simulation_active: bool) {
        for task in self.scheduler.take_due(now) {
            match task {
                Task::ShowPopup(key) => {
                    self.overlays
                        .show_due(&mut self.surface, key, WALL_MS, simulation_active)
                }
                Task::HidePopup => self.overlays.hide_due(&mut self.surface),
                Task::CommitPending => unreachable!("no batcher in these tests"),
            }
        }
    }
}

#[test]
fn badges_follow_activity_counts() {
    let mut f = fixture();
    let key = f.key.clone();

    f.set_data(Some(activity(&key, 42)));
    assert_eq!(f.surface.overlay_count(), 1);
    let overlay = f.registry.edge(&key).expect("edge").overlay().expect("badge");
    assert_eq!(f.surface.overlay_label(overlay), Some("42"));
    assert_eq!(f.surface.overlay_position(overlay), Some(Point::new(100.0, 112.0)));

    // Zero count removes the badge; null data clears everything.
    f.set_data(Some(activity(&key, 0)));
    assert_eq!(f.surface.overlay_count(), 0);

    f.set_data(Some(activity(&key, 7)));
    assert_eq!(f.surface.overlay_count(), 1);
    f.set_data(None);
    assert_eq!(f.surface.overlay_count(), 0);
    assert!(f.registry.edge(&key).expect("edge").overlay().is_none());
}

#[test]
fn hover_fetches_once_per_key() {
    let mut f = fixture();
    let key = f.key.clone();
    f.set_data(Some(activity(&key, 3)));

    f.hover_badge(0);
    f.hover_badge(10);
    assert_eq!(f.fetcher.started().len(), 1);
    assert!(f.overlays.is_in_flight(&key));

    // A completed fetch caches the result; further hovers stay quiet.
    let outcome = FetchOutcome {
        generation: f.overlays.generation(),
        key: key.clone(),
        result: Ok(vec![visit("c1")]),
    };
    f.overlays.fetch_completed(&mut f.surface, outcome, WALL_MS);
    f.hover_badge(30);
    assert_eq!(f.fetcher.started().len(), 1);
    assert_eq!(f.overlays.cached(&key).map(<[_]>::len), Some(1));
}

#[test]
fn reset_invalidates_cache_and_aborts_in_flight() {
    let mut f = fixture();
    let key = f.key.clone();
    f.set_data(Some(activity(&key, 3)));
    f.hover_badge(0);
    let stale_generation = f.overlays.generation();

    // Reset mid-flight: everything outstanding is aborted.
    f.set_data(Some(activity(&key, 4)));
    assert!(f.fetcher.aborts() >= 2);
    assert!(!f.overlays.is_in_flight(&key));

    // The stale response must not repopulate the fresh cache.
    let outcome = FetchOutcome {
        generation: stale_generation,
        key: key.clone(),
        result: Ok(vec![visit("c1")]),
    };
    f.overlays.fetch_completed(&mut f.surface, outcome, WALL_MS);
    assert!(f.overlays.cached(&key).is_none());

    // A new hover fetches again under the new generation.
    f.hover_badge(60);
    assert_eq!(f.fetcher.started().len(), 2);
    assert_eq!(f.fetcher.started()[1].generation, f.overlays.generation());
}

#[test]
fn popup_opens_after_delay_and_upgrades_from_loading() {
    let mut f = fixture();
    let key = f.key.clone();
    f.set_data(Some(activity(&key, 3)));

    f.hover_badge(0);
    f.pump(POPUP_SHOW_DELAY_MS - 1, false);
    assert!(f.surface.popup().is_none());

    f.pump(POPUP_SHOW_DELAY_MS, false);
    let (position, shown) = f.surface.popup().expect("popup");
    assert_eq!(*position, Point::new(100.0, 120.0));
    assert_eq!(*shown, ShownPopup::Loading);

    let outcome = FetchOutcome {
        generation: f.overlays.generation(),
        key: key.clone(),
        result: Ok(vec![visit("c1"), visit("c2")]),
    };
    f.overlays.fetch_completed(&mut f.surface, outcome, WALL_MS);
    let (_, shown) = f.surface.popup().expect("popup");
    let ShownPopup::Contacts(rows) = shown else {
        panic!("expected contact rows, got {shown:?}");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].contact_id, "c1");
}

#[test]
fn time_labels_compare_epoch_timestamps_against_the_wall_clock() {
    let mut f = fixture();
    let key = f.key.clone();
    f.set_data(Some(activity(&key, 3)));

    f.hover_badge(0);
    let outcome = FetchOutcome {
        generation: f.overlays.generation(),
        key: key.clone(),
        result: Ok(vec![ContactVisit::new(
            ContactId::new("c1").expect("contact id"),
            None,
            None,
            Some(WALL_MS - 3 * 24 * 60 * 60 * 1000),
        )]),
    };
    f.overlays.fetch_completed(&mut f.surface, outcome, WALL_MS);

    // The scheduler clock is tiny; the label must still reflect epoch time.
    f.pump(POPUP_SHOW_DELAY_MS, false);
    let (_, shown) = f.surface.popup().expect("popup");
    let ShownPopup::Contacts(rows) = shown else {
        panic!("expected contact rows, got {shown:?}");
    };
    assert_eq!(rows[0].when.as_deref(), Some("3d ago"));
}

#[test]
fn empty_and_failed_fetches_show_the_empty_state() {
    let mut f = fixture();
    let key = f.key.clone();
    f.set_data(Some(activity(&key, 3)));

    f.hover_badge(0);
    let failed = FetchOutcome {
        generation: f.overlays.generation(),
        key: key.clone(),
        result: Err(FetchError::Failed("timeout".to_owned())),
    };
    f.overlays.fetch_completed(&mut f.surface, failed, WALL_MS);
    f.pump(POPUP_SHOW_DELAY_MS, false);
    assert_eq!(f.surface.popup().map(|(_, shown)| shown), Some(&ShownPopup::Empty));

    // Failure leaves the key uncached, so the next hover retries.
    f.hover_badge(300);
    assert_eq!(f.fetcher.started().len(), 2);
}

#[test]
fn leaving_hides_after_grace_unless_popup_is_entered() {
    let mut f = fixture();
    let key = f.key.clone();
    f.set_data(Some(activity(&key, 3)));

    f.hover_badge(0);
    f.pump(POPUP_SHOW_DELAY_MS, false);
    assert!(f.surface.popup().is_some());

    // Leave, then move into the popup within the grace window: stays open.
    f.overlays.badge_left(&mut f.scheduler, 250);
    f.overlays.popup_entered(&mut f.scheduler);
    f.pump(250 + POPUP_HIDE_GRACE_MS + 10, false);
    assert!(f.surface.popup().is_some());

    // Leave the popup and let the grace elapse: closed.
    f.overlays.popup_left(&mut f.scheduler, 700);
    f.pump(700 + POPUP_HIDE_GRACE_MS, false);
    assert!(f.surface.popup().is_none());
    assert!(f.overlays.showing().is_none());
}

#[test]
fn leaving_before_the_delay_cancels_the_open() {
    let mut f = fixture();
    let key = f.key.clone();
    f.set_data(Some(activity(&key, 3)));

    f.hover_badge(0);
    f.overlays.badge_left(&mut f.scheduler, 50);
    f.pump(POPUP_SHOW_DELAY_MS + 100, false);
    assert!(f.surface.popup().is_none());
}

#[test]
fn simulation_overlay_suppresses_the_popup() {
    let mut f = fixture();
    let key = f.key.clone();
    f.set_data(Some(activity(&key, 3)));

    f.hover_badge(0);
    f.pump(POPUP_SHOW_DELAY_MS, true);
    assert!(f.surface.popup().is_none());
    assert!(f.overlays.showing().is_none());
}

#[test]
fn contact_click_closes_immediately_and_notifies() {
    let mut f = fixture();
    let key = f.key.clone();
    f.set_data(Some(activity(&key, 3)));

    f.hover_badge(0);
    let outcome = FetchOutcome {
        generation: f.overlays.generation(),
        key: key.clone(),
        result: Ok(vec![visit("c1")]),
    };
    f.overlays.fetch_completed(&mut f.surface, outcome, WALL_MS);
    f.pump(POPUP_SHOW_DELAY_MS, false);

    let contact = ContactId::new("c1").expect("contact id");
    let events = f
        .overlays
        .contact_clicked(&mut f.surface, &mut f.scheduler, contact.clone());
    assert_eq!(events, vec![ConnectionEvent::ContactClicked { edge: key, contact }]);
    assert!(f.surface.popup().is_none());

    // No grace timer survives the click.
    f.pump(10_000, false);
    assert!(f.surface.popup().is_none());
}

#[test]
fn aborted_outcome_is_ignored_entirely() {
    let mut f = fixture();
    let key = f.key.clone();
    f.set_data(Some(activity(&key, 3)));

    f.hover_badge(0);
    let outcome = FetchOutcome {
        generation: f.overlays.generation(),
        key: key.clone(),
        result: Err(FetchError::Aborted),
    };
    f.overlays.fetch_completed(&mut f.surface, outcome, WALL_MS);
    assert!(f.overlays.cached(&key).is_none());
    assert!(!f.overlays.is_in_flight(&key));
}
