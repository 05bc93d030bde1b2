// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cooperative scheduling: cancellable delayed tasks plus a single-flight
//! frame flag.
//!
//! The engine never owns a timer thread. The host pumps time through
//! `ConnectionEngine::advance(now_ms)` and render ticks through
//! `ConnectionEngine::frame()`; this module only keeps the bookkeeping
//! deterministic: due tasks run in `(due, id)` order, and any number of frame
//! requests between ticks collapse into one.

use std::collections::BTreeMap;

use crate::model::EdgeKey;

/// Milliseconds on the host's monotonic clock.
pub type TimeMs = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// Everything the engine ever defers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Commit the pending-connection queue (debounce window elapsed).
    CommitPending,
    /// Open the recent-contacts popup for this edge.
    ShowPopup(EdgeKey),
    /// Close the popup (hide grace elapsed).
    HidePopup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Scheduled {
    due_ms: TimeMs,
    task: Task,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    pending: BTreeMap<TaskId, Scheduled>,
    frame_requested: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: TimeMs, task: Task) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.pending.insert(id, Scheduled { due_ms, task });
        id
    }

    /// Returns whether the task was still pending.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.pending.remove(&id).is_some()
    }

    /// Removes and returns every task due at `now`, ordered by due time then
    /// scheduling order.
    pub fn take_due(&mut self, now: TimeMs) -> Vec<Task> {
        let mut due = self
            .pending
            .iter()
            .filter(|(_, scheduled)| scheduled.due_ms <= now)
            .map(|(id, scheduled)| (scheduled.due_ms, *id))
            .collect::<Vec<_>>();
        due.sort();

        due.into_iter()
            .map(|(_, id)| self.pending.remove(&id).expect("task pending").task)
            .collect()
    }

    pub fn request_frame(&mut self) {
        self.frame_requested = true;
    }

    /// Consumes the frame flag; true at most once per render tick.
    pub fn take_frame(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.frame_requested = false;
    }
}
