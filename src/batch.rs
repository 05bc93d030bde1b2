// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Debounced batching for programmatic connects.
//!
//! Rebuilding a diagram wires many edges in one logical operation; each call
//! restarts the debounce window and the whole queue commits in a single pass
//! when it elapses. Commit order is call order, so a later duplicate source
//! wins through the registry's replace semantics. No partial commit is ever
//! observable before the window fires.

use crate::model::{ExitId, TargetId};
use crate::registry::ConnectionRegistry;
use crate::sched::{Scheduler, Task, TaskId, TimeMs};
use crate::surface::Surface;

/// Debounce window for programmatic connects.
pub const CONNECT_DEBOUNCE_MS: TimeMs = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConnection {
    scope: String,
    source: ExitId,
    target: TargetId,
}

impl PendingConnection {
    pub fn new(scope: impl Into<String>, source: ExitId, target: TargetId) -> Self {
        Self { scope: scope.into(), source, target }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn source(&self) -> &ExitId {
        &self.source
    }

    pub fn target(&self) -> &TargetId {
        &self.target
    }
}

#[derive(Debug, Default)]
pub struct PendingConnections {
    queue: Vec<PendingConnection>,
    timer: Option<TaskId>,
}

impl PendingConnections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a request and (re)starts the debounce window.
    pub fn push(&mut self, scheduler: &mut Scheduler, now: TimeMs, request: PendingConnection) {
        self.queue.push(request);
        if let Some(timer) = self.timer.take() {
            scheduler.cancel(timer);
        }
        self.timer = Some(scheduler.schedule(now + CONNECT_DEBOUNCE_MS, Task::CommitPending));
    }

    /// Commits every queued triple in call order; runs when the window fires.
    pub fn commit(&mut self, surface: &mut dyn Surface, registry: &mut ConnectionRegistry) -> usize {
        self.timer = None;
        let queue = std::mem::take(&mut self.queue);
        let committed = queue.len();
        for request in queue {
            let PendingConnection { scope, source, target } = request;
            registry.create(surface, &scope, source, target);
        }
        if committed > 0 {
            log::debug!("committed {committed} pending connection(s)");
        }
        committed
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Teardown: drops the queue and cancels the live window.
    pub fn clear(&mut self, scheduler: &mut Scheduler) {
        self.queue.clear();
        if let Some(timer) = self.timer.take() {
            scheduler.cancel(timer);
        }
    }
}
