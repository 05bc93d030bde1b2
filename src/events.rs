// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Connection lifecycle notifications.
//!
//! Subsystems emit intent as events; observers (the surrounding editor, and
//! the engine's own commit path) react. Dispatch is synchronous and in emit
//! order.

use crate::model::{ContactId, EdgeKey, ExitId, TargetId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A drag gesture started on this source.
    DragStart { source: ExitId },
    /// The gesture ended with no valid target; the model is unchanged.
    DragAbort { source: ExitId },
    /// The source's existing edge is about to be replaced.
    Detach { source: ExitId, target: TargetId },
    /// A new connection was requested (by drag or programmatically).
    Connect { scope: String, source: ExitId, target: TargetId },
    /// A row in the recent-contacts popup was clicked.
    ContactClicked { edge: EdgeKey, contact: ContactId },
}

pub type Observer = Box<dyn FnMut(&ConnectionEvent)>;

#[derive(Default)]
pub struct EventBus {
    observers: Vec<Observer>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    pub fn emit(&mut self, event: &ConnectionEvent) {
        for observer in &mut self.observers {
            observer(event);
        }
    }

}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::model::ExitId;

    use super::{ConnectionEvent, EventBus};

    #[test]
    fn emit_reaches_every_observer_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for tag in ["first", "second"] {
            let seen = Rc::clone(&seen);
            bus.subscribe(Box::new(move |event| {
                seen.borrow_mut().push((tag, event.clone()));
            }));
        }

        let source = ExitId::new("exit-1").expect("id");
        bus.emit(&ConnectionEvent::DragStart { source: source.clone() });

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "first");
        assert_eq!(seen[1].0, "second");
        assert!(seen
            .iter()
            .all(|(_, event)| *event == ConnectionEvent::DragStart { source: source.clone() }));
    }
}
