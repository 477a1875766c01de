//! Callback capture for assertions on what a recognizer reported.

use std::cell::RefCell;
use std::rc::Rc;
use tactile_foundation::{GestureAction, GestureCallbacks, GestureEvent};

/// Collects every callback fired through the [`GestureCallbacks`] it builds.
///
/// Clones share the same log, so a test can keep one handle and give the
/// callbacks to a recognizer.
#[derive(Clone, Default)]
pub struct CallbackRecorder {
    events: Rc<RefCell<Vec<(GestureAction, GestureEvent)>>>,
}

impl CallbackRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callbacks for all five actions, each appending to this recorder.
    pub fn callbacks(&self) -> GestureCallbacks {
        let slot = |action: GestureAction| {
            let events = Rc::clone(&self.events);
            move |event: &GestureEvent| {
                log::trace!("recorded {action:?}");
                events.borrow_mut().push((action, event.clone()));
            }
        };
        GestureCallbacks::new()
            .on_action(slot(GestureAction::Action))
            .on_action_start(slot(GestureAction::Start))
            .on_action_update(slot(GestureAction::Update))
            .on_action_end(slot(GestureAction::End))
            .on_action_cancel(slot(GestureAction::Cancel))
    }

    /// Actions in the order they fired.
    pub fn actions(&self) -> Vec<GestureAction> {
        self.events.borrow().iter().map(|(action, _)| *action).collect()
    }

    pub fn events(&self) -> Vec<(GestureAction, GestureEvent)> {
        self.events.borrow().clone()
    }

    pub fn count(&self, action: GestureAction) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|(recorded, _)| *recorded == action)
            .count()
    }

    /// Payload of the most recent `action`.
    pub fn last(&self, action: GestureAction) -> Option<GestureEvent> {
        self.events
            .borrow()
            .iter()
            .rev()
            .find(|(recorded, _)| *recorded == action)
            .map(|(_, event)| event.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
