//! Helpers for driving recognizers without a referee.

use super::{Ballot, GestureAction, GestureCallbacks, GestureContext, GestureDisposal, GestureEvent};
use crate::input::{TargetGeometry, Unbounded};
use std::cell::RefCell;
use std::rc::Rc;
use tactile_core::TimerQueue;

/// Runs `f` against `recognizer` and returns the votes it cast.
pub(crate) fn drive<T>(
    recognizer: &mut T,
    timers: &mut TimerQueue,
    f: impl FnOnce(&mut T, &mut GestureContext<'_>),
) -> Vec<GestureDisposal> {
    drive_with(recognizer, timers, &Unbounded, true, f)
}

pub(crate) fn drive_with<T>(
    recognizer: &mut T,
    timers: &mut TimerQueue,
    targets: &dyn TargetGeometry,
    flush_end: bool,
    f: impl FnOnce(&mut T, &mut GestureContext<'_>),
) -> Vec<GestureDisposal> {
    let mut ballot = Ballot::new();
    {
        let mut cx = GestureContext::new(&mut ballot, timers, targets).with_flush_end(flush_end);
        f(recognizer, &mut cx);
    }
    ballot.take().into_vec()
}

/// Records every callback fired through the callbacks it hands out.
#[derive(Clone, Default)]
pub(crate) struct Recorded {
    events: Rc<RefCell<Vec<(GestureAction, GestureEvent)>>>,
}

impl Recorded {
    pub(crate) fn callbacks(&self) -> GestureCallbacks {
        let slot = |action: GestureAction| {
            let events = Rc::clone(&self.events);
            move |event: &GestureEvent| events.borrow_mut().push((action, event.clone()))
        };
        GestureCallbacks::new()
            .on_action(slot(GestureAction::Action))
            .on_action_start(slot(GestureAction::Start))
            .on_action_update(slot(GestureAction::Update))
            .on_action_end(slot(GestureAction::End))
            .on_action_cancel(slot(GestureAction::Cancel))
    }

    pub(crate) fn actions(&self) -> Vec<GestureAction> {
        self.events.borrow().iter().map(|(action, _)| *action).collect()
    }

    pub(crate) fn count(&self, action: GestureAction) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|(recorded, _)| *recorded == action)
            .count()
    }

    pub(crate) fn last(&self, action: GestureAction) -> Option<GestureEvent> {
        self.events
            .borrow()
            .iter()
            .rev()
            .find(|(recorded, _)| *recorded == action)
            .map(|(_, event)| event.clone())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}
