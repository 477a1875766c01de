//! Gesture recognizers and the protocol they share with the referee.
//!
//! Every recognizer observes samples through [`GestureRecognizer::handle_touch`]
//! and [`GestureRecognizer::handle_axis`], votes on the current touch sequence
//! by casting a [`GestureDisposal`] into its [`GestureContext`], and later
//! receives the verdict through one of the `on_*` methods. Only the
//! recognizer's own methods change its [`RefereeState`].

mod base;
mod error;
mod event;
mod long_press;
mod pinch;
mod sequenced;
mod tap;

pub use base::{
    Ballot, GestureContext, GestureDisposal, GestureMask, GesturePriority, RecognizerBase,
    RefereeState,
};
pub(crate) use base::recognizer_builders;
pub use error::ReconcileError;
pub use event::{
    FingerInfo, GestureAction, GestureCallback, GestureCallbacks, GestureEvent, GestureInfo,
    GestureJudge, GestureJudgeResult, GestureType,
};
pub use long_press::LongPressRecognizer;
pub use pinch::PinchRecognizer;
pub use sequenced::SequencedRecognizer;
pub use tap::TapRecognizer;

use crate::input::{AxisSample, TouchSample};
use tactile_core::{TimerQueue, TimerToken};

/// Capabilities the referee (or an enclosing group) relies on.
pub trait GestureRecognizer {
    fn base(&self) -> &RecognizerBase;

    fn base_mut(&mut self) -> &mut RecognizerBase;

    fn gesture_type(&self) -> GestureType;

    fn state(&self) -> RefereeState {
        self.base().state()
    }

    fn disposal(&self) -> GestureDisposal {
        self.base().disposal()
    }

    fn priority(&self) -> GesturePriority {
        self.base().priority()
    }

    fn handle_touch(&mut self, touch: &TouchSample, cx: &mut GestureContext<'_>);

    fn handle_axis(&mut self, axis: &AxisSample, cx: &mut GestureContext<'_>);

    /// Offers a due timer. Returns `true` if the token belonged to this
    /// recognizer (or one of its children).
    fn on_timer(&mut self, _token: TimerToken, _cx: &mut GestureContext<'_>) -> bool {
        false
    }

    fn on_accepted(&mut self, cx: &mut GestureContext<'_>);

    fn on_rejected(&mut self, cx: &mut GestureContext<'_>);

    fn on_pending(&mut self, _cx: &mut GestureContext<'_>) {
        self.base_mut().state = RefereeState::Pending;
    }

    /// A competing gesture ranked ahead of this one is still undecided.
    fn on_blocked(&mut self, _cx: &mut GestureContext<'_>) {
        let base = self.base_mut();
        match base.disposal {
            GestureDisposal::Accept => base.state = RefereeState::SucceedBlocked,
            GestureDisposal::Pending => base.state = RefereeState::PendingBlocked,
            GestureDisposal::None | GestureDisposal::Reject => {}
        }
    }

    /// Called by an enclosing group right before it advances past this
    /// recognizer.
    fn about_to_accept(&mut self, cx: &mut GestureContext<'_>) {
        self.on_accepted(cx);
    }

    /// Clears per-sequence bookkeeping. Configuration survives.
    fn on_reset_status(&mut self, timers: &mut TimerQueue);

    /// Soft reset between independent touch sequences.
    fn reset_status(&mut self, timers: &mut TimerQueue) {
        self.on_reset_status(timers);
        self.base_mut().reset();
    }

    /// Reset used when the attached element is recycled. A recognizer that
    /// still has fingers down keeps tracking them.
    fn clean_recognizer_state(&mut self, timers: &mut TimerQueue) {
        let settled = matches!(
            self.state(),
            RefereeState::Succeed | RefereeState::Fail | RefereeState::Detecting
        );
        if settled && self.base().current_fingers() == 0 {
            self.reset_status(timers);
        }
    }

    /// Hard reset used when the attached element leaves the tree.
    fn force_clean_recognizer(&mut self, timers: &mut TimerQueue) {
        self.reset_status(timers);
    }
}

/// The closed set of recognizers the engine knows how to arbitrate.
#[derive(Debug, Clone)]
pub enum RecognizerKind {
    Tap(TapRecognizer),
    LongPress(LongPressRecognizer),
    Pinch(PinchRecognizer),
    Sequenced(SequencedRecognizer),
}

macro_rules! dispatch {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            RecognizerKind::Tap($inner) => $body,
            RecognizerKind::LongPress($inner) => $body,
            RecognizerKind::Pinch($inner) => $body,
            RecognizerKind::Sequenced($inner) => $body,
        }
    };
}

impl RecognizerKind {
    /// Moves the callbacks of `incoming` onto this recognizer when both
    /// describe the same gesture, keeping any in-flight state.
    ///
    /// On failure this recognizer is reset and `incoming` is dropped.
    pub fn reconcile_from(
        &mut self,
        incoming: RecognizerKind,
        timers: &mut TimerQueue,
    ) -> Result<(), ReconcileError> {
        match (&mut *self, incoming) {
            (RecognizerKind::Tap(current), RecognizerKind::Tap(incoming)) => {
                current.reconcile_from(incoming, timers)
            }
            (RecognizerKind::LongPress(current), RecognizerKind::LongPress(incoming)) => {
                current.reconcile_from(incoming, timers)
            }
            (RecognizerKind::Pinch(current), RecognizerKind::Pinch(incoming)) => {
                current.reconcile_from(incoming, timers)
            }
            (RecognizerKind::Sequenced(current), RecognizerKind::Sequenced(incoming)) => {
                current.reconcile_from(incoming, timers)
            }
            (current, incoming) => {
                let expected = current.gesture_type();
                current.force_clean_recognizer(timers);
                Err(ReconcileError::KindMismatch {
                    expected,
                    found: incoming.gesture_type(),
                })
            }
        }
    }

    pub fn as_long_press(&self) -> Option<&LongPressRecognizer> {
        match self {
            RecognizerKind::LongPress(long_press) => Some(long_press),
            _ => None,
        }
    }

    pub fn as_pinch(&self) -> Option<&PinchRecognizer> {
        match self {
            RecognizerKind::Pinch(pinch) => Some(pinch),
            _ => None,
        }
    }

    pub fn as_sequenced(&self) -> Option<&SequencedRecognizer> {
        match self {
            RecognizerKind::Sequenced(sequenced) => Some(sequenced),
            _ => None,
        }
    }

    pub fn as_tap(&self) -> Option<&TapRecognizer> {
        match self {
            RecognizerKind::Tap(tap) => Some(tap),
            _ => None,
        }
    }
}

impl GestureRecognizer for RecognizerKind {
    fn base(&self) -> &RecognizerBase {
        dispatch!(self, r => r.base())
    }

    fn base_mut(&mut self) -> &mut RecognizerBase {
        dispatch!(self, r => r.base_mut())
    }

    fn gesture_type(&self) -> GestureType {
        dispatch!(self, r => r.gesture_type())
    }

    fn handle_touch(&mut self, touch: &TouchSample, cx: &mut GestureContext<'_>) {
        dispatch!(self, r => r.handle_touch(touch, cx))
    }

    fn handle_axis(&mut self, axis: &AxisSample, cx: &mut GestureContext<'_>) {
        dispatch!(self, r => r.handle_axis(axis, cx))
    }

    fn on_timer(&mut self, token: TimerToken, cx: &mut GestureContext<'_>) -> bool {
        dispatch!(self, r => r.on_timer(token, cx))
    }

    fn on_accepted(&mut self, cx: &mut GestureContext<'_>) {
        dispatch!(self, r => r.on_accepted(cx))
    }

    fn on_rejected(&mut self, cx: &mut GestureContext<'_>) {
        dispatch!(self, r => r.on_rejected(cx))
    }

    fn on_pending(&mut self, cx: &mut GestureContext<'_>) {
        dispatch!(self, r => r.on_pending(cx))
    }

    fn on_blocked(&mut self, cx: &mut GestureContext<'_>) {
        dispatch!(self, r => r.on_blocked(cx))
    }

    fn about_to_accept(&mut self, cx: &mut GestureContext<'_>) {
        dispatch!(self, r => r.about_to_accept(cx))
    }

    fn on_reset_status(&mut self, timers: &mut TimerQueue) {
        dispatch!(self, r => r.on_reset_status(timers))
    }

    fn reset_status(&mut self, timers: &mut TimerQueue) {
        dispatch!(self, r => r.reset_status(timers))
    }

    fn clean_recognizer_state(&mut self, timers: &mut TimerQueue) {
        dispatch!(self, r => r.clean_recognizer_state(timers))
    }

    fn force_clean_recognizer(&mut self, timers: &mut TimerQueue) {
        dispatch!(self, r => r.force_clean_recognizer(timers))
    }
}

impl From<TapRecognizer> for RecognizerKind {
    fn from(value: TapRecognizer) -> Self {
        RecognizerKind::Tap(value)
    }
}

impl From<LongPressRecognizer> for RecognizerKind {
    fn from(value: LongPressRecognizer) -> Self {
        RecognizerKind::LongPress(value)
    }
}

impl From<PinchRecognizer> for RecognizerKind {
    fn from(value: PinchRecognizer) -> Self {
        RecognizerKind::Pinch(value)
    }
}

impl From<SequencedRecognizer> for RecognizerKind {
    fn from(value: SequencedRecognizer) -> Self {
        RecognizerKind::Sequenced(value)
    }
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
