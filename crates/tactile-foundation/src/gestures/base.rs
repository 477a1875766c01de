//! Bookkeeping shared by every recognizer, and the context recognizers are
//! driven with.

use super::event::{
    GestureAction, GestureCallbacks, GestureEvent, GestureInfo, GestureJudge, GestureJudgeResult,
    GestureType,
};
use crate::input::{InputEventType, TargetGeometry};
use smallvec::SmallVec;
use tactile_core::{NodeId, TimerQueue};
use tactile_geometry::Point;

/// Where a recognizer stands in the arbitration of the current touch sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RefereeState {
    #[default]
    Ready,
    Detecting,
    Pending,
    PendingBlocked,
    SucceedBlocked,
    Succeed,
    Fail,
}

impl RefereeState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RefereeState::Succeed | RefereeState::Fail)
    }

    /// States in which the referee still owes this recognizer a verdict.
    pub fn is_unresolved(self) -> bool {
        matches!(
            self,
            RefereeState::Pending | RefereeState::PendingBlocked | RefereeState::SucceedBlocked
        )
    }
}

/// A recognizer's vote on the current touch sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GestureDisposal {
    #[default]
    None,
    Accept,
    Pending,
    Reject,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GesturePriority {
    #[default]
    Low,
    High,
    /// Recognized alongside other gestures instead of competing with them.
    Parallel,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GestureMask {
    #[default]
    Normal,
    IgnoreInternal,
}

/// Votes cast by the recognizer currently being driven.
///
/// Whoever drives a recognizer (the referee for top-level recognizers, a
/// group for its children) hands it a fresh ballot and reads the votes back
/// once the call returns, so verdicts are never delivered into a recognizer
/// that is still on the stack.
#[derive(Debug, Default)]
pub struct Ballot {
    votes: SmallVec<[GestureDisposal; 2]>,
}

impl Ballot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cast(&mut self, disposal: GestureDisposal) {
        self.votes.push(disposal);
    }

    pub fn take(&mut self) -> SmallVec<[GestureDisposal; 2]> {
        std::mem::take(&mut self.votes)
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}

/// Everything a recognizer may touch while handling one call.
pub struct GestureContext<'a> {
    ballot: &'a mut Ballot,
    timers: &'a mut TimerQueue,
    targets: &'a dyn TargetGeometry,
    flush_end: bool,
}

impl<'a> GestureContext<'a> {
    pub fn new(
        ballot: &'a mut Ballot,
        timers: &'a mut TimerQueue,
        targets: &'a dyn TargetGeometry,
    ) -> Self {
        Self {
            ballot,
            timers,
            targets,
            flush_end: true,
        }
    }

    /// Marks whether the sample being handled is the last of its batch.
    pub fn with_flush_end(mut self, flush_end: bool) -> Self {
        self.flush_end = flush_end;
        self
    }

    /// Context for driving a child: same timers and geometry, separate ballot.
    pub fn scoped<'b>(&'b mut self, ballot: &'b mut Ballot) -> GestureContext<'b> {
        GestureContext {
            ballot,
            timers: &mut *self.timers,
            targets: self.targets,
            flush_end: self.flush_end,
        }
    }

    pub fn cast(&mut self, disposal: GestureDisposal) {
        self.ballot.cast(disposal);
    }

    pub fn timers(&mut self) -> &mut TimerQueue {
        &mut *self.timers
    }

    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    pub fn targets(&self) -> &dyn TargetGeometry {
        self.targets
    }

    /// Whether the current touch batch has finished flushing.
    pub fn is_flush_end(&self) -> bool {
        self.flush_end
    }
}

/// State every recognizer embeds.
#[derive(Default, Clone)]
pub struct RecognizerBase {
    pub(crate) state: RefereeState,
    pub(crate) disposal: GestureDisposal,
    pub(crate) priority: GesturePriority,
    pub(crate) priority_mask: GestureMask,
    pub(crate) callbacks: GestureCallbacks,
    pub(crate) judge: Option<GestureJudge>,
    pub(crate) target: Option<NodeId>,
    pub(crate) tag: Option<String>,
    /// Fingers currently down as seen by this recognizer.
    pub(crate) current_fingers: usize,
    pub(crate) input_event_type: InputEventType,
}

impl std::fmt::Debug for RecognizerBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognizerBase")
            .field("state", &self.state)
            .field("disposal", &self.disposal)
            .field("priority", &self.priority)
            .field("priority_mask", &self.priority_mask)
            .field("callbacks", &self.callbacks)
            .field("judge", &self.judge.as_ref().map(|_| "provided"))
            .field("target", &self.target)
            .field("tag", &self.tag)
            .field("current_fingers", &self.current_fingers)
            .field("input_event_type", &self.input_event_type)
            .finish()
    }
}

impl RecognizerBase {
    pub fn state(&self) -> RefereeState {
        self.state
    }

    pub fn disposal(&self) -> GestureDisposal {
        self.disposal
    }

    pub fn priority(&self) -> GesturePriority {
        self.priority
    }

    pub fn priority_mask(&self) -> GestureMask {
        self.priority_mask
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn current_fingers(&self) -> usize {
        self.current_fingers
    }

    pub fn input_event_type(&self) -> InputEventType {
        self.input_event_type
    }

    /// Records `disposal` as this recognizer's vote and reports it upward.
    pub(crate) fn adjudicate(&mut self, disposal: GestureDisposal, cx: &mut GestureContext<'_>) {
        self.disposal = disposal;
        cx.cast(disposal);
    }

    /// Back to `Ready` with no vote and no fingers down.
    pub(crate) fn reset(&mut self) {
        self.state = RefereeState::Ready;
        self.disposal = GestureDisposal::None;
        self.current_fingers = 0;
    }

    pub(crate) fn finger_down(&mut self) {
        self.current_fingers += 1;
    }

    pub(crate) fn finger_up(&mut self) {
        self.current_fingers = self.current_fingers.saturating_sub(1);
    }

    pub(crate) fn fire(&self, action: GestureAction, event: &GestureEvent) {
        if self.callbacks.fire(action, event) {
            log::trace!("fired {action:?} callback");
        }
    }

    /// Whether `point` lands on the attached element. Detached recognizers
    /// accept every point.
    pub(crate) fn hits_target(&self, point: Point, cx: &GestureContext<'_>) -> bool {
        match self.target {
            Some(node) => cx.targets().contains(node, point),
            None => true,
        }
    }

    pub(crate) fn to_local(&self, point: Point, cx: &GestureContext<'_>) -> Point {
        match self.target {
            Some(node) => cx.targets().to_local(node, point),
            None => point,
        }
    }

    /// Asks the gesture judge, if any, whether acceptance may proceed.
    pub(crate) fn judge(&self, gesture_type: GestureType, event: &GestureEvent) -> GestureJudgeResult {
        let Some(judge) = self.judge.as_ref() else {
            return GestureJudgeResult::Continue;
        };
        let info = GestureInfo {
            gesture_type,
            tag: self.tag.clone(),
            target: self.target,
        };
        judge(&info, event)
    }

    /// Takes the user-facing configuration of `incoming`, keeping in-flight state.
    pub(crate) fn adopt_callbacks(&mut self, incoming: &mut RecognizerBase) {
        self.callbacks = std::mem::take(&mut incoming.callbacks);
        self.judge = incoming.judge.take();
        self.tag = incoming.tag.take();
    }
}

/// Builder methods shared by every recognizer through [`RecognizerBase`].
macro_rules! recognizer_builders {
    ($ty:ty) => {
        impl $ty {
            pub fn with_priority(mut self, priority: $crate::gestures::GesturePriority) -> Self {
                self.base.priority = priority;
                self
            }

            pub fn with_priority_mask(mut self, mask: $crate::gestures::GestureMask) -> Self {
                self.base.priority_mask = mask;
                self
            }

            pub fn with_callbacks(mut self, callbacks: $crate::gestures::GestureCallbacks) -> Self {
                self.base.callbacks = callbacks;
                self
            }

            pub fn with_judge(
                mut self,
                judge: impl Fn(
                        &$crate::gestures::GestureInfo,
                        &$crate::gestures::GestureEvent,
                    ) -> $crate::gestures::GestureJudgeResult
                    + 'static,
            ) -> Self {
                self.base.judge = Some(std::rc::Rc::new(judge));
                self
            }

            pub fn with_target(mut self, node: tactile_core::NodeId) -> Self {
                self.base.target = Some(node);
                self
            }

            pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
                self.base.tag = Some(tag.into());
                self
            }
        }
    };
}

pub(crate) use recognizer_builders;
