//! Compound gesture made of children recognized one after another.
//!
//! Only the child at `current_index` sees input. When it wants to accept and
//! more children follow, the group asks the referee to put it in `Pending`
//! and moves on to the next child once the referee agrees. The group itself
//! succeeds only when the last child accepts. A group left `Pending` after
//! the user lifts every finger gives up after [`SEQUENCE_TIMEOUT_MS`].

use super::base::{
    recognizer_builders, Ballot, GestureContext, GestureDisposal, RecognizerBase, RefereeState,
};
use super::error::ReconcileError;
use super::event::{GestureAction, GestureEvent, GestureType};
use super::{GestureRecognizer, RecognizerKind};
use crate::gesture_constants::SEQUENCE_TIMEOUT_MS;
use crate::input::{
    AxisAction, AxisSample, FingerId, InputEventType, TouchSample, TouchType,
};
use indexmap::IndexMap;
use smallvec::SmallVec;
use tactile_core::{DeadlineTimer, TimerQueue, TimerToken};

#[derive(Debug, Clone)]
pub struct SequencedRecognizer {
    pub(crate) base: RecognizerBase,
    children: Vec<RecognizerKind>,
    current_index: usize,
    /// Latest sample of every finger still down, replayed into a child that
    /// becomes active mid-sequence.
    touch_points: IndexMap<FingerId, TouchSample>,
    /// Child that saw the Begin of the axis segment in progress.
    axis_child: Option<usize>,
    deadline: DeadlineTimer,
    /// Time of the last UP (or axis END) since the last DOWN.
    released_at: Option<u64>,
}

impl SequencedRecognizer {
    pub fn new(children: impl IntoIterator<Item = RecognizerKind>) -> Self {
        let children: Vec<RecognizerKind> = children.into_iter().collect();
        if children.is_empty() {
            log::warn!("sequenced gesture created without children");
        }
        Self {
            base: RecognizerBase::default(),
            children,
            current_index: 0,
            touch_points: IndexMap::new(),
            axis_child: None,
            deadline: DeadlineTimer::new(),
            released_at: None,
        }
    }

    pub fn children(&self) -> &[RecognizerKind] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&RecognizerKind> {
        self.children.get(index)
    }

    /// Index of the child currently receiving input.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Whether the inter-gesture deadline is running.
    pub fn is_waiting(&self) -> bool {
        self.deadline.is_armed()
    }

    pub fn reconcile_from(
        &mut self,
        mut incoming: SequencedRecognizer,
        timers: &mut TimerQueue,
    ) -> Result<(), ReconcileError> {
        if self.children.len() != incoming.children.len() {
            self.force_clean_recognizer(timers);
            return Err(ReconcileError::ChildCountMismatch {
                expected: self.children.len(),
                found: incoming.children.len(),
            });
        }
        if self.base.priority_mask != incoming.base.priority_mask {
            self.force_clean_recognizer(timers);
            return Err(ReconcileError::ConfigMismatch {
                gesture_type: GestureType::Sequenced,
            });
        }

        let pairs = self.children.iter_mut().zip(incoming.children.drain(..));
        let mut failure = None;
        for (index, (current, replacement)) in pairs.enumerate() {
            if let Err(source) = current.reconcile_from(replacement, timers) {
                failure = Some(ReconcileError::ChildMismatch {
                    index,
                    source: Box::new(source),
                });
                break;
            }
        }
        if let Some(error) = failure {
            self.force_clean_recognizer(timers);
            return Err(error);
        }

        self.base.adopt_callbacks(&mut incoming.base);
        Ok(())
    }

    /// Runs `f` against one child with a ballot of its own, then turns the
    /// child's votes into group decisions.
    fn drive_child<R>(
        &mut self,
        index: usize,
        cx: &mut GestureContext<'_>,
        f: impl FnOnce(&mut RecognizerKind, &mut GestureContext<'_>) -> R,
    ) -> Option<R> {
        let mut ballot = Ballot::new();
        let result = {
            let child = self.children.get_mut(index)?;
            let mut child_cx = cx.scoped(&mut ballot);
            f(child, &mut child_cx)
        };
        for disposal in ballot.take() {
            self.batch_adjudicate(index, disposal, cx);
        }
        Some(result)
    }

    fn batch_adjudicate(
        &mut self,
        index: usize,
        disposal: GestureDisposal,
        cx: &mut GestureContext<'_>,
    ) {
        log::trace!("sequenced child {index} voted {disposal:?}");
        if index != self.current_index || self.base.state == RefereeState::Fail {
            let stale = self
                .children
                .get(index)
                .is_some_and(|child| child.state() != RefereeState::Fail);
            if disposal == GestureDisposal::Reject && stale {
                self.drive_child(index, cx, |child, cx| child.on_rejected(cx));
            }
            return;
        }

        match disposal {
            GestureDisposal::Accept => {
                if index + 1 == self.children.len() {
                    self.group_adjudicate(GestureDisposal::Accept, cx);
                } else if self.base.state == RefereeState::Pending {
                    self.drive_child(index, cx, |child, cx| child.about_to_accept(cx));
                    self.update_current_index(cx);
                } else {
                    self.group_adjudicate(GestureDisposal::Pending, cx);
                }
            }
            GestureDisposal::Reject => self.group_adjudicate(GestureDisposal::Reject, cx),
            GestureDisposal::Pending => {
                if self.base.state == RefereeState::Pending {
                    self.drive_child(index, cx, |child, cx| child.on_pending(cx));
                } else {
                    self.group_adjudicate(GestureDisposal::Pending, cx);
                }
            }
            GestureDisposal::None => {}
        }
    }

    fn group_adjudicate(&mut self, disposal: GestureDisposal, cx: &mut GestureContext<'_>) {
        log::debug!(
            "sequenced gesture votes {disposal:?} at child {}",
            self.current_index
        );
        self.base.adjudicate(disposal, cx);
    }

    fn update_current_index(&mut self, cx: &mut GestureContext<'_>) {
        if self.current_index + 1 >= self.children.len() {
            return;
        }
        self.current_index += 1;
        log::debug!("sequenced gesture advanced to child {}", self.current_index);

        if !self.check_between_two_long_press() {
            return;
        }
        let offset = self.children[self.current_index - 1]
            .as_long_press()
            .map_or(0, |long_press| long_press.duration());
        let downs: SmallVec<[TouchSample; 5]> = self
            .touch_points
            .values()
            .map(|touch| TouchSample {
                time: touch.time.saturating_add(offset),
                ..touch.retyped(TouchType::Down)
            })
            .collect();
        let index = self.current_index;
        for down in &downs {
            self.drive_child(index, cx, |child, cx| child.handle_touch(down, cx));
        }
    }

    /// A mouse button held through consecutive long presses.
    fn check_between_two_long_press(&self) -> bool {
        if self.current_index == 0 || self.base.input_event_type != InputEventType::MouseButton {
            return false;
        }
        let previous = &self.children[self.current_index - 1];
        let current = self.children.get(self.current_index);
        matches!(previous, RecognizerKind::LongPress(_))
            && matches!(current, Some(RecognizerKind::LongPress(_)))
    }

    fn start_deadline(&mut self, released_at: u64, cx: &mut GestureContext<'_>) {
        let deadline = released_at.saturating_add(SEQUENCE_TIMEOUT_MS);
        self.deadline.arm(cx.timers(), deadline);
        log::trace!("sequenced gesture waits for next child until {deadline}ms");
    }

    fn payload(&self, cx: &GestureContext<'_>) -> GestureEvent {
        GestureEvent {
            time: cx.now(),
            target: self.base.target(),
            input_event_type: self.base.input_event_type(),
            ..GestureEvent::default()
        }
    }

    fn reset_children(&mut self, timers: &mut TimerQueue) {
        for child in &mut self.children {
            child.reset_status(timers);
        }
    }
}

recognizer_builders!(SequencedRecognizer);

impl GestureRecognizer for SequencedRecognizer {
    fn base(&self) -> &RecognizerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RecognizerBase {
        &mut self.base
    }

    fn gesture_type(&self) -> GestureType {
        GestureType::Sequenced
    }

    fn handle_touch(&mut self, touch: &TouchSample, cx: &mut GestureContext<'_>) {
        self.base.input_event_type = InputEventType::of_touch(touch);
        match touch.kind {
            TouchType::Down => self.base.finger_down(),
            TouchType::Up | TouchType::Cancel => self.base.finger_up(),
            TouchType::Move => {}
        }

        if self.base.state != RefereeState::Fail {
            if touch.kind == TouchType::Down {
                self.deadline.cancel(cx.timers());
                self.released_at = None;
                if self.base.state == RefereeState::Ready {
                    self.base.state = RefereeState::Detecting;
                }
            }

            match self.children.get(self.current_index) {
                None => {
                    log::warn!(
                        "sequenced gesture has no child at index {}",
                        self.current_index
                    );
                    self.group_adjudicate(GestureDisposal::Reject, cx);
                }
                Some(child) => {
                    let index = self.current_index;
                    if child.state() == RefereeState::Ready && !self.check_between_two_long_press()
                    {
                        let replay: SmallVec<[TouchSample; 5]> = self
                            .touch_points
                            .values()
                            .filter(|buffered| {
                                touch.kind != TouchType::Down || buffered.id != touch.id
                            })
                            .map(|buffered| buffered.retyped(TouchType::Down))
                            .collect();
                        for down in &replay {
                            self.drive_child(index, cx, |child, cx| child.handle_touch(down, cx));
                        }
                    }
                    let index = self.current_index;
                    self.drive_child(index, cx, |child, cx| child.handle_touch(touch, cx));
                }
            }
        }

        match touch.kind {
            TouchType::Down | TouchType::Move => {
                self.touch_points.insert(touch.id, *touch);
            }
            TouchType::Up | TouchType::Cancel => {
                self.touch_points.shift_remove(&touch.id);
            }
        }

        if touch.kind == TouchType::Up {
            self.released_at = Some(touch.time);
            if self.base.state == RefereeState::Pending && self.base.current_fingers() == 0 {
                self.start_deadline(touch.time, cx);
            }
        }
    }

    fn handle_axis(&mut self, axis: &AxisSample, cx: &mut GestureContext<'_>) {
        if axis.action == AxisAction::None {
            return;
        }
        self.base.input_event_type = InputEventType::Axis;
        match axis.action {
            AxisAction::Begin => self.base.finger_down(),
            AxisAction::End | AxisAction::Cancel => self.base.finger_up(),
            AxisAction::Update | AxisAction::None => {}
        }
        if self.base.state == RefereeState::Fail {
            return;
        }

        if axis.action == AxisAction::Begin {
            self.deadline.cancel(cx.timers());
            self.released_at = None;
            self.axis_child = Some(self.current_index);
            if self.base.state == RefereeState::Ready {
                self.base.state = RefereeState::Detecting;
            }
        }

        if self.children.get(self.current_index).is_none() {
            log::warn!(
                "sequenced gesture has no child at index {}",
                self.current_index
            );
            self.group_adjudicate(GestureDisposal::Reject, cx);
            return;
        }
        // A child activated mid-segment waits for the next Begin.
        if self.axis_child == Some(self.current_index) {
            let index = self.current_index;
            self.drive_child(index, cx, |child, cx| child.handle_axis(axis, cx));
        }

        match axis.action {
            AxisAction::End => {
                self.axis_child = None;
                self.released_at = Some(axis.time);
                if self.base.state == RefereeState::Pending && self.base.current_fingers() == 0 {
                    self.start_deadline(axis.time, cx);
                }
            }
            AxisAction::Cancel => self.axis_child = None,
            AxisAction::Begin | AxisAction::Update | AxisAction::None => {}
        }
    }

    fn on_timer(&mut self, token: TimerToken, cx: &mut GestureContext<'_>) -> bool {
        for index in 0..self.children.len() {
            let consumed = self
                .drive_child(index, cx, |child, cx| child.on_timer(token, cx))
                .unwrap_or(false);
            if consumed {
                return true;
            }
        }
        if !self.deadline.fire(token) {
            return false;
        }
        if self.base.state == RefereeState::Pending {
            log::debug!(
                "sequenced gesture timed out waiting for child {}",
                self.current_index
            );
            self.group_adjudicate(GestureDisposal::Reject, cx);
        }
        true
    }

    fn on_accepted(&mut self, cx: &mut GestureContext<'_>) {
        log::debug!("sequenced gesture accepted");
        self.base.state = RefereeState::Succeed;
        self.deadline.cancel(cx.timers());
        let index = self.current_index;
        self.drive_child(index, cx, |child, cx| child.about_to_accept(cx));
        self.update_current_index(cx);
    }

    fn on_rejected(&mut self, cx: &mut GestureContext<'_>) {
        log::debug!("sequenced gesture rejected at child {}", self.current_index);
        let activated = self.current_index > 0
            || self
                .children
                .get(self.current_index)
                .is_some_and(|child| child.state() != RefereeState::Ready);
        self.base.state = RefereeState::Fail;
        self.deadline.cancel(cx.timers());
        for index in self.current_index..self.children.len() {
            self.drive_child(index, cx, |child, cx| child.on_rejected(cx));
        }
        if activated {
            let event = self.payload(cx);
            self.base.fire(GestureAction::Cancel, &event);
        }
    }

    fn on_pending(&mut self, cx: &mut GestureContext<'_>) {
        self.base.state = RefereeState::Pending;
        let index = self.current_index;
        match self.children.get(index).map(|child| child.disposal()) {
            Some(GestureDisposal::Accept) => {
                self.drive_child(index, cx, |child, cx| child.about_to_accept(cx));
                self.update_current_index(cx);
            }
            Some(GestureDisposal::Pending) => {
                self.drive_child(index, cx, |child, cx| child.on_pending(cx));
            }
            _ => {}
        }
        if let Some(released_at) = self.released_at {
            if self.base.current_fingers() == 0 && !self.deadline.is_armed() {
                self.start_deadline(released_at, cx);
            }
        }
    }

    fn on_blocked(&mut self, cx: &mut GestureContext<'_>) {
        match self.base.disposal {
            GestureDisposal::Accept => self.base.state = RefereeState::SucceedBlocked,
            GestureDisposal::Pending => {
                self.base.state = RefereeState::PendingBlocked;
                let index = self.current_index;
                self.drive_child(index, cx, |child, cx| child.on_blocked(cx));
            }
            GestureDisposal::None | GestureDisposal::Reject => {}
        }
    }

    fn on_reset_status(&mut self, timers: &mut TimerQueue) {
        self.current_index = 0;
        self.deadline.cancel(timers);
        self.touch_points.clear();
        self.axis_child = None;
        self.released_at = None;
        self.reset_children(timers);
    }

    fn clean_recognizer_state(&mut self, timers: &mut TimerQueue) {
        for child in &mut self.children {
            child.clean_recognizer_state(timers);
        }
        let settled = matches!(
            self.base.state,
            RefereeState::Succeed | RefereeState::Fail | RefereeState::Detecting
        );
        if settled && self.base.current_fingers() == 0 {
            self.deadline.cancel(timers);
            self.touch_points.clear();
            self.axis_child = None;
            self.released_at = None;
            self.base.reset();
        }
        self.current_index = 0;
    }

    fn force_clean_recognizer(&mut self, timers: &mut TimerQueue) {
        for child in &mut self.children {
            child.force_clean_recognizer(timers);
        }
        self.reset_status(timers);
    }
}

#[cfg(test)]
#[path = "tests/sequenced_tests.rs"]
mod tests;
