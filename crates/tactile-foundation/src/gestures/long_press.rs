use super::base::{
    recognizer_builders, GestureContext, GestureDisposal, RecognizerBase, RefereeState,
};
use super::error::ReconcileError;
use super::event::{FingerInfo, GestureAction, GestureEvent, GestureJudgeResult, GestureType};
use super::GestureRecognizer;
use crate::gesture_constants::{DEFAULT_LONG_PRESS_DURATION_MS, LONG_PRESS_SLOP};
use crate::input::{AxisSample, FingerId, InputEventType, TouchSample, TouchType};
use indexmap::IndexMap;
use tactile_core::{DeadlineTimer, TimerQueue, TimerToken};

/// Recognizes `fingers` fingers held still for `duration` milliseconds.
#[derive(Debug, Clone)]
pub struct LongPressRecognizer {
    pub(crate) base: RecognizerBase,
    duration: u64,
    fingers: usize,
    slop: f32,
    touch_points: IndexMap<FingerId, TouchSample>,
    last_touch: Option<TouchSample>,
    hold: DeadlineTimer,
}

impl Default for LongPressRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_LONG_PRESS_DURATION_MS, 1)
    }
}

impl LongPressRecognizer {
    pub fn new(duration: u64, fingers: usize) -> Self {
        let duration = if duration == 0 {
            log::warn!("long press duration must be positive, using default");
            DEFAULT_LONG_PRESS_DURATION_MS
        } else {
            duration
        };
        Self {
            base: RecognizerBase::default(),
            duration,
            fingers: fingers.max(1),
            slop: LONG_PRESS_SLOP,
            touch_points: IndexMap::new(),
            last_touch: None,
            hold: DeadlineTimer::new(),
        }
    }

    pub fn with_slop(mut self, slop: f32) -> Self {
        if slop > 0.0 {
            self.slop = slop;
        }
        self
    }

    /// Hold time in milliseconds.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn fingers(&self) -> usize {
        self.fingers
    }

    pub fn reconcile_from(
        &mut self,
        mut incoming: LongPressRecognizer,
        timers: &mut TimerQueue,
    ) -> Result<(), ReconcileError> {
        if self.duration != incoming.duration
            || self.fingers != incoming.fingers
            || self.base.priority != incoming.base.priority
            || self.base.priority_mask != incoming.base.priority_mask
        {
            self.reset_status(timers);
            return Err(ReconcileError::ConfigMismatch {
                gesture_type: GestureType::LongPress,
            });
        }
        self.base.adopt_callbacks(&mut incoming.base);
        Ok(())
    }

    fn handle_touch_down(&mut self, touch: &TouchSample, cx: &mut GestureContext<'_>) {
        if self.base.state != RefereeState::Ready && self.base.state != RefereeState::Detecting {
            return;
        }
        if !self.base.hits_target(touch.position, cx) {
            self.base.adjudicate(GestureDisposal::Reject, cx);
            return;
        }
        self.touch_points.insert(touch.id, *touch);
        if self.touch_points.len() > self.fingers {
            self.base.adjudicate(GestureDisposal::Reject, cx);
            return;
        }
        if self.touch_points.len() == self.fingers {
            let deadline = touch.time.saturating_add(self.duration);
            self.hold.arm(cx.timers(), deadline);
            self.base.state = RefereeState::Detecting;
            log::trace!("long press armed until {deadline}ms");
        }
    }

    fn handle_touch_move(&mut self, touch: &TouchSample, cx: &mut GestureContext<'_>) {
        let Some(down) = self.touch_points.get(&touch.id) else {
            return;
        };
        let moved = down.position.distance_to(touch.position) > self.slop;
        if moved && matches!(self.base.state, RefereeState::Ready | RefereeState::Detecting) {
            log::trace!("long press finger {} moved beyond slop", touch.id);
            self.hold.cancel(cx.timers());
            self.base.adjudicate(GestureDisposal::Reject, cx);
        }
    }

    fn handle_touch_up(&mut self, touch: &TouchSample, cx: &mut GestureContext<'_>) {
        if !self.touch_points.contains_key(&touch.id) {
            return;
        }
        match self.base.state {
            RefereeState::Succeed => {
                if self.touch_points.len() == self.fingers {
                    let event = self.payload(cx);
                    self.base.fire(GestureAction::End, &event);
                }
            }
            RefereeState::Fail => {}
            _ => {
                self.hold.cancel(cx.timers());
                self.base.adjudicate(GestureDisposal::Reject, cx);
            }
        }
        self.touch_points.shift_remove(&touch.id);
    }

    fn handle_touch_cancel(&mut self, touch: &TouchSample, cx: &mut GestureContext<'_>) {
        match self.base.state {
            RefereeState::Succeed => {
                let event = self.payload(cx);
                self.base.fire(GestureAction::Cancel, &event);
                self.base.state = RefereeState::Ready;
            }
            RefereeState::Fail => {}
            _ => {
                self.hold.cancel(cx.timers());
                self.base.adjudicate(GestureDisposal::Reject, cx);
            }
        }
        self.touch_points.shift_remove(&touch.id);
    }

    fn payload(&self, cx: &GestureContext<'_>) -> GestureEvent {
        let mut event = GestureEvent {
            time: cx.now(),
            target: self.base.target(),
            input_event_type: self.base.input_event_type(),
            ..GestureEvent::default()
        };
        for touch in self.touch_points.values() {
            event.fingers.push(FingerInfo {
                id: touch.id,
                global: touch.position,
                local: self.base.to_local(touch.position, cx),
                source_type: touch.source_type,
                source_tool: touch.source_tool,
            });
        }
        if let Some(touch) = self.last_touch {
            event.source_type = touch.source_type;
            event.source_tool = touch.source_tool;
            event.force = touch.force;
            event.tilt_x = touch.tilt_x;
            event.tilt_y = touch.tilt_y;
        }
        event
    }
}

recognizer_builders!(LongPressRecognizer);

impl GestureRecognizer for LongPressRecognizer {
    fn base(&self) -> &RecognizerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RecognizerBase {
        &mut self.base
    }

    fn gesture_type(&self) -> GestureType {
        GestureType::LongPress
    }

    fn handle_touch(&mut self, touch: &TouchSample, cx: &mut GestureContext<'_>) {
        self.base.input_event_type = InputEventType::of_touch(touch);
        self.last_touch = Some(*touch);
        match touch.kind {
            TouchType::Down => {
                self.base.finger_down();
                self.handle_touch_down(touch, cx);
            }
            TouchType::Move => self.handle_touch_move(touch, cx),
            TouchType::Up => {
                self.base.finger_up();
                self.handle_touch_up(touch, cx);
            }
            TouchType::Cancel => {
                self.base.finger_up();
                self.handle_touch_cancel(touch, cx);
            }
        }
    }

    fn handle_axis(&mut self, _axis: &AxisSample, _cx: &mut GestureContext<'_>) {}

    fn on_timer(&mut self, token: TimerToken, cx: &mut GestureContext<'_>) -> bool {
        if !self.hold.fire(token) {
            return false;
        }
        if self.base.state != RefereeState::Detecting {
            return true;
        }
        let event = self.payload(cx);
        if self.base.judge(GestureType::LongPress, &event) == GestureJudgeResult::Reject {
            log::debug!("long press vetoed by gesture judge");
            self.base.adjudicate(GestureDisposal::Reject, cx);
        } else {
            self.base.adjudicate(GestureDisposal::Accept, cx);
        }
        true
    }

    fn on_accepted(&mut self, cx: &mut GestureContext<'_>) {
        log::debug!("long press accepted");
        self.base.state = RefereeState::Succeed;
        self.hold.cancel(cx.timers());
        let event = self.payload(cx);
        self.base.fire(GestureAction::Action, &event);
    }

    fn on_rejected(&mut self, cx: &mut GestureContext<'_>) {
        self.base.state = RefereeState::Fail;
        self.hold.cancel(cx.timers());
    }

    fn on_reset_status(&mut self, timers: &mut TimerQueue) {
        self.hold.cancel(timers);
        self.touch_points.clear();
        self.last_touch = None;
    }
}

#[cfg(test)]
#[path = "tests/long_press_tests.rs"]
mod tests;
