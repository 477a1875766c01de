//! Single and multi-tap recognizer.

use super::base::{
    recognizer_builders, GestureContext, GestureDisposal, RecognizerBase, RefereeState,
};
use super::error::ReconcileError;
use super::event::{FingerInfo, GestureAction, GestureEvent, GestureJudgeResult, GestureType};
use super::GestureRecognizer;
use crate::gesture_constants::{MULTI_TAP_SLOP, MULTI_TAP_TIMEOUT_MS, TAP_SLOP};
use crate::input::{AxisSample, FingerId, InputEventType, TouchSample, TouchType};
use indexmap::IndexMap;
use tactile_core::{DeadlineTimer, TimerQueue, TimerToken};
use tactile_geometry::Point;

/// Recognizes `count` consecutive taps made with `fingers` fingers.
///
/// A tap completes when every finger has lifted without moving further than
/// the tap slop. Between taps the recognizer waits at most
/// [`MULTI_TAP_TIMEOUT_MS`] for the next touch.
#[derive(Debug, Clone)]
pub struct TapRecognizer {
    pub(crate) base: RecognizerBase,
    count: u32,
    fingers: usize,
    slop: f32,
    /// DOWN sample of every finger in the current tap.
    touch_points: IndexMap<FingerId, TouchSample>,
    fingers_reached: bool,
    tapped_count: u32,
    first_tap_origin: Option<Point>,
    last_touch: Option<TouchSample>,
    multi_tap: DeadlineTimer,
}

impl Default for TapRecognizer {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl TapRecognizer {
    pub fn new(count: u32, fingers: usize) -> Self {
        Self {
            base: RecognizerBase::default(),
            count: count.max(1),
            fingers: fingers.max(1),
            slop: TAP_SLOP,
            touch_points: IndexMap::new(),
            fingers_reached: false,
            tapped_count: 0,
            first_tap_origin: None,
            last_touch: None,
            multi_tap: DeadlineTimer::new(),
        }
    }

    pub fn with_slop(mut self, slop: f32) -> Self {
        if slop > 0.0 {
            self.slop = slop;
        }
        self
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn fingers(&self) -> usize {
        self.fingers
    }

    /// Taps completed so far in the current attempt.
    pub fn tapped_count(&self) -> u32 {
        self.tapped_count
    }

    pub fn reconcile_from(
        &mut self,
        mut incoming: TapRecognizer,
        timers: &mut TimerQueue,
    ) -> Result<(), ReconcileError> {
        if self.count != incoming.count
            || self.fingers != incoming.fingers
            || self.base.priority != incoming.base.priority
            || self.base.priority_mask != incoming.base.priority_mask
        {
            self.reset_status(timers);
            return Err(ReconcileError::ConfigMismatch {
                gesture_type: GestureType::Tap,
            });
        }
        self.base.adopt_callbacks(&mut incoming.base);
        Ok(())
    }

    fn handle_touch_down(&mut self, touch: &TouchSample, cx: &mut GestureContext<'_>) {
        if !self.base.hits_target(touch.position, cx) {
            self.base.adjudicate(GestureDisposal::Reject, cx);
            return;
        }
        self.multi_tap.cancel(cx.timers());

        if self.touch_points.is_empty() {
            match self.first_tap_origin {
                Some(origin) if origin.distance_to(touch.position) > MULTI_TAP_SLOP => {
                    log::trace!("tap too far from the previous one");
                    self.base.adjudicate(GestureDisposal::Reject, cx);
                    return;
                }
                Some(_) => {}
                None => self.first_tap_origin = Some(touch.position),
            }
        }

        self.touch_points.insert(touch.id, *touch);
        if self.touch_points.len() > self.fingers {
            self.base.adjudicate(GestureDisposal::Reject, cx);
            return;
        }
        if self.touch_points.len() == self.fingers {
            self.fingers_reached = true;
        }
        if self.base.state == RefereeState::Ready {
            self.base.state = RefereeState::Detecting;
        }
    }

    fn handle_touch_move(&mut self, touch: &TouchSample, cx: &mut GestureContext<'_>) {
        let Some(down) = self.touch_points.get(&touch.id) else {
            return;
        };
        if down.position.distance_to(touch.position) > self.slop {
            log::trace!("tap finger {} moved beyond slop", touch.id);
            self.base.adjudicate(GestureDisposal::Reject, cx);
        }
    }

    fn handle_touch_up(&mut self, touch: &TouchSample, cx: &mut GestureContext<'_>) {
        if self.touch_points.shift_remove(&touch.id).is_none() || !self.touch_points.is_empty() {
            return;
        }
        if !self.fingers_reached {
            self.base.adjudicate(GestureDisposal::Reject, cx);
            return;
        }
        self.fingers_reached = false;
        self.tapped_count += 1;
        if self.tapped_count < self.count {
            let deadline = touch.time.saturating_add(MULTI_TAP_TIMEOUT_MS);
            self.multi_tap.arm(cx.timers(), deadline);
            return;
        }

        let event = self.payload(cx);
        if self.base.judge(GestureType::Tap, &event) == GestureJudgeResult::Reject {
            log::debug!("tap vetoed by gesture judge");
            self.base.adjudicate(GestureDisposal::Reject, cx);
            return;
        }
        self.base.adjudicate(GestureDisposal::Accept, cx);
    }

    fn payload(&self, cx: &GestureContext<'_>) -> GestureEvent {
        let mut event = GestureEvent {
            time: cx.now(),
            target: self.base.target(),
            input_event_type: self.base.input_event_type(),
            repeat: self.tapped_count > 1,
            ..GestureEvent::default()
        };
        if let Some(touch) = self.last_touch {
            event.time = touch.time;
            event.source_type = touch.source_type;
            event.source_tool = touch.source_tool;
            event.force = touch.force;
            event.tilt_x = touch.tilt_x;
            event.tilt_y = touch.tilt_y;
            event.fingers.push(FingerInfo {
                id: touch.id,
                global: touch.position,
                local: self.base.to_local(touch.position, cx),
                source_type: touch.source_type,
                source_tool: touch.source_tool,
            });
        }
        event
    }
}

recognizer_builders!(TapRecognizer);

impl GestureRecognizer for TapRecognizer {
    fn base(&self) -> &RecognizerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RecognizerBase {
        &mut self.base
    }

    fn gesture_type(&self) -> GestureType {
        GestureType::Tap
    }

    fn handle_touch(&mut self, touch: &TouchSample, cx: &mut GestureContext<'_>) {
        match touch.kind {
            TouchType::Down => self.base.finger_down(),
            TouchType::Up | TouchType::Cancel => self.base.finger_up(),
            TouchType::Move => {}
        }
        if !matches!(
            self.base.state,
            RefereeState::Ready | RefereeState::Detecting
        ) {
            return;
        }
        self.base.input_event_type = InputEventType::of_touch(touch);
        self.last_touch = Some(*touch);
        match touch.kind {
            TouchType::Down => self.handle_touch_down(touch, cx),
            TouchType::Move => self.handle_touch_move(touch, cx),
            TouchType::Up => self.handle_touch_up(touch, cx),
            TouchType::Cancel => self.base.adjudicate(GestureDisposal::Reject, cx),
        }
    }

    fn handle_axis(&mut self, _axis: &AxisSample, _cx: &mut GestureContext<'_>) {}

    fn on_timer(&mut self, token: TimerToken, cx: &mut GestureContext<'_>) -> bool {
        if !self.multi_tap.fire(token) {
            return false;
        }
        if self.base.state == RefereeState::Detecting {
            log::trace!("multi-tap window expired after {} taps", self.tapped_count);
            self.base.adjudicate(GestureDisposal::Reject, cx);
        }
        true
    }

    fn on_accepted(&mut self, cx: &mut GestureContext<'_>) {
        log::debug!("tap accepted");
        self.base.state = RefereeState::Succeed;
        self.multi_tap.cancel(cx.timers());
        let event = self.payload(cx);
        self.base.fire(GestureAction::Action, &event);
    }

    fn on_rejected(&mut self, cx: &mut GestureContext<'_>) {
        self.base.state = RefereeState::Fail;
        self.multi_tap.cancel(cx.timers());
    }

    fn on_reset_status(&mut self, timers: &mut TimerQueue) {
        self.multi_tap.cancel(timers);
        self.touch_points.clear();
        self.fingers_reached = false;
        self.tapped_count = 0;
        self.first_tap_origin = None;
        self.last_touch = None;
    }
}

#[cfg(test)]
#[path = "tests/tap_tests.rs"]
mod tests;
