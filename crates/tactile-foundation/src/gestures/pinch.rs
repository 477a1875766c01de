//! Multi-finger pinch (zoom) recognizer.
//!
//! The spread of the active fingers is measured as their average deviation
//! around the centroid. Once it has changed by at least `distance` since all
//! required fingers went down, the recognizer asks to be accepted; from then
//! on every move reports `scale = current / initial`. Axis devices
//! (Ctrl+wheel, trackpad pinch) drive the same state machine through a single
//! pseudo-finger.

use super::base::{
    recognizer_builders, GestureContext, GestureDisposal, RecognizerBase, RefereeState,
};
use super::error::ReconcileError;
use super::event::{FingerInfo, GestureAction, GestureEvent, GestureJudgeResult, GestureType};
use super::GestureRecognizer;
use crate::gesture_constants::{
    AXIS_SCALE_STEP, DEFAULT_PINCH_DISTANCE, DEFAULT_PINCH_FINGERS, MAX_PINCH_FINGERS,
    MIN_PINCH_FINGERS, SCALE_EPSILON,
};
use crate::input::{AxisAction, AxisSample, FingerId, InputEventType, TouchSample, TouchType};
use indexmap::IndexMap;
use smallvec::SmallVec;
use tactile_core::TimerQueue;
use tactile_geometry::{average_deviation, centroid, Point};

#[derive(Debug, Clone)]
pub struct PinchRecognizer {
    pub(crate) base: RecognizerBase,
    fingers: usize,
    distance: f32,
    touch_points: IndexMap<FingerId, TouchSample>,
    active_fingers: SmallVec<[FingerId; MAX_PINCH_FINGERS]>,
    last_axis: Option<AxisSample>,
    initial_deviation: f32,
    current_deviation: f32,
    pinch_center: Point,
    scale: f32,
    last_time: u64,
    is_pinch_end: bool,
}

impl Default for PinchRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_PINCH_FINGERS, DEFAULT_PINCH_DISTANCE)
    }
}

impl PinchRecognizer {
    /// Creates a pinch over `fingers` fingers (clamped to 2..=5) that
    /// triggers once the spread changes by `distance`. Non-positive
    /// distances fall back to the default.
    pub fn new(fingers: usize, distance: f32) -> Self {
        let clamped = fingers.clamp(MIN_PINCH_FINGERS, MAX_PINCH_FINGERS);
        if clamped != fingers {
            log::warn!("pinch finger count {fingers} out of range, using {clamped}");
        }
        let distance = if distance > 0.0 {
            distance
        } else {
            log::warn!("pinch distance {distance} must be positive, using default");
            DEFAULT_PINCH_DISTANCE
        };
        Self {
            base: RecognizerBase::default(),
            fingers: clamped,
            distance,
            touch_points: IndexMap::new(),
            active_fingers: SmallVec::new(),
            last_axis: None,
            initial_deviation: 0.0,
            current_deviation: 0.0,
            pinch_center: Point::ZERO,
            scale: 1.0,
            last_time: 0,
            is_pinch_end: false,
        }
    }

    pub fn fingers(&self) -> usize {
        self.fingers
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Current scale ratio. Only meaningful while the pinch has succeeded.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Centroid of the active fingers in the target's local space.
    pub fn pinch_center(&self) -> Point {
        self.pinch_center
    }

    pub fn active_finger_count(&self) -> usize {
        self.active_fingers.len()
    }

    pub fn initial_deviation(&self) -> f32 {
        self.initial_deviation
    }

    pub fn current_deviation(&self) -> f32 {
        self.current_deviation
    }

    pub fn reconcile_from(
        &mut self,
        mut incoming: PinchRecognizer,
        timers: &mut TimerQueue,
    ) -> Result<(), ReconcileError> {
        let same = self.fingers == incoming.fingers
            && (self.distance - incoming.distance).abs() < SCALE_EPSILON
            && self.base.priority == incoming.base.priority
            && self.base.priority_mask == incoming.base.priority_mask;
        if !same {
            log::debug!("pinch configuration changed, resetting");
            self.reset_status(timers);
            return Err(ReconcileError::ConfigMismatch {
                gesture_type: GestureType::Pinch,
            });
        }
        self.base.adopt_callbacks(&mut incoming.base);
        Ok(())
    }

    fn active_positions(&self) -> impl Iterator<Item = Point> + Clone + '_ {
        self.active_fingers
            .iter()
            .filter_map(move |id| self.touch_points.get(id))
            .map(|touch| touch.position)
    }

    fn update_center(&mut self, cx: &GestureContext<'_>) {
        if let Some(center) = centroid(self.active_positions()) {
            self.pinch_center = self.base.to_local(center, cx);
        }
    }

    fn compute_scale(&self) -> f32 {
        if self.initial_deviation > SCALE_EPSILON {
            self.current_deviation / self.initial_deviation
        } else {
            1.0
        }
    }

    fn handle_touch_down(&mut self, touch: &TouchSample, cx: &mut GestureContext<'_>) {
        if self.active_fingers.len() >= self.fingers {
            return;
        }
        if !self.base.hits_target(touch.position, cx) {
            if !self.base.state.is_terminal() {
                self.base.adjudicate(GestureDisposal::Reject, cx);
            }
            return;
        }

        self.touch_points.insert(touch.id, *touch);
        if !self.active_fingers.contains(&touch.id) {
            self.active_fingers.push(touch.id);
            self.base.finger_down();
        }

        if self.active_fingers.len() == self.fingers && self.base.state != RefereeState::Fail {
            self.initial_deviation = average_deviation(self.active_positions());
            self.current_deviation = self.initial_deviation;
            self.update_center(cx);
            self.base.state = RefereeState::Detecting;
            log::trace!(
                "pinch detecting, initial deviation {}",
                self.initial_deviation
            );
        }
    }

    fn handle_touch_move(&mut self, touch: &TouchSample, cx: &mut GestureContext<'_>) {
        if !self.active_fingers.contains(&touch.id) {
            return;
        }
        self.touch_points.insert(touch.id, *touch);
        if self.active_fingers.len() < self.fingers {
            return;
        }
        self.current_deviation = average_deviation(self.active_positions());

        match self.base.state {
            RefereeState::Detecting => {
                if (self.current_deviation - self.initial_deviation).abs() >= self.distance {
                    self.scale = self.compute_scale();
                    self.update_center(cx);
                    self.request_accept(cx);
                }
            }
            RefereeState::Succeed => {
                self.scale = self.compute_scale();
                self.update_center(cx);
                if cx.is_flush_end() {
                    let event = self.payload(cx);
                    self.base.fire(GestureAction::Update, &event);
                }
            }
            _ => {}
        }
    }

    fn handle_touch_up(&mut self, touch: &TouchSample, cx: &mut GestureContext<'_>) {
        if !self.active_fingers.contains(&touch.id) {
            return;
        }
        self.touch_points.insert(touch.id, *touch);
        match self.base.state {
            RefereeState::Succeed => {
                if self.active_fingers.len() == self.fingers && !self.is_pinch_end {
                    let event = self.payload(cx);
                    self.base.fire(GestureAction::End, &event);
                    self.is_pinch_end = true;
                }
            }
            RefereeState::Fail => {}
            _ => self.base.adjudicate(GestureDisposal::Reject, cx),
        }
        self.remove_finger(touch.id);
    }

    fn handle_touch_cancel(&mut self, touch: &TouchSample, cx: &mut GestureContext<'_>) {
        if !self.active_fingers.contains(&touch.id) {
            return;
        }
        match self.base.state {
            RefereeState::Succeed => {
                let event = self.payload(cx);
                self.base.fire(GestureAction::Cancel, &event);
                self.base.state = RefereeState::Ready;
            }
            RefereeState::Fail => {}
            _ => self.base.adjudicate(GestureDisposal::Reject, cx),
        }
        self.remove_finger(touch.id);
    }

    fn remove_finger(&mut self, id: FingerId) {
        self.touch_points.shift_remove(&id);
        self.active_fingers.retain(|active| *active != id);
        self.base.finger_up();
    }

    fn handle_axis_begin(&mut self, axis: &AxisSample, cx: &mut GestureContext<'_>) {
        if !self.base.hits_target(axis.position, cx) {
            if !self.base.state.is_terminal() {
                self.base.adjudicate(GestureDisposal::Reject, cx);
            }
            return;
        }
        self.last_axis = Some(*axis);
        self.base.finger_down();
        if self.base.state == RefereeState::Fail {
            return;
        }
        let device_pinch = (axis.pinch_axis_scale - 1.0).abs() < SCALE_EPSILON;
        if device_pinch || axis.modifiers.ctrl() {
            self.scale = 1.0;
            self.pinch_center = self.base.to_local(axis.position, cx);
            self.base.state = RefereeState::Detecting;
            log::trace!("pinch detecting from axis begin");
        }
    }

    fn handle_axis_update(&mut self, axis: &AxisSample, cx: &mut GestureContext<'_>) {
        if !matches!(
            self.base.state,
            RefereeState::Detecting | RefereeState::Succeed
        ) {
            return;
        }
        self.last_axis = Some(*axis);
        let scale = if axis.pinch_axis_scale.abs() > f32::EPSILON {
            axis.pinch_axis_scale
        } else if axis.vertical_axis > 0.0 {
            self.scale - AXIS_SCALE_STEP
        } else if axis.vertical_axis < 0.0 {
            self.scale + AXIS_SCALE_STEP
        } else {
            self.scale
        };
        self.scale = scale.max(0.0);
        self.pinch_center = self.base.to_local(axis.position, cx);

        match self.base.state {
            RefereeState::Detecting => self.request_accept(cx),
            RefereeState::Succeed => {
                let event = self.payload(cx);
                self.base.fire(GestureAction::Update, &event);
            }
            _ => {}
        }
    }

    fn handle_axis_end(&mut self, axis: &AxisSample, cx: &mut GestureContext<'_>) {
        self.last_axis = Some(*axis);
        match self.base.state {
            RefereeState::Succeed => {
                if !self.is_pinch_end {
                    let event = self.payload(cx);
                    self.base.fire(GestureAction::End, &event);
                    self.is_pinch_end = true;
                }
            }
            RefereeState::Fail => {}
            _ => self.base.adjudicate(GestureDisposal::Reject, cx),
        }
        self.base.finger_up();
    }

    fn handle_axis_cancel(&mut self, axis: &AxisSample, cx: &mut GestureContext<'_>) {
        self.last_axis = Some(*axis);
        match self.base.state {
            RefereeState::Succeed => {
                let event = self.payload(cx);
                self.base.fire(GestureAction::Cancel, &event);
                self.base.state = RefereeState::Ready;
            }
            RefereeState::Fail => {}
            _ => self.base.adjudicate(GestureDisposal::Reject, cx),
        }
        self.base.finger_up();
    }

    fn request_accept(&mut self, cx: &mut GestureContext<'_>) {
        let event = self.payload(cx);
        if self.base.judge(GestureType::Pinch, &event) == GestureJudgeResult::Reject {
            log::debug!("pinch vetoed by gesture judge");
            self.base.adjudicate(GestureDisposal::Reject, cx);
            return;
        }
        self.base.adjudicate(GestureDisposal::Accept, cx);
    }

    fn payload(&self, cx: &GestureContext<'_>) -> GestureEvent {
        let mut event = GestureEvent {
            time: self.last_time,
            target: self.base.target(),
            input_event_type: self.base.input_event_type(),
            scale: self.scale,
            pinch_center: self.pinch_center,
            ..GestureEvent::default()
        };

        if self.base.input_event_type() == InputEventType::Axis {
            if let Some(axis) = self.last_axis {
                event.source_type = axis.source_type;
                event.source_tool = axis.source_tool;
                event.horizontal_axis = axis.horizontal_axis;
                event.vertical_axis = axis.vertical_axis;
                event.pinch_axis_scale = axis.pinch_axis_scale;
                event.fingers.push(FingerInfo {
                    id: axis.id,
                    global: axis.position,
                    local: self.base.to_local(axis.position, cx),
                    source_type: axis.source_type,
                    source_tool: axis.source_tool,
                });
            }
            return event;
        }

        for touch in self
            .active_fingers
            .iter()
            .filter_map(|id| self.touch_points.get(id))
        {
            event.fingers.push(FingerInfo {
                id: touch.id,
                global: touch.position,
                local: self.base.to_local(touch.position, cx),
                source_type: touch.source_type,
                source_tool: touch.source_tool,
            });
        }
        if let Some(last) = self.touch_points.values().last() {
            event.source_type = last.source_type;
            event.source_tool = last.source_tool;
            event.force = last.force;
            event.tilt_x = last.tilt_x;
            event.tilt_y = last.tilt_y;
        }
        event
    }
}

recognizer_builders!(PinchRecognizer);

impl GestureRecognizer for PinchRecognizer {
    fn base(&self) -> &RecognizerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RecognizerBase {
        &mut self.base
    }

    fn gesture_type(&self) -> GestureType {
        GestureType::Pinch
    }

    fn handle_touch(&mut self, touch: &TouchSample, cx: &mut GestureContext<'_>) {
        self.base.input_event_type = InputEventType::of_touch(touch);
        self.last_time = touch.time;
        log::trace!("pinch {:?} finger {}", touch.kind, touch.id);
        match touch.kind {
            TouchType::Down => self.handle_touch_down(touch, cx),
            TouchType::Move => self.handle_touch_move(touch, cx),
            TouchType::Up => self.handle_touch_up(touch, cx),
            TouchType::Cancel => self.handle_touch_cancel(touch, cx),
        }
    }

    fn handle_axis(&mut self, axis: &AxisSample, cx: &mut GestureContext<'_>) {
        if axis.is_rotation_event || axis.action == AxisAction::None {
            return;
        }
        self.base.input_event_type = InputEventType::Axis;
        self.last_time = axis.time;
        match axis.action {
            AxisAction::Begin => self.handle_axis_begin(axis, cx),
            AxisAction::Update => self.handle_axis_update(axis, cx),
            AxisAction::End => self.handle_axis_end(axis, cx),
            AxisAction::Cancel => self.handle_axis_cancel(axis, cx),
            AxisAction::None => {}
        }
    }

    fn on_accepted(&mut self, cx: &mut GestureContext<'_>) {
        log::debug!("pinch accepted at scale {}", self.scale);
        self.base.state = RefereeState::Succeed;
        self.is_pinch_end = false;
        let event = self.payload(cx);
        self.base.fire(GestureAction::Start, &event);
    }

    fn on_rejected(&mut self, _cx: &mut GestureContext<'_>) {
        log::debug!("pinch rejected");
        self.base.state = RefereeState::Fail;
    }

    fn on_reset_status(&mut self, _timers: &mut TimerQueue) {
        self.touch_points.clear();
        self.active_fingers.clear();
        self.last_axis = None;
        self.initial_deviation = 0.0;
        self.current_deviation = 0.0;
        self.pinch_center = Point::ZERO;
        self.scale = 1.0;
        self.last_time = 0;
        self.is_pinch_end = false;
    }
}

#[cfg(test)]
#[path = "tests/pinch_tests.rs"]
mod tests;
