//! Robot-style driver for end-to-end gesture tests
//!
//! A [`GestureRobot`] owns a [`GestureReferee`] and a [`ManualClock`]. Tests
//! move fingers and the clock; the robot stamps every sample with the current
//! time and remembers where each finger is so that `up` and `cancel` land
//! where the finger last was.
//!
//! # Example
//!
//! ```
//! use tactile_foundation::{GestureAction, PinchRecognizer};
//! use tactile_testing::{CallbackRecorder, GestureRobot};
//!
//! let recorder = CallbackRecorder::new();
//! let mut robot = GestureRobot::new();
//! let pinch = robot.attach(PinchRecognizer::default().with_callbacks(recorder.callbacks()));
//!
//! robot.down(0, 100.0, 100.0);
//! robot.down(1, 200.0, 100.0);
//! robot.advance_by(16);
//! robot.move_all(&[(0, 80.0, 100.0), (1, 220.0, 100.0)]);
//!
//! assert_eq!(recorder.count(GestureAction::Start), 1);
//! assert!(robot.pinch(pinch).is_some());
//! ```

use tactile_core::collections::map::HashMap;
use tactile_core::{Clock, ManualClock, NodeId};
use tactile_foundation::{
    AxisSample, FingerId, GestureReferee, PinchRecognizer, PointerButton, RecognizerId,
    RecognizerKind, RefereeState, SequencedRecognizer, TargetRects, TouchSample,
};
use tactile_geometry::{Point, Rect};

/// Programmatic control over one dispatch root.
pub struct GestureRobot {
    referee: GestureReferee<TargetRects>,
    clock: ManualClock,
    mouse: bool,
    fingers: HashMap<FingerId, Point>,
}

impl Default for GestureRobot {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureRobot {
    pub fn new() -> Self {
        Self {
            referee: GestureReferee::new(TargetRects::new()),
            clock: ManualClock::new(0),
            mouse: false,
            fingers: HashMap::default(),
        }
    }

    /// Reports every later touch sample as a primary mouse button.
    pub fn with_mouse(mut self) -> Self {
        self.mouse = true;
        self
    }

    /// Registers the bounds of an element recognizers can target.
    pub fn place(&mut self, node: NodeId, rect: Rect) {
        self.referee.targets_mut().insert(node, rect);
    }

    pub fn attach(&mut self, recognizer: impl Into<RecognizerKind>) -> RecognizerId {
        self.referee.attach(recognizer)
    }

    pub fn referee(&self) -> &GestureReferee<TargetRects> {
        &self.referee
    }

    pub fn referee_mut(&mut self) -> &mut GestureReferee<TargetRects> {
        &mut self.referee
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn state(&self, id: RecognizerId) -> Option<RefereeState> {
        self.referee.state(id)
    }

    pub fn pinch(&self, id: RecognizerId) -> Option<&PinchRecognizer> {
        self.referee.recognizer(id).and_then(RecognizerKind::as_pinch)
    }

    pub fn sequenced(&self, id: RecognizerId) -> Option<&SequencedRecognizer> {
        self.referee
            .recognizer(id)
            .and_then(RecognizerKind::as_sequenced)
    }

    /// Number of fingers currently held down by the robot.
    pub fn fingers_down(&self) -> usize {
        self.fingers.len()
    }

    pub fn down(&mut self, id: FingerId, x: f32, y: f32) {
        let position = Point::new(x, y);
        self.fingers.insert(id, position);
        let sample = self.sample(TouchSample::down(id, position, self.now()));
        self.referee.handle_touch(&sample);
    }

    pub fn move_to(&mut self, id: FingerId, x: f32, y: f32) {
        let position = Point::new(x, y);
        self.fingers.insert(id, position);
        let sample = self.sample(TouchSample::moved(id, position, self.now()));
        self.referee.handle_touch(&sample);
    }

    /// Moves several fingers in one frame; recognizers see a single flush.
    pub fn move_all(&mut self, moves: &[(FingerId, f32, f32)]) {
        let now = self.now();
        let mut samples = Vec::with_capacity(moves.len());
        for &(id, x, y) in moves {
            let position = Point::new(x, y);
            self.fingers.insert(id, position);
            samples.push(self.sample(TouchSample::moved(id, position, now)));
        }
        self.referee.handle_touch_batch(&samples);
    }

    /// Lifts a finger where it last was. Unknown fingers are ignored.
    pub fn up(&mut self, id: FingerId) {
        let Some(position) = self.fingers.remove(&id) else {
            log::warn!("robot asked to lift finger {id} that is not down");
            return;
        };
        let sample = self.sample(TouchSample::up(id, position, self.now()));
        self.referee.handle_touch(&sample);
    }

    pub fn cancel(&mut self, id: FingerId) {
        let Some(position) = self.fingers.remove(&id) else {
            log::warn!("robot asked to cancel finger {id} that is not down");
            return;
        };
        let sample = self.sample(TouchSample::cancel(id, position, self.now()));
        self.referee.handle_touch(&sample);
    }

    /// Down then up at the same spot, `hold` milliseconds apart.
    pub fn tap_at(&mut self, x: f32, y: f32, hold: u64) {
        self.down(0, x, y);
        self.advance_by(hold);
        self.up(0);
    }

    /// Delivers an axis sample stamped with the current time.
    pub fn axis(&mut self, axis: AxisSample) {
        let axis = AxisSample {
            time: self.now(),
            ..axis
        };
        self.referee.handle_axis(&axis);
    }

    /// Moves the clock forward, firing every timer that falls due.
    pub fn advance_by(&mut self, millis: u64) {
        let now = self.clock.advance(millis);
        self.referee.advance_to(now);
    }

    /// Fires pending timers one deadline at a time until none are left.
    pub fn wait_for_idle(&mut self) {
        while let Some(deadline) = self.referee.next_deadline() {
            self.clock.set(deadline);
            self.referee.advance_to(self.clock.now());
        }
    }

    fn sample(&self, touch: TouchSample) -> TouchSample {
        if self.mouse {
            touch.with_mouse_button(PointerButton::Primary)
        } else {
            touch
        }
    }
}
