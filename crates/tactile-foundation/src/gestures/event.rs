//! Gesture payloads and the user-facing callback contract.

use crate::input::{FingerId, InputEventType, SourceTool, SourceType};
use smallvec::SmallVec;
use std::fmt;
use std::rc::Rc;
use tactile_core::NodeId;
use tactile_geometry::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureType {
    Tap,
    LongPress,
    Pinch,
    Sequenced,
}

/// One finger as reported to gesture callbacks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FingerInfo {
    pub id: FingerId,
    /// Position in dispatch-root coordinates.
    pub global: Point,
    /// Position in the attached element's coordinates.
    pub local: Point,
    pub source_type: SourceType,
    pub source_tool: SourceTool,
}

/// Payload handed to every gesture callback.
///
/// Which optional fields are meaningful depends on `input_event_type`: axis
/// devices fill the axis fields, touch devices fill force and tilt.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GestureEvent {
    pub time: u64,
    pub target: Option<NodeId>,
    pub fingers: SmallVec<[FingerInfo; 5]>,
    pub source_type: SourceType,
    pub source_tool: SourceTool,
    pub input_event_type: InputEventType,
    pub repeat: bool,
    pub scale: f32,
    pub pinch_center: Point,
    pub horizontal_axis: f32,
    pub vertical_axis: f32,
    pub pinch_axis_scale: f32,
    pub force: f32,
    pub tilt_x: Option<f32>,
    pub tilt_y: Option<f32>,
}

pub type GestureCallback = Rc<dyn Fn(&GestureEvent)>;

/// Which user callback to fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureAction {
    /// Discrete recognition (tap, long press).
    Action,
    Start,
    Update,
    End,
    Cancel,
}

/// Optional user callbacks, owned by the element that attached the gesture.
#[derive(Clone, Default)]
pub struct GestureCallbacks {
    pub on_action: Option<GestureCallback>,
    pub on_action_start: Option<GestureCallback>,
    pub on_action_update: Option<GestureCallback>,
    pub on_action_end: Option<GestureCallback>,
    pub on_action_cancel: Option<GestureCallback>,
}

impl GestureCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_action(mut self, callback: impl Fn(&GestureEvent) + 'static) -> Self {
        self.on_action = Some(Rc::new(callback));
        self
    }

    pub fn on_action_start(mut self, callback: impl Fn(&GestureEvent) + 'static) -> Self {
        self.on_action_start = Some(Rc::new(callback));
        self
    }

    pub fn on_action_update(mut self, callback: impl Fn(&GestureEvent) + 'static) -> Self {
        self.on_action_update = Some(Rc::new(callback));
        self
    }

    pub fn on_action_end(mut self, callback: impl Fn(&GestureEvent) + 'static) -> Self {
        self.on_action_end = Some(Rc::new(callback));
        self
    }

    pub fn on_action_cancel(mut self, callback: impl Fn(&GestureEvent) + 'static) -> Self {
        self.on_action_cancel = Some(Rc::new(callback));
        self
    }

    pub fn slot(&self, action: GestureAction) -> Option<&GestureCallback> {
        match action {
            GestureAction::Action => self.on_action.as_ref(),
            GestureAction::Start => self.on_action_start.as_ref(),
            GestureAction::Update => self.on_action_update.as_ref(),
            GestureAction::End => self.on_action_end.as_ref(),
            GestureAction::Cancel => self.on_action_cancel.as_ref(),
        }
    }

    /// Invokes the callback for `action`, returning whether one was installed.
    pub fn fire(&self, action: GestureAction, event: &GestureEvent) -> bool {
        match self.slot(action) {
            Some(callback) => {
                callback(event);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for GestureCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let provided = |slot: &Option<GestureCallback>| if slot.is_some() { "provided" } else { "-" };
        f.debug_struct("GestureCallbacks")
            .field("on_action", &provided(&self.on_action))
            .field("on_action_start", &provided(&self.on_action_start))
            .field("on_action_update", &provided(&self.on_action_update))
            .field("on_action_end", &provided(&self.on_action_end))
            .field("on_action_cancel", &provided(&self.on_action_cancel))
            .finish()
    }
}

/// Verdict of a gesture judge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureJudgeResult {
    #[default]
    Continue,
    Reject,
}

/// What a gesture judge is told about the recognizer asking for acceptance.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureInfo {
    pub gesture_type: GestureType,
    pub tag: Option<String>,
    pub target: Option<NodeId>,
}

/// Interceptor consulted right before a recognizer accepts. An ancestor
/// element can veto the gesture by returning [`GestureJudgeResult::Reject`].
pub type GestureJudge = Rc<dyn Fn(&GestureInfo, &GestureEvent) -> GestureJudgeResult>;
