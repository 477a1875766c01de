//! Gesture recognition and arbitration for Tactile
//!
//! Recognizers observe touch and axis samples, vote on the current touch
//! sequence and react to the verdicts of a [`GestureReferee`]. The referee is
//! the single entry point a host needs: attach recognizers, feed it samples
//! and advance its clock.

pub mod gesture_constants;
pub mod gestures;
pub mod input;
mod referee;

pub use gestures::{
    FingerInfo, GestureAction, GestureCallbacks, GestureContext, GestureDisposal, GestureEvent,
    GestureInfo, GestureJudgeResult, GestureMask, GesturePriority, GestureRecognizer,
    GestureType, LongPressRecognizer, PinchRecognizer, RecognizerKind, ReconcileError,
    RefereeState, SequencedRecognizer, TapRecognizer,
};
pub use input::{
    AxisAction, AxisSample, FingerId, InputEventType, KeyModifier, KeyModifiers, PointerButton,
    PointerButtons, SourceTool, SourceType, TargetGeometry, TargetRects, TouchSample, TouchType,
    Unbounded,
};
pub use referee::{GestureReferee, RecognizerId, RefereeError};

pub mod prelude {
    pub use crate::gestures::{
        GestureCallbacks, GestureDisposal, GestureEvent, GestureJudgeResult, GesturePriority,
        GestureRecognizer, LongPressRecognizer, PinchRecognizer, RecognizerKind, RefereeState,
        SequencedRecognizer, TapRecognizer,
    };
    pub use crate::input::prelude::*;
    pub use crate::input::{TargetGeometry, TargetRects, Unbounded};
    pub use crate::referee::{GestureReferee, RecognizerId};
    pub use tactile_geometry::Point;
}
