//! Assertion helpers for robot tests.

use crate::recorder::CallbackRecorder;
use tactile_foundation::GestureAction;
use tactile_geometry::Point;

/// Asserts that `actual` is within `tolerance` of `expected`.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{msg}: expected {expected} (±{tolerance}), got {actual} (diff: {diff})"
    );
}

pub fn assert_point_approx_eq(actual: Point, expected: Point, tolerance: f32, msg: &str) {
    assert_approx_eq(actual.x, expected.x, tolerance, &format!("{msg} - x"));
    assert_approx_eq(actual.y, expected.y, tolerance, &format!("{msg} - y"));
}

/// Asserts the exact sequence of callbacks a recorder has seen.
pub fn assert_actions(recorder: &CallbackRecorder, expected: &[GestureAction], msg: &str) {
    let actual = recorder.actions();
    assert_eq!(actual, expected, "{msg}: unexpected callback sequence");
}
