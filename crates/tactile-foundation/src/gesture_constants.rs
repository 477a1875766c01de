//! Shared gesture constants for consistent touch/axis handling.
//!
//! Distances are in device-independent units (the same space as sample
//! positions); durations are in milliseconds.

/// Fingers a pinch needs when none (or an out-of-range value) is configured.
pub const DEFAULT_PINCH_FINGERS: usize = 2;

/// Smallest finger count a pinch can be configured with.
pub const MIN_PINCH_FINGERS: usize = 2;

/// Largest finger count a pinch can be configured with.
pub const MAX_PINCH_FINGERS: usize = 5;

/// Minimum change in average finger deviation before a pinch is recognized.
///
/// Values at or below zero are replaced by this default.
pub const DEFAULT_PINCH_DISTANCE: f32 = 5.0;

/// Scale step applied per wheel notch when Ctrl+wheel drives a pinch and the
/// device reports no scale of its own.
pub const AXIS_SCALE_STEP: f32 = 0.1;

/// Tolerance used when comparing scales and deviations.
pub const SCALE_EPSILON: f32 = 1e-3;

/// How long a sequenced gesture waits for its next segment after one child
/// succeeds before giving up.
pub const SEQUENCE_TIMEOUT_MS: u64 = 300;

/// Maximum gap between the taps of a multi-tap gesture.
pub const MULTI_TAP_TIMEOUT_MS: u64 = 300;

/// Hold time before a long press is recognized.
pub const DEFAULT_LONG_PRESS_DURATION_MS: u64 = 500;

/// Movement allowed during a tap before it is rejected.
pub const TAP_SLOP: f32 = 20.0;

/// Movement allowed while holding for a long press before it is rejected.
pub const LONG_PRESS_SLOP: f32 = 15.0;

/// Maximum distance between the first touch of consecutive taps.
pub const MULTI_TAP_SLOP: f32 = 60.0;
