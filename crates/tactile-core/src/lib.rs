//! Core runtime services for Tactile
//!
//! Everything in here is host-facing plumbing the gesture engine consumes:
//! weak node handles, hash collections, clocks and the one-shot timer queue
//! that recognizers use for their deadlines. All of it is single-threaded;
//! the engine runs on the UI thread and timers re-enter through the same
//! dispatch path as input.

pub mod collections;
mod platform;
mod timer;

pub use platform::{Clock, ManualClock, SystemClock};
pub use timer::{DeadlineTimer, TimerQueue, TimerToken};

/// Weak handle to a UI element owned by the host tree.
///
/// Recognizers never own the element they are attached to; they keep this id
/// and ask the host for geometry when they need it.
pub type NodeId = usize;

pub mod prelude {
    pub use crate::platform::{Clock, ManualClock, SystemClock};
    pub use crate::timer::{DeadlineTimer, TimerQueue, TimerToken};
    pub use crate::NodeId;
}
