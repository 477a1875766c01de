//! Testing utilities and harness for Tactile

pub mod recorder;
pub mod robot;
pub mod robot_assertions;

pub use recorder::CallbackRecorder;
pub use robot::*;

/// Routes `log` output through the test harness. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub mod prelude {
    pub use crate::init_logging;
    pub use crate::recorder::CallbackRecorder;
    pub use crate::robot::*;
    pub use crate::robot_assertions;
}
