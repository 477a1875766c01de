pub mod target;
pub mod types;

pub use target::{TargetGeometry, TargetRects, Unbounded};
pub use types::{
    AxisAction, AxisSample, FingerId, InputEventType, KeyModifier, KeyModifiers, PointerButton,
    PointerButtons, SourceTool, SourceType, TouchSample, TouchType,
};

pub mod prelude {
    pub use super::types::{
        AxisAction, AxisSample, FingerId, InputEventType, KeyModifier, KeyModifiers,
        PointerButton, SourceTool, SourceType, TouchSample, TouchType,
    };
}
