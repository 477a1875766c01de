use tactile_geometry::Point;

pub type FingerId = i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchType {
    Down,
    Move,
    Up,
    Cancel,
}

/// Device family that produced a sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SourceType {
    #[default]
    Touch,
    Mouse,
    Touchpad,
}

/// Physical tool that produced a sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SourceTool {
    #[default]
    Finger,
    Pen,
    Mouse,
    Touchpad,
}

/// How the most recent sample reached a recognizer.
///
/// Touch-screen and axis devices report different native fields, so gesture
/// payloads are populated according to this value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputEventType {
    #[default]
    TouchScreen,
    MouseButton,
    Axis,
}

impl InputEventType {
    /// Classifies a touch-path sample: a mouse reporting a pressed button
    /// through the touch path is a button press, everything else is the
    /// touch screen.
    pub fn of_touch(touch: &TouchSample) -> Self {
        match touch.source_type {
            SourceType::Mouse if !touch.buttons.is_empty() => InputEventType::MouseButton,
            SourceType::Mouse | SourceType::Touch | SourceType::Touchpad => {
                InputEventType::TouchScreen
            }
        }
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary = 0,
    Secondary = 1,
    Middle = 2,
    Back = 3,
    Forward = 4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerButtons(u8);

impl PointerButtons {
    pub const NONE: Self = Self(0);

    pub fn new() -> Self {
        Self::NONE
    }

    pub fn with(mut self, button: PointerButton) -> Self {
        self.insert(button);
        self
    }

    pub fn insert(&mut self, button: PointerButton) {
        self.0 |= 1 << (button as u8);
    }

    pub fn remove(&mut self, button: PointerButton) {
        self.0 &= !(1 << (button as u8));
    }

    pub fn contains(&self, button: PointerButton) -> bool {
        (self.0 & (1 << (button as u8))) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for PointerButtons {
    fn default() -> Self {
        Self::NONE
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyModifier {
    Ctrl = 0,
    Shift = 1,
    Alt = 2,
    Meta = 3,
}

/// Modifier keys held while an axis sample was produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyModifiers(u8);

impl KeyModifiers {
    pub const NONE: Self = Self(0);

    pub fn with(mut self, key: KeyModifier) -> Self {
        self.0 |= 1 << (key as u8);
        self
    }

    pub fn contains(&self, key: KeyModifier) -> bool {
        (self.0 & (1 << (key as u8))) != 0
    }

    pub fn ctrl(&self) -> bool {
        self.contains(KeyModifier::Ctrl)
    }
}

/// One finger (or pointer) at one instant, as delivered by the dispatch layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchSample {
    pub id: FingerId,
    pub kind: TouchType,
    pub position: Point,
    /// Milliseconds since the host's epoch.
    pub time: u64,
    pub source_type: SourceType,
    pub source_tool: SourceTool,
    pub buttons: PointerButtons,
    pub force: f32,
    pub tilt_x: Option<f32>,
    pub tilt_y: Option<f32>,
}

impl TouchSample {
    pub fn new(id: FingerId, kind: TouchType, position: Point, time: u64) -> Self {
        Self {
            id,
            kind,
            position,
            time,
            source_type: SourceType::Touch,
            source_tool: SourceTool::Finger,
            buttons: PointerButtons::NONE,
            force: 0.0,
            tilt_x: None,
            tilt_y: None,
        }
    }

    pub fn down(id: FingerId, position: Point, time: u64) -> Self {
        Self::new(id, TouchType::Down, position, time)
    }

    pub fn moved(id: FingerId, position: Point, time: u64) -> Self {
        Self::new(id, TouchType::Move, position, time)
    }

    pub fn up(id: FingerId, position: Point, time: u64) -> Self {
        Self::new(id, TouchType::Up, position, time)
    }

    pub fn cancel(id: FingerId, position: Point, time: u64) -> Self {
        Self::new(id, TouchType::Cancel, position, time)
    }

    /// Marks this sample as coming from a mouse pressing `button`.
    pub fn with_mouse_button(mut self, button: PointerButton) -> Self {
        self.source_type = SourceType::Mouse;
        self.source_tool = SourceTool::Mouse;
        self.buttons = self.buttons.with(button);
        self
    }

    pub fn with_source(mut self, source_type: SourceType, source_tool: SourceTool) -> Self {
        self.source_type = source_type;
        self.source_tool = source_tool;
        self
    }

    pub fn with_force(mut self, force: f32) -> Self {
        self.force = force;
        self
    }

    pub fn with_tilt(mut self, tilt_x: f32, tilt_y: f32) -> Self {
        self.tilt_x = Some(tilt_x);
        self.tilt_y = Some(tilt_y);
        self
    }

    /// Copy of this sample re-typed as `kind`, used when replaying fingers.
    pub fn retyped(&self, kind: TouchType) -> Self {
        Self { kind, ..*self }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AxisAction {
    #[default]
    None,
    Begin,
    Update,
    End,
    Cancel,
}

/// A non-touch sample: mouse wheel, trackpad pinch or rotation axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisSample {
    pub id: FingerId,
    pub action: AxisAction,
    pub position: Point,
    pub time: u64,
    /// Scale reported by the device; `0.0` when the device reports none.
    pub pinch_axis_scale: f32,
    pub is_rotation_event: bool,
    pub horizontal_axis: f32,
    pub vertical_axis: f32,
    pub modifiers: KeyModifiers,
    pub source_type: SourceType,
    pub source_tool: SourceTool,
}

impl AxisSample {
    pub fn new(action: AxisAction, position: Point, time: u64) -> Self {
        Self {
            id: 0,
            action,
            position,
            time,
            pinch_axis_scale: 0.0,
            is_rotation_event: false,
            horizontal_axis: 0.0,
            vertical_axis: 0.0,
            modifiers: KeyModifiers::NONE,
            source_type: SourceType::Mouse,
            source_tool: SourceTool::Mouse,
        }
    }

    pub fn with_pinch_scale(mut self, scale: f32) -> Self {
        self.pinch_axis_scale = scale;
        self
    }

    pub fn with_axes(mut self, horizontal: f32, vertical: f32) -> Self {
        self.horizontal_axis = horizontal;
        self.vertical_axis = vertical;
        self
    }

    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_source(mut self, source_type: SourceType, source_tool: SourceTool) -> Self {
        self.source_type = source_type;
        self.source_tool = source_tool;
        self
    }

    pub fn rotation(mut self) -> Self {
        self.is_rotation_event = true;
        self
    }
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
