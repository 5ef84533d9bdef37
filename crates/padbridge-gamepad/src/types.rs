use std::fmt;

/// Logical buttons reported to subscribers after mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalButton {
    A,
    B,
    X,
    Y,
    Start,
    Back,
    LeftBumper,
    RightBumper,
    LeftStickClick,
    RightStickClick,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

impl LogicalButton {
    /// Buttons resolved through a [`ButtonMapping`](crate::ButtonMapping),
    /// in the order presses are reported within one poll.
    pub const MAPPED: [LogicalButton; 10] = [
        LogicalButton::A,
        LogicalButton::B,
        LogicalButton::X,
        LogicalButton::Y,
        LogicalButton::LeftBumper,
        LogicalButton::RightBumper,
        LogicalButton::Back,
        LogicalButton::Start,
        LogicalButton::LeftStickClick,
        LogicalButton::RightStickClick,
    ];
}

/// Navigation intent, at most one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_none(&self) -> bool {
        *self == Direction::None
    }

    /// The D-pad button equivalent of this direction.
    pub fn as_button(&self) -> Option<LogicalButton> {
        match self {
            Direction::None => None,
            Direction::Up => Some(LogicalButton::DPadUp),
            Direction::Down => Some(LogicalButton::DPadDown),
            Direction::Left => Some(LogicalButton::DPadLeft),
            Direction::Right => Some(LogicalButton::DPadRight),
        }
    }

    /// Resolve analog deflection into a direction, vertical first.
    ///
    /// `dx` grows to the right and `dy` grows downwards.
    pub fn from_axes<T>(dx: T, dy: T, deadzone: T) -> Direction
    where
        T: PartialOrd + std::ops::Neg<Output = T> + Copy,
    {
        if dy < -deadzone {
            Direction::Up
        } else if dy > deadzone {
            Direction::Down
        } else if dx < -deadzone {
            Direction::Left
        } else if dx > deadzone {
            Direction::Right
        } else {
            Direction::None
        }
    }
}

/// Backend family of the active controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControllerType {
    #[default]
    None,
    XInput,
    GenericHid,
    PlayStation,
}

impl fmt::Display for ControllerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControllerType::None => "none",
            ControllerType::XInput => "xinput",
            ControllerType::GenericHid => "generic-hid",
            ControllerType::PlayStation => "playstation",
        };
        f.write_str(name)
    }
}
