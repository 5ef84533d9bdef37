//! Tunable timings and speeds shared by every backend.

use std::time::Duration;

use padbridge_control::KeyCombo;

/// How long bumpers plus Start must be held to request close.
pub const CLOSE_HOLD_THRESHOLD: Duration = Duration::from_millis(2000);
/// Longest bumper tap that still counts as a window switch.
pub const QUICK_TAP_THRESHOLD: Duration = Duration::from_millis(500);
/// Delay between the first report of a held direction and its first repeat.
pub const REPEAT_DELAY: Duration = Duration::from_millis(400);
/// Interval between later repeats, once [`REPEAT_DELAY`] has passed.
///
/// Repeats follow the keyboard pattern of a long delay then a faster rate.
/// Setting the interval equal to the delay spaces every repeat by the delay.
pub const REPEAT_INTERVAL: Duration = Duration::from_millis(150);
/// Cursor speed at the deadzone edge, px per poll.
pub const MOUSE_MIN_SPEED: f32 = 2.0;
/// Cursor speed at full deflection, px per poll.
pub const MOUSE_MAX_SPEED: f32 = 20.0;
/// Exponent of the speed curve between the two speeds.
pub const MOUSE_GAMMA: f32 = 2.0;
/// Recent pointer activity that keeps mouse mode on.
pub const MOUSE_MODE_TIMEOUT: Duration = Duration::from_millis(1000);
/// Longest touch contact that still counts as a tap.
pub const TAP_MAX_DURATION: Duration = Duration::from_millis(200);
/// Largest finger travel, in touchpad units, that still counts as a tap.
pub const TAP_MAX_DISTANCE: f32 = 30.0;
/// Hardware read interval (~60 Hz).
pub const POLL_INTERVAL: Duration = Duration::from_millis(16);
/// Connection topology check interval.
pub const HEALTH_CHECK_INTERVAL: Duration = Duration::from_millis(2000);
/// Bound on waiting for a polling thread to finish.
pub const STOP_TIMEOUT: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSettings {
    pub close_hold: Duration,
    pub quick_tap: Duration,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            close_hold: CLOSE_HOLD_THRESHOLD,
            quick_tap: QUICK_TAP_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationSettings {
    pub repeat_delay: Duration,
    pub repeat_interval: Duration,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            repeat_delay: REPEAT_DELAY,
            repeat_interval: REPEAT_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseSettings {
    pub min_speed: f32,
    pub max_speed: f32,
    pub gamma: f32,
    pub timeout: Duration,
    /// Cursor pixels per touchpad unit of finger travel.
    pub touch_sensitivity: f32,
    pub tap_duration: Duration,
    pub tap_distance: f32,
}

impl Default for MouseSettings {
    fn default() -> Self {
        Self {
            min_speed: MOUSE_MIN_SPEED,
            max_speed: MOUSE_MAX_SPEED,
            gamma: MOUSE_GAMMA,
            timeout: MOUSE_MODE_TIMEOUT,
            touch_sensitivity: 1.0,
            tap_duration: TAP_MAX_DURATION,
            tap_distance: TAP_MAX_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollSettings {
    pub poll_interval: Duration,
    pub health_check_interval: Duration,
    pub stop_timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            health_check_interval: HEALTH_CHECK_INTERVAL,
            stop_timeout: STOP_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub gestures: GestureSettings,
    pub navigation: NavigationSettings,
    pub mouse: MouseSettings,
    pub polling: PollSettings,
    /// Shortcut performed by the bumper quick-tap.
    pub switch_window: KeyCombo,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gestures: GestureSettings::default(),
            navigation: NavigationSettings::default(),
            mouse: MouseSettings::default(),
            polling: PollSettings::default(),
            switch_window: KeyCombo::alt_tab(),
        }
    }
}
