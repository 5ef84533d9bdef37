//! Gamepad input arbitration and translation.
//!
//! Probes PlayStation HID, XInput and generic joystick hardware in priority
//! order, keeps one backend active at a time and turns its reads into a
//! single stream of [`PadEvent`]s, with gesture detection and mouse mode on
//! top.

mod arbitrator;
mod backend;
mod clock;
mod error;
mod events;
mod mapping;
mod mask;
pub mod platform;
mod settings;
mod translate;
mod types;

pub use crate::arbitrator::Arbitrator;
pub use crate::backend::{
    playstation_button, Adapter, Backend, JoystickSource, PlayStationSource, ReadOutcome,
    SharedSimulator, Source, XInputSource, DUALSENSE_PRODUCT_IDS, DUALSHOCK4_PRODUCT_IDS,
    JOYSTICK_NATIVE, PLAYSTATION_NATIVE, SONY_VENDOR_ID, XINPUT_NATIVE,
};
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::error::{Error, Result};
pub use crate::events::{EventReceiver, EventSink, PadEvent};
pub use crate::mapping::ButtonMapping;
pub use crate::mask::{button_name, parse_button_name, RawButtons};
pub use crate::settings::{
    GestureSettings, MouseSettings, NavigationSettings, PollSettings, Settings,
    CLOSE_HOLD_THRESHOLD, HEALTH_CHECK_INTERVAL, MOUSE_GAMMA, MOUSE_MAX_SPEED, MOUSE_MIN_SPEED,
    MOUSE_MODE_TIMEOUT, POLL_INTERVAL, QUICK_TAP_THRESHOLD, REPEAT_DELAY, REPEAT_INTERVAL,
    STOP_TIMEOUT, TAP_MAX_DISTANCE, TAP_MAX_DURATION,
};
pub use crate::translate::{Frame, StickSample, TouchPoint, Translator};
pub use crate::types::{ControllerType, Direction, LogicalButton};
