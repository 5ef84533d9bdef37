//! Controller backends: one polling adapter per hardware protocol.

mod adapter;
mod joystick;
mod playstation;
mod xinput;

use std::sync::{Arc, Mutex};

use padbridge_control::InputSimulator;

use crate::events::EventSink;
use crate::mapping::ButtonMapping;
use crate::translate::Frame;
use crate::types::ControllerType;

pub use adapter::Adapter;
pub use joystick::{JoystickSource, JOYSTICK_NATIVE};
pub use playstation::{
    playstation_button, PlayStationSource, DUALSENSE_PRODUCT_IDS, DUALSHOCK4_PRODUCT_IDS,
    PLAYSTATION_NATIVE, SONY_VENDOR_ID,
};
pub use xinput::{XInputSource, XINPUT_NATIVE};

/// OS input simulator shared by every adapter; only the active one uses it.
pub type SharedSimulator = Arc<Mutex<Box<dyn InputSimulator>>>;

/// Lifecycle every controller backend offers to the arbitrator.
pub trait Backend: Send {
    fn controller_type(&self) -> ControllerType;

    /// Probe for a device and open it. Idempotent: returns `true` right away
    /// when already connected. Leaves nothing open on failure.
    fn try_connect(&mut self) -> bool;

    fn is_connected(&self) -> bool;

    /// Start the background read loop, delivering events to `sink`.
    fn start_polling(&mut self, sink: EventSink);

    /// Stop the read loop and close the device. Waits for the loop with a
    /// bound, then abandons it.
    fn stop_polling(&mut self);

    /// Takes effect on the next poll iteration.
    fn update_button_mapping(&self, mapping: ButtonMapping);

    fn reset_navigation_state(&self);
}

/// Result of one hardware read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadOutcome {
    Frame(Frame),
    /// Device present, nothing new to report.
    Idle,
    /// The device went away.
    Disconnected,
}

/// A hardware protocol: device discovery plus report decoding.
pub trait Source: Send + 'static {
    const CONTROLLER_TYPE: ControllerType;

    /// Find and open a device. Leaves nothing open on failure.
    fn probe(&mut self) -> bool;

    fn read(&mut self) -> ReadOutcome;

    fn close(&mut self);

    /// Whether `read` rediscovers devices on its own after a loss. Sources
    /// that do not heal end their read loop on disconnect.
    fn self_heals(&self) -> bool;

    /// The mapping this protocol actually applies to its raw buttons.
    fn resolve_mapping(mapping: &ButtonMapping) -> ButtonMapping;
}
