//! Thin seams over the OS device APIs.
//!
//! Adapters talk to hardware only through these traits so that decoding,
//! slot scanning and reconnect logic can run against scripted devices.

#[cfg(feature = "hid-backend")]
mod hid;
mod winmm;
mod xinput;

#[cfg(feature = "hid-backend")]
pub use hid::HidapiPort;
pub use winmm::SystemJoystick;
pub use xinput::SystemXInput;

use crate::error::Result;

/// Raw XInput gamepad state of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct XInputState {
    pub packet: u32,
    pub buttons: u16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

/// XInput user slots, `0..XINPUT_SLOTS`.
pub const XINPUT_SLOTS: u32 = 4;

pub trait XInputPort: Send + 'static {
    /// State of `slot`, `None` when nothing is plugged into it.
    fn get_state(&mut self, slot: u32) -> Option<XInputState>;
}

/// Legacy joystick position, axes in `0..=65535`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoystickPosition {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub r: u32,
    /// One bit per button, button 1 in bit 0.
    pub buttons: u32,
    /// Hat angle in hundredths of a degree, anything above 35999 is centered.
    pub pov: u32,
}

impl Default for JoystickPosition {
    fn default() -> Self {
        Self {
            x: JOYSTICK_AXIS_CENTER,
            y: JOYSTICK_AXIS_CENTER,
            z: JOYSTICK_AXIS_CENTER,
            r: JOYSTICK_AXIS_CENTER,
            buttons: 0,
            pov: JOYSTICK_POV_CENTERED,
        }
    }
}

pub const JOYSTICK_AXIS_CENTER: u32 = 32767;
pub const JOYSTICK_POV_CENTERED: u32 = 0xFFFF;

pub trait JoystickPort: Send + 'static {
    fn slot_count(&self) -> u32;
    /// Product name reported for `slot`, if the slot has a driver.
    fn name(&mut self, slot: u32) -> Option<String>;
    /// Current position; `None` when the device does not answer.
    fn position(&mut self, slot: u32) -> Option<JoystickPosition>;
}

pub trait HidPort: Send + 'static {
    /// Open the first device with `vendor_id` and one of `product_ids`,
    /// returning its product id. Any previously open device is closed.
    fn open(&mut self, vendor_id: u16, product_ids: &[u16]) -> Result<Option<u16>>;

    /// Non-blocking read of one input report. `Ok(0)` when none is queued.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    fn close(&mut self);

    fn is_open(&self) -> bool;
}
