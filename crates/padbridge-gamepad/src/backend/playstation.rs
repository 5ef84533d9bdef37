use super::{ReadOutcome, Source};
use crate::mapping::ButtonMapping;
use crate::mask::RawButtons;
use crate::platform::HidPort;
use crate::translate::{Frame, TouchPoint};
use crate::types::{ControllerType, Direction};

pub const SONY_VENDOR_ID: u16 = 0x054C;
pub const DUALSHOCK4_PRODUCT_IDS: [u16; 3] = [0x05C4, 0x09CC, 0x0BA0];
pub const DUALSENSE_PRODUCT_IDS: [u16; 2] = [0x0CE6, 0x0DF2];

const STICK_CENTER: i32 = 128;
const STICK_DEADZONE: i32 = 64;

/// Reports drained per poll; the controller streams far faster than we read.
const MAX_REPORTS_PER_POLL: usize = 64;

/// Raw bits this backend assigns to PlayStation buttons.
pub mod playstation_button {
    pub const SQUARE: u32 = 0x0001;
    pub const CROSS: u32 = 0x0002;
    pub const CIRCLE: u32 = 0x0004;
    pub const TRIANGLE: u32 = 0x0008;
    pub const L1: u32 = 0x0010;
    pub const R1: u32 = 0x0020;
    pub const L2: u32 = 0x0040;
    pub const R2: u32 = 0x0080;
    pub const SHARE: u32 = 0x0100;
    pub const OPTIONS: u32 = 0x0200;
    pub const L3: u32 = 0x0400;
    pub const R3: u32 = 0x0800;
    pub const PS: u32 = 0x1000;
    pub const TOUCH_CLICK: u32 = 0x2000;
}

use playstation_button::{CIRCLE, CROSS, L1, L3, OPTIONS, R1, R3, SHARE, SQUARE, TRIANGLE};

/// Fixed PlayStation layout. Share (Create on DualSense) is Back and Options
/// is Start.
pub const PLAYSTATION_NATIVE: ButtonMapping = ButtonMapping::from_bits([
    CROSS, CIRCLE, SQUARE, TRIANGLE, L1, R1, SHARE, OPTIONS, L3, R3,
]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Model {
    DualShock4,
    DualSense,
}

impl Model {
    fn from_product_id(product_id: u16) -> Option<Model> {
        if DUALSHOCK4_PRODUCT_IDS.contains(&product_id) {
            Some(Model::DualShock4)
        } else if DUALSENSE_PRODUCT_IDS.contains(&product_id) {
            Some(Model::DualSense)
        } else {
            None
        }
    }
}

/// Byte offsets of one report layout, relative to its payload start.
struct Layout {
    buttons: usize,
    touch: usize,
}

const DUALSHOCK4_LAYOUT: Layout = Layout {
    buttons: 4,
    touch: 34,
};

const DUALSENSE_LAYOUT: Layout = Layout {
    buttons: 7,
    touch: 32,
};

/// DualShock 4 and DualSense over raw HID, USB or Bluetooth.
///
/// The button layout is fixed and ignores the configurable mapping.
pub struct PlayStationSource<P: HidPort> {
    port: P,
    model: Option<Model>,
    buf: [u8; 128],
}

impl<P: HidPort> PlayStationSource<P> {
    pub fn new(port: P) -> Self {
        Self {
            port,
            model: None,
            buf: [0; 128],
        }
    }
}

impl<P: HidPort> Source for PlayStationSource<P> {
    const CONTROLLER_TYPE: ControllerType = ControllerType::PlayStation;

    fn probe(&mut self) -> bool {
        let product_ids: Vec<u16> = DUALSHOCK4_PRODUCT_IDS
            .iter()
            .chain(DUALSENSE_PRODUCT_IDS.iter())
            .copied()
            .collect();
        self.model = match self.port.open(SONY_VENDOR_ID, &product_ids) {
            Ok(Some(product_id)) => Model::from_product_id(product_id),
            Ok(None) => None,
            Err(e) => {
                log::debug!("playstation probe failed: {e}");
                None
            }
        };
        if self.model.is_none() {
            self.port.close();
        } else {
            log::debug!("playstation controller opened: {:?}", self.model);
        }
        self.model.is_some()
    }

    fn read(&mut self) -> ReadOutcome {
        let Some(model) = self.model else {
            return ReadOutcome::Disconnected;
        };
        let mut latest = None;
        for _ in 0..MAX_REPORTS_PER_POLL {
            match self.port.read(&mut self.buf) {
                Ok(0) => break,
                Ok(len) => {
                    let report = &self.buf[..len.min(self.buf.len())];
                    match decode_report(model, report) {
                        Some(frame) => latest = Some(frame),
                        None => log::trace!("discarded {len} byte report"),
                    }
                }
                Err(e) => {
                    log::debug!("playstation read failed: {e}");
                    self.close();
                    return ReadOutcome::Disconnected;
                }
            }
        }
        latest.map_or(ReadOutcome::Idle, ReadOutcome::Frame)
    }

    fn close(&mut self) {
        self.port.close();
        self.model = None;
    }

    fn self_heals(&self) -> bool {
        false
    }

    fn resolve_mapping(_mapping: &ButtonMapping) -> ButtonMapping {
        PLAYSTATION_NATIVE
    }
}

/// Payload start of a report, chosen by its id byte.
fn payload_start(model: Model, report_id: u8) -> Option<usize> {
    match (model, report_id) {
        (_, 0x01) => Some(1),
        // Bluetooth reports carry a two byte header after the id.
        (Model::DualShock4, 0x11) => Some(3),
        (Model::DualSense, 0x31) => Some(2),
        _ => None,
    }
}

/// Hat nibble to direction; diagonals collapse onto a cardinal.
pub(crate) fn hat_direction(nibble: u8) -> Direction {
    match nibble {
        0 | 1 | 7 => Direction::Up,
        2 => Direction::Right,
        3..=5 => Direction::Down,
        6 => Direction::Left,
        _ => Direction::None,
    }
}

fn decode_touch(bytes: &[u8]) -> Option<TouchPoint> {
    let &[contact, b0, b1, b2] = bytes else {
        return None;
    };
    // Bit 7 set means no finger.
    if contact & 0x80 != 0 {
        return None;
    }
    let x = u16::from(b0) | (u16::from(b1 & 0x0F) << 8);
    let y = u16::from(b1 >> 4) | (u16::from(b2) << 4);
    Some(TouchPoint {
        x: f32::from(x),
        y: f32::from(y),
    })
}

fn decode_report(model: Model, report: &[u8]) -> Option<Frame> {
    let base = payload_start(model, *report.first()?)?;
    let layout = match model {
        Model::DualShock4 => &DUALSHOCK4_LAYOUT,
        Model::DualSense => &DUALSENSE_LAYOUT,
    };
    let payload = report.get(base..)?;
    let &[lx, ly, ..] = payload else {
        return None;
    };
    let &[b0, b1, b2] = payload.get(layout.buttons..layout.buttons + 3)? else {
        return None;
    };

    let bits = u32::from(b0 >> 4) | (u32::from(b1) << 4) | (u32::from(b2 & 0x03) << 12);

    let mut direction = hat_direction(b0 & 0x0F);
    if direction.is_none() {
        direction = Direction::from_axes(
            i32::from(lx) - STICK_CENTER,
            i32::from(ly) - STICK_CENTER,
            STICK_DEADZONE,
        );
    }

    let touch = payload
        .get(layout.touch..layout.touch + 4)
        .and_then(decode_touch);

    Some(Frame {
        buttons: RawButtons::from_bits(bits),
        direction,
        pointer_stick: None,
        touch,
    })
}
