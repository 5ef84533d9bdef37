use super::{ReadOutcome, Source};
use crate::mapping::ButtonMapping;
use crate::mask::RawButtons;
use crate::platform::{JoystickPort, JoystickPosition, JOYSTICK_AXIS_CENTER};
use crate::translate::{Frame, StickSample};
use crate::types::{ControllerType, Direction};

const AXIS_DEADZONE: i64 = 12000;

/// Hat readings above this are the centered sentinel.
const POV_MAX: u32 = 35999;

/// Product name fragments of devices another backend drives.
const CLAIMED_NAMES: &[&str] = &[
    "xbox",
    "x-box",
    "xinput",
    "microsoft",
    "wireless controller",
    "dualshock",
    "dualsense",
    "playstation",
];

/// Buttons 1 to 10 in A, B, X, Y, LB, RB, Back, Start, LS, RS order.
pub const JOYSTICK_NATIVE: ButtonMapping = ButtonMapping::from_bits([
    0x0001, 0x0002, 0x0004, 0x0008, 0x0010, 0x0020, 0x0040, 0x0080, 0x0100, 0x0200,
]);

/// Generic DirectInput-class gamepads on the legacy joystick slots.
#[derive(Debug)]
pub struct JoystickSource<P: JoystickPort> {
    port: P,
    slot: Option<u32>,
}

impl<P: JoystickPort> JoystickSource<P> {
    pub fn new(port: P) -> Self {
        Self { port, slot: None }
    }

    fn scan(&mut self) -> Option<(u32, JoystickPosition)> {
        for slot in 0..self.port.slot_count() {
            let Some(name) = self.port.name(slot) else {
                continue;
            };
            if is_claimed(&name) {
                log::trace!("joystick slot {slot} skipped: {name}");
                continue;
            }
            if let Some(position) = self.port.position(slot) {
                log::debug!("joystick on slot {slot}: {name}");
                return Some((slot, position));
            }
        }
        None
    }
}

impl<P: JoystickPort> Source for JoystickSource<P> {
    const CONTROLLER_TYPE: ControllerType = ControllerType::GenericHid;

    fn probe(&mut self) -> bool {
        self.slot = self.scan().map(|(slot, _)| slot);
        self.slot.is_some()
    }

    fn read(&mut self) -> ReadOutcome {
        if let Some(slot) = self.slot {
            if let Some(position) = self.port.position(slot) {
                return ReadOutcome::Frame(decode_position(&position));
            }
        }
        match self.scan() {
            Some((slot, position)) => {
                self.slot = Some(slot);
                ReadOutcome::Frame(decode_position(&position))
            }
            None => {
                self.slot = None;
                ReadOutcome::Disconnected
            }
        }
    }

    fn close(&mut self) {
        self.slot = None;
    }

    fn self_heals(&self) -> bool {
        true
    }

    /// Any single button bit is valid on this protocol.
    fn resolve_mapping(mapping: &ButtonMapping) -> ButtonMapping {
        mapping.resolve(&JOYSTICK_NATIVE, |_| true)
    }
}

fn is_claimed(name: &str) -> bool {
    let name = name.to_lowercase();
    CLAIMED_NAMES.iter().any(|marker| name.contains(marker))
}

/// Hat angle in hundredths of a degree, diagonals resolved to the nearest
/// cardinal with ties going to the vertical.
pub(crate) fn pov_direction(pov: u32) -> Direction {
    match pov {
        0..=4500 | 31500..=POV_MAX => Direction::Up,
        4501..=13499 => Direction::Right,
        13500..=22500 => Direction::Down,
        22501..=31499 => Direction::Left,
        _ => Direction::None,
    }
}

fn centered(axis: u32) -> i64 {
    i64::from(axis) - i64::from(JOYSTICK_AXIS_CENTER)
}

fn normalize_axis(axis: u32) -> f32 {
    (centered(axis) as f32 / JOYSTICK_AXIS_CENTER as f32).clamp(-1.0, 1.0)
}

pub(crate) fn decode_position(position: &JoystickPosition) -> Frame {
    let mut direction = pov_direction(position.pov);
    if direction.is_none() {
        direction = Direction::from_axes(
            centered(position.x),
            centered(position.y),
            AXIS_DEADZONE,
        );
    }
    Frame {
        buttons: RawButtons::from_bits(position.buttons),
        direction,
        pointer_stick: Some(StickSample {
            x: normalize_axis(position.z),
            y: normalize_axis(position.r),
            deadzone: AXIS_DEADZONE as f32 / JOYSTICK_AXIS_CENTER as f32,
        }),
        touch: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::JOYSTICK_POV_CENTERED;

    #[derive(Default)]
    struct FakePort {
        devices: Vec<(String, Option<JoystickPosition>)>,
    }

    impl JoystickPort for FakePort {
        fn slot_count(&self) -> u32 {
            16
        }

        fn name(&mut self, slot: u32) -> Option<String> {
            self.devices.get(slot as usize).map(|(name, _)| name.clone())
        }

        fn position(&mut self, slot: u32) -> Option<JoystickPosition> {
            self.devices.get(slot as usize).and_then(|(_, pos)| *pos)
        }
    }

    fn at_rest() -> JoystickPosition {
        JoystickPosition::default()
    }

    #[test]
    fn pov_sectors() {
        assert_eq!(pov_direction(0), Direction::Up);
        assert_eq!(pov_direction(4500), Direction::Up);
        assert_eq!(pov_direction(9000), Direction::Right);
        assert_eq!(pov_direction(13500), Direction::Down);
        assert_eq!(pov_direction(18000), Direction::Down);
        assert_eq!(pov_direction(27000), Direction::Left);
        assert_eq!(pov_direction(31500), Direction::Up);
        assert_eq!(pov_direction(JOYSTICK_POV_CENTERED), Direction::None);
    }

    #[test]
    fn axes_fall_back_when_hat_is_centered() {
        let mut position = at_rest();
        position.x = 0;
        assert_eq!(decode_position(&position).direction, Direction::Left);
        position.y = 65535;
        assert_eq!(decode_position(&position).direction, Direction::Down);
        position.pov = 9000;
        assert_eq!(decode_position(&position).direction, Direction::Right);
    }

    #[test]
    fn small_deflection_stays_inside_deadzone() {
        let mut position = at_rest();
        position.x = JOYSTICK_AXIS_CENTER + 12000;
        assert_eq!(decode_position(&position).direction, Direction::None);
        position.x += 1;
        assert_eq!(decode_position(&position).direction, Direction::Right);
    }

    #[test]
    fn claimed_devices_are_skipped() {
        let port = FakePort {
            devices: vec![
                ("Controller (XBOX 360 For Windows)".into(), Some(at_rest())),
                ("Wireless Controller".into(), Some(at_rest())),
                ("USB Gamepad".into(), Some(at_rest())),
            ],
        };
        let mut source = JoystickSource::new(port);
        assert!(source.probe());
        assert_eq!(source.slot, Some(2));
    }

    #[test]
    fn silent_device_is_not_connected() {
        let port = FakePort {
            devices: vec![("USB Gamepad".into(), None)],
        };
        let mut source = JoystickSource::new(port);
        assert!(!source.probe());
    }

    #[test]
    fn lost_device_reads_as_disconnected() {
        let port = FakePort {
            devices: vec![("USB Gamepad".into(), Some(at_rest()))],
        };
        let mut source = JoystickSource::new(port);
        assert!(source.probe());
        source.port.devices[0].1 = None;
        assert_eq!(source.read(), ReadOutcome::Disconnected);
        source.port.devices[0].1 = Some(at_rest());
        assert!(matches!(source.read(), ReadOutcome::Frame(_)));
    }

    #[test]
    fn multi_bit_mapping_entry_falls_back() {
        let mut mapping = JOYSTICK_NATIVE;
        mapping.a = RawButtons::from_bits(0x0003);
        mapping.b = RawButtons::from_bits(0x8000);
        let resolved = JoystickSource::<FakePort>::resolve_mapping(&mapping);
        assert_eq!(resolved.a, RawButtons::from_bits(0x0001));
        assert_eq!(resolved.b, RawButtons::from_bits(0x8000));
    }
}
