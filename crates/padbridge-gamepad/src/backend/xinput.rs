use super::{ReadOutcome, Source};
use crate::mapping::ButtonMapping;
use crate::mask::RawButtons;
use crate::platform::{XInputPort, XInputState, XINPUT_SLOTS};
use crate::translate::{Frame, StickSample};
use crate::types::{ControllerType, Direction};

const DPAD_UP: u16 = 0x0001;
const DPAD_DOWN: u16 = 0x0002;
const DPAD_LEFT: u16 = 0x0004;
const DPAD_RIGHT: u16 = 0x0008;

/// Face, shoulder, menu and thumb buttons; the D-pad is excluded.
const KNOWN_BUTTONS: u32 = 0xF3F0;

const THUMB_DEADZONE: i32 = 8000;
const THUMB_MAX: f32 = 32767.0;

/// Native XInput flags: A, B, X, Y, LB, RB, Back, Start, LS, RS.
pub const XINPUT_NATIVE: ButtonMapping = ButtonMapping::from_bits([
    0x1000, 0x2000, 0x4000, 0x8000, 0x0100, 0x0200, 0x0020, 0x0010, 0x0040, 0x0080,
]);

/// Xbox-compatible controllers on XInput user slots.
#[derive(Debug)]
pub struct XInputSource<P: XInputPort> {
    port: P,
    slot: Option<u32>,
}

impl<P: XInputPort> XInputSource<P> {
    pub fn new(port: P) -> Self {
        Self { port, slot: None }
    }

    /// First answering slot, trying `preferred` before `0..4`.
    fn scan(&mut self, preferred: Option<u32>) -> Option<(u32, XInputState)> {
        preferred
            .into_iter()
            .chain(0..XINPUT_SLOTS)
            .find_map(|slot| self.port.get_state(slot).map(|state| (slot, state)))
    }
}

impl<P: XInputPort> Source for XInputSource<P> {
    const CONTROLLER_TYPE: ControllerType = ControllerType::XInput;

    fn probe(&mut self) -> bool {
        self.slot = self.scan(None).map(|(slot, _)| slot);
        if let Some(slot) = self.slot {
            log::debug!("xinput controller on slot {slot}");
        }
        self.slot.is_some()
    }

    fn read(&mut self) -> ReadOutcome {
        match self.scan(self.slot) {
            Some((slot, state)) => {
                if self.slot != Some(slot) {
                    log::debug!("xinput controller moved to slot {slot}");
                    self.slot = Some(slot);
                }
                ReadOutcome::Frame(decode_state(&state))
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

    /// A mapping captured on an XInput pad is used as is. Anything else,
    /// such as the joystick default layout, means the native flags.
    fn resolve_mapping(mapping: &ButtonMapping) -> ButtonMapping {
        if is_xinput_layout(mapping) {
            *mapping
        } else {
            XINPUT_NATIVE
        }
    }
}

/// Every entry is a distinct XInput button flag.
fn is_xinput_layout(mapping: &ButtonMapping) -> bool {
    let mut claimed = 0;
    mapping.entries().all(|(_, mask)| {
        let bits = mask.bits();
        let fits = mask.is_single() && bits & KNOWN_BUTTONS != 0 && bits & claimed == 0;
        claimed |= bits;
        fits
    })
}

fn dpad_direction(buttons: u16) -> Direction {
    if buttons & DPAD_UP != 0 {
        Direction::Up
    } else if buttons & DPAD_DOWN != 0 {
        Direction::Down
    } else if buttons & DPAD_LEFT != 0 {
        Direction::Left
    } else if buttons & DPAD_RIGHT != 0 {
        Direction::Right
    } else {
        Direction::None
    }
}

fn normalize_thumb(value: i16) -> f32 {
    (f32::from(value) / THUMB_MAX).clamp(-1.0, 1.0)
}

pub(crate) fn decode_state(state: &XInputState) -> Frame {
    let mut direction = dpad_direction(state.buttons);
    if direction.is_none() {
        // Thumb Y grows upwards.
        direction = Direction::from_axes(
            i32::from(state.thumb_lx),
            -i32::from(state.thumb_ly),
            THUMB_DEADZONE,
        );
    }
    Frame {
        buttons: RawButtons::from_bits(u32::from(state.buttons)),
        direction,
        pointer_stick: Some(StickSample {
            x: normalize_thumb(state.thumb_rx),
            y: -normalize_thumb(state.thumb_ry),
            deadzone: THUMB_DEADZONE as f32 / THUMB_MAX,
        }),
        touch: None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use crossbeam_channel::unbounded;
    use padbridge_control::NullSimulator;

    use super::*;
    use crate::backend::{Adapter, Backend};
    use crate::clock::SystemClock;
    use crate::events::PadEvent;
    use crate::settings::Settings;
    use crate::translate::Translator;
    use crate::types::LogicalButton;

    #[derive(Default)]
    struct FakePort {
        slots: [Option<XInputState>; 4],
    }

    impl XInputPort for FakePort {
        fn get_state(&mut self, slot: u32) -> Option<XInputState> {
            self.slots.get(slot as usize).copied().flatten()
        }
    }

    fn pad(buttons: u16) -> XInputState {
        XInputState {
            buttons,
            ..XInputState::default()
        }
    }

    #[test]
    fn dpad_wins_over_thumb() {
        let state = XInputState {
            buttons: DPAD_LEFT,
            thumb_ly: 30000,
            ..XInputState::default()
        };
        assert_eq!(decode_state(&state).direction, Direction::Left);
    }

    #[test]
    fn dpad_priority_is_up_down_left_right() {
        assert_eq!(dpad_direction(DPAD_UP | DPAD_RIGHT), Direction::Up);
        assert_eq!(dpad_direction(DPAD_DOWN | DPAD_LEFT), Direction::Down);
        assert_eq!(dpad_direction(DPAD_LEFT | DPAD_RIGHT), Direction::Left);
    }

    #[test]
    fn thumb_uses_deadzone_and_vertical_first() {
        let mut state = XInputState::default();
        state.thumb_lx = 8000;
        assert_eq!(decode_state(&state).direction, Direction::None);
        state.thumb_lx = 8001;
        assert_eq!(decode_state(&state).direction, Direction::Right);
        state.thumb_ly = -9000;
        assert_eq!(decode_state(&state).direction, Direction::Down);
        state.thumb_ly = 9000;
        assert_eq!(decode_state(&state).direction, Direction::Up);
    }

    #[test]
    fn right_thumb_feeds_pointer_with_downward_y() {
        let state = XInputState {
            thumb_rx: 32767,
            thumb_ry: 32767,
            ..XInputState::default()
        };
        let stick = decode_state(&state).pointer_stick.unwrap();
        assert_eq!(stick.x, 1.0);
        assert_eq!(stick.y, -1.0);
    }

    #[test]
    fn first_answering_slot_is_used() {
        let mut port = FakePort::default();
        port.slots[2] = Some(pad(0x1000));
        let mut source = XInputSource::new(port);
        assert!(source.probe());
        assert_eq!(source.slot, Some(2));
    }

    #[test]
    fn empty_slots_do_not_probe() {
        let mut source = XInputSource::new(FakePort::default());
        assert!(!source.probe());
        assert_eq!(source.read(), ReadOutcome::Disconnected);
    }

    #[test]
    fn read_follows_controller_to_another_slot() {
        let mut port = FakePort::default();
        port.slots[0] = Some(pad(0));
        let mut source = XInputSource::new(port);
        assert!(source.probe());
        source.port.slots[0] = None;
        source.port.slots[3] = Some(pad(0x2000));
        match source.read() {
            ReadOutcome::Frame(frame) => assert_eq!(frame.buttons.bits(), 0x2000),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(source.slot, Some(3));
    }

    #[test]
    fn captured_xinput_layout_is_kept() {
        let mut mapping = XINPUT_NATIVE;
        mapping.a = XINPUT_NATIVE.b;
        mapping.b = XINPUT_NATIVE.a;
        assert_eq!(XInputSource::<FakePort>::resolve_mapping(&mapping), mapping);
    }

    #[test]
    fn foreign_or_clashing_entries_mean_native_layout() {
        let mut dpad = XINPUT_NATIVE;
        dpad.a = RawButtons::from_bits(0x0001);
        let mut unused_bit = XINPUT_NATIVE;
        unused_bit.b = RawButtons::from_bits(0x0400);
        let mut clash = XINPUT_NATIVE;
        clash.x = XINPUT_NATIVE.y;
        for mapping in [dpad, unused_bit, clash] {
            assert_eq!(
                XInputSource::<FakePort>::resolve_mapping(&mapping),
                XINPUT_NATIVE
            );
        }
    }

    #[test]
    fn default_mapping_means_native_layout() {
        assert_eq!(
            XInputSource::<FakePort>::resolve_mapping(&ButtonMapping::default()),
            XINPUT_NATIVE
        );
    }

    #[test]
    fn edited_joystick_mapping_keeps_xinput_bumpers() {
        let mut mapping = ButtonMapping::default();
        mapping.a = RawButtons::from_bits(0x0002);
        mapping.b = RawButtons::from_bits(0x0001);
        let resolved = XInputSource::<FakePort>::resolve_mapping(&mapping);

        let mut translator = Translator::new(&Settings::default());
        let mut events = Vec::new();
        let frame = decode_state(&pad(0x0100));
        translator.process(
            &frame,
            &resolved,
            Instant::now(),
            &mut NullSimulator,
            &mut |event| events.push(event),
        );
        assert_eq!(
            events,
            vec![
                PadEvent::RawButtonPressed(RawButtons::from_bits(0x0100)),
                PadEvent::ButtonPressed(LogicalButton::LeftBumper),
            ]
        );
    }

    #[test]
    fn slot_zero_dpad_up_reports_direction() {
        let mut port = FakePort::default();
        port.slots[0] = Some(pad(DPAD_UP));
        let mut settings = Settings::default();
        settings.polling.poll_interval = Duration::from_millis(1);
        let mut adapter = Adapter::new(
            XInputSource::new(port),
            settings,
            ButtonMapping::default(),
            Arc::new(SystemClock),
            Arc::new(Mutex::new(Box::new(NullSimulator))),
        );
        assert!(adapter.try_connect());
        let (tx, rx) = unbounded();
        adapter.start_polling(Arc::new(move |event| {
            let _ = tx.send(event);
        }));
        let direction = rx
            .iter()
            .find(|event| matches!(event, PadEvent::DirectionChanged(_)));
        adapter.stop_polling();
        assert_eq!(direction, Some(PadEvent::DirectionChanged(Direction::Up)));
    }
}
