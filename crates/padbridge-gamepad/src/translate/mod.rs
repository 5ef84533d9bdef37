//! Backend-independent translation of decoded frames into events, gestures
//! and cursor motion.

mod combo;
mod mouse;
mod repeat;
mod util;

use std::time::Instant;

use padbridge_control::{InputSimulator, KeyCombo};

use crate::events::PadEvent;
use crate::mapping::ButtonMapping;
use crate::mask::RawButtons;
use crate::settings::Settings;
use crate::types::{Direction, LogicalButton};

use self::combo::{HoldCombo, TapCombo};
use self::mouse::MouseTranslator;
use self::repeat::DirectionRepeater;

/// Analog stick position normalized to `-1.0..=1.0`, `y` growing downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickSample {
    pub x: f32,
    pub y: f32,
    /// Radial deadzone in the same normalized units.
    pub deadzone: f32,
}

/// Touchpad contact position in device units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

/// One decoded hardware read.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    /// Pressed buttons in the backend's raw bit space.
    pub buttons: RawButtons,
    pub direction: Direction,
    /// Stick that drives the cursor, if the device has one.
    pub pointer_stick: Option<StickSample>,
    /// Finger 1 on the touchpad, if touching.
    pub touch: Option<TouchPoint>,
}

/// Stateful frame-to-event translation of one adapter session.
///
/// Per poll it drives the cursor, reports button edges, runs the close and
/// window-switch gestures and applies directional repeat, in that order.
#[derive(Debug)]
pub struct Translator {
    mouse: MouseTranslator,
    close: HoldCombo,
    switch: TapCombo,
    repeat: DirectionRepeater,
    switch_window: KeyCombo,
    last_buttons: RawButtons,
}

impl Translator {
    pub fn new(settings: &Settings) -> Self {
        Self {
            mouse: MouseTranslator::new(&settings.mouse),
            close: HoldCombo::new(settings.gestures.close_hold),
            switch: TapCombo::new(settings.gestures.quick_tap),
            repeat: DirectionRepeater::new(&settings.navigation),
            switch_window: settings.switch_window.clone(),
            last_buttons: RawButtons::empty(),
        }
    }

    pub fn process(
        &mut self,
        frame: &Frame,
        mapping: &ButtonMapping,
        now: Instant,
        simulator: &mut dyn InputSimulator,
        emit: &mut dyn FnMut(PadEvent),
    ) {
        self.mouse
            .update_stick(frame.pointer_stick.as_ref(), now, simulator);
        self.mouse.update_touch(frame.touch, now, simulator);

        let pressed = frame.buttons.pressed_since(self.last_buttons);
        if !pressed.is_empty() {
            for bit in pressed.iter_bits() {
                emit(PadEvent::RawButtonPressed(bit));
            }
            let mouse_mode = self.mouse.is_mouse_mode(now);
            for (button, mask) in mapping.entries() {
                if !pressed.intersects(mask) {
                    continue;
                }
                if button == LogicalButton::A && mouse_mode {
                    if let Err(e) = simulator.left_click() {
                        log::debug!("confirm click failed: {e}");
                    }
                    continue;
                }
                emit(PadEvent::ButtonPressed(button));
            }
        }

        let buttons = frame.buttons;
        if self
            .close
            .update(buttons.contains_all(mapping.close_chord()), now)
        {
            emit(PadEvent::CloseComboHeld);
        }

        let chord = buttons.contains_all(mapping.switch_chord());
        let cancel = buttons.intersects(mapping.start);
        if self.switch.update(chord, cancel, now) {
            if let Err(e) = simulator.perform(&self.switch_window) {
                log::debug!("switch window shortcut failed: {e}");
            }
            emit(PadEvent::AltTabRequested);
        }

        if let Some(direction) = self.repeat.update(frame.direction, now) {
            emit(PadEvent::DirectionChanged(direction));
        }

        self.last_buttons = buttons;
    }

    /// Whether recent pointer activity routes the confirm button to a click.
    pub fn is_mouse_mode(&self, now: Instant) -> bool {
        self.mouse.is_mouse_mode(now)
    }

    /// Forget repeat timers; a still-held direction reports again at once.
    pub fn reset_navigation(&mut self) {
        self.repeat.reset();
    }

    /// Drop every piece of per-device state, as after an unplug.
    pub fn release_all(&mut self) {
        self.mouse.reset();
        self.close.reset();
        self.switch.reset();
        self.repeat.reset();
        self.last_buttons = RawButtons::empty();
    }
}
