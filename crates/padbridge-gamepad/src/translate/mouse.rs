use std::time::Instant;

use padbridge_control::InputSimulator;

use crate::settings::MouseSettings;
use crate::translate::util::{apply_gamma, magnitude2d, normalize_after_deadzone};
use crate::translate::{StickSample, TouchPoint};

#[derive(Debug, Clone, Copy)]
struct TouchTrack {
    started: Instant,
    last: TouchPoint,
    travelled: f32,
    residual: (f32, f32),
}

/// Analog stick and touchpad to cursor translation, plus the mouse-mode
/// predicate derived from recent pointer activity.
#[derive(Debug)]
pub(crate) struct MouseTranslator {
    settings: MouseSettings,
    last_activity: Option<Instant>,
    touch: Option<TouchTrack>,
}

impl MouseTranslator {
    pub(crate) fn new(settings: &MouseSettings) -> Self {
        Self {
            settings: *settings,
            last_activity: None,
            touch: None,
        }
    }

    /// Cursor delta for one poll of a deflected stick, `None` inside the
    /// deadzone.
    pub(crate) fn stick_step(&self, stick: &StickSample) -> Option<(i32, i32)> {
        let mag = magnitude2d(stick.x, stick.y);
        if mag <= stick.deadzone {
            return None;
        }
        let t = normalize_after_deadzone(mag.min(1.0), stick.deadzone);
        let MouseSettings {
            min_speed,
            max_speed,
            gamma,
            ..
        } = self.settings;
        let speed = min_speed + (max_speed - min_speed) * apply_gamma(t, gamma);
        let dx = (stick.x / mag * speed).round() as i32;
        let dy = (stick.y / mag * speed).round() as i32;
        Some((dx, dy))
    }

    pub(crate) fn update_stick(
        &mut self,
        stick: Option<&StickSample>,
        now: Instant,
        simulator: &mut dyn InputSimulator,
    ) {
        let Some((dx, dy)) = stick.and_then(|s| self.stick_step(s)) else {
            return;
        };
        self.last_activity = Some(now);
        if dx != 0 || dy != 0 {
            if let Err(e) = simulator.move_cursor(dx, dy) {
                log::debug!("cursor move failed: {e}");
            }
        }
    }

    /// Track touchpad finger 1: drag moves the cursor, a short and still
    /// contact clicks on lift.
    pub(crate) fn update_touch(
        &mut self,
        touch: Option<TouchPoint>,
        now: Instant,
        simulator: &mut dyn InputSimulator,
    ) {
        let Some(point) = touch else {
            if let Some(track) = self.touch.take() {
                let held = now.saturating_duration_since(track.started);
                let tap = held < self.settings.tap_duration
                    && track.travelled < self.settings.tap_distance;
                if tap {
                    self.last_activity = Some(now);
                    if let Err(e) = simulator.left_click() {
                        log::debug!("tap click failed: {e}");
                    }
                }
            }
            return;
        };
        let Some(track) = self.touch.as_mut() else {
            self.touch = Some(TouchTrack {
                started: now,
                last: point,
                travelled: 0.0,
                residual: (0.0, 0.0),
            });
            return;
        };

        let (mx, my) = (point.x - track.last.x, point.y - track.last.y);
        track.last = point;
        if mx == 0.0 && my == 0.0 {
            return;
        }
        track.travelled += magnitude2d(mx, my);
        let sens = self.settings.touch_sensitivity;
        let fx = track.residual.0 + mx * sens;
        let fy = track.residual.1 + my * sens;
        let (dx, dy) = (fx.trunc(), fy.trunc());
        track.residual = (fx - dx, fy - dy);
        self.last_activity = Some(now);
        if dx != 0.0 || dy != 0.0 {
            if let Err(e) = simulator.move_cursor(dx as i32, dy as i32) {
                log::debug!("cursor move failed: {e}");
            }
        }
    }

    /// Whether pointer activity happened within the mouse-mode window.
    pub(crate) fn is_mouse_mode(&self, now: Instant) -> bool {
        self.last_activity
            .is_some_and(|at| now.saturating_duration_since(at) < self.settings.timeout)
    }

    pub(crate) fn reset(&mut self) {
        self.last_activity = None;
        self.touch = None;
    }
}
