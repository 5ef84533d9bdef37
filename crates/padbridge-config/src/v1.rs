use std::time::Duration;

use serde::Deserialize;

use padbridge_control::KeyCombo;
use padbridge_gamepad::{
    parse_button_name, ButtonMapping, LogicalButton, RawButtons, Settings,
};

use crate::{Config, ConfigError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigV1 {
    pub version: u8,
    #[serde(default)]
    pub mapping: MappingV1,
    #[serde(default)]
    pub gestures: GesturesV1,
    #[serde(default)]
    pub navigation: NavigationV1,
    #[serde(default)]
    pub mouse: MouseV1,
    #[serde(default)]
    pub polling: PollingV1,
    #[serde(default)]
    pub switch_window: Option<KeyCombo>,
}

/// A raw button written either as a name (`B5`, `0x0010`) or a plain number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ButtonValue {
    Name(String),
    Bits(u32),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MappingV1 {
    pub a: Option<ButtonValue>,
    pub b: Option<ButtonValue>,
    pub x: Option<ButtonValue>,
    pub y: Option<ButtonValue>,
    pub left_bumper: Option<ButtonValue>,
    pub right_bumper: Option<ButtonValue>,
    pub back: Option<ButtonValue>,
    pub start: Option<ButtonValue>,
    pub left_stick: Option<ButtonValue>,
    pub right_stick: Option<ButtonValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GesturesV1 {
    pub close_hold_ms: Option<u64>,
    pub quick_tap_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct NavigationV1 {
    pub repeat_delay_ms: Option<u64>,
    pub repeat_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MouseV1 {
    pub min_speed: Option<f32>,
    pub max_speed: Option<f32>,
    pub gamma: Option<f32>,
    pub timeout_ms: Option<u64>,
    pub touch_sensitivity: Option<f32>,
    pub tap_ms: Option<u64>,
    pub tap_distance: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PollingV1 {
    pub poll_interval_ms: Option<u64>,
    pub health_check_ms: Option<u64>,
    pub stop_timeout_ms: Option<u64>,
}

impl ConfigV1 {
    pub(crate) fn to_config(&self) -> Result<Config, ConfigError> {
        Ok(Config {
            settings: self.settings()?,
            mapping: self.mapping.to_mapping()?,
        })
    }

    fn settings(&self) -> Result<Settings, ConfigError> {
        let mut settings = Settings::default();

        let gestures = &mut settings.gestures;
        set_ms(&mut gestures.close_hold, self.gestures.close_hold_ms);
        set_ms(&mut gestures.quick_tap, self.gestures.quick_tap_ms);

        let navigation = &mut settings.navigation;
        set_ms(&mut navigation.repeat_delay, self.navigation.repeat_delay_ms);
        set_ms(
            &mut navigation.repeat_interval,
            self.navigation.repeat_interval_ms,
        );

        let mouse = &mut settings.mouse;
        set(&mut mouse.min_speed, self.mouse.min_speed);
        set(&mut mouse.max_speed, self.mouse.max_speed);
        set(&mut mouse.gamma, self.mouse.gamma);
        set_ms(&mut mouse.timeout, self.mouse.timeout_ms);
        set(&mut mouse.touch_sensitivity, self.mouse.touch_sensitivity);
        set_ms(&mut mouse.tap_duration, self.mouse.tap_ms);
        set(&mut mouse.tap_distance, self.mouse.tap_distance);

        let polling = &mut settings.polling;
        set_ms(&mut polling.poll_interval, self.polling.poll_interval_ms);
        set_ms(
            &mut polling.health_check_interval,
            self.polling.health_check_ms,
        );
        set_ms(&mut polling.stop_timeout, self.polling.stop_timeout_ms);

        if let Some(combo) = &self.switch_window {
            settings.switch_window = combo.clone();
        }

        validate(&settings)?;
        Ok(settings)
    }
}

impl MappingV1 {
    fn to_mapping(&self) -> Result<ButtonMapping, ConfigError> {
        let mut mapping = ButtonMapping::default();
        let entries = [
            (LogicalButton::A, "a", &self.a),
            (LogicalButton::B, "b", &self.b),
            (LogicalButton::X, "x", &self.x),
            (LogicalButton::Y, "y", &self.y),
            (LogicalButton::LeftBumper, "left_bumper", &self.left_bumper),
            (LogicalButton::RightBumper, "right_bumper", &self.right_bumper),
            (LogicalButton::Back, "back", &self.back),
            (LogicalButton::Start, "start", &self.start),
            (LogicalButton::LeftStickClick, "left_stick", &self.left_stick),
            (LogicalButton::RightStickClick, "right_stick", &self.right_stick),
        ];
        for (button, field, value) in entries {
            if let Some(value) = value {
                mapping.set(button, value.to_mask(field)?);
            }
        }
        Ok(mapping)
    }
}

impl ButtonValue {
    fn to_mask(&self, field: &'static str) -> Result<RawButtons, ConfigError> {
        let parsed = match self {
            ButtonValue::Name(name) => parse_button_name(name),
            ButtonValue::Bits(bits) => parse_button_name(&format!("{bits:#x}")),
        };
        parsed.map_err(|source| ConfigError::InvalidButton { field, source })
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn set_ms(slot: &mut Duration, value: Option<u64>) {
    set(slot, value.map(Duration::from_millis));
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    let mouse = &settings.mouse;
    if mouse.min_speed.is_nan()
        || mouse.min_speed < 0.0
        || mouse.min_speed > mouse.max_speed
    {
        return Err(ConfigError::InvalidValue(
            "mouse.min_speed",
            format!("{} must be between 0 and max_speed", mouse.min_speed),
        ));
    }
    if mouse.gamma.is_nan() || mouse.gamma <= 0.0 {
        return Err(ConfigError::InvalidValue(
            "mouse.gamma",
            format!("{} must be positive", mouse.gamma),
        ));
    }
    if settings.polling.poll_interval.is_zero() {
        return Err(ConfigError::InvalidValue(
            "polling.poll_interval_ms",
            "must be positive".into(),
        ));
    }
    if settings.polling.health_check_interval.is_zero() {
        return Err(ConfigError::InvalidValue(
            "polling.health_check_ms",
            "must be positive".into(),
        ));
    }
    Ok(())
}
