use std::fmt::Write as _;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crossbeam_channel::{select, Receiver};

use padbridge_config::load_config;
use padbridge_control::NullSimulator;
use padbridge_gamepad::{
    Arbitrator, ButtonMapping, ControllerType, LogicalButton, PadEvent, RawButtons,
    SharedSimulator,
};

use crate::{print_info, print_warning};

use super::AppError;

/// Result of feeding one event to a [`RemapSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemapStep {
    /// Not a raw button press.
    Ignored,
    /// The raw button already belongs to an earlier logical button.
    Duplicate {
        raw: RawButtons,
        owner: LogicalButton,
    },
    Assigned {
        button: LogicalButton,
        raw: RawButtons,
    },
    /// Every logical button has been assigned.
    Done,
}

/// Walks the mappable logical buttons in order, assigning each the next
/// raw button pressed.
#[derive(Debug, Clone)]
pub struct RemapSession {
    mapping: ButtonMapping,
    assigned: Vec<(LogicalButton, RawButtons)>,
}

impl RemapSession {
    pub fn new(base: ButtonMapping) -> Self {
        Self {
            mapping: base,
            assigned: Vec::with_capacity(LogicalButton::MAPPED.len()),
        }
    }

    /// The logical button waiting for a press.
    pub fn current(&self) -> Option<LogicalButton> {
        LogicalButton::MAPPED.get(self.assigned.len()).copied()
    }

    pub fn is_done(&self) -> bool {
        self.current().is_none()
    }

    pub fn feed(&mut self, event: &PadEvent) -> RemapStep {
        let Some(button) = self.current() else {
            return RemapStep::Done;
        };
        let PadEvent::RawButtonPressed(raw) = *event else {
            return RemapStep::Ignored;
        };
        if let Some(&(owner, _)) = self.assigned.iter().find(|(_, taken)| *taken == raw) {
            return RemapStep::Duplicate { raw, owner };
        }
        self.mapping.set(button, raw);
        self.assigned.push((button, raw));
        RemapStep::Assigned { button, raw }
    }

    pub fn mapping(&self) -> ButtonMapping {
        self.mapping
    }
}

/// The `mapping:` section of a config file for `mapping`.
pub fn mapping_yaml(mapping: &ButtonMapping) -> String {
    let mut out = String::from("mapping:\n");
    for button in LogicalButton::MAPPED {
        let Some(mask) = mapping.get(button) else {
            continue;
        };
        let _ = writeln!(out, "  {}: {mask}", config_key(button));
    }
    out
}

fn config_key(button: LogicalButton) -> &'static str {
    match button {
        LogicalButton::A => "a",
        LogicalButton::B => "b",
        LogicalButton::X => "x",
        LogicalButton::Y => "y",
        LogicalButton::LeftBumper => "left_bumper",
        LogicalButton::RightBumper => "right_bumper",
        LogicalButton::Back => "back",
        LogicalButton::Start => "start",
        LogicalButton::LeftStickClick => "left_stick",
        LogicalButton::RightStickClick => "right_stick",
        LogicalButton::DPadUp => "dpad_up",
        LogicalButton::DPadDown => "dpad_down",
        LogicalButton::DPadLeft => "dpad_left",
        LogicalButton::DPadRight => "dpad_right",
    }
}

/// Capture a full mapping from the first controller found. Returns `None`
/// when stopped before every button was assigned.
///
/// No input is simulated while capturing, so gestures stay inert.
pub fn run_remap(
    config_path: &Path,
    stop_rx: &Receiver<()>,
) -> Result<Option<ButtonMapping>, AppError> {
    let config = load_config(config_path)?;
    let simulator: SharedSimulator = Arc::new(Mutex::new(Box::new(NullSimulator)));
    let arbitrator =
        Arbitrator::with_default_backends(&config.settings, config.mapping, simulator);
    let events = arbitrator.subscribe();
    arbitrator.start();

    let mut session = RemapSession::new(config.mapping);
    print_info!("waiting for a controller");

    let result = loop {
        select! {
            recv(stop_rx) -> _ => break Ok(None),
            recv(events) -> msg => {
                let Ok(event) = msg else {
                    break Err(AppError::EventsClosed);
                };
                if let PadEvent::ConnectionChanged { connected: true, controller } = event {
                    print_info!("{controller} controller connected");
                    if controller == ControllerType::PlayStation {
                        print_warning!("PlayStation pads keep their native layout");
                    }
                    prompt(&session);
                    continue;
                }
                match session.feed(&event) {
                    RemapStep::Ignored => {}
                    RemapStep::Duplicate { raw, owner } => {
                        print_warning!("{raw} is already assigned to {owner:?}, press another button");
                    }
                    RemapStep::Assigned { button, raw } => {
                        print_info!("{button:?} -> {raw}");
                        if session.is_done() {
                            break Ok(Some(session.mapping()));
                        }
                        prompt(&session);
                    }
                    RemapStep::Done => break Ok(Some(session.mapping())),
                }
            }
        }
    };

    arbitrator.stop();
    result
}

fn prompt(session: &RemapSession) {
    if let Some(button) = session.current() {
        print_info!("press the button for {button:?}");
    }
}
