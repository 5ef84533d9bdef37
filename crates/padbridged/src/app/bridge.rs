use std::path::Path;

use crossbeam_channel::{never, select, Receiver};

use padbridge_config::{load_config, Config, ConfigEvent, ConfigWatcher};
use padbridge_gamepad::{Arbitrator, PadEvent};

use crate::{print_debug, print_error, print_info, print_warning};

use super::{system_simulator, AppError};

/// Human readable line for a pad event.
pub fn describe_event(event: &PadEvent) -> String {
    match event {
        PadEvent::ButtonPressed(button) => format!("button {button:?}"),
        PadEvent::DirectionChanged(direction) => format!("direction {direction:?}"),
        PadEvent::RawButtonPressed(raw) => format!("raw button {raw}"),
        PadEvent::CloseComboHeld => "close combo held".to_string(),
        PadEvent::AltTabRequested => "window switch".to_string(),
        PadEvent::ConnectionChanged {
            connected: true,
            controller,
        } => format!("{controller} controller connected"),
        PadEvent::ConnectionChanged {
            connected: false,
            controller,
        } => format!("{controller} controller disconnected"),
    }
}

/// Run the bridge until `stop_rx` fires. Mapping changes in the config file
/// are applied live.
pub fn run_bridge(config_path: &Path, stop_rx: &Receiver<()>) -> Result<(), AppError> {
    let mut config = load_config(config_path)?;
    let arbitrator = Arbitrator::with_default_backends(
        &config.settings,
        config.mapping,
        system_simulator(),
    );
    let events = arbitrator.subscribe();

    let watcher = match ConfigWatcher::new(config_path) {
        Ok((watcher, rx)) => Some((watcher, rx)),
        Err(e) => {
            print_warning!("config hot reload disabled: {e}");
            None
        }
    };
    let config_rx = watcher
        .as_ref()
        .map(|(_, rx)| rx.clone())
        .unwrap_or_else(never);

    arbitrator.start();
    print_info!("padbridged started, config: {}", config_path.display());

    let result = loop {
        select! {
            recv(stop_rx) -> _ => break Ok(()),
            recv(events) -> msg => match msg {
                Ok(event) => log_event(&event),
                Err(_) => break Err(AppError::EventsClosed),
            },
            recv(config_rx) -> msg => match msg {
                Ok(event) => apply_config_event(&arbitrator, &mut config, event),
                Err(_) => break Err(AppError::WatcherClosed),
            },
        }
    };

    arbitrator.stop();
    print_info!("padbridged stopped");
    result
}

fn log_event(event: &PadEvent) {
    match event {
        PadEvent::ConnectionChanged { .. }
        | PadEvent::CloseComboHeld
        | PadEvent::AltTabRequested => print_info!("{}", describe_event(event)),
        _ => print_debug!("{}", describe_event(event)),
    }
}

fn apply_config_event(arbitrator: &Arbitrator, current: &mut Config, event: ConfigEvent) {
    match event {
        ConfigEvent::Changed(next) => {
            if next.mapping != current.mapping {
                arbitrator.update_button_mapping(next.mapping);
                print_info!("button mapping reloaded");
            }
            if next.settings != current.settings {
                print_warning!("timing and speed changes apply after restart");
            }
            *current = next;
        }
        ConfigEvent::Removed => {
            print_warning!("config file removed, keeping the current settings");
        }
        ConfigEvent::Error(e) => {
            print_error!("config reload failed: {e}");
        }
    }
}
