use std::path::Path;
use std::sync::{Arc, Mutex};

use padbridge_config::load_config;
use padbridge_control::NullSimulator;
use padbridge_gamepad::{Arbitrator, ControllerType, SharedSimulator};

use super::AppError;

/// Run the priority probe once and report the backend it settles on.
pub fn probe(config_path: &Path) -> Result<ControllerType, AppError> {
    let config = load_config(config_path)?;
    let simulator: SharedSimulator = Arc::new(Mutex::new(Box::new(NullSimulator)));
    let arbitrator =
        Arbitrator::with_default_backends(&config.settings, config.mapping, simulator);
    arbitrator.check_now();
    let controller = arbitrator.active_controller_type();
    arbitrator.stop();
    Ok(controller)
}
