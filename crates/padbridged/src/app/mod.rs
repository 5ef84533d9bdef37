mod bridge;
mod probe;
mod remap;

use std::sync::{Arc, Mutex};

use thiserror::Error;

use padbridge_config::ConfigError;
use padbridge_control::{InputSimulator, NullSimulator, Performer};
use padbridge_gamepad::SharedSimulator;

use crate::print_warning;

pub use bridge::{describe_event, run_bridge};
pub use probe::probe;
pub use remap::{mapping_yaml, run_remap, RemapSession, RemapStep};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("event channel closed")]
    EventsClosed,
    #[error("config watcher channel closed")]
    WatcherClosed,
}

/// The OS input simulator, or one that does nothing when the session has
/// no input backend (headless, no display server).
pub fn system_simulator() -> SharedSimulator {
    let simulator: Box<dyn InputSimulator> = match Performer::new() {
        Ok(performer) => Box::new(performer),
        Err(e) => {
            print_warning!("input simulation unavailable, continuing without it: {e}");
            Box::new(NullSimulator)
        }
    };
    Arc::new(Mutex::new(simulator))
}
