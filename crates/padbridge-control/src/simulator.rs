use thiserror::Error;

use crate::KeyCombo;

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("input simulation failed: {0}")]
    Input(#[from] enigo::InputError),
}

/// Side-effecting access to the OS cursor and keyboard.
///
/// The cursor is a machine-wide resource: implementations must not assume
/// that nobody else moves it between calls.
pub trait InputSimulator: Send {
    /// Move the cursor relative to its current position.
    fn move_cursor(&mut self, dx: i32, dy: i32) -> Result<(), SimulatorError>;

    /// Click the primary mouse button.
    fn left_click(&mut self) -> Result<(), SimulatorError>;

    /// Perform a keyboard shortcut.
    fn perform(&mut self, combo: &KeyCombo) -> Result<(), SimulatorError>;
}

/// Simulator used when no OS input backend is available.
#[derive(Debug, Default)]
pub struct NullSimulator;

impl InputSimulator for NullSimulator {
    fn move_cursor(&mut self, dx: i32, dy: i32) -> Result<(), SimulatorError> {
        log::trace!("cursor move ignored ({dx}, {dy})");
        Ok(())
    }

    fn left_click(&mut self) -> Result<(), SimulatorError> {
        log::trace!("left click ignored");
        Ok(())
    }

    fn perform(&mut self, combo: &KeyCombo) -> Result<(), SimulatorError> {
        log::trace!("key combo ignored: {combo}");
        Ok(())
    }
}
