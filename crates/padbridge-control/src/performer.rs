use enigo::{
    Button, Coordinate, Direction::Click, Enigo, Mouse, NewConError, Settings,
};

use crate::{InputSimulator, KeyCombo, SimulatorError};

/// Enigo-backed input simulator.
pub struct Performer {
    enigo: Enigo,
}

// SAFETY: the performer is only reachable through the `Mutex` that wraps the
// active simulator, so Enigo is never used from two threads at once. The
// platform event source it holds has no thread affinity for posting events.
unsafe impl Send for Performer {}

impl Performer {
    /// Create a new performer.
    pub fn new() -> Result<Self, NewConError> {
        let settings = Settings::default();
        let enigo = Enigo::new(&settings)?;
        Ok(Self { enigo })
    }
}

impl InputSimulator for Performer {
    fn move_cursor(&mut self, dx: i32, dy: i32) -> Result<(), SimulatorError> {
        self.enigo.move_mouse(dx, dy, Coordinate::Rel)?;
        Ok(())
    }

    fn left_click(&mut self) -> Result<(), SimulatorError> {
        self.enigo.button(Button::Left, Click)?;
        Ok(())
    }

    fn perform(&mut self, combo: &KeyCombo) -> Result<(), SimulatorError> {
        combo.perform(&mut self.enigo)?;
        Ok(())
    }
}
