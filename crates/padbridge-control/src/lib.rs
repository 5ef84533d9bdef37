mod key;
mod key_combo;
mod modifiers;
mod performer;
mod simulator;

pub use key::Key;
pub use key_combo::KeyCombo;
pub use modifiers::{Modifier, Modifiers};
pub use performer::Performer;
pub use simulator::{InputSimulator, NullSimulator, SimulatorError};
