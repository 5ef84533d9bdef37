use std::sync::Arc;

use crossbeam_channel::Receiver;

use crate::mask::RawButtons;
use crate::types::{ControllerType, Direction, LogicalButton};

/// Normalized events emitted by the active controller backend.
///
/// Events are produced on background polling threads. Consumers must hand
/// them over to their own execution context before touching UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadEvent {
    /// A mapped logical button went down.
    ButtonPressed(LogicalButton),
    /// Navigation intent changed, or a held direction repeated.
    DirectionChanged(Direction),
    /// A single physical button went down; carries its raw bit.
    RawButtonPressed(RawButtons),
    /// Bumpers and Start were held past the close threshold.
    CloseComboHeld,
    /// Both bumpers were tapped quickly; the window switcher was triggered.
    AltTabRequested,
    /// The active backend changed or lost its device.
    ConnectionChanged {
        connected: bool,
        controller: ControllerType,
    },
}

/// Receiving end for event subscriptions.
pub type EventReceiver = Receiver<PadEvent>;

/// Callback a backend delivers events to. Must not block.
pub type EventSink = Arc<dyn Fn(PadEvent) + Send + Sync>;
