use thiserror::Error;

/// Error type for gamepad core operations.
///
/// Missing or unplugged hardware is never an error; it shows up as a failed
/// connect or a `ConnectionChanged(false, ..)` event instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to initialize a platform backend.
    #[error("backend init failed: {0}")]
    BackendInit(String),
    /// The raw HID layer reported an error.
    #[error("hid error: {0}")]
    Hid(String),
    /// A raw button name could not be parsed.
    #[error("invalid button name: {0}")]
    InvalidButtonName(String),
    /// A mapping value must have exactly one bit set.
    #[error("mask {0:#06x} must have exactly one bit set")]
    NotSingleBit(u32),
}

/// Convenient result alias for gamepad operations.
pub type Result<T> = std::result::Result<T, Error>;
