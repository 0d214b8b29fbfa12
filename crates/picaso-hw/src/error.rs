//! Error types for the PICASO display driver.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the display module.
#[derive(Error, Debug)]
pub enum Error {
    /// The channel accepted fewer bytes than the frame contained.
    #[error("Short write: {written} of {expected} bytes accepted")]
    ShortWrite { expected: usize, written: usize },

    /// The module answered with ERR.
    #[error("Command rejected by display (ERR)")]
    CommandRejected,

    /// The module answered with neither ACK nor ERR.
    ///
    /// The link is in an unknown state until it is reset or reopened.
    #[error("Protocol desync: unexpected status byte 0x{0:02X}")]
    ProtocolDesync(u8),

    /// A read did not complete within the configured bound.
    #[error("Timed out waiting for display response")]
    Timeout,

    /// Baud rate detection tried every candidate without an answer.
    #[error("No match in any baud rate")]
    NoMatchingBaudRate,

    /// The module supports this rate but the host serial driver does not.
    #[error("Baud rate {0} is supported by the display but not by the host")]
    UnsupportedByHost(u32),

    /// Caller supplied an out-of-range or malformed argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The link has not been opened, or has been closed.
    #[error("Serial link is not open")]
    NotOpen,

    /// The link is already open.
    #[error("Serial link is already open")]
    AlreadyOpen,

    /// Serial port communication error.
    #[error("Serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// Serial I/O error.
    #[error("Serial I/O error: {0}")]
    SerialIo(#[from] std::io::Error),
}

impl Error {
    /// Builds an [`Error::InvalidArgument`] from anything displayable.
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
