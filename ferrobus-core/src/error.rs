//! Errors returned by adapter operations

use core::fmt;

use ferrobus_protocol::FrameError;

/// Errors from sending a message over the link
///
/// Transport failures are passed through untouched; they are fatal to the
/// operation that hit them, not to the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The serial transport refused the write
    Transport(E),
    /// The message could not be framed (payload too large, bad kind)
    Frame(FrameError),
}

impl<E> From<FrameError> for Error<E> {
    fn from(e: FrameError) -> Self {
        Error::Frame(e)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "transport error: {:?}", e),
            Error::Frame(e) => write!(f, "framing error: {}", e),
        }
    }
}
