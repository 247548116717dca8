#![expect(
    clippy::module_name_repetitions,
    reason = "Error types include the module name to indicate their scope"
)]

use std::error::Error as StdError;
use std::fmt;

/// Reasons a relay drops a client connection.
#[non_exhaustive]
#[derive(Debug)]
pub enum RelayError {
    /// Reading from the client failed
    Read(axum::Error),
    /// Writing a frame to the client failed
    Write(axum::Error),
    /// The client sent nothing within the idle timeout
    IdleTimeout,
    /// The client fell more than a full queue behind the published frames
    QueueOverflow,
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(e) => write!(f, "failed to read from client: {e}"),
            Self::Write(e) => write!(f, "failed to write to client: {e}"),
            Self::IdleTimeout => write!(f, "client went idle"),
            Self::QueueOverflow => write!(f, "client fell behind the published frames"),
        }
    }
}

impl StdError for RelayError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Read(e) | Self::Write(e) => Some(e),
            Self::IdleTimeout | Self::QueueOverflow => None,
        }
    }
}

impl From<RelayError> for crate::error::Error {
    fn from(e: RelayError) -> Self {
        crate::error::Error::with_source(crate::error::Kind::Relay, e)
    }
}
