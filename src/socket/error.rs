#![expect(
    clippy::module_name_repetitions,
    reason = "Error types include the module name to indicate their scope"
)]

use std::error::Error as StdError;
use std::fmt;

use tokio_tungstenite::tungstenite;

use crate::codec::DecodeError;

/// Reasons a socket session ends other than a local close.
#[non_exhaustive]
#[derive(Debug)]
pub enum SessionError {
    /// The opening handshake failed; the session never reached `Open`
    Connect(tungstenite::Error),
    /// The opening handshake did not finish within the configured timeout
    ConnectTimeout,
    /// The transport reported an unrecoverable error while open
    Transport(tungstenite::Error),
    /// The peer closed the connection
    ConnectionClosed,
    /// An inbound message carried no type byte; the stream is considered corrupt
    Truncated(DecodeError),
    /// The acknowledgement for a keepalive frame could not be written
    KeepaliveAck(tungstenite::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect(e) => write!(f, "unable to open socket: {e}"),
            Self::ConnectTimeout => write!(f, "socket handshake timed out"),
            Self::Transport(e) => write!(f, "socket transport error: {e}"),
            Self::ConnectionClosed => write!(f, "socket closed by peer"),
            Self::Truncated(e) => write!(f, "corrupt frame stream: {e}"),
            Self::KeepaliveAck(e) => write!(f, "unable to acknowledge keepalive: {e}"),
        }
    }
}

impl StdError for SessionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Connect(e) | Self::Transport(e) | Self::KeepaliveAck(e) => Some(e),
            Self::Truncated(e) => Some(e),
            Self::ConnectTimeout | Self::ConnectionClosed => None,
        }
    }
}

impl From<SessionError> for crate::error::Error {
    fn from(e: SessionError) -> Self {
        crate::error::Error::with_source(crate::error::Kind::Session, e)
    }
}
