use std::time::Duration;

use bon::Builder;

/// Acknowledgement marker sent as the payload of every keepalive ack.
pub const DEFAULT_ACK_MARKER: u8 = 1;

/// Upper bound on the closing handshake before the connection is dropped.
pub const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration for a socket session.
#[non_exhaustive]
#[derive(Debug, Clone, Builder)]
pub struct Config {
    /// Payload byte of the keepalive acknowledgement frame
    #[builder(default = DEFAULT_ACK_MARKER)]
    pub ack_marker: u8,
    /// Upper bound on the opening handshake. `None` waits as long as the transport does.
    pub connect_timeout: Option<Duration>,
    /// Time allowed for the closing handshake
    #[builder(default = DEFAULT_CLOSE_TIMEOUT)]
    pub close_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ack_marker: DEFAULT_ACK_MARKER,
            connect_timeout: None,
            close_timeout: DEFAULT_CLOSE_TIMEOUT,
        }
    }
}
