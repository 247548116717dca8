use crate::codec;

use super::config::Config;

/// Answers keepalive frames.
///
/// Holds no state across frames: every inbound keepalive maps to exactly one
/// acknowledgement, and nothing is timed on this side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keepalive {
    ack_marker: u8,
}

impl Keepalive {
    #[must_use]
    pub const fn new(ack_marker: u8) -> Self {
        Self { ack_marker }
    }

    #[must_use]
    pub const fn ack_marker(&self) -> u8 {
        self.ack_marker
    }

    /// Wire form of the acknowledgement for one inbound keepalive.
    ///
    /// The inbound payload does not affect the answer.
    #[must_use]
    pub fn respond(&self, _ping: &[u8]) -> Vec<u8> {
        codec::keepalive_ack(self.ack_marker)
    }
}

impl From<&Config> for Keepalive {
    fn from(config: &Config) -> Self {
        Self::new(config.ack_marker)
    }
}
