//! Tagged binary frame format.
//!
//! Every transport message carries exactly one frame:
//!
//! ```text
//! byte 0       : type tag (0 = keepalive, 1 = data, others reserved)
//! byte 1..end  : payload
//! ```
//!
//! There is no length prefix and no checksum. Message boundaries come from the
//! transport's own framing.

use std::error::Error as StdError;
use std::fmt;
use std::str::Utf8Error;

/// Leading byte of a frame identifying its type.
///
/// The tag space is open: any byte decodes, and tags other than
/// [`Tag::KEEPALIVE`] and [`Tag::DATA`] are only ignored at dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(u8);

impl Tag {
    /// Liveness check from the peer, and the acknowledgement sent back.
    pub const KEEPALIVE: Tag = Tag(0);
    /// UTF-8 text payload destined for the display.
    pub const DATA: Tag = Tag(1);

    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether this tag has a handler in the current protocol version.
    #[must_use]
    pub const fn is_known(self) -> bool {
        matches!(self, Self::KEEPALIVE | Self::DATA)
    }
}

impl From<u8> for Tag {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::KEEPALIVE => write!(f, "keepalive"),
            Self::DATA => write!(f, "data"),
            Self(other) => write!(f, "reserved({other})"),
        }
    }
}

/// One decoded frame, borrowing its payload from the inbound message buffer.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'buf> {
    pub tag: Tag,
    pub payload: &'buf [u8],
}

impl<'buf> Frame<'buf> {
    #[must_use]
    pub const fn new(tag: Tag, payload: &'buf [u8]) -> Self {
        Self { tag, payload }
    }

    /// Decode the payload as UTF-8 text.
    pub fn text(&self) -> Result<&'buf str, DecodeError> {
        std::str::from_utf8(self.payload).map_err(DecodeError::InvalidText)
    }

    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        encode(self.tag, self.payload)
    }
}

/// Frame decoding failures.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The message did not even contain a type byte
    Truncated,
    /// A data payload was not valid UTF-8
    InvalidText(Utf8Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "frame is truncated: missing type byte"),
            Self::InvalidText(e) => write!(f, "frame payload is not valid UTF-8: {e}"),
        }
    }
}

impl StdError for DecodeError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::InvalidText(e) => Some(e),
            Self::Truncated => None,
        }
    }
}

/// Split a transport message into its tag and payload.
pub fn decode(bytes: &[u8]) -> Result<Frame<'_>, DecodeError> {
    let (&tag, payload) = bytes.split_first().ok_or(DecodeError::Truncated)?;
    Ok(Frame::new(Tag(tag), payload))
}

/// Produce the wire form of a frame: the tag byte followed by the payload verbatim.
#[must_use]
pub fn encode(tag: Tag, payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(payload.len() + 1);
    bytes.push(tag.0);
    bytes.extend_from_slice(payload);
    bytes
}

/// Wire form of a keepalive ping as sent by the publishing peer.
#[must_use]
pub fn keepalive_ping() -> Vec<u8> {
    encode(Tag::KEEPALIVE, &[])
}

/// Wire form of a keepalive acknowledgement carrying `marker`.
#[must_use]
pub fn keepalive_ack(marker: u8) -> Vec<u8> {
    encode(Tag::KEEPALIVE, &[marker])
}

/// Wire form of a data frame carrying `text`.
#[must_use]
pub fn data(text: &str) -> Vec<u8> {
    encode(Tag::DATA, text.as_bytes())
}
