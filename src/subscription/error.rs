#![expect(
    clippy::module_name_repetitions,
    reason = "Error types include the module name to indicate their scope"
)]

use std::error::Error as StdError;
use std::fmt;
use std::string::FromUtf8Error;

/// Failures of a single subscription exchange. They never affect a socket session.
#[non_exhaustive]
#[derive(Debug)]
pub enum RequestError {
    /// The request could not be sent or the response could not be read
    TransportFailure(reqwest::Error),
    /// The response body was not valid UTF-8 text
    InvalidText(FromUtf8Error),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransportFailure(e) => write!(f, "subscription request failed: {e}"),
            Self::InvalidText(e) => write!(f, "subscription response is not text: {e}"),
        }
    }
}

impl StdError for RequestError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::TransportFailure(e) => Some(e),
            Self::InvalidText(e) => Some(e),
        }
    }
}

impl From<RequestError> for crate::error::Error {
    fn from(e: RequestError) -> Self {
        crate::error::Error::with_source(crate::error::Kind::Subscription, e)
    }
}
