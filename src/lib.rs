#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod codec;
pub mod display;
pub mod error;
pub mod relay;
pub mod socket;
pub mod subscription;

use serde::Serialize;

use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Environment variable naming the socket endpoint used by the demos.
pub const SOCKET_URL_VAR: &str = "CHANNEL_SOCKET_URL";

/// Environment variable naming the subscription host used by the demos.
pub const SUBSCRIBE_URL_VAR: &str = "CHANNEL_SUBSCRIBE_URL";

/// Environment variable naming the address the demo relay listens on.
pub const RELAY_ADDR_VAR: &str = "CHANNEL_RELAY_ADDR";

/// Trait for converting request types to URL query parameters.
///
/// This trait is automatically implemented for all types that implement [`Serialize`].
/// It uses [`serde_html_form`] to serialize the struct fields into a query string.
pub trait ToQueryParams: Serialize {
    /// Converts the request to a URL query string.
    ///
    /// Returns an empty string if no parameters are set, otherwise returns
    /// a string starting with `?` followed by URL-encoded key-value pairs.
    fn query_params(&self) -> String {
        let params = serde_html_form::to_string(self)
            .inspect_err(|e| {
                #[cfg(feature = "tracing")]
                tracing::error!("Unable to convert to URL-encoded string {e:?}");
                #[cfg(not(feature = "tracing"))]
                let _: &serde_html_form::ser::Error = e;
            })
            .unwrap_or_default();

        if params.is_empty() {
            String::new()
        } else {
            format!("?{params}")
        }
    }
}

impl<T: Serialize> ToQueryParams for T {}
