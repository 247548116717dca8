use reqwest::{
    Client as ReqwestClient, Method,
    header::{HeaderMap, HeaderValue},
};
use url::Url;

use super::error::RequestError;
use super::types::SubscriptionRequest;
use crate::display::DisplaySurface;
use crate::error::Error;
use crate::{Result, ToQueryParams as _};

/// Path of the subscription endpoint, relative to the host.
pub const DEFAULT_SUBSCRIBE_PATH: &str = "subscribe";

/// HTTP client for the channel subscription exchange.
///
/// Each call is self-contained; concurrent calls only share reqwest's
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use channel_socket::subscription::Client;
///
/// // Subscribe endpoint at http://localhost:3000/subscribe
/// let client = Client::new("http://localhost:3000").unwrap();
///
/// // Or mounted elsewhere
/// let client = Client::with_path("https://example.com/api/", "channels/join").unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    host: Url,
    path: String,
    client: ReqwestClient,
}

impl Client {
    /// Creates a client for the subscribe endpoint under `host`.
    pub fn new(host: &str) -> Result<Client> {
        Self::with_path(host, DEFAULT_SUBSCRIBE_PATH)
    }

    /// Creates a client for a subscribe endpoint at `path` under `host`.
    pub fn with_path(host: &str, path: &str) -> Result<Client> {
        let mut headers = HeaderMap::new();

        headers.insert("User-Agent", HeaderValue::from_static("channel_socket"));
        headers.insert("Accept", HeaderValue::from_static("text/plain, */*"));
        let client = ReqwestClient::builder().default_headers(headers).build()?;

        let mut host = Url::parse(host)?;
        if !host.path().ends_with('/') {
            let with_slash = format!("{}/", host.path());
            host.set_path(&with_slash);
        }

        Ok(Self {
            host,
            path: path.trim_start_matches('/').to_owned(),
            client,
        })
    }

    /// Returns the base URL of the subscription API.
    #[must_use]
    pub fn host(&self) -> &Url {
        &self.host
    }

    /// Asks the server to join `channel` and returns its confirmation text.
    ///
    /// Any HTTP response completes the exchange: the body is returned exactly as
    /// received, whatever the status code, because the server reports refusals
    /// as text for the user. Only a failure to send the request or read the
    /// response is an error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self), fields(status_code))
    )]
    pub async fn request_subscription(&self, channel: &str) -> Result<String> {
        if channel.is_empty() {
            return Err(Error::validation("channel name must not be empty"));
        }

        let query = SubscriptionRequest::new(channel).query_params();
        let request = self
            .client
            .request(Method::POST, format!("{}{}{query}", self.host, self.path))
            .build()?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(RequestError::TransportFailure)?;
        let status_code = response.status();

        #[cfg(feature = "tracing")]
        tracing::Span::current().record("status_code", status_code.as_u16());

        if !status_code.is_success() {
            #[cfg(feature = "tracing")]
            tracing::warn!(status = %status_code, channel, "Subscription refused");
        }

        let body = response
            .bytes()
            .await
            .map_err(RequestError::TransportFailure)?;

        Ok(String::from_utf8(body.to_vec()).map_err(RequestError::InvalidText)?)
    }

    /// Runs [`Client::request_subscription`] and shows the outcome in the
    /// confirmation area: the response text, or the error text on failure.
    pub async fn subscribe_and_show(
        &self,
        channel: &str,
        display: &dyn DisplaySurface,
    ) -> Result<()> {
        match self.request_subscription(channel).await {
            Ok(text) => {
                display.show_subscription_result(&text);
                Ok(())
            }
            Err(e) => {
                display.show_subscription_result(&e.to_string());
                Err(e)
            }
        }
    }
}
