use serde::Serialize;

/// A request to join one channel. Sent once, then discarded.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubscriptionRequest {
    /// Channel identifier, sent as the `channel` query parameter
    pub channel: String,
}

impl SubscriptionRequest {
    #[must_use]
    pub fn new<S: Into<String>>(channel: S) -> Self {
        Self {
            channel: channel.into(),
        }
    }
}
