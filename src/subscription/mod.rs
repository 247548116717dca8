//! Channel subscription exchange.
//!
//! Joining a channel does not travel over the socket. It is a single
//! request/response exchange over HTTP: the channel name goes out as the
//! `channel` query parameter, and the response body comes back as
//! confirmation text for the user.
//!
//! # Example
//!
//! ```no_run
//! use channel_socket::subscription::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new("http://localhost:3000")?;
//!
//! let confirmation = client.request_subscription("room-42").await?;
//! println!("{confirmation}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::Client;
pub use error::RequestError;
pub use types::SubscriptionRequest;
