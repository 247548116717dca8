//! Publishing side of the channel protocol.
//!
//! A [`Relay`] accepts WebSocket clients on `/ws`, pings each of them with
//! keepalive frames, and fans published text out to all of them as data frames.
//! Clients that stop answering, or fall a full queue behind, are dropped. The
//! same host answers `POST /subscribe?channel=<name>` with `{"channel":"<name>"}`,
//! or `400` when the channel is missing.
//!
//! # Example
//!
//! ```no_run
//! use channel_socket::relay::{Relay, config::Config};
//! use tokio::net::TcpListener;
//!
//! # async fn example() -> channel_socket::Result<()> {
//! let relay = Relay::new(Config::default());
//! let listener = TcpListener::bind("127.0.0.1:3000").await?;
//!
//! let server = relay.clone();
//! tokio::spawn(async move { server.serve(listener).await });
//!
//! relay.publish(r#"{"channel":"room-42"}"#);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod server;

pub use error::RelayError;
pub use server::Relay;
