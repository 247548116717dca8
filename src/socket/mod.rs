//! Socket session: connection lifecycle and frame dispatch.
//!
//! # Architecture
//!
//! - [`Session`]: owns one WebSocket connection and runs its dispatch loop
//! - [`Keepalive`]: answers keepalive pings with an acknowledgement frame
//! - [`DataSink`]: decodes data payloads and forwards them to the display
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use channel_socket::display::{DisplaySurface, OutputLog};
//! use channel_socket::socket::{Session, config::Config};
//!
//! # async fn example() -> channel_socket::Result<()> {
//! let log = Arc::new(OutputLog::new());
//! let display = Arc::clone(&log) as Arc<dyn DisplaySurface>;
//! let session = Session::connect("ws://localhost:3000/ws", Config::default(), display)?;
//!
//! // Runs until the peer goes away or the connection fails.
//! session.wait().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod keepalive;
pub mod session;
pub mod sink;

pub use error::SessionError;
pub use keepalive::Keepalive;
pub use session::{Session, SessionState};
pub use sink::DataSink;
