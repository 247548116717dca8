//! Terminal front end for a channel socket.
//!
//! Connects to the socket, prints every data frame as a line, and reads channel
//! names from stdin, requesting a subscription for each one.
//!
//! Run with tracing enabled:
//! ```sh
//! CHANNEL_SOCKET_URL=ws://localhost:3000/ws \
//! CHANNEL_SUBSCRIBE_URL=http://localhost:3000 \
//! RUST_LOG=info cargo run --example terminal_client --features tracing
//! ```

use std::env;
use std::io::Write as _;
use std::sync::Arc;

use channel_socket::display::{DisplaySurface, LINE_TERMINATOR};
use channel_socket::error::Error;
use channel_socket::socket::Session;
use channel_socket::socket::config::Config;
use channel_socket::subscription::Client;
use channel_socket::{SOCKET_URL_VAR, SUBSCRIBE_URL_VAR};
use tokio::io::{AsyncBufReadExt as _, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Writes straight to the terminal.
struct Terminal;

impl DisplaySurface for Terminal {
    fn append_line(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        _ = write!(stdout, "{text}{LINE_TERMINATOR}");
        _ = stdout.flush();
    }

    fn show_fatal_error(&self, error: &Error) {
        eprintln!("connection lost: {error}");
    }

    fn show_subscription_result(&self, text: &str) {
        println!("> {text}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let socket_url =
        env::var(SOCKET_URL_VAR).unwrap_or_else(|_| "ws://localhost:3000/ws".to_owned());
    let subscribe_url =
        env::var(SUBSCRIBE_URL_VAR).unwrap_or_else(|_| "http://localhost:3000".to_owned());

    let display: Arc<dyn DisplaySurface> = Arc::new(Terminal);
    let session = Session::connect(&socket_url, Config::default(), Arc::clone(&display))?;
    let client = Client::new(&subscribe_url)?;
    info!(%socket_url, %subscribe_url, "Type a channel name to subscribe");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            () = session.closed() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let channel = line.trim();
                if channel.is_empty() {
                    continue;
                }
                if let Err(e) = client.subscribe_and_show(channel, display.as_ref()).await {
                    warn!(channel, error = %e, "Subscription failed");
                }
            }
        }
    }

    session.close();
    if let Err(e) = session.wait().await {
        info!(error = %e, "Session ended");
    }

    Ok(())
}
