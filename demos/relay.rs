//! Minimal publishing peer.
//!
//! Accepts socket clients and publishes every line typed on stdin to all of
//! them. Stops on Ctrl-C or end of input.
//!
//! ```sh
//! CHANNEL_RELAY_ADDR=127.0.0.1:3000 RUST_LOG=debug cargo run --example relay --features tracing
//! ```

use std::env;

use channel_socket::RELAY_ADDR_VAR;
use channel_socket::relay::Relay;
use channel_socket::relay::config::Config;
use tokio::io::{AsyncBufReadExt as _, BufReader};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let addr = env::var(RELAY_ADDR_VAR).unwrap_or_else(|_| "127.0.0.1:3000".to_owned());
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Relay listening");

    let relay = Relay::new(Config::default());
    let server = relay.clone();
    let serving = tokio::spawn(async move { server.serve(listener).await });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let delivered = relay.publish(&line);
                info!(delivered, "Published");
            }
        }
    }

    relay.shutdown();
    serving.await??;

    Ok(())
}
