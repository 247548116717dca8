#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Do not need additional syntax for setting up tests"
)]
#![allow(
    unused,
    reason = "Not every test binary uses every helper"
)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use channel_socket::display::{DisplaySurface, OutputLog};
use channel_socket::socket::Session;
use channel_socket::socket::config::Config;
use futures_util::{SinkExt as _, StreamExt as _};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::Message;

pub const WAIT: Duration = Duration::from_secs(2);

/// Mock socket peer accepting a single client.
pub struct MockSocketServer {
    addr: SocketAddr,
    /// Messages to push to the client
    to_client: mpsc::UnboundedSender<Message>,
    /// Messages received from the client
    from_client: mpsc::UnboundedReceiver<Message>,
}

impl MockSocketServer {
    /// Start a mock server on a random port.
    ///
    /// Messages sent before the client connects are queued and delivered in
    /// order right after the handshake.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (to_client, mut outbound) = mpsc::unbounded_channel::<Message>();
        let (inbound, from_client) = mpsc::unbounded_channel::<Message>();

        tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let Ok(ws_stream) = tokio_tungstenite::accept_async(stream).await else {
                return;
            };
            let (mut write, mut read) = ws_stream.split();

            loop {
                tokio::select! {
                    msg = read.next() => {
                        match msg {
                            Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                            Some(Ok(message)) => drop(inbound.send(message)),
                            _ => break,
                        }
                    }
                    msg = outbound.recv() => {
                        let Some(message) = msg else { break };
                        if write.send(message).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self {
            addr,
            to_client,
            from_client,
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Send one frame to the client as a binary message.
    pub fn send(&self, frame: &[u8]) {
        self.send_message(Message::binary(frame.to_vec()));
    }

    pub fn send_message(&self, message: Message) {
        drop(self.to_client.send(message));
    }

    /// Receive the next message from the client.
    pub async fn recv(&mut self) -> Option<Message> {
        timeout(WAIT, self.from_client.recv()).await.ok().flatten()
    }

    /// Receive a message only if one arrives within `window`.
    pub async fn recv_within(&mut self, window: Duration) -> Option<Message> {
        timeout(window, self.from_client.recv()).await.ok().flatten()
    }
}

/// Open a session against `url` reporting to `log`, and wait until it is open.
pub async fn open_session(url: &str, config: Config, log: &Arc<OutputLog>) -> Session {
    let display = Arc::clone(log) as Arc<dyn DisplaySurface>;
    let session = Session::connect(url, config, display).unwrap();

    let mut state_rx = session.state_receiver();
    timeout(WAIT, state_rx.wait_for(|state| state.is_open()))
        .await
        .expect("session did not open in time")
        .unwrap();

    session
}

/// Poll `condition` until it holds or the wait expires.
pub async fn eventually<F: Fn() -> bool>(condition: F) -> bool {
    timeout(WAIT, async {
        while !condition() {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .is_ok()
}
