use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dashmap::{DashMap, DashSet};
use futures::{SinkExt as _, StreamExt as _};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::{Instant, interval, sleep};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::config::Config;
use super::error::RelayError;
use crate::Result;
use crate::codec::{self, Tag};
use crate::error::{Error, Kind};

/// Path clients open their socket on.
pub const SOCKET_PATH: &str = "/ws";

/// Path of the subscription endpoint.
pub const SUBSCRIBE_PATH: &str = "/subscribe";

/// Body of the refusal sent when a subscription names no channel.
pub const MISSING_CHANNEL: &str = "channel query param is required";

/// Accepts socket clients and fans data frames out to them.
///
/// The relay serves two routes on one listener: [`SOCKET_PATH`] upgrades to a
/// WebSocket, and `POST` [`SUBSCRIBE_PATH`] records a channel subscription.
///
/// Cloning is cheap; clones share the same set of clients.
#[derive(Clone)]
pub struct Relay {
    inner: Arc<RelayInner>,
}

struct RelayInner {
    config: Config,
    /// Outbound frame queue of every connected client
    clients: DashMap<Uuid, mpsc::Sender<Vec<u8>>>,
    channels: DashSet<String>,
    shutdown: CancellationToken,
}

#[derive(Debug, Deserialize)]
struct SubscribeParams {
    channel: Option<String>,
}

#[derive(Debug, Serialize)]
struct SubscribeResponse {
    channel: String,
}

impl Relay {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(RelayInner {
                config,
                clients: DashMap::new(),
                channels: DashSet::new(),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Routes of the relay, for mounting into a larger application.
    pub fn router(&self) -> Router {
        Router::new()
            .route(SOCKET_PATH, get(upgrade))
            .route(SUBSCRIBE_PATH, post(subscribe))
            .fallback(not_found)
            .with_state(Arc::clone(&self.inner))
    }

    /// Serve [`Relay::router`] on `listener` until [`Relay::shutdown`] is called.
    ///
    /// Each client runs in its own task. A failed upgrade only affects that
    /// request; a failure of the listener itself ends serving with an error.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(self.inner.shutdown.clone().cancelled_owned())
            .await
            .map_err(|e| Error::with_source(Kind::Relay, e))
    }

    /// Send `text` to every connected client as a data frame.
    ///
    /// Returns the number of clients the frame was queued for. A client whose
    /// queue is full is disconnected instead.
    pub fn publish(&self, text: &str) -> usize {
        self.inner.broadcast(&codec::data(text))
    }

    /// Send raw bytes to every connected client as a data frame payload.
    pub fn publish_bytes(&self, payload: &[u8]) -> usize {
        self.inner.broadcast(&codec::encode(Tag::DATA, payload))
    }

    /// Serialize `value` to JSON and publish it.
    pub fn publish_json<T: Serialize>(&self, value: &T) -> Result<usize> {
        let text = serde_json::to_string(value)?;
        Ok(self.publish(&text))
    }

    /// Number of clients currently connected.
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.inner.clients.len()
    }

    /// Channels subscribed through [`SUBSCRIBE_PATH`], in no particular order.
    #[must_use]
    pub fn channels(&self) -> Vec<String> {
        self.inner.channels.iter().map(|c| c.key().clone()).collect()
    }

    /// Stop accepting clients and close every open connection.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
    }
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("config", &self.inner.config)
            .field("clients", &self.client_count())
            .finish_non_exhaustive()
    }
}

async fn upgrade(State(inner): State<Arc<RelayInner>>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| async move { inner.handle_client(socket).await })
}

async fn subscribe(
    State(inner): State<Arc<RelayInner>>,
    Query(params): Query<SubscribeParams>,
) -> Response {
    let channel = params.channel.unwrap_or_default();
    if channel.is_empty() {
        return (StatusCode::BAD_REQUEST, MISSING_CHANNEL).into_response();
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(%channel, "Channel subscribed");
    inner.channels.insert(channel.clone());

    Json(SubscribeResponse { channel }).into_response()
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

impl RelayInner {
    fn broadcast(&self, frame: &[u8]) -> usize {
        let mut delivered = 0_usize;
        self.clients
            .retain(|id, queue| match queue.try_send(frame.to_vec()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                // Dropping the sender ends that client's task.
                Err(TrySendError::Full(_)) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(%id, "Client queue full, disconnecting");
                    #[cfg(not(feature = "tracing"))]
                    let _: &Uuid = id;
                    false
                }
                Err(TrySendError::Closed(_)) => false,
            });
        delivered
    }

    async fn handle_client(&self, socket: WebSocket) {
        let id = Uuid::new_v4();
        let (queue_tx, queue_rx) = mpsc::channel(self.config.queue_capacity.max(1));
        self.clients.insert(id, queue_tx);
        #[cfg(feature = "tracing")]
        tracing::debug!(%id, "Socket client connected");

        let outcome = self.pump(socket, queue_rx).await;
        self.clients.remove(&id);

        match outcome {
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(%id, "Socket client disconnected");
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(%id, error = %e, "Dropped socket client");
                #[cfg(not(feature = "tracing"))]
                let _: &RelayError = &e;
            }
        }
    }

    /// Drive one client: keepalive pings out, published frames out, anything in
    /// counts as a sign of life.
    async fn pump(
        &self,
        socket: WebSocket,
        mut queue_rx: mpsc::Receiver<Vec<u8>>,
    ) -> std::result::Result<(), RelayError> {
        let (mut write, mut read) = socket.split();
        let mut keepalive = interval(self.config.keepalive_interval);
        let idle = sleep(self.config.idle_timeout);
        tokio::pin!(idle);

        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => {
                    _ = write.send(Message::Close(None)).await;
                    return Ok(());
                }

                _ = keepalive.tick() => {
                    write
                        .send(Message::Binary(codec::keepalive_ping().into()))
                        .await
                        .map_err(RelayError::Write)?;
                }

                frame = queue_rx.recv() => {
                    // The queue only closes when a broadcast found it full.
                    let Some(frame) = frame else {
                        _ = write.send(Message::Close(None)).await;
                        return Err(RelayError::QueueOverflow);
                    };
                    write
                        .send(Message::Binary(frame.into()))
                        .await
                        .map_err(RelayError::Write)?;
                }

                message = read.next() => {
                    match message {
                        Some(Ok(Message::Close(_))) | None => return Ok(()),
                        Some(Ok(_)) => {
                            idle.as_mut().reset(Instant::now() + self.config.idle_timeout);
                        }
                        Some(Err(e)) => return Err(RelayError::Read(e)),
                    }
                }

                () = &mut idle => return Err(RelayError::IdleTimeout),
            }
        }
    }
}
