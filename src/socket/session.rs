use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::{SinkExt as _, StreamExt as _};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tokio_util::sync::{CancellationToken, DropGuard};
use url::Url;

use super::config::Config;
use super::error::SessionError;
use super::keepalive::Keepalive;
use super::sink::DataSink;
use crate::codec::{self, Tag};
use crate::display::DisplaySurface;
use crate::{Result, error::Error};

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Lifecycle of a socket session.
///
/// `Connecting -> Open -> Closed`, or `Connecting -> Closed` when the handshake
/// fails. `Closed` is terminal.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Opening handshake in progress
    Connecting,
    /// Frames are being dispatched
    Open {
        /// When the handshake completed
        since: Instant,
    },
    /// No further reads or writes will happen
    Closed,
}

impl SessionState {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open { .. })
    }

    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// One socket connection and its dispatch loop.
///
/// The loop runs in a background task and handles one inbound message at a
/// time: a message is fully dispatched, keepalive acknowledgement included,
/// before the next one is read. Any termination other than [`Session::close`]
/// is reported once through [`DisplaySurface::show_fatal_error`]. There is no
/// reconnection; a supervisor wanting one opens a new session.
///
/// Dropping the session closes the connection.
pub struct Session {
    state_rx: watch::Receiver<SessionState>,
    shutdown: CancellationToken,
    task: JoinHandle<Result<()>>,
    _close_on_drop: DropGuard,
}

impl Session {
    /// Open a session to `endpoint` (`ws://` or `wss://`).
    ///
    /// Returns immediately in [`SessionState::Connecting`]; the handshake runs in
    /// the session task. A failed handshake moves the session straight to
    /// [`SessionState::Closed`] and is reported like any other fatal error.
    pub fn connect(
        endpoint: &str,
        config: Config,
        display: Arc<dyn DisplaySurface>,
    ) -> Result<Self> {
        let url = Url::parse(endpoint)?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(Error::validation(format!(
                "unsupported socket scheme `{}`",
                url.scheme()
            )));
        }

        Ok(Self::spawn(config, display, |runner| async move {
            runner.connect_and_run(url).await
        }))
    }

    /// Run a session over a WebSocket whose handshake has already completed.
    pub fn from_stream<S>(
        stream: WebSocketStream<S>,
        config: Config,
        display: Arc<dyn DisplaySurface>,
    ) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        Self::spawn(config, display, |runner| async move {
            runner.run(stream).await
        })
    }

    fn spawn<F, Fut>(config: Config, display: Arc<dyn DisplaySurface>, start: F) -> Self
    where
        F: FnOnce(Runner) -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let (state_tx, state_rx) = watch::channel(SessionState::Connecting);
        let shutdown = CancellationToken::new();

        let runner = Runner {
            keepalive: Keepalive::from(&config),
            sink: DataSink::new(Arc::clone(&display)),
            display,
            connect_timeout: config.connect_timeout,
            close_timeout: config.close_timeout,
            state_tx,
            shutdown: shutdown.clone(),
        };
        let task = tokio::spawn(start(runner));

        Self {
            state_rx,
            _close_on_drop: shutdown.clone().drop_guard(),
            shutdown,
            task,
        }
    }

    /// Get the current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state_rx.borrow()
    }

    /// Subscribe to session state changes.
    #[must_use]
    pub fn state_receiver(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    /// Wait until the session reaches [`SessionState::Closed`].
    pub async fn closed(&self) {
        let mut state_rx = self.state_rx.clone();
        // An error means the session task is gone, which is closed as well.
        _ = state_rx.wait_for(|state| state.is_closed()).await;
    }

    /// Close the underlying connection.
    ///
    /// The session ends without a fatal notification.
    pub fn close(&self) {
        self.shutdown.cancel();
    }

    /// Wait for the session to end.
    ///
    /// Resolves to `Ok(())` after [`Session::close`], or to the error that ended
    /// the session.
    pub async fn wait(self) -> Result<()> {
        let Self {
            task,
            _close_on_drop: close_on_drop,
            ..
        } = self;
        // Waiting must not close the session.
        let _token = close_on_drop.disarm();
        task.await?
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// State owned by the session task.
struct Runner {
    keepalive: Keepalive,
    sink: DataSink,
    display: Arc<dyn DisplaySurface>,
    connect_timeout: Option<Duration>,
    close_timeout: Duration,
    state_tx: watch::Sender<SessionState>,
    shutdown: CancellationToken,
}

impl Runner {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, url), fields(endpoint = %url))
    )]
    async fn connect_and_run(self, url: Url) -> Result<()> {
        let handshake = tokio::select! {
            () = self.shutdown.cancelled() => return self.finish(Ok(())),
            result = self.handshake(&url) => result,
        };

        match handshake {
            Ok(stream) => self.run(stream).await,
            Err(e) => self.finish(Err(e)),
        }
    }

    async fn handshake(&self, url: &Url) -> std::result::Result<WsStream, SessionError> {
        let connect = connect_async(url.as_str());
        let result = match self.connect_timeout {
            Some(limit) => timeout(limit, connect)
                .await
                .map_err(|_elapsed| SessionError::ConnectTimeout)?,
            None => connect.await,
        };

        result
            .map(|(stream, _response)| stream)
            .map_err(SessionError::Connect)
    }

    async fn run<S>(self, mut stream: WebSocketStream<S>) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        self.state_tx.send_replace(SessionState::Open {
            since: Instant::now(),
        });
        #[cfg(feature = "tracing")]
        tracing::debug!("socket session open");

        let outcome = self.dispatch_loop(&mut stream).await;
        self.finish(outcome)
    }

    async fn dispatch_loop<S>(
        &self,
        stream: &mut WebSocketStream<S>,
    ) -> std::result::Result<(), SessionError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        loop {
            let message = tokio::select! {
                biased;

                () = self.shutdown.cancelled() => {
                    self.close_stream(stream).await;
                    return Ok(());
                }
                message = stream.next() => message,
            };

            match message {
                Some(Ok(Message::Binary(bytes))) => self.dispatch(stream, &bytes).await?,
                Some(Ok(Message::Text(text))) => self.dispatch(stream, text.as_bytes()).await?,
                Some(Ok(Message::Close(_))) | None => return Err(SessionError::ConnectionClosed),
                Some(Ok(_)) => {
                    // Transport-level ping/pong, answered by tungstenite itself.
                }
                Some(Err(e)) => return Err(SessionError::Transport(e)),
            }
        }
    }

    /// Route one inbound message. Returns an error only for fatal conditions.
    async fn dispatch<S>(
        &self,
        stream: &mut WebSocketStream<S>,
        bytes: &[u8],
    ) -> std::result::Result<(), SessionError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let frame = match codec::decode(bytes) {
            Ok(frame) => frame,
            Err(e) => {
                self.close_stream(stream).await;
                return Err(SessionError::Truncated(e));
            }
        };

        match frame.tag {
            Tag::KEEPALIVE => {
                let ack = self.keepalive.respond(frame.payload);
                stream
                    .send(Message::binary(ack))
                    .await
                    .map_err(SessionError::KeepaliveAck)?;
            }
            Tag::DATA => {
                if let Err(e) = self.sink.accept(&frame) {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %e, len = frame.payload.len(), "Dropping data frame");
                    #[cfg(not(feature = "tracing"))]
                    let _: &codec::DecodeError = &e;
                }
            }
            _ => {
                #[cfg(feature = "tracing")]
                tracing::trace!(tag = %frame.tag, "Ignoring frame with reserved tag");
            }
        }

        Ok(())
    }

    /// Best-effort closing handshake. A peer that stops reading must not keep
    /// the session from reaching `Closed`.
    async fn close_stream<S>(&self, stream: &mut WebSocketStream<S>)
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        if timeout(self.close_timeout, stream.close(None)).await.is_err() {
            #[cfg(feature = "tracing")]
            tracing::debug!(limit = ?self.close_timeout, "closing handshake timed out");
        }
    }

    /// Publish `Closed`, reporting the error first if there is one.
    fn finish(&self, outcome: std::result::Result<(), SessionError>) -> Result<()> {
        let result = match outcome {
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("socket session closed locally");
                Ok(())
            }
            Err(e) => {
                let error = Error::from(e);
                #[cfg(feature = "tracing")]
                tracing::warn!(%error, "socket session ended");
                self.display.show_fatal_error(&error);
                Err(error)
            }
        };

        self.state_tx.send_replace(SessionState::Closed);
        result
    }
}
