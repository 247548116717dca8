//! The display collaborator.
//!
//! The socket session and the subscription requester never render anything
//! themselves. They report to an injected [`DisplaySurface`], which owns the
//! accumulating output log, the fatal error indicator and the confirmation area.

use std::sync::{Mutex, PoisonError};

use crate::error::Error;

/// Terminator appended after every line written to an [`OutputLog`].
pub const LINE_TERMINATOR: &str = "\r\n";

/// Sink for everything the client wants the user to see.
///
/// Implementations must make each call atomic with respect to the others: the
/// socket session and a subscription exchange may report concurrently.
pub trait DisplaySurface: Send + Sync + 'static {
    /// Append one decoded data payload to the output log.
    fn append_line(&self, text: &str);

    /// Show that the session ended. Called at most once per session.
    fn show_fatal_error(&self, error: &Error);

    /// Show the text returned by a subscription exchange, or the error text if
    /// the exchange failed.
    fn show_subscription_result(&self, text: &str);
}

/// In-memory [`DisplaySurface`] keeping the output log as a single growing string.
#[derive(Debug, Default)]
pub struct OutputLog {
    inner: Mutex<LogState>,
}

#[derive(Debug, Default)]
struct LogState {
    log: String,
    fatal_errors: Vec<String>,
    subscription_result: Option<String>,
}

impl OutputLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The full output log, terminators included.
    #[must_use]
    pub fn contents(&self) -> String {
        self.lock().log.clone()
    }

    /// The output log split into lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lock()
            .log
            .split_terminator(LINE_TERMINATOR)
            .map(str::to_owned)
            .collect()
    }

    /// Number of fatal notifications received.
    #[must_use]
    pub fn fatal_count(&self) -> usize {
        self.lock().fatal_errors.len()
    }

    /// Message of the most recent fatal notification.
    #[must_use]
    pub fn fatal_error(&self) -> Option<String> {
        self.lock().fatal_errors.last().cloned()
    }

    /// Current content of the confirmation area.
    #[must_use]
    pub fn subscription_result(&self) -> Option<String> {
        self.lock().subscription_result.clone()
    }

    // The log is append-only, so a poisoned lock still holds consistent data.
    fn lock(&self) -> std::sync::MutexGuard<'_, LogState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DisplaySurface for OutputLog {
    fn append_line(&self, text: &str) {
        let mut state = self.lock();
        state.log.push_str(text);
        state.log.push_str(LINE_TERMINATOR);
    }

    fn show_fatal_error(&self, error: &Error) {
        self.lock().fatal_errors.push(error.to_string());
    }

    fn show_subscription_result(&self, text: &str) {
        self.lock().subscription_result = Some(text.to_owned());
    }
}
