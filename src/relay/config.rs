use std::time::Duration;

use bon::Builder;

const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_millis(100);
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_millis(500);
const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Configuration for a [`Relay`](super::Relay).
#[non_exhaustive]
#[derive(Debug, Clone, Builder)]
pub struct Config {
    /// Interval between keepalive pings sent to each client
    #[builder(default = DEFAULT_KEEPALIVE_INTERVAL)]
    pub keepalive_interval: Duration,
    /// A client that sends nothing for this long is disconnected
    #[builder(default = DEFAULT_IDLE_TIMEOUT)]
    pub idle_timeout: Duration,
    /// Frames queued per client before it is disconnected as too slow. At least one.
    #[builder(default = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keepalive_interval: DEFAULT_KEEPALIVE_INTERVAL,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}
