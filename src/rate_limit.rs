use std::time::Duration;

/// Fixed pause after every request to the query endpoint, whatever the
/// outcome of the request was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateLimit {
    interval: Duration,
}

impl RateLimit {
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// A gate that never waits, for test doubles and dry runs against a
    /// local endpoint.
    pub const fn disabled() -> Self {
        Self {
            interval: Duration::ZERO,
        }
    }

    pub async fn wait(&self) {
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }
}
