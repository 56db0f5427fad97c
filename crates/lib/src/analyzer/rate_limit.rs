use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Enforces a minimum interval between consecutive model requests.
///
/// The limiter is owned by a single analyzer and requests are strictly
/// sequential, so the last-request timestamp needs no synchronisation.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// A limiter that never waits.
    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Sleeps for whatever remains of the interval since the previous request,
    /// then records now as the latest request time.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                debug!("Rate limiting: sleeping {remaining:?}");
                sleep(remaining).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}
