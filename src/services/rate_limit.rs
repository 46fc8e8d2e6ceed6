use std::time::Duration;

/// Pause inserted between successive catalog calls of one request
///
/// The engine calls [`RateLimiter::wait`] before every catalog call except the
/// first of a stage. Implementations suspend the task instead of blocking the thread.
#[async_trait::async_trait]
pub trait RateLimiter: Send + Sync {
    async fn wait(&self);
}

/// Sleeps a fixed delay on every wait
#[derive(Debug, Clone)]
pub struct FixedInterval {
    delay: Duration,
}

impl FixedInterval {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait::async_trait]
impl RateLimiter for FixedInterval {
    async fn wait(&self) {
        if self.delay.is_zero() {
            return;
        }
        tracing::debug!(delay_ms = self.delay.as_millis() as u64, "Rate limit pause");
        tokio::time::sleep(self.delay).await;
    }
}

/// Never waits; for tests and catalogs without rate limits
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait::async_trait]
impl RateLimiter for NoDelay {
    async fn wait(&self) {}
}
