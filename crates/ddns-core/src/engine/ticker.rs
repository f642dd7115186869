//! Pause between two loop iterations
//!
//! The engine never sleeps directly; it awaits a [`Ticker`]. Production uses
//! [`FixedDelay`], tests substitute a ticker that returns immediately.

use async_trait::async_trait;
use std::time::Duration;

/// Source of the pause that ends every steady-state iteration
#[async_trait]
pub trait Ticker: Send {
    /// Wait until the next iteration may start
    async fn tick(&mut self);
}

/// Sleep a fixed duration after every iteration
///
/// No jitter, no backoff: the pause is the same whether the iteration
/// published, skipped or failed.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    /// Create a ticker with the given pause
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The configured pause
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl Ticker for FixedDelay {
    async fn tick(&mut self) {
        tokio::time::sleep(self.delay).await;
    }
}
