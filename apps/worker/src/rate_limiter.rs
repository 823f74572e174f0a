//! Admission control for refresh cycles
//!
//! A [`RateLimiter`] hands out [`AdmissionToken`]s; one token allows one
//! refresh cycle. Tokens come from a periodic ticker and from manual
//! injection through a [`RefreshTrigger`], and both share one bounded queue.
//! When the queue is full every producer waits.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::models::{AdmissionToken, TokenOrigin};
use crate::queue::{self, QueueClosed, QueueGauge, QueueReceiver, QueueSender};

/// Queue name reported in logs and stats
pub const TOKEN_QUEUE: &str = "refresh_tokens";

/// Consumer side: yields admission tokens in arrival order
#[derive(Debug)]
pub struct RateLimiter {
    tokens: QueueReceiver<AdmissionToken>,
}

/// Producer side: injects tokens, manually or on a timer
#[derive(Debug, Clone)]
pub struct RefreshTrigger {
    tokens: QueueSender<AdmissionToken>,
}

impl RateLimiter {
    /// Create a limiter whose token queue holds at most `capacity` tokens
    pub fn new(capacity: usize) -> (RefreshTrigger, RateLimiter) {
        let (tx, rx) = queue::bounded(TOKEN_QUEUE, capacity);
        (RefreshTrigger { tokens: tx }, RateLimiter { tokens: rx })
    }

    /// Wait for the next token
    ///
    /// Returns `None` once every [`RefreshTrigger`] has been dropped and the
    /// queue is drained.
    pub async fn next_token(&mut self) -> Option<AdmissionToken> {
        self.tokens.recv().await
    }

    pub fn gauge(&self) -> QueueGauge {
        self.tokens.gauge()
    }
}

impl RefreshTrigger {
    /// Add a token, waiting while the token queue is full
    pub async fn inject(&self, origin: TokenOrigin) -> Result<AdmissionToken, QueueClosed> {
        let token = AdmissionToken::new(origin);
        self.tokens.send(token.clone()).await?;
        debug!(token_id = %token.id, origin = %origin, "Refresh token queued");
        Ok(token)
    }

    /// Issue a timer token every `period`, starting one period from now
    ///
    /// A tick that cannot be queued delays the following ones instead of
    /// bursting. The task ends when the limiter is dropped.
    pub fn spawn_ticker(&self, period: Duration) -> JoinHandle<()> {
        let trigger = self.clone();
        tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(period_secs = period.as_secs(), "Refresh timer started");
            loop {
                ticks.tick().await;
                if trigger.inject(TokenOrigin::Timer).await.is_err() {
                    break;
                }
            }
            debug!("Refresh timer stopped");
        })
    }

    /// Tokens waiting to be consumed
    pub fn pending(&self) -> usize {
        self.tokens.gauge().len()
    }

    pub fn gauge(&self) -> QueueGauge {
        self.tokens.gauge()
    }

    /// Whether the limiter side is gone
    pub fn is_closed(&self) -> bool {
        self.tokens.is_closed()
    }
}
