//! Reconnection control: backoff, cooldown, and the single pending timer.
//!
//! The controller owns exactly one optional deadline. `schedule()` arms it
//! (a no-op when already armed: a second disconnection while a timer is
//! pending never creates a second timer), the actor's `select!` loop awaits
//! it through [`wait`](ReconnectController::wait), and `cancel()` disarms it
//! in one operation. There is no spawned timer task to chase.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Backoff and cooldown tuning.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Exponential growth factor per attempt.
    pub multiplier: f64,
    /// Ceiling on the exponential curve.
    pub max_delay: Duration,
    /// Attempts tolerated before the cooldown kicks in.
    pub attempt_cap: u32,
    /// The long fixed delay used once the cap is exceeded.
    pub cooldown: Duration,
    /// Attempts older than this are forgotten at the next scheduling.
    pub attempt_window: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(10),
            multiplier: 1.5,
            max_delay: Duration::from_secs(300),
            attempt_cap: 5,
            cooldown: Duration::from_secs(300),
            attempt_window: Duration::from_secs(300),
        }
    }
}

impl ReconnectConfig {
    /// Clamps out-of-range values so the config is safe to use.
    pub fn validated(mut self) -> Self {
        if self.multiplier < 1.0 {
            warn!(
                multiplier = self.multiplier,
                "backoff multiplier below 1 would shrink delays — clamping"
            );
            self.multiplier = 1.0;
        }
        if self.max_delay < self.base_delay {
            self.max_delay = self.base_delay;
        }
        if self.attempt_cap == 0 {
            self.attempt_cap = 1;
        }
        self
    }

    /// The delay for a retry with `attempts` prior attempts on record:
    /// `min(base * multiplier^attempts, max)`.
    pub fn delay_after(&self, attempts: u32) -> Duration {
        let raw = self.base_delay.as_secs_f64()
            * self.multiplier.powi(attempts as i32);
        Duration::from_secs_f64(raw).min(self.max_delay)
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns the retry counter and the single pending reconnect deadline.
pub struct ReconnectController {
    config: ReconnectConfig,
    attempts: u32,
    last_scheduled: Option<Instant>,
    deadline: Option<Instant>,
    cooling_down: bool,
}

impl ReconnectController {
    /// Creates a controller with no attempts on record.
    pub fn new(config: ReconnectConfig) -> Self {
        Self {
            config: config.validated(),
            attempts: 0,
            last_scheduled: None,
            deadline: None,
            cooling_down: false,
        }
    }

    /// Arms the reconnect timer and returns the chosen delay.
    ///
    /// Returns `None` without touching anything when a timer is already
    /// pending — the at-most-one-pending-timer invariant.
    pub fn schedule(&mut self) -> Option<Duration> {
        if self.deadline.is_some() {
            debug!("reconnect already pending — ignoring duplicate request");
            return None;
        }

        let now = Instant::now();

        // Rolling window: a quiet stretch since the last scheduling means
        // the old failures no longer count.
        if let Some(last) = self.last_scheduled {
            if now.saturating_duration_since(last) > self.config.attempt_window
            {
                debug!(
                    forgotten = self.attempts,
                    "attempt window elapsed — resetting attempt counter"
                );
                self.attempts = 0;
            }
        }

        let delay = if self.attempts >= self.config.attempt_cap {
            self.cooling_down = true;
            warn!(
                attempts = self.attempts,
                cooldown_secs = self.config.cooldown.as_secs(),
                "attempt cap exceeded — entering cooldown"
            );
            self.config.cooldown
        } else {
            let delay = self.config.delay_after(self.attempts);
            self.attempts += 1;
            delay
        };

        self.last_scheduled = Some(now);
        self.deadline = Some(now + delay);
        info!(
            delay_secs = delay.as_secs(),
            attempt = self.attempts,
            "reconnect scheduled"
        );
        Some(delay)
    }

    /// Waits for the pending deadline. Pends forever when none is armed.
    ///
    /// On expiry the deadline is cleared (just before the caller re-enters
    /// its connect path) and, if this was the cooldown firing, the attempt
    /// counter starts over.
    pub async fn wait(&mut self) {
        let deadline = match self.deadline {
            Some(d) => d,
            None => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        };

        time::sleep_until(deadline).await;

        self.deadline = None;
        if self.cooling_down {
            self.cooling_down = false;
            self.attempts = 0;
            debug!("cooldown elapsed — attempt counter reset");
        }
    }

    /// Disarms the pending timer, if any. One operation, nothing to join.
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            debug!("pending reconnect cancelled");
        }
        self.cooling_down = false;
    }

    /// Clears the backoff history after a successful establishment.
    pub fn on_established(&mut self) {
        self.attempts = 0;
        self.cooling_down = false;
        self.deadline = None;
        self.last_scheduled = None;
    }

    /// Attempts currently on record.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Whether a reconnect timer is armed.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

// =========================================================================
// Tests
// =========================================================================
