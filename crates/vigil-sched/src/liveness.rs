//! Liveness monitoring: staleness and stuck detection.
//!
//! Two independent signals with very different consequences:
//!
//! - **Staleness** — no inbound activity within the timeout. The connection
//!   is silently dead even if the transport hasn't noticed; the owner tears
//!   the session down and reconnects.
//! - **Stuckness** — the avatar hasn't moved a meaningful distance across
//!   several consecutive checks. That's a *corrective* signal (force a
//!   waypoint jump), never a reconnect trigger.

use std::time::Duration;

use tokio::time::Instant;
use tracing::warn;
use vigil_session::Position;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning for the liveness monitor.
#[derive(Debug, Clone)]
pub struct LivenessConfig {
    /// How long without inbound activity before the session counts as dead.
    pub timeout: Duration,
    /// Movement below this distance counts as "no progress".
    pub stuck_epsilon: f64,
    /// Consecutive no-progress checks before a corrective action fires.
    pub stuck_threshold: u32,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            stuck_epsilon: 0.1,
            stuck_threshold: 10,
        }
    }
}

impl LivenessConfig {
    /// Clamps out-of-range values so the config is safe to use.
    ///
    /// A zero threshold would fire a corrective on every check and a
    /// negative epsilon never matches anything, so both are floored.
    pub fn validated(mut self) -> Self {
        if self.stuck_threshold == 0 {
            warn!("stuck_threshold of 0 is not usable — clamping to 1");
            self.stuck_threshold = 1;
        }
        if self.stuck_epsilon < 0.0 {
            self.stuck_epsilon = 0.0;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Progress verdict
// ---------------------------------------------------------------------------

/// Result of one position check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Moved at least epsilon since the previous check; counter reset.
    Moved,
    /// Below epsilon; the payload is the consecutive no-progress count.
    NoProgress(u32),
    /// The threshold was just reached. Reported exactly once — the counter
    /// resets immediately so the *next* threshold needs a full new run of
    /// no-progress checks.
    Stuck,
}

// ---------------------------------------------------------------------------
// Monitor
// ---------------------------------------------------------------------------

/// Tracks last-activity and movement progress for the one current session.
///
/// Uses `tokio::time::Instant` throughout so tests under a paused clock can
/// drive staleness deterministically.
pub struct LivenessMonitor {
    config: LivenessConfig,
    last_activity: Instant,
    last_position: Option<Position>,
    no_progress: u32,
}

impl LivenessMonitor {
    /// Creates a monitor; the activity clock starts now.
    pub fn new(config: LivenessConfig) -> Self {
        Self {
            config: config.validated(),
            last_activity: Instant::now(),
            last_position: None,
            no_progress: 0,
        }
    }

    /// Records inbound activity (an event arrived from the session).
    pub fn observe(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Whether the activity timeout has elapsed.
    pub fn is_stale(&self) -> bool {
        self.last_activity.elapsed() > self.config.timeout
    }

    /// Time since the last observed activity.
    pub fn activity_age(&self) -> Duration {
        self.last_activity.elapsed()
    }

    /// Feeds one position sample and reports movement progress.
    ///
    /// The first sample only seeds the baseline and counts as [`Progress::Moved`].
    pub fn track_position(&mut self, position: Position) -> Progress {
        let verdict = match self.last_position {
            None => Progress::Moved,
            Some(prev) => {
                if prev.distance_to(position) >= self.config.stuck_epsilon {
                    self.no_progress = 0;
                    Progress::Moved
                } else {
                    self.no_progress += 1;
                    if self.no_progress >= self.config.stuck_threshold {
                        self.no_progress = 0;
                        Progress::Stuck
                    } else {
                        Progress::NoProgress(self.no_progress)
                    }
                }
            }
        };
        self.last_position = Some(position);
        verdict
    }

    /// Clears all tracked state. Called on every session boundary so a new
    /// session never inherits the previous one's history.
    pub fn reset(&mut self) {
        self.last_activity = Instant::now();
        self.last_position = None;
        self.no_progress = 0;
    }

    /// The active configuration.
    pub fn config(&self) -> &LivenessConfig {
        &self.config
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config(threshold: u32) -> LivenessConfig {
        LivenessConfig {
            timeout: Duration::from_secs(60),
            stuck_epsilon: 0.1,
            stuck_threshold: threshold,
        }
    }

    fn pos(x: f64) -> Position {
        Position::new(x, 64.0, 0.0)
    }

    // ---------------------------------------------------------------------
    // Staleness
    // ---------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_is_stale_false_within_timeout() {
        let mut mon = LivenessMonitor::new(config(10));
        mon.observe();
        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(!mon.is_stale());
    }

    #[tokio::test(start_paused = true)]
    async fn test_is_stale_true_after_timeout() {
        let mut mon = LivenessMonitor::new(config(10));
        mon.observe();
        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(mon.is_stale());
    }

    #[tokio::test(start_paused = true)]
    async fn test_observe_pushes_staleness_out() {
        let mut mon = LivenessMonitor::new(config(10));
        tokio::time::advance(Duration::from_secs(59)).await;
        mon.observe();
        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(!mon.is_stale(), "observe should have reset the clock");
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_age_tracks_elapsed() {
        let mut mon = LivenessMonitor::new(config(10));
        mon.observe();
        tokio::time::advance(Duration::from_secs(7)).await;
        assert_eq!(mon.activity_age(), Duration::from_secs(7));
    }

    // ---------------------------------------------------------------------
    // Stuck tracking
    // ---------------------------------------------------------------------

    #[tokio::test]
    async fn test_track_position_first_sample_is_moved() {
        let mut mon = LivenessMonitor::new(config(3));
        assert_eq!(mon.track_position(pos(0.0)), Progress::Moved);
    }

    #[tokio::test]
    async fn test_track_position_movement_resets_counter() {
        let mut mon = LivenessMonitor::new(config(3));
        mon.track_position(pos(0.0));
        assert_eq!(mon.track_position(pos(0.0)), Progress::NoProgress(1));
        assert_eq!(mon.track_position(pos(0.0)), Progress::NoProgress(2));
        // A real move resets the run.
        assert_eq!(mon.track_position(pos(5.0)), Progress::Moved);
        assert_eq!(mon.track_position(pos(5.0)), Progress::NoProgress(1));
    }

    #[tokio::test]
    async fn test_track_position_stuck_fires_exactly_once_at_threshold() {
        let mut mon = LivenessMonitor::new(config(3));
        mon.track_position(pos(0.0));

        assert_eq!(mon.track_position(pos(0.0)), Progress::NoProgress(1));
        assert_eq!(mon.track_position(pos(0.0)), Progress::NoProgress(2));
        assert_eq!(mon.track_position(pos(0.0)), Progress::Stuck);
        // Counter reset: the run starts over, no second Stuck.
        assert_eq!(mon.track_position(pos(0.0)), Progress::NoProgress(1));
    }

    #[tokio::test]
    async fn test_track_position_sub_epsilon_drift_counts_as_no_progress() {
        let mut mon = LivenessMonitor::new(config(3));
        mon.track_position(pos(0.0));
        // 0.05 < epsilon of 0.1
        assert_eq!(mon.track_position(pos(0.05)), Progress::NoProgress(1));
    }

    #[tokio::test]
    async fn test_reset_clears_position_and_counter() {
        let mut mon = LivenessMonitor::new(config(3));
        mon.track_position(pos(0.0));
        mon.track_position(pos(0.0));
        mon.reset();
        // Baseline gone — first sample after reset seeds again.
        assert_eq!(mon.track_position(pos(0.0)), Progress::Moved);
    }

    // ---------------------------------------------------------------------
    // Config validation
    // ---------------------------------------------------------------------

    #[test]
    fn test_validated_clamps_zero_threshold() {
        let cfg = LivenessConfig {
            stuck_threshold: 0,
            ..LivenessConfig::default()
        }
        .validated();
        assert_eq!(cfg.stuck_threshold, 1);
    }

    #[test]
    fn test_validated_floors_negative_epsilon() {
        let cfg = LivenessConfig {
            stuck_epsilon: -1.0,
            ..LivenessConfig::default()
        }
        .validated();
        assert_eq!(cfg.stuck_epsilon, 0.0);
    }

    #[test]
    fn test_default_values() {
        let cfg = LivenessConfig::default();
        assert_eq!(cfg.timeout, Duration::from_secs(60));
        assert_eq!(cfg.stuck_threshold, 10);
    }
}
