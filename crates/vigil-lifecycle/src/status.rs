//! The read-only status snapshot.

use serde::Serialize;
use vigil_session::{GameMode, Position};

use crate::LifecycleState;

/// A point-in-time view of the lifecycle, pollable without side effects.
///
/// This is what an external monitoring surface (HTTP endpoint, health
/// check) serializes and serves. Everything is a plain value — the snapshot
/// holds no reference back into the actor.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    /// Current lifecycle state.
    pub state: LifecycleState,
    /// Convenience flag: `state == Connected`.
    pub connected: bool,
    /// Seconds since the session was established, when connected.
    pub uptime_secs: Option<u64>,
    /// The avatar's last known position.
    pub position: Option<Position>,
    /// Current session sub-mode.
    pub mode: Option<GameMode>,
    /// Seconds since the last inbound session activity.
    pub last_activity_secs: Option<u64>,
    /// Reconnect attempts on record (0 after a successful establishment).
    pub reconnect_attempts: u32,
    /// Waypoints in the current patrol route.
    pub waypoints: usize,
    /// Keepalive actions completed over the process lifetime.
    pub actions_fired: u64,
}
