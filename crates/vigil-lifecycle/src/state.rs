//! The lifecycle state machine.

use serde::Serialize;

/// Where the manager is in the connect/disconnect cycle.
///
/// ```text
///          start()                 Established
/// Idle ──────────────→ Connecting ──────────────→ Connected
///   ↑                      ↑   │                      │
///   │                      │   │ connect failed /     │ terminal event /
///   │        timer fires   │   │ stale                │ staleness
///   │stop()                │   ▼                      ▼
///   └───────────────── Reconnecting ←─────────────────┘
/// ```
///
/// Invariants:
/// - A session object exists only in `Connecting` (pending establishment)
///   and `Connected` (current). No session reference survives a transition
///   out of either.
/// - `stop()` reaches `Idle` from anywhere; no reconnect timer survives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LifecycleState {
    /// Not connected and not trying. The starting state, and where `stop()`
    /// lands.
    Idle,
    /// A connection attempt is in flight (transport connecting or session
    /// establishment pending).
    Connecting,
    /// The session is established; the keepalive schedule is live.
    Connected,
    /// The previous session is gone; a reconnect timer is pending (or about
    /// to be).
    Reconnecting,
}

impl LifecycleState {
    /// Whether `start()` is valid from this state.
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Idle | Self::Reconnecting)
    }

    /// Whether the session is established.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Whether a session object currently exists (established or pending).
    pub fn has_session(&self) -> bool {
        matches!(self, Self::Connecting | Self::Connected)
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::Reconnecting => write!(f, "reconnecting"),
        }
    }
}
