//! Session lifecycle events.

use crate::{GameMode, SessionError};

/// The closed set of events a session delivers to the lifecycle layer.
///
/// This is deliberately an enum, not an open listener registry: the
/// lifecycle actor has a single handler entry point and matches on the
/// variant. Protocol implementations emit these on the channel returned by
/// [`Connector::connect`](crate::Connector::connect).
///
/// # Terminal events
///
/// `Ended`, `Kicked`, and `Errored` are **terminal**: after delivering one
/// of them for a session instance, the implementation must deliver nothing
/// further, and the lifecycle layer guarantees no session method is called
/// on that instance again.
#[derive(Debug)]
pub enum SessionEvent {
    /// The session is fully established: logged in, spawned, ready to act.
    ///
    /// Arrives some time after [`Connector::connect`](crate::Connector::connect)
    /// resolves — connecting the transport and establishing the session are
    /// separate steps on most protocols.
    Established,

    /// A transport-level liveness pulse (server tick, keep-alive exchange).
    ///
    /// Implementations should emit this at their natural cadence; the
    /// lifecycle layer uses it to detect silently hung connections. Inbound
    /// events are the *only* activity signal — a link that still accepts
    /// writes but delivers nothing is stale.
    Heartbeat,

    /// The server switched the session's sub-mode.
    ModeChanged(GameMode),

    /// The session ended (server closed the connection, clean or not).
    Ended(String),

    /// The server explicitly kicked the session, with its reason text.
    Kicked(String),

    /// The session died from a protocol or transport error.
    Errored(SessionError),
}

impl SessionEvent {
    /// Whether this event terminates the session it was delivered for.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Ended(_) | Self::Kicked(_) | Self::Errored(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal_for_each_variant() {
        assert!(!SessionEvent::Established.is_terminal());
        assert!(!SessionEvent::Heartbeat.is_terminal());
        assert!(!SessionEvent::ModeChanged(GameMode::Spectator).is_terminal());
        assert!(SessionEvent::Ended("server closed".into()).is_terminal());
        assert!(SessionEvent::Kicked("afk".into()).is_terminal());
        assert!(SessionEvent::Errored(SessionError::Timeout).is_terminal());
    }
}
