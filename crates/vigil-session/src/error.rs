//! Error types for the session seam.

/// Errors produced by a session or while establishing one.
///
/// The lifecycle layer treats every session error as reconnect-triggering
/// and never as fatal to the process; [`is_transient`](Self::is_transient)
/// exists so logs and notifications can say *why* a reconnect happened, not
/// to branch retry logic on it.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The connection attempt itself failed (refused, unreachable, DNS).
    #[error("connect failed: {0}")]
    ConnectFailed(String),

    /// The connection or an operation on it timed out.
    #[error("connection timed out")]
    Timeout,

    /// The connection was reset by the peer.
    #[error("connection reset")]
    ConnectionReset,

    /// The peer sent something the protocol implementation couldn't make
    /// sense of (desync, partial read, malformed packet).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The session is closed; the operation was ignored.
    #[error("session closed")]
    Closed,
}

impl SessionError {
    /// Whether this is a transient connection fault (as opposed to a
    /// protocol-level rejection).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConnectFailed(_) | Self::Timeout | Self::ConnectionReset
        )
    }
}
