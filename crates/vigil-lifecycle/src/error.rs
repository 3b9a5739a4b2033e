//! Error types for the lifecycle layer.

use vigil_session::SessionError;

use crate::LifecycleState;

/// Errors surfaced through the [`LifecycleHandle`](crate::LifecycleHandle).
///
/// Note how small this is: almost nothing in the lifecycle escalates to the
/// caller. Session deaths, action failures, and delivery failures are all
/// absorbed by the actor (logged, reconnected, or dropped) — only misuse of
/// the handle and a dead actor are the caller's problem.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// `start()` was called from a state that doesn't allow it.
    #[error("cannot start from state {0}")]
    InvalidState(LifecycleState),

    /// The actor task is gone (panicked or the runtime shut down).
    #[error("lifecycle actor is unavailable")]
    Unavailable,

    /// A session-layer error that had to cross the handle boundary.
    #[error(transparent)]
    Session(#[from] SessionError),
}
