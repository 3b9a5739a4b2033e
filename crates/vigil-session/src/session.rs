//! The [`Session`] and [`Connector`] traits.
//!
//! Vigil doesn't implement a game protocol — that's the job of a protocol
//! crate (or a test mock). These two traits are the whole contract between
//! Vigil's lifecycle core and whatever actually speaks to the server.
//!
//! # Why the explicit `impl Future + Send` returns
//!
//! The lifecycle actor runs as a spawned task on a multi-threaded runtime,
//! so every future it awaits must be `Send`. Plain `async fn` in a trait
//! can't promise that; the desugared form can.

use std::future::Future;

use tokio::sync::mpsc;

use crate::{Endpoint, GameMode, Identity, PeerInfo, Position, SessionError};
use crate::SessionEvent;

/// The channel on which a session delivers its [`SessionEvent`]s.
pub type SessionEvents = mpsc::Receiver<SessionEvent>;

/// A live connection to the remote server.
///
/// Exactly one `Session` is owned by the lifecycle actor at any time, and
/// ownership never leaves it while the session is current — which is why
/// the acting methods take `&mut self` and no locking appears anywhere.
///
/// Observers are synchronous reads of locally-tracked state (a protocol
/// implementation already mirrors position, mode, and the entity roster);
/// actions are futures because they write to the wire.
///
/// After a terminal [`SessionEvent`] has been delivered for this instance,
/// no method other than [`close`](Self::close) is called on it.
pub trait Session: Send + 'static {
    /// The avatar's last known position, or `None` before the first spawn.
    fn position(&self) -> Option<Position>;

    /// The session's current sub-mode.
    fn current_mode(&self) -> GameMode;

    /// Peers currently visible to the session, excluding the session's own
    /// identity.
    fn peers(&self) -> Vec<PeerInfo>;

    /// Points the view at the given yaw/pitch (radians).
    fn set_orientation(
        &mut self,
        yaw: f64,
        pitch: f64,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Moves (or, in spectator mode, teleports) toward the target position.
    fn move_toward(
        &mut self,
        target: Position,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Tears the connection down. Idempotent; errors are the
    /// implementation's to swallow.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// Establishes sessions against a configured endpoint.
///
/// The same connector instance is reused across every reconnection attempt
/// for the life of the process, so it is `Sync` and shared behind an `Arc`
/// by the lifecycle actor.
///
/// # Contract
///
/// `connect` resolves once the transport link is up and the session object
/// can accept calls; full establishment (login complete, avatar spawned) is
/// signalled later by [`SessionEvent::Established`] on the returned channel.
/// If establishment fails, the implementation delivers a terminal event
/// instead.
pub trait Connector: Send + Sync + 'static {
    /// The session type this connector produces.
    type Session: Session;

    /// Opens a new connection and returns the session plus its event stream.
    fn connect(
        &self,
        endpoint: &Endpoint,
        identity: &Identity,
    ) -> impl Future<
        Output = Result<(Self::Session, SessionEvents), SessionError>,
    > + Send;
}
