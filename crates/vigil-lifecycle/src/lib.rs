//! Session lifecycle management for Vigil.
//!
//! This crate is the heart of the system: a single actor that owns the one
//! current session, drives the connect/disconnect state machine, runs the
//! keepalive schedule against the session, watches liveness, and brings the
//! session back with backoff when it dies.
//!
//! # How it fits in the stack
//!
//! ```text
//! vigil (above)            ← config, builder, wiring
//!     ↕
//! Lifecycle layer (this crate)  ← state machine, reconnection, action dispatch
//!     ↕
//! vigil-session / vigil-sched / vigil-notify (below)  ← seams and mechanisms
//! ```
//!
//! # Ownership model
//!
//! Everything mutable lives inside [`LifecycleActor`]'s task: the state tag,
//! the session, the epoch counter, the scheduler, the liveness monitor, the
//! reconnection controller. The outside world talks to it through a
//! [`LifecycleHandle`] — commands in, oneshot replies out. No locks.

mod actor;
mod error;
mod reconnect;
mod state;
mod status;

pub use actor::{
    ActionKind, KeepaliveIntervals, LifecycleConfig, LifecycleHandle,
    spawn_lifecycle,
};
pub use error::LifecycleError;
pub use reconnect::{ReconnectConfig, ReconnectController};
pub use state::LifecycleState;
pub use status::StatusSnapshot;
