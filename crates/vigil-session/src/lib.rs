//! Session and connector seams for Vigil.
//!
//! Vigil keeps exactly one logical game session alive at a time, but the
//! session protocol itself (login, movement packets, entity tracking) is not
//! Vigil's business. This crate defines the boundary:
//!
//! 1. **Connecting** — producing a live session ([`Connector`] trait)
//! 2. **Observing and acting** — what a live session exposes ([`Session`] trait)
//! 3. **Lifecycle events** — the closed set of things a session can report
//!    ([`SessionEvent`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Lifecycle layer (above)  ← owns the one current session, reacts to events
//!     ↕
//! Session layer (this crate)  ← the seam: traits, events, wire-adjacent types
//!     ↕
//! Protocol implementation (below, out of tree)  ← speaks the actual game protocol
//! ```

mod error;
mod event;
mod session;
mod types;

pub use error::SessionError;
pub use event::SessionEvent;
pub use session::{Connector, Session, SessionEvents};
pub use types::{Endpoint, GameMode, Identity, PeerInfo, Position};
