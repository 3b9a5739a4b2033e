//! # Vigil
//!
//! A long-lived client core that keeps exactly one game session alive
//! indefinitely: it connects, runs low-frequency keepalive actions against
//! the session, watches liveness, reconnects with backoff when the session
//! dies, and reports what happened over a webhook.
//!
//! The game protocol itself is not included — you provide it by
//! implementing [`Connector`] and [`Session`] (or use a ready-made
//! protocol crate that does).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use vigil::prelude::*;
//! use vigil::VigilBuilder;
//!
//! # async fn run<C: Connector>(my_connector: C) -> Result<(), VigilError> {
//! let vigil = VigilBuilder::new()
//!     .from_env()?            // VIGIL_HOST, VIGIL_WEBHOOK_URL, ...
//!     .build(my_connector);
//! vigil.start().await?;
//! // ... poll vigil.status().await whenever you like; it runs forever.
//! # Ok(())
//! # }
//! ```

mod builder;
mod config;
mod error;

pub use builder::{Vigil, VigilBuilder};
pub use config::{Config, ConfigError};
pub use error::VigilError;

// Re-export the seams and core types a consumer needs.
pub use vigil_lifecycle::{
    ActionKind, KeepaliveIntervals, LifecycleConfig, LifecycleHandle,
    LifecycleState, ReconnectConfig, StatusSnapshot,
};
pub use vigil_notify::{Notification, Notifier, Severity, WebhookNotifier};
pub use vigil_sched::{LivenessConfig, WaypointConfig};
pub use vigil_session::{
    Connector, Endpoint, GameMode, Identity, PeerInfo, Position, Session,
    SessionError, SessionEvent, SessionEvents,
};

/// The usual imports for a Vigil consumer.
pub mod prelude {
    pub use crate::{
        Config, Connector, Endpoint, GameMode, Identity, Position, Session,
        SessionEvent, StatusSnapshot, Vigil, VigilError,
    };
}

/// Installs a `tracing` subscriber reading `RUST_LOG`-style filters.
///
/// Convenience for binaries; libraries should never call this.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
