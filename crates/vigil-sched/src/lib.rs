//! Fixed-delay keepalive scheduling for Vigil.
//!
//! Three pieces, all driven from the lifecycle actor's `tokio::select!`
//! loop:
//!
//! - [`ActionScheduler`] — N named periodic actions, each on a
//!   **fixed-delay** loop: the next firing is armed only after the current
//!   one completes (or is skipped), so an action can never overlap itself
//!   and a slow session call never causes pile-up.
//! - [`LivenessMonitor`] — last-activity staleness plus consecutive
//!   no-progress ("stuck") tracking.
//! - [`WaypointRoute`] / [`AscentPlan`] — the spectator patrol layout and
//!   the vertical recovery interpolation.
//!
//! # Integration
//!
//! The scheduler sits inside the owner's `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         firing = scheduler.wait_next() => {
//!             if gate_allows(&firing) {
//!                 run_body(firing.kind).await;
//!                 scheduler.complete(firing);
//!             } else {
//!                 scheduler.skip(firing);
//!             }
//!         }
//!     }
//! }
//! ```

mod liveness;
mod scheduler;
mod waypoints;

pub use liveness::{LivenessConfig, LivenessMonitor, Progress};
pub use scheduler::{ActionGate, ActionScheduler, Firing};
pub use waypoints::{AscentPlan, Waypoint, WaypointConfig, WaypointRoute};
