//! The lifecycle actor: an isolated Tokio task that owns the one session.
//!
//! All mutable state — the state tag, the current session, the epoch
//! counter, the scheduler, the liveness monitor, the reconnection
//! controller — lives inside this task. The outside world talks to it
//! through an mpsc channel. This is the "actor model": no shared mutable
//! state, just message passing.
//!
//! The actor's whole life is one `tokio::select!` loop over five sources:
//!
//! 1. commands from [`LifecycleHandle`] (start / stop / status)
//! 2. events from the current session
//! 3. due keepalive actions from the scheduler
//! 4. the reconnect deadline
//! 5. the next forced-ascent step
//!
//! # Epochs
//!
//! Each connection attempt gets an incrementing epoch. Everything that can
//! outlive a session — a scheduler slot, an in-flight connect task —
//! carries the epoch it was created under, and the actor drops anything
//! tagged with a dead one. Teardown bumps the epoch, so "cancel everything
//! belonging to the old session" is one increment plus clearing the local
//! timer sources.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use vigil_notify::{Notification, Notifier, Severity};
use vigil_sched::{
    ActionGate, ActionScheduler, AscentPlan, LivenessMonitor, Progress,
    WaypointRoute,
};
use vigil_session::{
    Connector, GameMode, Position, Session, SessionError, SessionEvent,
    SessionEvents,
};

use crate::{
    LifecycleError, LifecycleState, ReconnectController, StatusSnapshot,
};

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// The closed set of scheduled keepalive actions.
///
/// An enum, not a registry of closures: the actor dispatches on the kind,
/// which keeps every body next to the state it touches and makes the whole
/// schedule auditable in one `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Small random view adjustments — the minimum signal of presence.
    LookAround,
    /// Advance to the next patrol waypoint (spectator only).
    Patrol,
    /// Staleness and stuck checks.
    LivenessProbe,
    /// Periodic status digest to the notifier.
    StatusReport,
    /// Periodic peer roster to the notifier.
    PlayerList,
}

/// Firing intervals for the keepalive schedule.
#[derive(Debug, Clone)]
pub struct KeepaliveIntervals {
    pub look_around: Duration,
    pub patrol: Duration,
    pub liveness_probe: Duration,
    pub status_report: Duration,
    pub player_list: Duration,
}

impl Default for KeepaliveIntervals {
    fn default() -> Self {
        Self {
            look_around: Duration::from_secs(5),
            patrol: Duration::from_secs(45),
            liveness_probe: Duration::from_secs(5),
            status_report: Duration::from_secs(30 * 60),
            player_list: Duration::from_secs(10 * 60),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Everything the lifecycle actor needs to know.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// The server to keep a session on.
    pub endpoint: vigil_session::Endpoint,
    /// The name the session presents.
    pub identity: vigil_session::Identity,
    /// Backoff and cooldown tuning.
    pub reconnect: crate::ReconnectConfig,
    /// Staleness and stuck tuning.
    pub liveness: vigil_sched::LivenessConfig,
    /// Keepalive firing intervals.
    pub intervals: KeepaliveIntervals,
    /// Patrol layout and ascent tuning.
    pub waypoints: vigil_sched::WaypointConfig,
}

impl LifecycleConfig {
    /// A config with defaults for everything but the target.
    pub fn new(
        endpoint: vigil_session::Endpoint,
        identity: vigil_session::Identity,
    ) -> Self {
        Self {
            endpoint,
            identity,
            reconnect: Default::default(),
            liveness: Default::default(),
            intervals: Default::default(),
            waypoints: Default::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Commands and handle
// ---------------------------------------------------------------------------

/// Commands sent to the actor through its channel.
enum Command<S> {
    /// Begin connecting. Valid from `Idle` and `Reconnecting`.
    Start {
        reply: oneshot::Sender<Result<(), LifecycleError>>,
    },
    /// Tear down without reconnecting and park in `Idle`.
    Stop {
        reply: oneshot::Sender<()>,
    },
    /// Read the status snapshot.
    Status {
        reply: oneshot::Sender<StatusSnapshot>,
    },
    /// Result of a spawned connect task, tagged with its epoch.
    ConnectOutcome {
        epoch: u64,
        outcome: Result<(S, SessionEvents), SessionError>,
    },
}

/// Handle to the running lifecycle actor. Cheap to clone.
pub struct LifecycleHandle<C: Connector> {
    sender: mpsc::Sender<Command<C::Session>>,
}

// Manual impl: `#[derive(Clone)]` would demand `C: Clone`, which the
// sender doesn't need.
impl<C: Connector> Clone for LifecycleHandle<C> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<C: Connector> LifecycleHandle<C> {
    /// Starts connecting. Errors if the actor is gone or the state machine
    /// is mid-connection; a pending reconnect timer is cancelled first.
    pub async fn start(&self) -> Result<(), LifecycleError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Command::Start { reply: tx })
            .await
            .map_err(|_| LifecycleError::Unavailable)?;
        rx.await.map_err(|_| LifecycleError::Unavailable)?
    }

    /// Tears the session down (if any) without reconnecting.
    ///
    /// The escape hatch: the actor parks in `Idle` and a later
    /// [`start`](Self::start) works again.
    pub async fn stop(&self) -> Result<(), LifecycleError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Command::Stop { reply: tx })
            .await
            .map_err(|_| LifecycleError::Unavailable)?;
        rx.await.map_err(|_| LifecycleError::Unavailable)
    }

    /// Reads the current status. Side-effect free, pollable at any time.
    pub async fn status(&self) -> Result<StatusSnapshot, LifecycleError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Command::Status { reply: tx })
            .await
            .map_err(|_| LifecycleError::Unavailable)?;
        rx.await.map_err(|_| LifecycleError::Unavailable)
    }
}

/// Spawns the lifecycle actor task and returns a handle to it.
///
/// The actor starts in `Idle`; call [`LifecycleHandle::start`] to begin.
/// It exits when every handle is dropped.
pub fn spawn_lifecycle<C, N>(
    connector: C,
    notifier: N,
    config: LifecycleConfig,
) -> LifecycleHandle<C>
where
    C: Connector,
    N: Notifier,
{
    let (tx, rx) = mpsc::channel(32);

    let actor = LifecycleActor {
        connector: Arc::new(connector),
        notifier,
        state: LifecycleState::Idle,
        epoch: 0,
        session: None,
        events: None,
        scheduler: ActionScheduler::new(),
        liveness: LivenessMonitor::new(config.liveness.clone()),
        reconnect: ReconnectController::new(config.reconnect.clone()),
        route: None,
        ascent: None,
        connected_at: None,
        yaw: 0.0,
        pitch: 0.0,
        self_tx: tx.downgrade(),
        receiver: rx,
        config,
    };

    tokio::spawn(actor.run());

    LifecycleHandle { sender: tx }
}

// ---------------------------------------------------------------------------
// The actor
// ---------------------------------------------------------------------------

/// An in-progress forced ascent: the plan plus its pacing deadline.
struct AscentRun {
    plan: AscentPlan,
    next_step_at: Instant,
    step_delay: Duration,
}

struct LifecycleActor<C: Connector, N: Notifier> {
    connector: Arc<C>,
    notifier: N,
    config: LifecycleConfig,

    state: LifecycleState,
    /// Session generation counter. Bumped on every connect attempt and
    /// every teardown; anything tagged with an older value is stale.
    epoch: u64,
    session: Option<C::Session>,
    events: Option<SessionEvents>,

    scheduler: ActionScheduler<ActionKind>,
    liveness: LivenessMonitor,
    reconnect: ReconnectController,
    route: Option<WaypointRoute>,
    ascent: Option<AscentRun>,

    connected_at: Option<Instant>,
    /// Actor-tracked view orientation, so look-around can drift from the
    /// last set values without the session having to expose them.
    yaw: f64,
    pitch: f64,

    /// Weak self-sender for spawned connect tasks. Weak so the command
    /// channel closes when the last external handle is dropped.
    self_tx: mpsc::WeakSender<Command<C::Session>>,
    receiver: mpsc::Receiver<Command<C::Session>>,
}

impl<C: Connector, N: Notifier> LifecycleActor<C, N> {
    async fn run(mut self) {
        info!(endpoint = %self.config.endpoint, "lifecycle actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(Command::Start { reply }) => {
                        let _ = reply.send(self.handle_start());
                    }
                    Some(Command::Stop { reply }) => {
                        self.teardown("stopped by request", false);
                        let _ = reply.send(());
                    }
                    Some(Command::Status { reply }) => {
                        let _ = reply.send(self.snapshot());
                    }
                    Some(Command::ConnectOutcome { epoch, outcome }) => {
                        self.handle_connect_outcome(epoch, outcome);
                    }
                    None => {
                        // Last handle dropped: dismantle and exit.
                        self.teardown("all handles dropped", false);
                        break;
                    }
                },

                event = next_event(&mut self.events) => match event {
                    Some(event) => self.handle_session_event(event),
                    // The session dropped its sender without a terminal
                    // event — treat it as one.
                    None => self.teardown("event channel closed", true),
                },

                firing = self.scheduler.wait_next() => {
                    self.handle_firing(firing).await;
                }

                _ = self.reconnect.wait() => {
                    info!("reconnect timer fired");
                    self.begin_connect();
                }

                _ = wait_ascent(&mut self.ascent) => {
                    self.ascent_step().await;
                }
            }
        }

        info!("lifecycle actor stopped");
    }

    // -----------------------------------------------------------------
    // Connecting
    // -----------------------------------------------------------------

    fn handle_start(&mut self) -> Result<(), LifecycleError> {
        if !self.state.can_start() {
            return Err(LifecycleError::InvalidState(self.state));
        }
        // A manual start while a reconnect timer is pending must not
        // double-start: the timer goes first.
        self.reconnect.cancel();
        self.begin_connect();
        Ok(())
    }

    fn begin_connect(&mut self) {
        self.epoch += 1;
        let epoch = self.epoch;
        self.state = LifecycleState::Connecting;
        self.liveness.reset();

        // Only the probe runs while connecting: if establishment never
        // happens, staleness is what notices (the single timeout mechanism).
        self.scheduler.unregister_all();
        self.scheduler.register(
            ActionKind::LivenessProbe,
            self.config.intervals.liveness_probe,
            ActionGate::Always,
            epoch,
        );

        info!(
            endpoint = %self.config.endpoint,
            identity = %self.config.identity,
            epoch,
            "connecting"
        );

        let Some(tx) = self.self_tx.upgrade() else {
            // Every handle is gone; the actor is about to exit anyway.
            return;
        };
        let connector = Arc::clone(&self.connector);
        let endpoint = self.config.endpoint.clone();
        let identity = self.config.identity.clone();

        tokio::spawn(async move {
            let outcome = connector.connect(&endpoint, &identity).await;
            let _ = tx.send(Command::ConnectOutcome { epoch, outcome }).await;
        });
    }

    fn handle_connect_outcome(
        &mut self,
        epoch: u64,
        outcome: Result<(C::Session, SessionEvents), SessionError>,
    ) {
        if epoch != self.epoch {
            // A stop or teardown raced the connect task. The delivered
            // session belongs to a dead generation — close it, keep nothing.
            debug!(
                epoch,
                current = self.epoch,
                "discarding stale connect outcome"
            );
            if let Ok((mut session, _events)) = outcome {
                tokio::spawn(async move { session.close().await });
            }
            return;
        }

        match outcome {
            Ok((session, events)) => {
                self.session = Some(session);
                self.events = Some(events);
                debug!("transport link up, awaiting establishment");
            }
            Err(e) => {
                warn!(
                    error = %e,
                    transient = e.is_transient(),
                    "connect attempt failed"
                );
                self.scheduler.unregister_all();
                self.state = LifecycleState::Reconnecting;
                self.notify(Notification::new(
                    "Connect failed",
                    e.to_string(),
                    Severity::Warning,
                ));
                self.schedule_reconnect();
            }
        }
    }

    // -----------------------------------------------------------------
    // Session events
    // -----------------------------------------------------------------

    fn handle_session_event(&mut self, event: SessionEvent) {
        // Any inbound event proves the link is alive.
        self.liveness.observe();

        match event {
            SessionEvent::Established => self.handle_established(),
            SessionEvent::Heartbeat => {}
            SessionEvent::ModeChanged(mode) => self.handle_mode_changed(mode),
            SessionEvent::Ended(reason) => {
                self.teardown(&format!("session ended: {reason}"), true);
            }
            SessionEvent::Kicked(reason) => {
                self.teardown(&format!("kicked: {reason}"), true);
            }
            SessionEvent::Errored(err) => {
                self.teardown(&format!("session error: {err}"), true);
            }
        }
    }

    fn handle_established(&mut self) {
        if self.state.is_connected() {
            debug!("duplicate establishment event ignored");
            return;
        }
        self.state = LifecycleState::Connected;
        self.connected_at = Some(Instant::now());
        // A successful connection clears the backoff history.
        self.reconnect.on_established();
        self.yaw = 0.0;
        self.pitch = 0.0;

        let iv = &self.config.intervals;
        let epoch = self.epoch;
        self.scheduler.register(
            ActionKind::LookAround,
            iv.look_around,
            ActionGate::Connected,
            epoch,
        );
        self.scheduler.register(
            ActionKind::Patrol,
            iv.patrol,
            ActionGate::Mode(GameMode::Spectator),
            epoch,
        );
        self.scheduler.register(
            ActionKind::StatusReport,
            iv.status_report,
            ActionGate::Connected,
            epoch,
        );
        self.scheduler.register(
            ActionKind::PlayerList,
            iv.player_list,
            ActionGate::Connected,
            epoch,
        );

        let spectator = self
            .session
            .as_ref()
            .is_some_and(|s| s.current_mode() == GameMode::Spectator);
        if spectator {
            self.regenerate_route();
        }

        info!(endpoint = %self.config.endpoint, "session established");
        self.notify(Notification::new(
            "Connected",
            format!(
                "{} joined {}",
                self.config.identity, self.config.endpoint
            ),
            Severity::Info,
        ));
    }

    fn handle_mode_changed(&mut self, mode: GameMode) {
        info!(%mode, "session mode changed");
        if mode == GameMode::Spectator {
            self.regenerate_route();
        } else {
            // Patrol and ascent are spectator maneuvers; the gate disables
            // the action, this drops its data.
            self.route = None;
            self.ascent = None;
        }
        self.notify(Notification::new(
            "Mode changed",
            format!("session is now in {mode} mode"),
            Severity::Info,
        ));
    }

    // -----------------------------------------------------------------
    // Teardown and reconnection
    // -----------------------------------------------------------------

    /// Dismantles the current session generation. Idempotent: safe against
    /// duplicate terminal events and safe to call with no session at all.
    fn teardown(&mut self, reason: &str, reconnect: bool) {
        if !self.state.has_session() {
            if reconnect {
                debug!(reason, "teardown already done — ignoring");
            } else {
                // stop() while idle or reconnecting: kill the timer, park.
                self.reconnect.cancel();
                if self.state != LifecycleState::Idle {
                    info!(reason, "stopping");
                    self.state = LifecycleState::Idle;
                }
            }
            return;
        }

        info!(reason, reconnect, "tearing down session");

        // Invalidate everything created under this generation, then clear
        // every local timer source. After this block nothing can reach the
        // old session.
        self.epoch += 1;
        self.scheduler.unregister_all();
        self.liveness.reset();
        self.ascent = None;
        self.route = None;
        self.events = None;
        self.connected_at = None;

        if let Some(mut session) = self.session.take() {
            // Closing can touch the network; never inside the actor loop.
            tokio::spawn(async move { session.close().await });
        }

        if reconnect {
            self.state = LifecycleState::Reconnecting;
            self.notify(Notification::new(
                "Disconnected",
                reason.to_string(),
                Severity::Error,
            ));
            self.schedule_reconnect();
        } else {
            self.reconnect.cancel();
            self.state = LifecycleState::Idle;
            self.notify(Notification::new(
                "Stopped",
                reason.to_string(),
                Severity::Info,
            ));
        }
    }

    fn schedule_reconnect(&mut self) {
        if let Some(delay) = self.reconnect.schedule() {
            self.notify(Notification::new(
                "Reconnecting",
                format!(
                    "next attempt in {}s (attempt {})",
                    delay.as_secs(),
                    self.reconnect.attempts().max(1)
                ),
                Severity::Warning,
            ));
        }
    }

    // -----------------------------------------------------------------
    // Scheduled actions
    // -----------------------------------------------------------------

    async fn handle_firing(&mut self, firing: vigil_sched::Firing<ActionKind>) {
        // Stale generation or failed gate: never touch the session, but the
        // loop survives — the next firing is still armed.
        if firing.epoch != self.epoch || !self.gate_allows(firing.gate) {
            self.scheduler.skip(firing);
            return;
        }

        match firing.kind {
            ActionKind::LookAround => self.action_look_around().await,
            ActionKind::Patrol => self.action_patrol().await,
            ActionKind::LivenessProbe => self.action_liveness_probe().await,
            ActionKind::StatusReport => self.action_status_report(),
            ActionKind::PlayerList => self.action_player_list(),
        }

        self.scheduler.complete(firing);
    }

    fn gate_allows(&self, gate: ActionGate) -> bool {
        match gate {
            ActionGate::Always => true,
            ActionGate::Connected => {
                self.state.is_connected() && self.session.is_some()
            }
            ActionGate::Mode(mode) => {
                self.state.is_connected()
                    && self
                        .session
                        .as_ref()
                        .is_some_and(|s| s.current_mode() == mode)
            }
        }
    }

    async fn action_look_around(&mut self) {
        // Scoped so the (non-Send) rng is gone before the await.
        let (yaw, pitch) = {
            let mut rng = rand::rng();
            (
                self.yaw + rng.random_range(-0.25..=0.25),
                (self.pitch + rng.random_range(-0.15..=0.15)).clamp(-0.5, 0.5),
            )
        };

        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.set_orientation(yaw, pitch).await {
            Ok(()) => {
                self.yaw = yaw;
                self.pitch = pitch;
            }
            Err(e) => debug!(error = %e, "look-around failed — skipping"),
        }
    }

    async fn action_patrol(&mut self) {
        if self.ascent.is_some() {
            // The recovery routine owns movement until the band is safe.
            return;
        }
        if self.route.is_none() {
            self.regenerate_route();
        }
        let Some(route) = self.route.as_mut() else {
            return;
        };
        let wp = route.advance().clone();

        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(e) = session.move_toward(wp.position).await {
            warn!(error = %e, "patrol move failed — skipping");
            return;
        }
        if let Err(e) = session.set_orientation(wp.yaw, wp.pitch).await {
            debug!(error = %e, "patrol orientation failed");
        }
        self.yaw = wp.yaw;
        self.pitch = wp.pitch;
    }

    async fn action_liveness_probe(&mut self) {
        if self.liveness.is_stale() {
            let age = self.liveness.activity_age().as_secs();
            warn!(age_secs = age, "liveness timeout — session is dead");
            // Same path as a terminal event: don't wait for the transport
            // to notice.
            self.teardown(
                &format!("liveness timeout: no activity for {age}s"),
                true,
            );
            return;
        }

        if !self.state.is_connected() {
            return;
        }
        let spectator = self
            .session
            .as_ref()
            .is_some_and(|s| s.current_mode() == GameMode::Spectator);
        if !spectator {
            return;
        }
        let Some(position) = self.session.as_ref().and_then(|s| s.position())
        else {
            return;
        };

        // Out of the safety band: the ascent routine takes over movement.
        if let Some(center_y) = self.route.as_ref().map(|r| r.center().y) {
            if !self.config.waypoints.band_contains(center_y, position.y)
                && self.ascent.is_none()
            {
                self.start_ascent(position, center_y);
                return;
            }
        }

        if self.liveness.track_position(position) == Progress::Stuck {
            warn!(%position, "stuck in place — forcing waypoint jump");
            self.notify(Notification::new(
                "Stuck",
                "no movement across consecutive checks — forcing a position change",
                Severity::Warning,
            ));
            // Corrective only. Never a reconnect.
            self.force_waypoint_jump().await;
        }
    }

    async fn force_waypoint_jump(&mut self) {
        if self.route.is_none() {
            self.regenerate_route();
        }
        let Some(route) = self.route.as_mut() else {
            return;
        };
        let wp = route.advance().clone();
        if let Some(session) = self.session.as_mut() {
            if let Err(e) = session.move_toward(wp.position).await {
                warn!(error = %e, "corrective move failed");
            }
        }
    }

    fn action_status_report(&mut self) {
        let snapshot = self.snapshot();
        let mut n = Notification::new(
            "Status report",
            format!("{} on {}", self.config.identity, self.config.endpoint),
            Severity::Info,
        )
        .field("State", snapshot.state.to_string())
        .field(
            "Uptime",
            format_uptime(snapshot.uptime_secs.unwrap_or(0)),
        )
        .field(
            "Reconnect attempts",
            snapshot.reconnect_attempts.to_string(),
        )
        .field("Actions fired", snapshot.actions_fired.to_string());
        if let Some(mode) = snapshot.mode {
            n = n.field("Mode", mode.to_string());
        }
        if let Some(pos) = snapshot.position {
            n = n.field("Position", pos.to_string());
        }
        self.notify(n);
    }

    fn action_player_list(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let peers = session.peers();

        let notification = if peers.is_empty() {
            Notification::new(
                "Player list",
                "No players online",
                Severity::Info,
            )
        } else {
            let mut n = Notification::new(
                "Player list",
                format!("{} player(s) online", peers.len()),
                Severity::Info,
            );
            for peer in &peers {
                let ping = peer
                    .ping_ms
                    .map(|ms| format!("{ms}ms"))
                    .unwrap_or_else(|| "n/a".to_string());
                let in_range = if peer.in_range { "yes" } else { "no" };
                n = n.field(
                    peer.name.clone(),
                    format!("ping: {ping} | in range: {in_range}"),
                );
            }
            n
        };
        self.notify(notification);
    }

    // -----------------------------------------------------------------
    // Patrol route and forced ascent
    // -----------------------------------------------------------------

    fn regenerate_route(&mut self) {
        match self.session.as_ref().and_then(|s| s.position()) {
            Some(center) => {
                self.route = Some(WaypointRoute::generate(
                    center,
                    &self.config.waypoints,
                ));
            }
            // No position yet; the next patrol firing retries.
            None => self.route = None,
        }
    }

    fn start_ascent(&mut self, from: Position, center_y: f64) {
        let target_y = self.config.waypoints.band_target(center_y);
        warn!(
            from_y = from.y,
            target_y, "outside safety band — forcing ascent"
        );
        self.ascent = Some(AscentRun {
            plan: AscentPlan::new(
                from,
                target_y,
                self.config.waypoints.ascent_steps,
            ),
            next_step_at: Instant::now(),
            step_delay: self.config.waypoints.ascent_step_delay,
        });
    }

    async fn ascent_step(&mut self) {
        let step = match self.ascent.as_mut() {
            Some(run) => match run.plan.next_step() {
                Some(step) => {
                    run.next_step_at = Instant::now() + run.step_delay;
                    step
                }
                None => {
                    debug!("ascent complete — regenerating route");
                    self.ascent = None;
                    self.regenerate_route();
                    return;
                }
            },
            None => return,
        };

        if let Some(session) = self.session.as_mut() {
            if let Err(e) = session.move_toward(step).await {
                warn!(error = %e, "ascent step failed");
            }
        }
    }

    // -----------------------------------------------------------------
    // Status
    // -----------------------------------------------------------------

    fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            state: self.state,
            connected: self.state.is_connected(),
            uptime_secs: self.connected_at.map(|t| t.elapsed().as_secs()),
            position: self.session.as_ref().and_then(|s| s.position()),
            mode: self.session.as_ref().map(|s| s.current_mode()),
            last_activity_secs: self
                .state
                .has_session()
                .then(|| self.liveness.activity_age().as_secs()),
            reconnect_attempts: self.reconnect.attempts(),
            waypoints: self.route.as_ref().map_or(0, |r| r.len()),
            actions_fired: self.scheduler.completed_count(),
        }
    }

    fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }
}

// ---------------------------------------------------------------------------
// Select-branch helpers
// ---------------------------------------------------------------------------

/// Receives the next session event; pends forever with no session.
async fn next_event(events: &mut Option<SessionEvents>) -> Option<SessionEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Waits for the next ascent step; pends forever with no ascent running.
async fn wait_ascent(ascent: &mut Option<AscentRun>) {
    match ascent {
        Some(run) => time::sleep_until(run.next_step_at).await,
        None => std::future::pending().await,
    }
}

/// Formats seconds as `3h 2m 1s`.
fn format_uptime(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours}h {minutes}m {seconds}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0), "0h 0m 0s");
        assert_eq!(format_uptime(61), "0h 1m 1s");
        assert_eq!(format_uptime(3661), "1h 1m 1s");
        assert_eq!(format_uptime(10 * 3600 + 59), "10h 0m 59s");
    }

    #[test]
    fn test_default_intervals_match_deployment_values() {
        let iv = KeepaliveIntervals::default();
        assert_eq!(iv.look_around, Duration::from_secs(5));
        assert_eq!(iv.patrol, Duration::from_secs(45));
        assert_eq!(iv.status_report, Duration::from_secs(1800));
        assert_eq!(iv.player_list, Duration::from_secs(600));
    }
}
