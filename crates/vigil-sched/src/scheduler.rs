//! The fixed-delay action scheduler.
//!
//! Each registered action is a *slot*: a kind tag, an interval, a gating
//! hint, and the epoch it was registered under. The scheduler only decides
//! *when* an action is due — evaluating the gate and running the body is
//! the owner's job, which keeps this crate free of any session knowledge
//! beyond the mode tag.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace};
use vigil_session::GameMode;

// ---------------------------------------------------------------------------
// Gates
// ---------------------------------------------------------------------------

/// When an action is allowed to run.
///
/// The scheduler carries the gate but never evaluates it — only the owner
/// knows the current lifecycle state and session mode. A firing whose gate
/// fails is [`skip`](ActionScheduler::skip)ped: the body never runs, the
/// next firing is still armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionGate {
    /// Runs whenever the scheduler is running (covers the connecting phase).
    Always,
    /// Runs only against an established session.
    Connected,
    /// Runs only when the session is in the given sub-mode.
    Mode(GameMode),
}

// ---------------------------------------------------------------------------
// Firing
// ---------------------------------------------------------------------------

/// A due action handed out by [`ActionScheduler::wait_next`].
///
/// Must be returned to the scheduler via [`complete`](ActionScheduler::complete)
/// or [`skip`](ActionScheduler::skip) — consuming the firing by value makes
/// double-completion unrepresentable. A firing that is dropped instead
/// leaves its slot dormant: at most one invocation of an action is ever in
/// flight.
#[derive(Debug)]
#[must_use = "a firing must be completed or skipped to re-arm its slot"]
pub struct Firing<K> {
    /// The action kind to dispatch on.
    pub kind: K,
    /// The gating hint recorded at registration.
    pub gate: ActionGate,
    /// The session epoch the slot was registered under. The owner compares
    /// this against its current epoch and skips on mismatch, so a timer
    /// that somehow outlives its session can never reach the session.
    pub epoch: u64,
    /// Slot identity, private so completions can't be forged.
    slot_id: u64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

struct Slot<K> {
    id: u64,
    kind: K,
    gate: ActionGate,
    interval: Duration,
    epoch: u64,
    next_due: Instant,
    in_flight: bool,
}

/// N named periodic actions on fixed-delay loops.
///
/// Fixed-delay means the next deadline is computed from *completion* time,
/// not from the previous deadline: an action whose body takes longer than
/// its interval simply drifts, it never overlaps itself and never bursts to
/// catch up.
pub struct ActionScheduler<K> {
    slots: Vec<Slot<K>>,
    next_slot_id: u64,
    paused: bool,
    completed: u64,
}

impl<K: Copy + std::fmt::Debug> ActionScheduler<K> {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_slot_id: 1,
            paused: false,
            completed: 0,
        }
    }

    /// Registers an action. Its first firing is due one full interval from
    /// now.
    pub fn register(
        &mut self,
        kind: K,
        interval: Duration,
        gate: ActionGate,
        epoch: u64,
    ) {
        let id = self.next_slot_id;
        self.next_slot_id += 1;
        self.slots.push(Slot {
            id,
            kind,
            gate,
            interval,
            epoch,
            next_due: Instant::now() + interval,
            in_flight: false,
        });
        debug!(?kind, ?interval, epoch, "action registered");
    }

    /// Drops every slot, cancelling all pending firings.
    ///
    /// Any [`Firing`] already handed out becomes inert: completing it is a
    /// no-op.
    pub fn unregister_all(&mut self) {
        if !self.slots.is_empty() {
            debug!(count = self.slots.len(), "all actions unregistered");
            self.slots.clear();
        }
    }

    /// Waits until the next action is due and hands it out.
    ///
    /// While paused, empty, or with every slot in flight, this future pends
    /// forever — `tokio::select!` keeps servicing other branches.
    pub async fn wait_next(&mut self) -> Firing<K> {
        let due = if self.paused {
            None
        } else {
            self.slots
                .iter()
                .filter(|s| !s.in_flight)
                .min_by_key(|s| s.next_due)
                .map(|s| (s.id, s.next_due))
        };

        let (slot_id, deadline) = match due {
            Some(d) => d,
            None => {
                // Nothing to wait for — pend until the owner re-enters
                // select! after mutating the schedule.
                std::future::pending::<()>().await;
                unreachable!()
            }
        };

        time::sleep_until(deadline).await;

        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.id == slot_id)
            .expect("due slot exists: nothing removed it while we slept");
        slot.in_flight = true;

        trace!(kind = ?slot.kind, "action due");

        Firing {
            kind: slot.kind,
            gate: slot.gate,
            epoch: slot.epoch,
            slot_id: slot.id,
        }
    }

    /// Marks a firing's invocation finished and arms the next one,
    /// `interval` from now.
    pub fn complete(&mut self, firing: Firing<K>) {
        if self.rearm(firing.slot_id) {
            self.completed += 1;
        }
    }

    /// Declines a firing (gate failed, stale epoch) without running it.
    /// The next firing is still armed — the loop outlives any one session.
    pub fn skip(&mut self, firing: Firing<K>) {
        trace!(kind = ?firing.kind, "action skipped");
        self.rearm(firing.slot_id);
    }

    fn rearm(&mut self, slot_id: u64) -> bool {
        match self.slots.iter_mut().find(|s| s.id == slot_id) {
            Some(slot) => {
                slot.in_flight = false;
                slot.next_due = Instant::now() + slot.interval;
                true
            }
            // Slot was unregistered while the firing was out.
            None => false,
        }
    }

    /// Pauses the scheduler; [`wait_next`](Self::wait_next) pends until
    /// [`resume`](Self::resume). Idempotent.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            debug!("scheduler paused");
        }
    }

    /// Resumes after a pause.
    ///
    /// Every deadline is re-based to `now + interval` so the time spent
    /// paused doesn't turn into a burst of immediately-due actions.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            let now = Instant::now();
            for slot in &mut self.slots {
                slot.next_due = now + slot.interval;
            }
            debug!("scheduler resumed");
        }
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether the scheduler is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Total completed (not skipped) invocations.
    pub fn completed_count(&self) -> u64 {
        self.completed
    }
}

impl<K: Copy + std::fmt::Debug> Default for ActionScheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}
