//! Integration tests for the fixed-delay action scheduler.
//!
//! Uses `tokio::time::pause()` so `sleep_until` resolves instantly when the
//! clock is advanced — tests are fast and deterministic.

use std::time::Duration;

use tokio::time::advance;
use vigil_sched::{ActionGate, ActionScheduler};

// =========================================================================
// Helpers
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Fast,
    Slow,
}

fn scheduler_with_fast(interval_ms: u64) -> ActionScheduler<Kind> {
    let mut s = ActionScheduler::new();
    s.register(
        Kind::Fast,
        Duration::from_millis(interval_ms),
        ActionGate::Connected,
        1,
    );
    s
}

/// Waits for the next firing with a timeout, for asserting "nothing fires".
async fn try_next(
    s: &mut ActionScheduler<Kind>,
    within: Duration,
) -> Option<Kind> {
    match tokio::time::timeout(within, s.wait_next()).await {
        Ok(firing) => {
            let kind = firing.kind;
            s.complete(firing);
            Some(kind)
        }
        Err(_) => None,
    }
}

// =========================================================================
// Registration and basic firing
// =========================================================================

#[test]
fn test_new_scheduler_is_empty_and_running() {
    let s: ActionScheduler<Kind> = ActionScheduler::new();
    assert!(s.is_empty());
    assert_eq!(s.len(), 0);
    assert!(!s.is_paused());
    assert_eq!(s.completed_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_first_firing_due_one_interval_after_register() {
    let mut s = scheduler_with_fast(100);

    let firing = s.wait_next().await;
    assert_eq!(firing.kind, Kind::Fast);
    assert_eq!(firing.gate, ActionGate::Connected);
    assert_eq!(firing.epoch, 1);
    s.complete(firing);
    assert_eq!(s.completed_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_firings_repeat_after_each_completion() {
    let mut s = scheduler_with_fast(100);

    for _ in 0..5 {
        let firing = s.wait_next().await;
        s.complete(firing);
    }
    assert_eq!(s.completed_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_empty_scheduler_pends_forever() {
    let mut s: ActionScheduler<Kind> = ActionScheduler::new();
    assert_eq!(try_next(&mut s, Duration::from_secs(60)).await, None);
}

// =========================================================================
// Fixed-delay semantics
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_next_firing_measured_from_completion_not_deadline() {
    // Action with a 100ms interval whose body "runs" for 250ms: the next
    // firing comes 100ms after completion, not at the 200ms mark.
    let mut s = scheduler_with_fast(100);

    let firing = s.wait_next().await;
    advance(Duration::from_millis(250)).await; // slow body
    s.complete(firing);

    // 50ms later (the old fixed-rate deadline is long past): nothing.
    assert_eq!(try_next(&mut s, Duration::from_millis(50)).await, None);
    // But a full interval after completion: fires.
    assert_eq!(
        try_next(&mut s, Duration::from_millis(60)).await,
        Some(Kind::Fast)
    );
}

#[tokio::test(start_paused = true)]
async fn test_no_overlapping_invocations_of_same_action() {
    // While a firing is outstanding the slot must not fire again, no matter
    // how much time passes.
    let mut s = scheduler_with_fast(100);

    let outstanding = s.wait_next().await;
    advance(Duration::from_secs(10)).await;
    assert_eq!(
        try_next(&mut s, Duration::from_secs(60)).await,
        None,
        "slot with an in-flight firing must not fire again"
    );
    s.complete(outstanding);
    assert_eq!(
        try_next(&mut s, Duration::from_millis(110)).await,
        Some(Kind::Fast)
    );
}

#[tokio::test(start_paused = true)]
async fn test_two_actions_fire_independently() {
    let mut s = scheduler_with_fast(100);
    s.register(
        Kind::Slow,
        Duration::from_millis(350),
        ActionGate::Always,
        1,
    );

    let mut fast = 0;
    let mut slow = 0;
    // Over ~700ms: Fast ≈ 7 firings, Slow = 2.
    for _ in 0..9 {
        let firing = s.wait_next().await;
        match firing.kind {
            Kind::Fast => fast += 1,
            Kind::Slow => slow += 1,
        }
        s.complete(firing);
    }
    assert!(fast >= 6, "fast fired {fast} times");
    assert_eq!(slow, 2, "slow fired {slow} times");
}

// =========================================================================
// Skip
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_skip_reschedules_without_counting_completion() {
    let mut s = scheduler_with_fast(100);

    let firing = s.wait_next().await;
    s.skip(firing);
    assert_eq!(s.completed_count(), 0);

    // The loop survives the skip: the next firing still arrives.
    assert_eq!(
        try_next(&mut s, Duration::from_millis(110)).await,
        Some(Kind::Fast)
    );
}

// =========================================================================
// Unregister
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_unregister_all_cancels_pending_firings() {
    let mut s = scheduler_with_fast(100);
    s.unregister_all();
    assert!(s.is_empty());
    assert_eq!(try_next(&mut s, Duration::from_secs(60)).await, None);
}

#[tokio::test(start_paused = true)]
async fn test_completing_firing_after_unregister_is_noop() {
    // A firing handed out before unregister_all must not resurrect its slot.
    let mut s = scheduler_with_fast(100);
    let firing = s.wait_next().await;

    s.unregister_all();
    s.complete(firing);

    assert!(s.is_empty());
    assert_eq!(s.completed_count(), 0);
    assert_eq!(try_next(&mut s, Duration::from_secs(60)).await, None);
}

#[tokio::test(start_paused = true)]
async fn test_register_after_unregister_starts_fresh() {
    let mut s = scheduler_with_fast(100);
    s.unregister_all();
    s.register(
        Kind::Slow,
        Duration::from_millis(200),
        ActionGate::Always,
        2,
    );

    let firing = s.wait_next().await;
    assert_eq!(firing.kind, Kind::Slow);
    assert_eq!(firing.epoch, 2);
    s.complete(firing);
}

// =========================================================================
// Pause / resume
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_pause_prevents_firings() {
    let mut s = scheduler_with_fast(100);
    s.pause();
    assert!(s.is_paused());
    assert_eq!(try_next(&mut s, Duration::from_secs(60)).await, None);
}

#[tokio::test(start_paused = true)]
async fn test_resume_rebases_deadlines_no_burst() {
    let mut s = scheduler_with_fast(100);
    s.pause();
    advance(Duration::from_secs(30)).await;
    s.resume();
    assert!(!s.is_paused());

    // Immediately after resume nothing is due — deadlines were re-based.
    assert_eq!(try_next(&mut s, Duration::from_millis(50)).await, None);
    assert_eq!(
        try_next(&mut s, Duration::from_millis(60)).await,
        Some(Kind::Fast)
    );
}

#[test]
fn test_pause_resume_idempotent() {
    let mut s: ActionScheduler<Kind> = ActionScheduler::new();
    s.pause();
    s.pause();
    assert!(s.is_paused());
    s.resume();
    s.resume();
    assert!(!s.is_paused());
}
