//! Wiring tests for the builder: config in, running lifecycle out.

use std::time::Duration;

use vigil::prelude::*;
use vigil::{LifecycleState, SessionError, SessionEvents, VigilBuilder};

/// A connector that always fails — enough to see the lifecycle spin.
struct RefusingConnector;

struct NeverSession;

impl Session for NeverSession {
    fn position(&self) -> Option<Position> {
        None
    }

    fn current_mode(&self) -> GameMode {
        GameMode::Interactive
    }

    fn peers(&self) -> Vec<vigil::PeerInfo> {
        Vec::new()
    }

    async fn set_orientation(
        &mut self,
        _yaw: f64,
        _pitch: f64,
    ) -> Result<(), SessionError> {
        Ok(())
    }

    async fn move_toward(
        &mut self,
        _target: Position,
    ) -> Result<(), SessionError> {
        Ok(())
    }

    async fn close(&mut self) {}
}

impl Connector for RefusingConnector {
    type Session = NeverSession;

    async fn connect(
        &self,
        _endpoint: &Endpoint,
        _identity: &Identity,
    ) -> Result<(NeverSession, SessionEvents), SessionError> {
        Err(SessionError::ConnectFailed("connection refused".into()))
    }
}

async fn settle() {
    for _ in 0..25 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_builder_spawns_idle_lifecycle() {
    let config = Config::new(
        Endpoint::new("test.local", 25565),
        Identity::new("builder-test"),
    );
    let vigil = VigilBuilder::new().config(config).build(RefusingConnector);

    let status = vigil.status().await.unwrap();
    assert_eq!(status.state, LifecycleState::Idle);
    assert!(!status.connected);
}

#[tokio::test(start_paused = true)]
async fn test_start_drives_reconnect_loop_on_failure() {
    let config = Config::new(
        Endpoint::new("test.local", 25565),
        Identity::new("builder-test"),
    );
    let vigil = VigilBuilder::new().config(config).build(RefusingConnector);

    vigil.start().await.unwrap();
    settle().await;

    // The refused attempt lands in Reconnecting with backoff armed; the
    // process never dies over connection errors.
    let status = vigil.status().await.unwrap();
    assert_eq!(status.state, LifecycleState::Reconnecting);
    assert_eq!(status.reconnect_attempts, 1);

    tokio::time::advance(Duration::from_secs(10)).await;
    settle().await;
    assert_eq!(vigil.status().await.unwrap().reconnect_attempts, 2);
}

#[tokio::test(start_paused = true)]
async fn test_stop_parks_the_lifecycle() {
    let config = Config::new(
        Endpoint::new("test.local", 25565),
        Identity::new("builder-test"),
    );
    let vigil = VigilBuilder::new().config(config).build(RefusingConnector);

    vigil.start().await.unwrap();
    settle().await;
    vigil.stop().await.unwrap();

    assert_eq!(vigil.status().await.unwrap().state, LifecycleState::Idle);
}
