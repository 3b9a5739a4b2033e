//! Loopback demo: the full Vigil stack against a simulated flaky server.
//!
//! The "server" lives in-process: every connection establishes after a
//! short delay, heartbeats every couple of seconds, and dies after a random
//! lifetime — which sends Vigil through its whole reconnect cycle over and
//! over. Watch the logs:
//!
//! ```text
//! RUST_LOG=debug cargo run -p loopback
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;

use vigil::prelude::*;
use vigil::{PeerInfo, SessionError, SessionEvents, VigilBuilder};

// ---------------------------------------------------------------------------
// Loopback connector
// ---------------------------------------------------------------------------

struct LoopbackConnector;

struct LoopbackSession {
    position: Arc<Mutex<Option<Position>>>,
}

impl Session for LoopbackSession {
    fn position(&self) -> Option<Position> {
        *self.position.lock().unwrap()
    }

    fn current_mode(&self) -> GameMode {
        GameMode::Spectator
    }

    fn peers(&self) -> Vec<PeerInfo> {
        vec![PeerInfo {
            name: "loopback-peer".into(),
            ping_ms: Some(1),
            in_range: true,
        }]
    }

    async fn set_orientation(
        &mut self,
        yaw: f64,
        pitch: f64,
    ) -> Result<(), SessionError> {
        tracing::debug!(yaw, pitch, "loopback: orientation set");
        Ok(())
    }

    async fn move_toward(
        &mut self,
        target: Position,
    ) -> Result<(), SessionError> {
        tracing::debug!(%target, "loopback: teleported");
        *self.position.lock().unwrap() = Some(target);
        Ok(())
    }

    async fn close(&mut self) {
        tracing::debug!("loopback: session closed");
    }
}

impl Connector for LoopbackConnector {
    type Session = LoopbackSession;

    async fn connect(
        &self,
        endpoint: &Endpoint,
        identity: &Identity,
    ) -> Result<(LoopbackSession, SessionEvents), SessionError> {
        tracing::info!(%endpoint, %identity, "loopback: accepting connection");

        let (tx, rx) = mpsc::channel(32);
        let position =
            Arc::new(Mutex::new(Some(Position::new(0.0, 64.0, 0.0))));

        // The "server" side of the link.
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            if tx.send(SessionEvent::Established).await.is_err() {
                return;
            }

            let lifetime = {
                let mut rng = rand::rng();
                Duration::from_secs(rng.random_range(30..90))
            };
            let dies_at = tokio::time::Instant::now() + lifetime;

            loop {
                tokio::time::sleep(Duration::from_secs(2)).await;
                if tokio::time::Instant::now() >= dies_at {
                    let _ = tx
                        .send(SessionEvent::Ended(
                            "loopback server closed the link".into(),
                        ))
                        .await;
                    return;
                }
                if tx.send(SessionEvent::Heartbeat).await.is_err() {
                    // Vigil tore the session down first.
                    return;
                }
            }
        });

        Ok((LoopbackSession { position }, rx))
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), VigilError> {
    vigil::init_tracing();

    // Real deployments set VIGIL_HOST (and friends); the demo falls back
    // to a placeholder target since the connector never dials anything.
    let config = if std::env::var_os("VIGIL_HOST").is_some() {
        Config::from_env()?
    } else {
        Config::new(
            Endpoint::new("loopback.local", 0),
            Identity::new("vigil-demo"),
        )
    };

    let vigil = VigilBuilder::new().config(config).build(LoopbackConnector);
    vigil.start().await?;

    loop {
        tokio::time::sleep(Duration::from_secs(10)).await;
        match vigil.status().await {
            Ok(status) => tracing::info!(
                state = %status.state,
                uptime_secs = status.uptime_secs,
                reconnect_attempts = status.reconnect_attempts,
                actions_fired = status.actions_fired,
                waypoints = status.waypoints,
                "status"
            ),
            Err(e) => {
                tracing::error!(error = %e, "lifecycle actor gone");
                return Ok(());
            }
        }
    }
}
