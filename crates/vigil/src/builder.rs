//! `Vigil` builder and running handle.
//!
//! This ties the layers together: config → webhook notifier → lifecycle
//! actor. The builder is the one place that decides which notifier backs
//! the actor, so the lifecycle crate stays generic.

use vigil_lifecycle::{
    LifecycleError, LifecycleHandle, StatusSnapshot, spawn_lifecycle,
};
use vigil_notify::WebhookNotifier;
use vigil_session::Connector;

use crate::{Config, ConfigError};

/// Builder for configuring and launching Vigil.
///
/// # Example
///
/// ```rust,ignore
/// let vigil = VigilBuilder::new()
///     .config(my_config)
///     .build(my_connector);
/// vigil.start().await?;
/// ```
#[derive(Default)]
pub struct VigilBuilder {
    config: Option<Config>,
}

impl VigilBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Uses an explicit configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Reads the configuration from `VIGIL_*` environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        self.config = Some(Config::from_env()?);
        Ok(self)
    }

    /// Spawns the lifecycle actor with the given protocol connector.
    ///
    /// # Panics
    ///
    /// Panics if no configuration was provided — that's a wiring bug, not
    /// a runtime condition.
    pub fn build<C: Connector>(self, connector: C) -> Vigil<C> {
        let config = self.config.expect("VigilBuilder: config not set");
        let notifier = WebhookNotifier::new(config.webhook_url.clone());
        let handle = spawn_lifecycle(connector, notifier, config.lifecycle());
        Vigil { handle }
    }
}

/// A running Vigil instance.
///
/// Thin wrapper around the lifecycle handle; cheap to clone and share.
pub struct Vigil<C: Connector> {
    handle: LifecycleHandle<C>,
}

impl<C: Connector> Clone for Vigil<C> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<C: Connector> Vigil<C> {
    /// Creates a new builder.
    pub fn builder() -> VigilBuilder {
        VigilBuilder::new()
    }

    /// Begins connecting. From here on the lifecycle is self-sustaining:
    /// disconnections reconnect with backoff, forever.
    pub async fn start(&self) -> Result<(), LifecycleError> {
        self.handle.start().await
    }

    /// Tears the session down and parks. `start()` works again afterwards.
    pub async fn stop(&self) -> Result<(), LifecycleError> {
        self.handle.stop().await
    }

    /// Polls the read-only status snapshot.
    pub async fn status(&self) -> Result<StatusSnapshot, LifecycleError> {
        self.handle.status().await
    }

    /// The underlying lifecycle handle.
    pub fn handle(&self) -> &LifecycleHandle<C> {
        &self.handle
    }
}
