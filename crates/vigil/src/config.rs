//! Environment-style configuration.
//!
//! Everything is tunable through `VIGIL_*` variables and everything has a
//! default — except the endpoint host, without which there is nothing to
//! keep alive. A missing host is a startup-fatal error; a missing webhook
//! URL merely disables notifications.

use std::str::FromStr;
use std::time::Duration;

use vigil_lifecycle::{KeepaliveIntervals, LifecycleConfig, ReconnectConfig};
use vigil_sched::{LivenessConfig, WaypointConfig};
use vigil_session::{Endpoint, Identity};

/// Recognized environment variables.
const VAR_HOST: &str = "VIGIL_HOST";
const VAR_PORT: &str = "VIGIL_PORT";
const VAR_NAME: &str = "VIGIL_NAME";
const VAR_WEBHOOK_URL: &str = "VIGIL_WEBHOOK_URL";
const VAR_RECONNECT_BASE_SECS: &str = "VIGIL_RECONNECT_BASE_SECS";
const VAR_RECONNECT_MULTIPLIER: &str = "VIGIL_RECONNECT_MULTIPLIER";
const VAR_RECONNECT_MAX_SECS: &str = "VIGIL_RECONNECT_MAX_SECS";
const VAR_RECONNECT_ATTEMPT_CAP: &str = "VIGIL_RECONNECT_ATTEMPT_CAP";
const VAR_RECONNECT_COOLDOWN_SECS: &str = "VIGIL_RECONNECT_COOLDOWN_SECS";
const VAR_LIVENESS_TIMEOUT_SECS: &str = "VIGIL_LIVENESS_TIMEOUT_SECS";
const VAR_LOOK_INTERVAL_SECS: &str = "VIGIL_LOOK_INTERVAL_SECS";
const VAR_PATROL_INTERVAL_SECS: &str = "VIGIL_PATROL_INTERVAL_SECS";
const VAR_STATUS_INTERVAL_SECS: &str = "VIGIL_STATUS_INTERVAL_SECS";
const VAR_PLAYER_LIST_INTERVAL_SECS: &str = "VIGIL_PLAYER_LIST_INTERVAL_SECS";

/// Configuration errors. All of them are startup-fatal: a process with a
/// broken config must not begin the lifecycle at all.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is absent.
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    /// A variable is present but unparseable.
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Full runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: Endpoint,
    pub identity: Identity,
    /// Absent URL disables notifications; it is not an error.
    pub webhook_url: Option<String>,
    pub reconnect: ReconnectConfig,
    pub liveness: LivenessConfig,
    pub intervals: KeepaliveIntervals,
    pub waypoints: WaypointConfig,
}

impl Config {
    /// A config with defaults for everything but the target.
    pub fn new(endpoint: Endpoint, identity: Identity) -> Self {
        Self {
            endpoint,
            identity,
            webhook_url: None,
            reconnect: Default::default(),
            liveness: Default::default(),
            intervals: Default::default(),
            waypoints: Default::default(),
        }
    }

    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the configuration through an arbitrary lookup function.
    ///
    /// The seam that makes config parsing testable without touching the
    /// (process-global, race-prone) environment.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let host = lookup(VAR_HOST)
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::Missing(VAR_HOST))?;
        let port = parsed(&lookup, VAR_PORT)?.unwrap_or(25565);
        let identity = Identity::new(
            lookup(VAR_NAME).unwrap_or_else(|| "vigil".to_string()),
        );
        let webhook_url = lookup(VAR_WEBHOOK_URL).filter(|u| !u.is_empty());

        let reconnect_defaults = ReconnectConfig::default();
        let reconnect = ReconnectConfig {
            base_delay: secs(&lookup, VAR_RECONNECT_BASE_SECS)?
                .unwrap_or(reconnect_defaults.base_delay),
            multiplier: parsed(&lookup, VAR_RECONNECT_MULTIPLIER)?
                .unwrap_or(reconnect_defaults.multiplier),
            max_delay: secs(&lookup, VAR_RECONNECT_MAX_SECS)?
                .unwrap_or(reconnect_defaults.max_delay),
            attempt_cap: parsed(&lookup, VAR_RECONNECT_ATTEMPT_CAP)?
                .unwrap_or(reconnect_defaults.attempt_cap),
            cooldown: secs(&lookup, VAR_RECONNECT_COOLDOWN_SECS)?
                .unwrap_or(reconnect_defaults.cooldown),
            ..reconnect_defaults
        };

        let liveness_defaults = LivenessConfig::default();
        let liveness = LivenessConfig {
            timeout: secs(&lookup, VAR_LIVENESS_TIMEOUT_SECS)?
                .unwrap_or(liveness_defaults.timeout),
            ..liveness_defaults
        };

        let interval_defaults = KeepaliveIntervals::default();
        let intervals = KeepaliveIntervals {
            look_around: secs(&lookup, VAR_LOOK_INTERVAL_SECS)?
                .unwrap_or(interval_defaults.look_around),
            patrol: secs(&lookup, VAR_PATROL_INTERVAL_SECS)?
                .unwrap_or(interval_defaults.patrol),
            status_report: secs(&lookup, VAR_STATUS_INTERVAL_SECS)?
                .unwrap_or(interval_defaults.status_report),
            player_list: secs(&lookup, VAR_PLAYER_LIST_INTERVAL_SECS)?
                .unwrap_or(interval_defaults.player_list),
            ..interval_defaults
        };

        Ok(Self {
            endpoint: Endpoint::new(host, port),
            identity,
            webhook_url,
            reconnect,
            liveness,
            intervals,
            waypoints: WaypointConfig::default(),
        })
    }

    /// The lifecycle-layer slice of this config.
    pub fn lifecycle(&self) -> LifecycleConfig {
        LifecycleConfig {
            endpoint: self.endpoint.clone(),
            identity: self.identity.clone(),
            reconnect: self.reconnect.clone(),
            liveness: self.liveness.clone(),
            intervals: self.intervals.clone(),
            waypoints: self.waypoints.clone(),
        }
    }
}

/// Parses an optional variable, erroring only when present-but-invalid.
fn parsed<T: FromStr>(
    lookup: impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}

/// Like [`parsed`], for whole-second durations.
fn secs(
    lookup: impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    Ok(parsed::<u64>(lookup, var)?.map(Duration::from_secs))
}

// =========================================================================
// Tests
// =========================================================================
