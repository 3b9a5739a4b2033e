//! Wire-adjacent types shared across the stack.
//!
//! These are the values that cross the session seam: where the remote server
//! lives, who we claim to be, where the session's avatar is, and what peers
//! are around it.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Endpoint / Identity
// ---------------------------------------------------------------------------

/// The remote server a session connects to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Hostname or IP address.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Endpoint {
    /// Creates an endpoint from host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// The logical name a session presents to the server.
///
/// Newtype wrapper so an identity can't be confused with any other string
/// floating through the config. `#[serde(transparent)]` keeps the JSON
/// representation a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub String);

impl Identity {
    /// Creates an identity from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A point in the game world.
///
/// Vigil treats coordinates as opaque apart from distance and the vertical
/// axis (`y`), which the safety-band and ascent logic care about.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    /// Creates a position from coordinates.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Distance ignoring the vertical axis.
    pub fn horizontal_distance_to(&self, other: Position) -> f64 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// The same position with a replaced vertical coordinate.
    pub fn with_y(&self, y: f64) -> Self {
        Self { y, ..*self }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.1}, {:.1}, {:.1})",
            self.x, self.y, self.z
        )
    }
}

// ---------------------------------------------------------------------------
// GameMode
// ---------------------------------------------------------------------------

/// The session's sub-mode on the server.
///
/// Some keepalive actions only make sense in one mode: a spectator can
/// teleport freely between waypoints but cannot touch terrain, while an
/// interactive session moves conventionally. Scheduled actions are gated on
/// this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Normal gameplay: conventional movement, terrain interaction allowed.
    Interactive,
    /// Observer mode: free teleportation, no world interaction.
    Spectator,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interactive => write!(f, "interactive"),
            Self::Spectator => write!(f, "spectator"),
        }
    }
}

// ---------------------------------------------------------------------------
// PeerInfo
// ---------------------------------------------------------------------------

/// A peer visible to the session, as reported in player-list notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerInfo {
    /// The peer's display name.
    pub name: String,
    /// Round-trip latency, when the server reports one.
    pub ping_ms: Option<u32>,
    /// Whether the peer's entity is loaded (the peer is nearby).
    pub in_range: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_display() {
        let ep = Endpoint::new("play.example.net", 25565);
        assert_eq!(ep.to_string(), "play.example.net:25565");
    }

    #[test]
    fn test_identity_serde_transparent() {
        let id = Identity::new("vigil");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"vigil\"");
    }

    #[test]
    fn test_position_distance_to() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 0.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_position_horizontal_distance_ignores_y() {
        let a = Position::new(0.0, 100.0, 0.0);
        let b = Position::new(3.0, -50.0, 4.0);
        assert!((a.horizontal_distance_to(b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_position_with_y_replaces_only_y() {
        let p = Position::new(1.0, 2.0, 3.0).with_y(64.0);
        assert_eq!(p, Position::new(1.0, 64.0, 3.0));
    }

    #[test]
    fn test_game_mode_display() {
        assert_eq!(GameMode::Spectator.to_string(), "spectator");
        assert_eq!(GameMode::Interactive.to_string(), "interactive");
    }
}
