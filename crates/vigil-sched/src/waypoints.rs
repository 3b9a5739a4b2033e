//! Spectator patrol layout and vertical recovery.
//!
//! A patrol route is generated once per region: concentric rings of
//! angularly-equidistant points around a center, each point's height
//! randomly perturbed within a safety band, visited in a pre-shuffled order
//! that wraps around forever. Every visit re-orients the view toward the
//! region center, which is what makes the patrol read as "looking around"
//! rather than pacing.
//!
//! When the avatar's height leaves the safety band (bad teleport, falling
//! through unloaded terrain), an [`AscentPlan`] interpolates it back in
//! fixed sub-steps; the owner paces the steps and regenerates the route
//! afterwards.

use std::f64::consts::{PI, TAU};
use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};
use vigil_session::Position;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning for route generation and ascent recovery.
#[derive(Debug, Clone)]
pub struct WaypointConfig {
    /// Number of concentric rings.
    pub rings: u32,
    /// Points per ring, angularly equidistant.
    pub points_per_ring: u32,
    /// Distance between consecutive rings (ring N sits at `(N+1) * spacing`).
    pub ring_spacing: f64,
    /// Maximum random vertical offset per point, in either direction.
    pub vertical_jitter: f64,
    /// Lower edge of the safety band, relative to the region center height.
    pub band_floor: f64,
    /// Upper edge of the safety band, relative to the region center height.
    pub band_ceiling: f64,
    /// Number of interpolation sub-steps in an ascent.
    pub ascent_steps: u32,
    /// Delay between ascent sub-steps.
    pub ascent_step_delay: Duration,
}

impl Default for WaypointConfig {
    fn default() -> Self {
        Self {
            rings: 4,
            points_per_ring: 6,
            ring_spacing: 6.0,
            vertical_jitter: 5.0,
            band_floor: -8.0,
            band_ceiling: 8.0,
            ascent_steps: 8,
            ascent_step_delay: Duration::from_millis(500),
        }
    }
}

impl WaypointConfig {
    /// Clamps out-of-range values so the config is safe to use.
    pub fn validated(mut self) -> Self {
        if self.rings == 0 {
            warn!("rings of 0 generates no route — clamping to 1");
            self.rings = 1;
        }
        if self.points_per_ring == 0 {
            self.points_per_ring = 1;
        }
        if self.ascent_steps == 0 {
            self.ascent_steps = 1;
        }
        if self.band_floor > self.band_ceiling {
            std::mem::swap(&mut self.band_floor, &mut self.band_ceiling);
        }
        self.vertical_jitter = self.vertical_jitter.abs();
        self
    }

    /// Whether a height is inside the safety band around `center_y`.
    pub fn band_contains(&self, center_y: f64, y: f64) -> bool {
        y >= center_y + self.band_floor && y <= center_y + self.band_ceiling
    }

    /// The height an ascent recovers to: the middle of the band.
    pub fn band_target(&self, center_y: f64) -> f64 {
        center_y + (self.band_floor + self.band_ceiling) / 2.0
    }
}

// ---------------------------------------------------------------------------
// Waypoints
// ---------------------------------------------------------------------------

/// One patrol stop: a position plus the view orientation to take there.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub position: Position,
    /// View yaw in radians, facing the region center.
    pub yaw: f64,
    /// View pitch in radians, a small random tilt.
    pub pitch: f64,
}

/// A cyclic patrol route around a region center.
pub struct WaypointRoute {
    center: Position,
    order: Vec<Waypoint>,
    cursor: usize,
}

impl WaypointRoute {
    /// Generates a route around `center`.
    ///
    /// Layout: `rings` rings at radii `(ring + 1) * ring_spacing`, each with
    /// `points_per_ring` points at equidistant polar angles. Heights are
    /// perturbed by up to `vertical_jitter` and clamped into the safety
    /// band. The visiting order is a shuffled permutation of every point,
    /// traversed cyclically.
    pub fn generate(center: Position, config: &WaypointConfig) -> Self {
        let config = config.clone().validated();
        let mut rng = rand::rng();
        let mut order = Vec::with_capacity(
            (config.rings * config.points_per_ring) as usize,
        );

        for ring in 0..config.rings {
            let radius = (ring + 1) as f64 * config.ring_spacing;
            for i in 0..config.points_per_ring {
                let angle = TAU / config.points_per_ring as f64 * i as f64;
                let jitter = if config.vertical_jitter > 0.0 {
                    rng.random_range(
                        -config.vertical_jitter..=config.vertical_jitter,
                    )
                } else {
                    0.0
                };
                let y = (center.y + jitter).clamp(
                    center.y + config.band_floor,
                    center.y + config.band_ceiling,
                );
                order.push(Waypoint {
                    position: Position::new(
                        center.x + angle.cos() * radius,
                        y,
                        center.z + angle.sin() * radius,
                    ),
                    // The point sits at polar angle `angle` from the center,
                    // so looking back at the center is half a turn away.
                    yaw: (angle + PI) % TAU,
                    pitch: rng.random_range(-0.15..=0.15),
                });
            }
        }

        order.shuffle(&mut rng);

        debug!(
            waypoints = order.len(),
            %center,
            "patrol route generated"
        );

        Self {
            center,
            order,
            cursor: 0,
        }
    }

    /// Returns the next waypoint, wrapping around at the end of the order.
    pub fn advance(&mut self) -> &Waypoint {
        let wp = &self.order[self.cursor];
        self.cursor = (self.cursor + 1) % self.order.len();
        wp
    }

    /// The region center the route was generated around.
    pub fn center(&self) -> Position {
        self.center
    }

    /// Number of waypoints in the route.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the route has no waypoints. Cannot happen for a validated
    /// config; exists for the usual pairing with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Ascent
// ---------------------------------------------------------------------------

/// Linear vertical interpolation back into the safety band.
///
/// Pure data: the plan yields the sub-step positions, the owner paces them
/// (one per `ascent_step_delay`) and drops the plan to cancel. Horizontal
/// position is held fixed throughout.
#[derive(Debug)]
pub struct AscentPlan {
    from: Position,
    target_y: f64,
    steps: u32,
    issued: u32,
}

impl AscentPlan {
    /// Plans an ascent (or descent) from `from` to `target_y`.
    pub fn new(from: Position, target_y: f64, steps: u32) -> Self {
        Self {
            from,
            target_y,
            steps: steps.max(1),
            issued: 0,
        }
    }

    /// The next interpolated position, or `None` once the target was
    /// reached. The final step lands exactly on `target_y`.
    pub fn next_step(&mut self) -> Option<Position> {
        if self.issued >= self.steps {
            return None;
        }
        self.issued += 1;
        let t = self.issued as f64 / self.steps as f64;
        let y = self.from.y + (self.target_y - self.from.y) * t;
        Some(self.from.with_y(y))
    }

    /// Steps remaining.
    pub fn remaining(&self) -> u32 {
        self.steps - self.issued
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn center() -> Position {
        Position::new(100.0, 64.0, -40.0)
    }

    // ---------------------------------------------------------------------
    // Route generation
    // ---------------------------------------------------------------------

    #[test]
    fn test_generate_produces_rings_times_points() {
        let route = WaypointRoute::generate(center(), &WaypointConfig::default());
        assert_eq!(route.len(), 4 * 6);
        assert!(!route.is_empty());
    }

    #[test]
    fn test_generate_heights_stay_inside_band() {
        let config = WaypointConfig {
            vertical_jitter: 50.0, // far beyond the band — must be clamped
            ..WaypointConfig::default()
        };
        let mut route = WaypointRoute::generate(center(), &config);
        for _ in 0..route.len() {
            let y = route.advance().position.y;
            assert!(config.band_contains(center().y, y), "height {y} out of band");
        }
    }

    #[test]
    fn test_generate_radii_match_ring_layout() {
        let config = WaypointConfig {
            rings: 3,
            points_per_ring: 4,
            ring_spacing: 6.0,
            vertical_jitter: 0.0,
            ..WaypointConfig::default()
        };
        let mut route = WaypointRoute::generate(center(), &config);
        for _ in 0..route.len() {
            let wp = route.advance().clone();
            let r = wp.position.horizontal_distance_to(center());
            let on_a_ring = (1..=3)
                .any(|ring| (r - ring as f64 * 6.0).abs() < 1e-6);
            assert!(on_a_ring, "radius {r} not on any ring");
        }
    }

    #[test]
    fn test_generate_yaw_faces_center() {
        let config = WaypointConfig {
            vertical_jitter: 0.0,
            ..WaypointConfig::default()
        };
        let mut route = WaypointRoute::generate(center(), &config);
        for _ in 0..route.len() {
            let wp = route.advance().clone();
            // Walking from the waypoint along -radial (the yaw direction)
            // must reduce the distance to the center.
            let step = Position::new(
                wp.position.x + (wp.yaw - PI).cos(),
                wp.position.y,
                wp.position.z + (wp.yaw - PI).sin(),
            );
            // yaw = angle + π, so yaw - π points from center to waypoint;
            // stepping that way moves AWAY from the center.
            assert!(
                step.horizontal_distance_to(center())
                    > wp.position.horizontal_distance_to(center())
            );
        }
    }

    #[test]
    fn test_advance_wraps_around_cyclically() {
        let route_config = WaypointConfig {
            rings: 1,
            points_per_ring: 3,
            ..WaypointConfig::default()
        };
        let mut route = WaypointRoute::generate(center(), &route_config);
        let first = route.advance().clone();
        route.advance();
        route.advance();
        // Fourth visit wraps back to the first waypoint in the order.
        assert_eq!(*route.advance(), first);
    }

    #[test]
    fn test_generate_order_is_a_permutation_of_all_points() {
        // Every generated point is visited exactly once per cycle.
        let config = WaypointConfig {
            rings: 2,
            points_per_ring: 5,
            ..WaypointConfig::default()
        };
        let mut route = WaypointRoute::generate(center(), &config);
        let mut seen = Vec::new();
        for _ in 0..route.len() {
            let wp = route.advance().clone();
            assert!(!seen.contains(&wp), "waypoint visited twice in one cycle");
            seen.push(wp);
        }
        assert_eq!(seen.len(), 10);
    }

    // ---------------------------------------------------------------------
    // Safety band
    // ---------------------------------------------------------------------

    #[test]
    fn test_band_contains_edges_inclusive() {
        let config = WaypointConfig::default(); // band is -8..=+8
        assert!(config.band_contains(64.0, 56.0));
        assert!(config.band_contains(64.0, 72.0));
        assert!(!config.band_contains(64.0, 55.9));
        assert!(!config.band_contains(64.0, 72.1));
    }

    #[test]
    fn test_band_target_is_band_midpoint() {
        let config = WaypointConfig {
            band_floor: -4.0,
            band_ceiling: 12.0,
            ..WaypointConfig::default()
        };
        assert_eq!(config.band_target(64.0), 68.0);
    }

    #[test]
    fn test_validated_swaps_inverted_band() {
        let config = WaypointConfig {
            band_floor: 8.0,
            band_ceiling: -8.0,
            ..WaypointConfig::default()
        }
        .validated();
        assert_eq!(config.band_floor, -8.0);
        assert_eq!(config.band_ceiling, 8.0);
    }

    // ---------------------------------------------------------------------
    // Ascent plan
    // ---------------------------------------------------------------------

    #[test]
    fn test_ascent_plan_issues_exactly_steps() {
        let mut plan = AscentPlan::new(Position::new(0.0, 40.0, 0.0), 64.0, 8);
        let mut count = 0;
        while plan.next_step().is_some() {
            count += 1;
        }
        assert_eq!(count, 8);
        assert_eq!(plan.remaining(), 0);
    }

    #[test]
    fn test_ascent_plan_is_monotonic_and_lands_on_target() {
        let mut plan = AscentPlan::new(Position::new(3.0, 40.0, -2.0), 64.0, 6);
        let mut last_y = 40.0;
        let mut final_pos = None;
        while let Some(p) = plan.next_step() {
            assert!(p.y > last_y, "ascent must be monotonic");
            assert_eq!(p.x, 3.0, "horizontal position held fixed");
            assert_eq!(p.z, -2.0);
            last_y = p.y;
            final_pos = Some(p);
        }
        assert_eq!(final_pos.unwrap().y, 64.0);
    }

    #[test]
    fn test_ascent_plan_descends_when_above_target() {
        let mut plan = AscentPlan::new(Position::new(0.0, 90.0, 0.0), 64.0, 4);
        let mut last_y = 90.0;
        while let Some(p) = plan.next_step() {
            assert!(p.y < last_y);
            last_y = p.y;
        }
        assert_eq!(last_y, 64.0);
    }
}
