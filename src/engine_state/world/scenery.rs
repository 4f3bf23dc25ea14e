//! # Decorative Scenery
//!
//! Non-interactive set dressing around the build area: a hot-air balloon that
//! bobs and morphs while the scenic camera orbits. Scenery entities are kept
//! in this typed collection rather than in the object registry, so they are
//! never hit-tested and never scanned for by tag.

use cgmath::{Point3, Vector3};
use web_time::Duration;

/// Length of one full balloon bob/morph cycle.
const BALLOON_LOOP: Duration = Duration::from_secs(10);

/// Vertical bob amplitude in world units.
const BOB_AMPLITUDE: f32 = 0.5;

/// Scale keyframes the balloon morphs through over one loop.
const MORPH_TARGETS: [Vector3<f32>; 3] = [
    Vector3::new(1.0, 1.0, 1.0),
    Vector3::new(1.0, 1.5, 1.0),
    Vector3::new(1.0, 1.0, 1.0),
];

/// The decorative hot-air balloon.
#[derive(Debug)]
pub struct Balloon {
    /// Rest position of the balloon's center
    pub base_position: Point3<f32>,
    /// Current animated position
    pub position: Point3<f32>,
    /// Current animated scale
    pub scale: Vector3<f32>,
}

impl Balloon {
    fn new(base_position: Point3<f32>) -> Self {
        Self {
            base_position,
            position: base_position,
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Typed collection of decorative entities.
#[derive(Debug)]
pub struct Scenery {
    /// The hot-air balloon hovering beyond the grid
    pub balloon: Balloon,
}

impl Scenery {
    /// Creates the scenery in its rest pose.
    pub fn new() -> Self {
        Self {
            balloon: Balloon::new(Point3::new(0.0, 20.0, -75.0)),
        }
    }

    /// Advances the balloon bob/morph animation.
    ///
    /// Driven by elapsed time since startup so the loop phase survives mode
    /// toggles. Only called while the scenic camera is active; outside scenic
    /// mode the balloon holds its last pose.
    ///
    /// # Arguments
    /// * `elapsed` - Time since application start
    pub fn animate(&mut self, elapsed: Duration) {
        let loop_seconds = BALLOON_LOOP.as_secs_f32();
        let normalized = (elapsed.as_secs_f32() % loop_seconds) / loop_seconds;

        let bob = (normalized * std::f32::consts::TAU).sin() * BOB_AMPLITUDE;
        self.balloon.position = self.balloon.base_position + Vector3::new(0.0, bob, 0.0);

        // Piecewise-linear morph through the keyframes.
        let segments = (MORPH_TARGETS.len() - 1) as f32;
        let morph_index = ((normalized * segments) as usize).min(MORPH_TARGETS.len() - 2);
        let next_index = (morph_index + 1) % MORPH_TARGETS.len();
        let morph_value = normalized * segments - morph_index as f32;

        let from = MORPH_TARGETS[morph_index];
        let to = MORPH_TARGETS[next_index];
        self.balloon.scale = from + (to - from) * morph_value;
    }
}

impl Default for Scenery {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn balloon_rests_at_base_pose() {
        let scenery = Scenery::new();
        assert_relative_eq!(scenery.balloon.position.y, 20.0);
        assert_relative_eq!(scenery.balloon.scale.y, 1.0);
    }

    #[test]
    fn balloon_stretches_mid_loop() {
        let mut scenery = Scenery::new();
        // Half way through the loop: top of the first morph segment.
        scenery.animate(Duration::from_secs(5));
        assert_relative_eq!(scenery.balloon.scale.y, 1.5, epsilon = 1.0e-4);
        // Sine bob is back at zero at the half-way point.
        assert_relative_eq!(
            scenery.balloon.position.y,
            scenery.balloon.base_position.y,
            epsilon = 1.0e-3
        );
    }

    #[test]
    fn balloon_loop_wraps() {
        let mut scenery = Scenery::new();
        scenery.animate(Duration::from_millis(2_500));
        let quarter_pose = scenery.balloon.position.y;
        assert_relative_eq!(quarter_pose, 20.5, epsilon = 1.0e-3);
        scenery.animate(Duration::from_millis(12_500));
        assert_relative_eq!(scenery.balloon.position.y, quarter_pose, epsilon = 1.0e-3);
    }
}
