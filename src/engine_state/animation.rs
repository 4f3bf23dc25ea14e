//! # Fall Animation
//!
//! The drop a block performs after a gravity-assisted placement: it falls from
//! its hover height to the collision-resolved cell over half a second while a
//! vertical stretch plays over the first fifth of a second. Progress is driven
//! by elapsed frame time handed in by the engine loop, never by wall-clock
//! reads, so the animation is deterministic under test.

use cgmath::{EuclideanSpace, Point3, Vector3};
use web_time::Duration;

use super::world::object::ObjectId;

/// Time a falling block takes to travel from hover height to its cell.
pub const FALL_DURATION: Duration = Duration::from_millis(500);

/// Time the vertical stretch takes to ramp in (and later to settle out).
pub const STRETCH_DURATION: Duration = Duration::from_millis(200);

/// Peak stretch applied while the block is in flight.
const STRETCHED_SCALE: Vector3<f32> = Vector3::new(1.0, 2.0, 1.0);

const UNIT_SCALE: Vector3<f32> = Vector3::new(1.0, 1.0, 1.0);

/// Pose a fall animation produces for one frame.
#[derive(Copy, Clone, Debug)]
pub struct FallFrame {
    /// Block center for this frame
    pub position: Point3<f32>,
    /// Block scale for this frame
    pub scale: Vector3<f32>,
    /// Whether the fall has completed and the pose is final
    pub finished: bool,
}

/// A block falling from hover height to its resolved cell.
///
/// At most one fall is in flight at a time; the placement controller holds it
/// and suppresses further commits until it finishes.
#[derive(Debug)]
pub struct FallAnimation {
    /// The registry object being animated
    pub object: ObjectId,
    start: Point3<f32>,
    end: Point3<f32>,
    elapsed: Duration,
}

impl FallAnimation {
    /// Starts a fall for `object` from `start` down to `end`.
    pub fn new(object: ObjectId, start: Point3<f32>, end: Point3<f32>) -> Self {
        Self {
            object,
            start,
            end,
            elapsed: Duration::ZERO,
        }
    }

    /// Advances the fall by one frame and returns the pose to apply.
    ///
    /// Position interpolates linearly from start to end over the fall
    /// duration. The scale ramps toward the stretched pose over the stretch
    /// duration while falling; once the fall completes, the same stretch
    /// ratio is reused to blend from the stretched pose back to unit, which
    /// makes the settle-out land in a single frame whenever the fall outlasts
    /// the stretch. On the finishing frame the pose is exactly the end
    /// position at unit scale.
    ///
    /// # Arguments
    /// * `dt` - Frame time to advance by
    pub fn advance(&mut self, dt: Duration) -> FallFrame {
        self.elapsed += dt;

        let fall_progress =
            (self.elapsed.as_secs_f32() / FALL_DURATION.as_secs_f32()).min(1.0);
        let stretch_progress =
            (self.elapsed.as_secs_f32() / STRETCH_DURATION.as_secs_f32()).min(1.0);

        if fall_progress >= 1.0 {
            let scale = if stretch_progress >= 1.0 {
                UNIT_SCALE
            } else {
                lerp_vector(STRETCHED_SCALE, UNIT_SCALE, stretch_progress)
            };
            return FallFrame {
                position: self.end,
                scale,
                finished: true,
            };
        }

        FallFrame {
            position: Point3::from_vec(
                self.start.to_vec()
                    + (self.end - self.start) * fall_progress,
            ),
            scale: lerp_vector(UNIT_SCALE, STRETCHED_SCALE, stretch_progress),
            finished: false,
        }
    }
}

fn lerp_vector(from: Vector3<f32>, to: Vector3<f32>, value: f32) -> Vector3<f32> {
    from + (to - from) * value
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fall() -> FallAnimation {
        FallAnimation::new(
            ObjectId(0),
            Point3::new(2.0, 14.0, 2.0),
            Point3::new(2.0, 2.0, 2.0),
        )
    }

    #[test]
    fn block_stretches_while_in_flight() {
        let mut animation = fall();
        let frame = animation.advance(Duration::from_millis(100));
        assert!(!frame.finished);
        // Half way through the stretch ramp, one fifth through the fall.
        assert_relative_eq!(frame.scale.y, 1.5, epsilon = 1.0e-4);
        assert_relative_eq!(frame.position.y, 11.6, epsilon = 1.0e-3);
    }

    #[test]
    fn fall_lands_exactly_at_the_end_pose() {
        let mut animation = fall();
        let mut frame = animation.advance(Duration::from_millis(450));
        assert!(!frame.finished);
        frame = animation.advance(Duration::from_millis(100));
        assert!(frame.finished);
        assert_eq!(frame.position, Point3::new(2.0, 2.0, 2.0));
        assert_eq!(frame.scale, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn position_never_overshoots_under_a_long_frame() {
        let mut animation = fall();
        let frame = animation.advance(Duration::from_secs(3));
        assert!(frame.finished);
        assert_eq!(frame.position, Point3::new(2.0, 2.0, 2.0));
        assert_eq!(frame.scale, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn descent_is_monotonic() {
        let mut animation = fall();
        let mut last_y = f32::INFINITY;
        for _ in 0..10 {
            let frame = animation.advance(Duration::from_millis(60));
            assert!(frame.position.y <= last_y);
            last_y = frame.position.y;
        }
        assert_relative_eq!(last_y, 2.0);
    }
}
