//! # Camera State Management
//!
//! The editor camera system: four compass-aligned viewpoints around the build
//! area, an elevated top-down variant of each, and the scenic orbit that
//! circles the scene while building is paused. All viewpoints look at the
//! world origin; the active one is packed into a uniform buffer every time it
//! changes.

use cgmath::{Matrix4, Point3};
use web_time::Duration;

use crate::core::StSystem;

use super::buffer_state::BufferState;

pub mod camera;

/// Name of the GPU buffer used for camera uniform data
pub const CAMERA_BUFFER_NAME: &str = "camera_buffer";

/// Horizontal distance of the compass viewpoints from the origin.
const COMPASS_RADIUS: f32 = 150.0;

/// Eye height of the standard compass viewpoints.
const COMPASS_HEIGHT: f32 = 90.0;

/// Eye height of the elevated top-down viewpoints.
const TOP_DOWN_HEIGHT: f32 = 200.0;

/// Horizontal distance of the scenic orbit from the origin.
const SCENIC_RADIUS: f32 = 300.0;

/// Eye height of the scenic orbit.
const SCENIC_HEIGHT: f32 = 150.0;

/// Orbit speed in radians per millisecond of elapsed time.
const SCENIC_ANGULAR_SPEED: f32 = 0.0005;

/// The four compass-aligned viewpoints around the build area.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompassDirection {
    /// Viewpoint on the +X side
    North,
    /// Viewpoint on the +Z side
    East,
    /// Viewpoint on the -X side
    South,
    /// Viewpoint on the -Z side
    West,
}

impl CompassDirection {
    /// Eye position of this viewpoint at the given height.
    fn eye(self, height: f32) -> Point3<f32> {
        match self {
            CompassDirection::North => Point3::new(COMPASS_RADIUS, height, 0.0),
            CompassDirection::East => Point3::new(0.0, height, COMPASS_RADIUS),
            CompassDirection::South => Point3::new(-COMPASS_RADIUS, height, 0.0),
            CompassDirection::West => Point3::new(0.0, height, -COMPASS_RADIUS),
        }
    }
}

/// Eye position of the scenic orbit for the given elapsed time.
fn scenic_eye(elapsed: Duration) -> Point3<f32> {
    let angle = elapsed.as_millis() as f32 * SCENIC_ANGULAR_SPEED;
    Point3::new(
        angle.cos() * SCENIC_RADIUS,
        SCENIC_HEIGHT,
        angle.sin() * SCENIC_RADIUS,
    )
}

/// Manages the editor camera, its viewpoint selection, and its GPU buffer.
pub struct CameraState {
    /// The current camera position and target
    pub camera: camera::Camera,
    /// GPU-optimized camera data for shaders
    camera_uniform: camera::CameraUniform,
    /// The selected compass viewpoint
    compass: CompassDirection,
    /// Whether the elevated top-down variant is active
    top_down: bool,
    /// Inverse view projection cached for cursor unprojection
    view_proj_inverse: Matrix4<f32>,
    /// Manages GPU buffer state for camera data
    buffer_state: StSystem<BufferState>,
}

impl CameraState {
    /// Creates the camera state at the north viewpoint and uploads the
    /// initial uniform.
    ///
    /// # Arguments
    /// * `buffer_state` - The buffer state system for GPU resource management
    /// * `projection` - The initial camera projection settings
    pub fn new(buffer_state: StSystem<BufferState>, projection: &camera::Projection) -> Self {
        let compass = CompassDirection::North;
        let camera = camera::Camera::new(compass.eye(COMPASS_HEIGHT), Point3::new(0.0, 0.0, 0.0));

        let mut camera_uniform = camera::CameraUniform::new();
        let view_proj_inverse = camera_uniform.update_view_proj_and_pos(&camera, projection);

        buffer_state.get_mut().create_buffer_init(
            CAMERA_BUFFER_NAME,
            wgpu::util::BufferInitDescriptor {
                label: Some(CAMERA_BUFFER_NAME),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        CameraState {
            camera,
            camera_uniform,
            compass,
            top_down: false,
            view_proj_inverse,
            buffer_state: buffer_state.clone(),
        }
    }

    /// Selects a compass viewpoint, keeping the current elevation variant.
    pub fn set_compass(&mut self, direction: CompassDirection) {
        self.compass = direction;
    }

    /// Switches between the standard and elevated top-down viewpoints.
    pub fn toggle_top_down(&mut self) {
        self.top_down = !self.top_down;
    }

    /// Returns the camera to the north standard viewpoint.
    pub fn reset(&mut self) {
        self.compass = CompassDirection::North;
        self.top_down = false;
    }

    /// Inverse view projection of the last uploaded camera pose.
    pub fn view_proj_inverse(&self) -> Matrix4<f32> {
        self.view_proj_inverse
    }

    /// Recomputes the camera pose and uploads the uniform.
    ///
    /// With `scenic_elapsed` set, the camera orbits the scene; otherwise it
    /// sits at the selected compass viewpoint. Called every frame, since the
    /// orbit moves continuously and viewpoint switches are cheap to re-upload.
    ///
    /// # Arguments
    /// * `scenic_elapsed` - Elapsed time driving the orbit, when scenic view is active
    /// * `projection` - Current camera projection settings
    pub fn update(&mut self, scenic_elapsed: Option<Duration>, projection: &camera::Projection) {
        let eye = match scenic_elapsed {
            Some(elapsed) => scenic_eye(elapsed),
            None => {
                let height = if self.top_down {
                    TOP_DOWN_HEIGHT
                } else {
                    COMPASS_HEIGHT
                };
                self.compass.eye(height)
            }
        };

        self.camera = camera::Camera::new(eye, Point3::new(0.0, 0.0, 0.0));
        self.view_proj_inverse = self
            .camera_uniform
            .update_view_proj_and_pos(&self.camera, projection);
        self.buffer_state.get_mut().write_buffer(
            CAMERA_BUFFER_NAME,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn compass_viewpoints_ring_the_origin() {
        assert_eq!(
            CompassDirection::North.eye(90.0),
            Point3::new(150.0, 90.0, 0.0)
        );
        assert_eq!(
            CompassDirection::East.eye(90.0),
            Point3::new(0.0, 90.0, 150.0)
        );
        assert_eq!(
            CompassDirection::South.eye(90.0),
            Point3::new(-150.0, 90.0, 0.0)
        );
        assert_eq!(
            CompassDirection::West.eye(90.0),
            Point3::new(0.0, 90.0, -150.0)
        );
    }

    #[test]
    fn scenic_orbit_holds_its_radius_and_height() {
        for millis in [0_u64, 700, 3_141, 60_000] {
            let eye = scenic_eye(Duration::from_millis(millis));
            let radius = (eye.x * eye.x + eye.z * eye.z).sqrt();
            assert_relative_eq!(radius, 300.0, epsilon = 1.0e-2);
            assert_relative_eq!(eye.y, 150.0);
        }
    }

    #[test]
    fn scenic_orbit_starts_on_the_positive_x_axis() {
        let eye = scenic_eye(Duration::ZERO);
        assert_relative_eq!(eye.x, 300.0);
        assert_relative_eq!(eye.z, 0.0);
    }
}
