//! # Camera Implementation
//!
//! The core camera types: a look-at camera, the perspective projection, and
//! the packed uniform the shaders consume. The editor camera always looks at
//! the center of the build area, so unlike a free-look camera it carries no
//! yaw or pitch, only an eye position and a target.

use cgmath::*;

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// WGPU clip space runs Z from 0 to 1 where OpenGL runs -1 to 1; this matrix
/// rescales and shifts Z accordingly.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,  // Scale Z from [-1,1] to [-0.5,0.5]
    0.0, 0.0, 0.5, 1.0,  // Translate Z from [-0.5,0.5] to [0,1]
);

/// A camera defined by where it sits and what it looks at.
#[derive(Copy, Clone, Debug)]
pub struct Camera {
    /// The camera's position in world space
    pub eye: Point3<f32>,
    /// The point the camera looks at
    pub target: Point3<f32>,
}

impl Camera {
    /// Creates a camera at `eye` looking at `target`.
    pub fn new<V: Into<Point3<f32>>, T: Into<Point3<f32>>>(eye: V, target: T) -> Self {
        Self {
            eye: eye.into(),
            target: target.into(),
        }
    }

    /// Calculates the view matrix for this camera.
    ///
    /// # Returns
    /// A 4x4 view matrix that transforms world coordinates to view space
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.target, Vector3::unit_y())
    }
}

/// Represents a camera's projection matrix and related parameters.
#[derive(Debug)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view in radians
    fovy: Rad<f32>,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fovy` - Vertical field of view (can be any type convertible to `Rad<f32>`)
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        let aspect = width as f32 / height as f32;
        let fovy: Rad<f32> = fovy.into();
        Self {
            aspect,
            fovy,
            znear,
            zfar,
        }
    }

    /// Updates the projection's aspect ratio for viewport resizing.
    ///
    /// # Arguments
    /// * `width` - New viewport width in pixels
    /// * `height` - New viewport height in pixels
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    /// Calculates the projection matrix.
    ///
    /// Combines the perspective projection with the OpenGL to WGPU coordinate
    /// system transform.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// GPU-friendly representation of camera data for shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    // cgmath matrices are not Pod, so they are stored as 4x4 f32 arrays
    view_proj: [[f32; 4]; 4],
    view_proj_inverse: [[f32; 4]; 4],
    position: [f32; 4],
}

impl CameraUniform {
    /// Creates a new camera uniform with identity matrices and zero position.
    pub fn new() -> Self {
        Self {
            view_proj: cgmath::Matrix4::identity().into(),
            view_proj_inverse: cgmath::Matrix4::identity().into(),
            position: [0.0, 0.0, 0.0, 0.0],
        }
    }

    /// Updates the matrices and position from the current camera state.
    ///
    /// # Arguments
    /// * `camera` - The camera to take the view matrix and position from
    /// * `projection` - The projection to use
    ///
    /// # Returns
    /// The inverse view projection, for unprojecting cursor positions.
    pub fn update_view_proj_and_pos(
        &mut self,
        camera: &Camera,
        projection: &Projection,
    ) -> Matrix4<f32> {
        let view_proj = projection.calc_matrix() * camera.calc_matrix();
        // A perspective view projection is always invertible.
        let view_proj_inverse = view_proj.invert().unwrap_or_else(Matrix4::identity);
        self.view_proj = view_proj.into();
        self.view_proj_inverse = view_proj_inverse.into();
        let eye: [f32; 3] = camera.eye.into();
        self.position = [eye[0], eye[1], eye[2], 0.0];
        view_proj_inverse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unprojection_round_trips_through_the_inverse() {
        let camera = Camera::new(Point3::new(150.0, 90.0, 0.0), Point3::new(0.0, 0.0, 0.0));
        let projection = Projection::new(1280, 720, Deg(45.0), 1.0, 1000.0);
        let mut uniform = CameraUniform::new();
        let inverse = uniform.update_view_proj_and_pos(&camera, &projection);

        let view_proj = projection.calc_matrix() * camera.calc_matrix();
        let round_trip = view_proj * inverse;
        for column in 0..4 {
            for row in 0..4 {
                let expected = if column == row { 1.0 } else { 0.0 };
                assert_relative_eq!(round_trip[column][row], expected, epsilon = 1.0e-4);
            }
        }
    }
}
