//! # Mesh Generation
//!
//! Builds the unit meshes every shape in the scene instances from: cube,
//! cylinder, sphere, tetrahedron, and a flat plane, plus the grid guide line
//! list. Meshes are generated once at startup and uploaded to vertex/index
//! buffers; instances scale them to cell size.

use std::f32::consts::TAU;

use cgmath::InnerSpace;

use super::vertex::Vertex;
use crate::engine_state::grid::GridConfig;

pub mod renderer;

pub use renderer::{FrameBatches, ShapeMesh, ShapeRenderer};

/// Sides used for the cylinder barrel.
const CYLINDER_SEGMENTS: u32 = 24;

/// Latitude bands of the sphere.
const SPHERE_RINGS: u32 = 12;

/// Longitude segments of the sphere.
const SPHERE_SEGMENTS: u32 = 24;

/// Height at which the grid guide floats above the ground.
const GRID_LINE_HEIGHT: f32 = 0.02;

/// A triangle mesh ready for upload.
#[derive(Debug, Default)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Triangle list indices into `vertices`
    pub indices: Vec<u32>,
}

impl Mesh {
    /// A cube spanning one unit, centered on the origin.
    ///
    /// Each face carries its own four vertices so normals and texture
    /// coordinates stay per-face.
    pub fn unit_cube() -> Self {
        let mut mesh = Mesh::default();
        // (normal, tangent, bitangent) per face
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];

        for (normal, tangent, bitangent) in faces {
            let base = mesh.vertices.len() as u32;
            for (u, v) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
                let position = [
                    0.5 * normal[0] + (u - 0.5) * tangent[0] + (v - 0.5) * bitangent[0],
                    0.5 * normal[1] + (u - 0.5) * tangent[1] + (v - 0.5) * bitangent[1],
                    0.5 * normal[2] + (u - 0.5) * tangent[2] + (v - 0.5) * bitangent[2],
                ];
                mesh.vertices
                    .push(Vertex::new(position, normal, [u, 1.0 - v]));
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    /// A cylinder one unit tall with a one unit diameter, centered on the
    /// origin with its axis along Y.
    pub fn unit_cylinder() -> Self {
        let mut mesh = Mesh::default();
        let radius = 0.5;

        // Barrel: a ring of quads with outward-facing normals.
        for segment in 0..=CYLINDER_SEGMENTS {
            let angle = segment as f32 / CYLINDER_SEGMENTS as f32 * TAU;
            let (sin, cos) = angle.sin_cos();
            let normal = [cos, 0.0, sin];
            let u = segment as f32 / CYLINDER_SEGMENTS as f32;
            mesh.vertices
                .push(Vertex::new([cos * radius, -0.5, sin * radius], normal, [u, 1.0]));
            mesh.vertices
                .push(Vertex::new([cos * radius, 0.5, sin * radius], normal, [u, 0.0]));
        }
        for segment in 0..CYLINDER_SEGMENTS {
            let base = segment * 2;
            mesh.indices.extend_from_slice(&[
                base,
                base + 1,
                base + 2,
                base + 2,
                base + 1,
                base + 3,
            ]);
        }

        // Caps: triangle fans around a center vertex.
        for (y, normal, winding) in [(0.5, [0.0, 1.0, 0.0], false), (-0.5, [0.0, -1.0, 0.0], true)]
        {
            let center = mesh.vertices.len() as u32;
            mesh.vertices.push(Vertex::new([0.0, y, 0.0], normal, [0.5, 0.5]));
            for segment in 0..=CYLINDER_SEGMENTS {
                let angle = segment as f32 / CYLINDER_SEGMENTS as f32 * TAU;
                let (sin, cos) = angle.sin_cos();
                mesh.vertices.push(Vertex::new(
                    [cos * radius, y, sin * radius],
                    normal,
                    [0.5 + cos * 0.5, 0.5 + sin * 0.5],
                ));
            }
            for segment in 0..CYLINDER_SEGMENTS {
                let first = center + 1 + segment;
                let second = center + 2 + segment;
                if winding {
                    mesh.indices.extend_from_slice(&[center, first, second]);
                } else {
                    mesh.indices.extend_from_slice(&[center, second, first]);
                }
            }
        }
        mesh
    }

    /// A UV sphere with a one unit diameter, centered on the origin.
    pub fn unit_sphere() -> Self {
        let mut mesh = Mesh::default();
        let radius = 0.5;

        for ring in 0..=SPHERE_RINGS {
            let v = ring as f32 / SPHERE_RINGS as f32;
            let polar = v * std::f32::consts::PI;
            let (polar_sin, polar_cos) = polar.sin_cos();
            for segment in 0..=SPHERE_SEGMENTS {
                let u = segment as f32 / SPHERE_SEGMENTS as f32;
                let azimuth = u * TAU;
                let (azimuth_sin, azimuth_cos) = azimuth.sin_cos();
                let normal = [polar_sin * azimuth_cos, polar_cos, polar_sin * azimuth_sin];
                let position = [normal[0] * radius, normal[1] * radius, normal[2] * radius];
                mesh.vertices.push(Vertex::new(position, normal, [u, v]));
            }
        }

        let stride = SPHERE_SEGMENTS + 1;
        for ring in 0..SPHERE_RINGS {
            for segment in 0..SPHERE_SEGMENTS {
                let a = ring * stride + segment;
                let b = a + stride;
                mesh.indices
                    .extend_from_slice(&[a, a + 1, b, b, a + 1, b + 1]);
            }
        }
        mesh
    }

    /// A regular tetrahedron inscribed in a half-unit-radius sphere, centered
    /// on the origin. Flat shaded, so each face has its own vertices.
    pub fn unit_tetrahedron() -> Self {
        let mut mesh = Mesh::default();
        let scale = 0.5 / 3.0_f32.sqrt();
        let corners = [
            cgmath::Vector3::new(1.0, 1.0, 1.0) * scale,
            cgmath::Vector3::new(1.0, -1.0, -1.0) * scale,
            cgmath::Vector3::new(-1.0, 1.0, -1.0) * scale,
            cgmath::Vector3::new(-1.0, -1.0, 1.0) * scale,
        ];
        let faces = [[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]];

        for face in faces {
            let a = corners[face[0]];
            let b = corners[face[1]];
            let c = corners[face[2]];
            let normal: [f32; 3] = (b - a).cross(c - a).normalize().into();
            let base = mesh.vertices.len() as u32;
            mesh.vertices.push(Vertex::new(a.into(), normal, [0.0, 1.0]));
            mesh.vertices.push(Vertex::new(b.into(), normal, [1.0, 1.0]));
            mesh.vertices.push(Vertex::new(c.into(), normal, [0.5, 0.0]));
            mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
        }
        mesh
    }

    /// A unit square in the XZ plane facing +Y, centered on the origin.
    pub fn unit_plane() -> Self {
        let normal = [0.0, 1.0, 0.0];
        Mesh {
            vertices: vec![
                Vertex::new([-0.5, 0.0, -0.5], normal, [0.0, 0.0]),
                Vertex::new([0.5, 0.0, -0.5], normal, [1.0, 0.0]),
                Vertex::new([0.5, 0.0, 0.5], normal, [1.0, 1.0]),
                Vertex::new([-0.5, 0.0, 0.5], normal, [0.0, 1.0]),
            ],
            indices: vec![0, 2, 1, 0, 3, 2],
        }
    }
}

/// Builds the grid guide as a line list floating just above the ground.
///
/// One line per cell boundary in each direction, spanning the full grid
/// extent.
pub fn grid_line_vertices(grid: &GridConfig) -> Vec<Vertex> {
    let half_extent = grid.extent() / 2.0;
    let up = [0.0, 1.0, 0.0];
    let mut vertices = Vec::with_capacity((grid.grid_dimensions as usize + 1) * 4);
    for line in 0..=grid.grid_dimensions {
        let offset = -half_extent + line as f32 * grid.cell_size;
        vertices.push(Vertex::new([offset, GRID_LINE_HEIGHT, -half_extent], up, [0.0, 0.0]));
        vertices.push(Vertex::new([offset, GRID_LINE_HEIGHT, half_extent], up, [0.0, 0.0]));
        vertices.push(Vertex::new([-half_extent, GRID_LINE_HEIGHT, offset], up, [0.0, 0.0]));
        vertices.push(Vertex::new([half_extent, GRID_LINE_HEIGHT, offset], up, [0.0, 0.0]));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_within_unit_bounds(mesh: &Mesh) {
        for vertex in &mesh.vertices {
            for component in vertex.position {
                assert!(component.abs() <= 0.5 + 1.0e-5);
            }
        }
    }

    #[test]
    fn cube_has_one_quad_per_face() {
        let cube = Mesh::unit_cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert_within_unit_bounds(&cube);
    }

    #[test]
    fn sphere_vertices_sit_on_the_half_unit_radius() {
        let sphere = Mesh::unit_sphere();
        for vertex in &sphere.vertices {
            let [x, y, z] = vertex.position;
            assert_relative_eq!((x * x + y * y + z * z).sqrt(), 0.5, epsilon = 1.0e-5);
        }
    }

    #[test]
    fn cylinder_and_tetrahedron_fit_the_unit_cell() {
        assert_within_unit_bounds(&Mesh::unit_cylinder());
        assert_within_unit_bounds(&Mesh::unit_tetrahedron());
    }

    #[test]
    fn closed_meshes_wind_counter_clockwise_outward() {
        // Every triangle's geometric normal must leave the mesh, or back-face
        // culling would eat it.
        for mesh in [
            Mesh::unit_cube(),
            Mesh::unit_cylinder(),
            Mesh::unit_sphere(),
            Mesh::unit_tetrahedron(),
        ] {
            for triangle in mesh.indices.chunks_exact(3) {
                let position = |index: u32| {
                    let [x, y, z] = mesh.vertices[index as usize].position;
                    cgmath::Vector3::new(x, y, z)
                };
                let a = position(triangle[0]);
                let b = position(triangle[1]);
                let c = position(triangle[2]);
                let normal = (b - a).cross(c - a);
                if normal.magnitude2() <= 1.0e-12 {
                    continue;
                }
                let centroid = (a + b + c) / 3.0;
                assert!(normal.dot(centroid) > -1.0e-6);
            }
        }
    }

    #[test]
    fn index_buffers_stay_in_range() {
        for mesh in [
            Mesh::unit_cube(),
            Mesh::unit_cylinder(),
            Mesh::unit_sphere(),
            Mesh::unit_tetrahedron(),
            Mesh::unit_plane(),
        ] {
            assert_eq!(mesh.indices.len() % 3, 0);
            let count = mesh.vertices.len() as u32;
            assert!(mesh.indices.iter().all(|index| *index < count));
        }
    }

    #[test]
    fn grid_guide_spans_the_build_area() {
        let grid = GridConfig::default();
        let vertices = grid_line_vertices(&grid);
        // 33 boundaries, two lines each, two vertices per line.
        assert_eq!(vertices.len(), 33 * 4);
        assert!(vertices
            .iter()
            .all(|vertex| vertex.position[0].abs() <= 64.0 && vertex.position[2].abs() <= 64.0));
    }
}
