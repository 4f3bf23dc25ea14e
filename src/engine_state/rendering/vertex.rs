//! Vertex and instance data structures for mesh rendering.
//!
//! Every renderable shape shares one vertex format; per-object placement,
//! tint, and texturing travel in an instance buffer so each mesh is uploaded
//! once and drawn many times.

use cgmath::{Matrix4, Vector4};

/// A vertex of a unit mesh.
///
/// Positions are centered on the origin and span one world unit; instances
/// scale them up to cell size.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in mesh-local space
    pub position: [f32; 3],
    /// Outward unit normal
    pub normal: [f32; 3],
    /// UV texture coordinates (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Creates a new vertex.
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coords,
        }
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: normal (vec3<f32>)
    /// - `location = 2`: tex_coords (vec2<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Per-instance data: where a mesh goes and how it is colored.
///
/// The tint multiplies the sampled texel; opaque white leaves the texture as
/// is, and solid-colored shapes pair a tint with the plain white texture
/// layer.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    /// Model matrix, column major
    pub model: [[f32; 4]; 4],
    /// RGBA tint multiplied into the sampled texel
    pub tint: [f32; 4],
    /// Layer of the surface texture array to sample
    pub texture_index: u32,
    /// Pads the struct to a 16-byte multiple
    pub _padding: [u32; 3],
}

impl InstanceRaw {
    /// Builds instance data from a model matrix, tint, and texture layer.
    pub fn new(model: Matrix4<f32>, tint: Vector4<f32>, texture_index: u32) -> Self {
        Self {
            model: model.into(),
            tint: tint.into(),
            texture_index,
            _padding: [0; 3],
        }
    }

    /// Returns the instance buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 5..=8`: model matrix columns (vec4<f32> each)
    /// - `location = 9`: tint (vec4<f32>)
    /// - `location = 10`: texture_index (u32)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 20]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Uint32,
                },
            ],
        }
    }
}
