//! Instanced shape renderer.
//!
//! Every shape in the scene is an instance of one of five unit meshes. The
//! meshes are uploaded once at startup; each frame the engine hands this
//! renderer a batch of instances per shape, which it uploads and draws in two
//! phases, opaque instances first and translucent ones after.

use wgpu::{Device, RenderPass, RenderPipeline, TextureFormat};

use crate::{
    core::StSystem,
    engine_state::{
        buffer_state::BufferState,
        rendering::bind_group_state::{
            BindGroupState, CAMERA_BIND_GROUP, CAMERA_BIND_GROUP_LAYOUT, TEXTURE_BIND_GROUP,
            TEXTURE_BIND_GROUP_LAYOUT,
        },
        rendering::vertex::{InstanceRaw, Vertex},
    },
};

use super::Mesh;

/// The unit meshes shapes are instanced from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShapeMesh {
    /// Unit cube
    Cube,
    /// Unit cylinder
    Cylinder,
    /// Unit sphere
    Sphere,
    /// Unit tetrahedron
    Tetrahedron,
    /// Unit plane
    Plane,
}

/// Number of distinct shape meshes.
pub const SHAPE_COUNT: usize = 5;

/// Instance capacity of each shape's instance buffer.
const MAX_INSTANCES_PER_SHAPE: usize = 4096;

impl ShapeMesh {
    /// Every shape, in buffer slot order.
    pub fn all() -> [ShapeMesh; SHAPE_COUNT] {
        [
            ShapeMesh::Cube,
            ShapeMesh::Cylinder,
            ShapeMesh::Sphere,
            ShapeMesh::Tetrahedron,
            ShapeMesh::Plane,
        ]
    }

    fn slot(self) -> usize {
        match self {
            ShapeMesh::Cube => 0,
            ShapeMesh::Cylinder => 1,
            ShapeMesh::Sphere => 2,
            ShapeMesh::Tetrahedron => 3,
            ShapeMesh::Plane => 4,
        }
    }

    fn build(self) -> Mesh {
        match self {
            ShapeMesh::Cube => Mesh::unit_cube(),
            ShapeMesh::Cylinder => Mesh::unit_cylinder(),
            ShapeMesh::Sphere => Mesh::unit_sphere(),
            ShapeMesh::Tetrahedron => Mesh::unit_tetrahedron(),
            ShapeMesh::Plane => Mesh::unit_plane(),
        }
    }

    fn vertex_buffer_name(self) -> &'static str {
        match self {
            ShapeMesh::Cube => "cube_vertex_buffer",
            ShapeMesh::Cylinder => "cylinder_vertex_buffer",
            ShapeMesh::Sphere => "sphere_vertex_buffer",
            ShapeMesh::Tetrahedron => "tetrahedron_vertex_buffer",
            ShapeMesh::Plane => "plane_vertex_buffer",
        }
    }

    fn index_buffer_name(self) -> &'static str {
        match self {
            ShapeMesh::Cube => "cube_index_buffer",
            ShapeMesh::Cylinder => "cylinder_index_buffer",
            ShapeMesh::Sphere => "sphere_index_buffer",
            ShapeMesh::Tetrahedron => "tetrahedron_index_buffer",
            ShapeMesh::Plane => "plane_index_buffer",
        }
    }

    fn instance_buffer_name(self) -> &'static str {
        match self {
            ShapeMesh::Cube => "cube_instance_buffer",
            ShapeMesh::Cylinder => "cylinder_instance_buffer",
            ShapeMesh::Sphere => "sphere_instance_buffer",
            ShapeMesh::Tetrahedron => "tetrahedron_instance_buffer",
            ShapeMesh::Plane => "plane_instance_buffer",
        }
    }
}

/// Instances of one shape collected for a frame, split by blend phase.
#[derive(Debug, Default)]
struct ShapeBatch {
    opaque: Vec<InstanceRaw>,
    transparent: Vec<InstanceRaw>,
}

/// Everything to draw in one frame, grouped by shape.
#[derive(Debug, Default)]
pub struct FrameBatches {
    shapes: [ShapeBatch; SHAPE_COUNT],
}

impl FrameBatches {
    /// Creates an empty batch set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an opaque instance of `shape`.
    pub fn push_opaque(&mut self, shape: ShapeMesh, instance: InstanceRaw) {
        self.shapes[shape.slot()].opaque.push(instance);
    }

    /// Queues a translucent instance of `shape`, drawn after all opaque ones.
    pub fn push_transparent(&mut self, shape: ShapeMesh, instance: InstanceRaw) {
        self.shapes[shape.slot()].transparent.push(instance);
    }
}

/// Renders all shapes through one instanced pipeline.
pub struct ShapeRenderer {
    /// The WebGPU render pipeline for shape rendering
    render_pipeline: RenderPipeline,
    /// Shared state for buffer management
    buffer_state: StSystem<BufferState>,
    /// Shared state for bind group management
    bind_group_state: StSystem<BindGroupState>,
    /// Index count of each shape's mesh, by buffer slot
    index_counts: [u32; SHAPE_COUNT],
    /// Uploaded (opaque, total) instance counts, by buffer slot
    instance_counts: [(u32, u32); SHAPE_COUNT],
}

impl ShapeRenderer {
    /// Creates the shape pipeline and uploads every unit mesh.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `buffer_state` - Shared state for buffer management
    /// * `shader_string` - The WGSL shader source code
    /// * `texture_format` - The texture format to use for rendering
    /// * `bind_group_state` - State for managing bind groups
    /// * `depth_stencil` - Optional depth stencil state
    pub fn new(
        device: StSystem<Device>,
        buffer_state: StSystem<BufferState>,
        shader_string: &str,
        texture_format: TextureFormat,
        bind_group_state: StSystem<BindGroupState>,
        depth_stencil: Option<wgpu::DepthStencilState>,
    ) -> Self {
        let device_ref = device.get();

        let pipeline_layout = device_ref.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shape Render Pipeline Layout"),
            bind_group_layouts: &[
                bind_group_state
                    .get()
                    .get_bind_group_layout(CAMERA_BIND_GROUP_LAYOUT),
                bind_group_state
                    .get()
                    .get_bind_group_layout(TEXTURE_BIND_GROUP_LAYOUT),
            ],
            push_constant_ranges: &[],
        });

        let shader = device_ref.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shape Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_string.into()),
        });

        let render_pipeline = device_ref.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shape Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::desc(), InstanceRaw::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: texture_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        drop(device_ref);

        let mut index_counts = [0; SHAPE_COUNT];
        {
            let mut buffer_state_write = buffer_state.get_mut();
            for shape in ShapeMesh::all() {
                let mesh = shape.build();
                index_counts[shape.slot()] = mesh.indices.len() as u32;
                buffer_state_write.create_buffer_init(
                    shape.vertex_buffer_name(),
                    wgpu::util::BufferInitDescriptor {
                        label: Some(shape.vertex_buffer_name()),
                        contents: bytemuck::cast_slice(&mesh.vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    },
                );
                buffer_state_write.create_buffer_init(
                    shape.index_buffer_name(),
                    wgpu::util::BufferInitDescriptor {
                        label: Some(shape.index_buffer_name()),
                        contents: bytemuck::cast_slice(&mesh.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    },
                );
                buffer_state_write.create_buffer(
                    shape.instance_buffer_name(),
                    wgpu::BufferDescriptor {
                        label: Some(shape.instance_buffer_name()),
                        size: (MAX_INSTANCES_PER_SHAPE * std::mem::size_of::<InstanceRaw>())
                            as wgpu::BufferAddress,
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                        mapped_at_creation: false,
                    },
                );
            }
        }

        Self {
            render_pipeline,
            buffer_state,
            bind_group_state,
            index_counts,
            instance_counts: [(0, 0); SHAPE_COUNT],
        }
    }

    /// Uploads this frame's instances.
    ///
    /// Instances beyond a shape's buffer capacity are dropped with a warning
    /// rather than growing the buffer mid-frame.
    pub fn intake_batches(&mut self, batches: &FrameBatches) {
        for shape in ShapeMesh::all() {
            let batch = &batches.shapes[shape.slot()];
            let mut combined: Vec<InstanceRaw> =
                Vec::with_capacity(batch.opaque.len() + batch.transparent.len());
            combined.extend_from_slice(&batch.opaque);
            combined.extend_from_slice(&batch.transparent);

            if combined.len() > MAX_INSTANCES_PER_SHAPE {
                log::warn!(
                    "Dropping {} instances over the {:?} buffer capacity",
                    combined.len() - MAX_INSTANCES_PER_SHAPE,
                    shape
                );
                combined.truncate(MAX_INSTANCES_PER_SHAPE);
            }

            let opaque_count = batch.opaque.len().min(combined.len()) as u32;
            self.instance_counts[shape.slot()] = (opaque_count, combined.len() as u32);

            if !combined.is_empty() {
                self.buffer_state.get().write_buffer(
                    shape.instance_buffer_name(),
                    0,
                    bytemuck::cast_slice(&combined),
                );
            }
        }
    }

    /// Draws the uploaded instances, opaque phase then translucent phase.
    ///
    /// # Arguments
    /// * `render_pass` - The render pass to use for rendering
    pub fn render<'a, 'b>(&'a self, render_pass: &mut RenderPass<'b>)
    where
        'a: 'b,
    {
        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(
            0,
            self.bind_group_state.get().get_bind_group(CAMERA_BIND_GROUP),
            &[],
        );
        render_pass.set_bind_group(
            1,
            self.bind_group_state
                .get()
                .get_bind_group(TEXTURE_BIND_GROUP),
            &[],
        );

        for transparent_phase in [false, true] {
            for shape in ShapeMesh::all() {
                let (opaque_count, total_count) = self.instance_counts[shape.slot()];
                let range = if transparent_phase {
                    opaque_count..total_count
                } else {
                    0..opaque_count
                };
                if range.is_empty() {
                    continue;
                }

                render_pass.set_vertex_buffer(
                    0,
                    self.buffer_state
                        .get()
                        .get_buffer(shape.vertex_buffer_name())
                        .slice(..),
                );
                render_pass.set_vertex_buffer(
                    1,
                    self.buffer_state
                        .get()
                        .get_buffer(shape.instance_buffer_name())
                        .slice(..),
                );
                render_pass.set_index_buffer(
                    self.buffer_state
                        .get()
                        .get_buffer(shape.index_buffer_name())
                        .slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                render_pass.draw_indexed(0..self.index_counts[shape.slot()], 0, range);
            }
        }
    }
}
