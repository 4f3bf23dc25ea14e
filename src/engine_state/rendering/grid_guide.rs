//! Grid guide renderer.
//!
//! Draws the cell boundary lines floating just above the ground so the
//! player can see where a placement will snap. The line list is generated
//! once from the grid configuration; visibility is decided per frame.

use wgpu::{Device, RenderPass, RenderPipeline, TextureFormat};

use crate::{
    core::StSystem,
    engine_state::{
        buffer_state::BufferState,
        grid::GridConfig,
        rendering::bind_group_state::{
            BindGroupState, CAMERA_BIND_GROUP, CAMERA_BIND_GROUP_LAYOUT,
        },
        rendering::vertex::Vertex,
    },
};

use super::meshing::grid_line_vertices;

/// Name of the grid guide vertex buffer
const GRID_LINE_BUFFER_NAME: &str = "grid_line_buffer";

/// Renders the grid guide line list.
pub struct GridGuideRenderer {
    /// The WebGPU render pipeline for line rendering
    render_pipeline: RenderPipeline,
    /// Shared state for buffer management
    buffer_state: StSystem<BufferState>,
    /// Shared state for bind group management
    bind_group_state: StSystem<BindGroupState>,
    /// Number of line vertices in the buffer
    vertex_count: u32,
}

impl GridGuideRenderer {
    /// Creates the line pipeline and uploads the grid line vertices.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `buffer_state` - Shared state for buffer management
    /// * `shader_string` - The WGSL shader source code
    /// * `texture_format` - The texture format to use for rendering
    /// * `bind_group_state` - State for managing bind groups
    /// * `depth_stencil` - Optional depth stencil state
    /// * `grid` - Grid configuration the guide is generated from
    pub fn new(
        device: StSystem<Device>,
        buffer_state: StSystem<BufferState>,
        shader_string: &str,
        texture_format: TextureFormat,
        bind_group_state: StSystem<BindGroupState>,
        depth_stencil: Option<wgpu::DepthStencilState>,
        grid: &GridConfig,
    ) -> Self {
        let device_ref = device.get();

        let pipeline_layout = device_ref.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Grid Guide Pipeline Layout"),
            bind_group_layouts: &[bind_group_state
                .get()
                .get_bind_group_layout(CAMERA_BIND_GROUP_LAYOUT)],
            push_constant_ranges: &[],
        });

        let shader = device_ref.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Grid Guide Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_string.into()),
        });

        let render_pipeline = device_ref.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Grid Guide Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_line"),
                compilation_options: Default::default(),
                buffers: &[Vertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_line"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: texture_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
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

        let vertices = grid_line_vertices(grid);
        let vertex_count = vertices.len() as u32;
        buffer_state.get_mut().create_buffer_init(
            GRID_LINE_BUFFER_NAME,
            wgpu::util::BufferInitDescriptor {
                label: Some(GRID_LINE_BUFFER_NAME),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        Self {
            render_pipeline,
            buffer_state,
            bind_group_state,
            vertex_count,
        }
    }

    /// Draws the grid guide.
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
        render_pass.set_vertex_buffer(
            0,
            self.buffer_state
                .get()
                .get_buffer(GRID_LINE_BUFFER_NAME)
                .slice(..),
        );
        render_pass.draw(0..self.vertex_count, 0..1);
    }
}
