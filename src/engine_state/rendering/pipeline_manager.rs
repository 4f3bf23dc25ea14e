//! Manages the WebGPU render pipelines and the frame render pass.
//!
//! The pipeline manager owns the shared rendering resources (bind groups,
//! depth texture) and the two specialized renderers: the instanced shape
//! renderer and the grid guide line renderer. Each frame it opens one render
//! pass, clears to the sky color, and delegates drawing to them.

use log::error;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration, TextureFormat};

use crate::{
    core::StSystem,
    engine_state::{buffer_state::BufferState, grid::GridConfig},
};

use super::{
    bind_group_state::BindGroupState,
    grid_guide::GridGuideRenderer,
    meshing::{FrameBatches, ShapeRenderer},
    texture,
};

/// Sky color the frame clears to, linearized from the scene's sRGB sky blue.
const SKY_CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.004,
    g: 0.376,
    b: 0.815,
    a: 1.0,
};

/// Coordinates the rendering process and its shared resources.
pub struct PipelineManager {
    /// Manages all bind groups used in the pipelines
    pub bind_group_state: StSystem<BindGroupState>,
    /// Shared state for buffer management
    pub buffer_state: StSystem<BufferState>,
    /// Depth texture used for depth testing
    pub depth_texture: texture::Texture,
    /// Instanced renderer for every shape in the scene
    pub shape_renderer: ShapeRenderer,
    /// Line renderer for the grid guide
    pub grid_guide_renderer: GridGuideRenderer,
}

impl PipelineManager {
    /// Creates a new `PipelineManager` instance.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `queue` - The WebGPU queue for buffer operations
    /// * `config` - Surface configuration containing size and format
    /// * `texture_format` - The texture format to use for rendering
    /// * `buffer_state` - Shared state for buffer management
    /// * `shader_string` - The WGSL shader source code
    /// * `grid` - Grid configuration the guide lines are generated from
    pub fn new(
        device: StSystem<Device>,
        queue: StSystem<Queue>,
        config: &SurfaceConfiguration,
        texture_format: TextureFormat,
        buffer_state: StSystem<BufferState>,
        shader_string: &str,
        grid: &GridConfig,
    ) -> Self {
        let bind_group_state = StSystem::new(BindGroupState::new(
            device.clone(),
            buffer_state.clone(),
            queue.clone(),
        ));

        let depth_texture =
            texture::Texture::create_depth_texture(&device.get(), config, "DEPTH TEXTURE");

        let depth_stencil = Some(wgpu::DepthStencilState {
            format: texture::Texture::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        let shape_renderer = ShapeRenderer::new(
            device.clone(),
            buffer_state.clone(),
            shader_string,
            texture_format,
            bind_group_state.clone(),
            depth_stencil.clone(),
        );

        let grid_guide_renderer = GridGuideRenderer::new(
            device,
            buffer_state.clone(),
            shader_string,
            texture_format,
            bind_group_state.clone(),
            depth_stencil,
            grid,
        );

        Self {
            bind_group_state,
            buffer_state,
            depth_texture,
            shape_renderer,
            grid_guide_renderer,
        }
    }

    /// Renders a frame to the given surface.
    ///
    /// Uploads the frame's instance batches, opens one render pass cleared to
    /// the sky color, draws the grid guide when requested, then every shape.
    ///
    /// # Arguments
    /// * `surface` - The target surface to render to
    /// * `device` - The WebGPU device for creating GPU resources
    /// * `queue` - The WebGPU queue for command submission
    /// * `batches` - Instances to draw this frame
    /// * `grid_visible` - Whether the grid guide is drawn
    ///
    /// # Panics
    /// Panics if the surface texture cannot be acquired.
    pub fn render(
        &mut self,
        surface: &Surface,
        device: StSystem<Device>,
        queue: StSystem<Queue>,
        batches: &FrameBatches,
        grid_visible: bool,
    ) {
        let frame = match surface.get_current_texture() {
            Ok(frame) => frame,
            Err(err) => {
                error!("Error getting current frame: {:?}", err);
                panic!();
            }
        };

        self.shape_renderer.intake_batches(batches);

        let view = frame.texture.create_view(&Default::default());
        let mut encoder = device.get().create_command_encoder(&Default::default());
        {
            let depth_stencil_attachment = Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            });
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(SKY_CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment,
                timestamp_writes: None,
                ..Default::default()
            });

            if grid_visible {
                self.grid_guide_renderer.render(&mut rpass);
            }
            self.shape_renderer.render(&mut rpass);
        }

        let command_buffer = encoder.finish();
        queue.get().submit([command_buffer]);
        frame.present();
    }

    /// Handles window resize events by recreating the depth texture.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `config` - The new surface configuration containing the updated size
    pub fn resize(&mut self, device: StSystem<Device>, config: &SurfaceConfiguration) {
        self.depth_texture =
            texture::Texture::create_depth_texture(&device.get(), config, "DEPTH TEXTURE");
    }
}
