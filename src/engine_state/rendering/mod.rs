//! Rendering system for the block editor.
//!
//! Owns the WebGPU surface and pipelines and translates the world into
//! per-frame instance batches: every placed block, the fixtures, the scenery,
//! and the hover preview become instances of a handful of unit meshes.

use cgmath::{EuclideanSpace, Matrix4, Point3, Vector3, Vector4};
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};

use crate::core::StSystem;

use super::{
    buffer_state::BufferState,
    camera_state::camera,
    grid::GridConfig,
    world::{
        object::{GeometryKind, ObjectKind, SurfaceKind},
        World,
    },
};

mod bind_group_state;
mod grid_guide;
pub mod meshing;
mod pipeline_manager;
pub mod surface_textures;
mod texture;
mod vertex;

use meshing::{FrameBatches, ShapeMesh};
use pipeline_manager::PipelineManager;
use surface_textures::WHITE_TEXTURE_INDEX;

// Re-export commonly used types
pub use vertex::{InstanceRaw, Vertex};

/// Tint alpha of the hover preview.
const PREVIEW_ALPHA: f32 = 0.5;

/// The block highlighted under the cursor, drawn translucent at the place it
/// would occupy.
#[derive(Copy, Clone, Debug)]
pub struct PreviewInstance {
    /// Cell center the preview sits at
    pub position: Point3<f32>,
    /// Geometry the preview is drawn as
    pub geometry: GeometryKind,
}

/// Manages the surface, pipelines, and per-frame batch building.
pub struct SceneRendererManager {
    /// The WebGPU surface being rendered to
    pub surface: Surface<'static>,
    /// Configuration for the surface (size, format, etc.)
    pub surface_config: SurfaceConfiguration,
    /// The WebGPU device used for creating GPU resources
    pub device: StSystem<Device>,
    /// The WebGPU queue for submitting command buffers
    pub queue: StSystem<Queue>,
    /// Manages the rendering pipelines and shaders
    pub pipeline_manager: PipelineManager,
    /// Camera projection settings
    pub camera_projection: camera::Projection,
}

impl SceneRendererManager {
    /// Creates a new `SceneRendererManager` instance.
    ///
    /// # Arguments
    /// * `surface` - The WebGPU surface to render to
    /// * `surface_config` - Configuration for the surface
    /// * `shader_string` - WGSL source code for the shaders
    /// * `camera_projection` - Initial camera projection settings
    /// * `device` - The WebGPU device
    /// * `queue` - The WebGPU queue
    /// * `buffer_state` - Shared state for buffer management
    /// * `grid` - Grid configuration for the guide lines
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        shader_string: &str,
        camera_projection: camera::Projection,
        device: StSystem<Device>,
        queue: StSystem<Queue>,
        buffer_state: StSystem<BufferState>,
        grid: &GridConfig,
    ) -> Self {
        let pipeline_manager = PipelineManager::new(
            device.clone(),
            queue.clone(),
            &surface_config,
            surface_config.format,
            buffer_state,
            shader_string,
            grid,
        );

        Self {
            surface,
            surface_config,
            device,
            queue,
            pipeline_manager,
            camera_projection,
        }
    }

    /// Handles window resize events.
    ///
    /// # Arguments
    /// * `size` - The new window size in physical pixels
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.surface_config.width = size.width.max(1);
        self.surface_config.height = size.height.max(1);

        self.surface
            .configure(&self.device.get(), &self.surface_config);

        self.camera_projection.resize(size.width, size.height);
        self.pipeline_manager
            .resize(self.device.clone(), &self.surface_config);
    }

    /// Renders a new frame of the world.
    ///
    /// # Arguments
    /// * `world` - The world to draw
    /// * `preview` - Hover preview to draw translucent, if any
    /// * `grid` - Grid configuration for cell sizing
    /// * `grid_visible` - Whether the grid guide is drawn
    pub fn render(
        &mut self,
        world: &World,
        preview: Option<PreviewInstance>,
        grid: &GridConfig,
        grid_visible: bool,
    ) {
        let batches = build_frame_batches(world, preview, grid);
        self.pipeline_manager.render(
            &self.surface,
            self.device.clone(),
            self.queue.clone(),
            &batches,
            grid_visible,
        );
    }
}

/// Converts one sRGB channel byte to its linear value.
fn srgb_channel(byte: u8) -> f32 {
    let value = byte as f32 / 255.0;
    if value <= 0.04045 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

/// A linear-space tint from an sRGB color and alpha.
fn srgb_tint(r: u8, g: u8, b: u8, alpha: f32) -> Vector4<f32> {
    Vector4::new(srgb_channel(r), srgb_channel(g), srgb_channel(b), alpha)
}

fn shape_for(geometry: GeometryKind) -> ShapeMesh {
    match geometry {
        GeometryKind::Cube => ShapeMesh::Cube,
        GeometryKind::Cylinder => ShapeMesh::Cylinder,
        GeometryKind::Sphere => ShapeMesh::Sphere,
        GeometryKind::Tetrahedron => ShapeMesh::Tetrahedron,
    }
}

fn model_matrix(position: Point3<f32>, scale: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::from_translation(position.to_vec())
        * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
}

/// Collects every instance the frame draws.
fn build_frame_batches(
    world: &World,
    preview: Option<PreviewInstance>,
    grid: &GridConfig,
) -> FrameBatches {
    let mut batches = FrameBatches::new();
    let opaque_white = Vector4::new(1.0, 1.0, 1.0, 1.0);
    let ground_tint = srgb_tint(0x0e, 0xa5, 0xe9, 1.0);
    let border_tint = srgb_tint(0xa3, 0xd2, 0x64, 1.0);

    for object in world.registry.iter() {
        match object.kind {
            ObjectKind::Block { geometry, surface } => {
                let scale = object.scale * grid.cell_size;
                let instance = InstanceRaw::new(
                    model_matrix(object.position, scale),
                    opaque_white,
                    surface.texture_index(),
                );
                if surface == SurfaceKind::Glass {
                    batches.push_transparent(shape_for(geometry), instance);
                } else {
                    batches.push_opaque(shape_for(geometry), instance);
                }
            }
            ObjectKind::GroundPlane { half_extent } => {
                let scale = Vector3::new(half_extent * 2.0, 1.0, half_extent * 2.0);
                batches.push_opaque(
                    ShapeMesh::Plane,
                    InstanceRaw::new(
                        model_matrix(object.position, scale),
                        ground_tint,
                        WHITE_TEXTURE_INDEX,
                    ),
                );
            }
            ObjectKind::Border { half_extents } => {
                batches.push_opaque(
                    ShapeMesh::Cube,
                    InstanceRaw::new(
                        model_matrix(object.position, half_extents * 2.0),
                        border_tint,
                        WHITE_TEXTURE_INDEX,
                    ),
                );
            }
        }
    }

    // Balloon: a stretched sphere envelope with a small cube basket below.
    let balloon = &world.scenery.balloon;
    let envelope_scale = Vector3::new(
        10.0 * balloon.scale.x,
        12.0 * balloon.scale.y,
        10.0 * balloon.scale.z,
    );
    batches.push_opaque(
        ShapeMesh::Sphere,
        InstanceRaw::new(
            model_matrix(balloon.position, envelope_scale),
            srgb_tint(0xd2, 0x5a, 0x50, 1.0),
            WHITE_TEXTURE_INDEX,
        ),
    );
    batches.push_opaque(
        ShapeMesh::Cube,
        InstanceRaw::new(
            model_matrix(
                balloon.position + Vector3::new(0.0, -9.0, 0.0),
                Vector3::new(3.0, 3.0, 3.0),
            ),
            srgb_tint(0x8a, 0x5a, 0x2b, 1.0),
            WHITE_TEXTURE_INDEX,
        ),
    );

    // The preview goes last so it blends over everything at its cell.
    if let Some(preview) = preview {
        let scale = Vector3::new(grid.cell_size, grid.cell_size, grid.cell_size);
        batches.push_transparent(
            shape_for(preview.geometry),
            InstanceRaw::new(
                model_matrix(preview.position, scale),
                srgb_tint(0x64, 0x64, 0x64, PREVIEW_ALPHA),
                WHITE_TEXTURE_INDEX,
            ),
        );
    }

    batches
}
