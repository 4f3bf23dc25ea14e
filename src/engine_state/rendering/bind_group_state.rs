//! Manages WebGPU bind groups and their layouts.
//!
//! Bind groups and layouts are created once at startup and stored by name:
//! the camera uniform group and the surface texture array group.

use std::collections::HashMap;

use wgpu::{BindGroup, BindGroupLayout, Device, Queue};

use crate::{
    core::StSystem,
    engine_state::{buffer_state::BufferState, camera_state::CAMERA_BUFFER_NAME},
};

use super::texture::Texture;

/// Name of the camera bind group
pub const CAMERA_BIND_GROUP: &str = "camera_bind_group";
/// Name of the camera bind group layout
pub const CAMERA_BIND_GROUP_LAYOUT: &str = "camera_bind_group_layout";
/// Name of the surface texture bind group
pub const TEXTURE_BIND_GROUP: &str = "texture_bind_group";
/// Name of the surface texture bind group layout
pub const TEXTURE_BIND_GROUP_LAYOUT: &str = "texture_bind_group_layout";

/// Registry of named bind groups and layouts.
pub struct BindGroupState {
    /// Map of bind group names to their WebGPU bind group objects
    bind_groups: HashMap<&'static str, wgpu::BindGroup>,
    /// Map of bind group layout names to their WebGPU bind group layout objects
    bind_group_layouts: HashMap<&'static str, wgpu::BindGroupLayout>,
}

impl BindGroupState {
    /// Creates the bind groups the scene pipelines use.
    ///
    /// The camera uniform buffer must already exist in `buffer_state`; the
    /// surface texture array is generated and uploaded here.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `buffer_state` - Shared state for buffer management
    /// * `queue` - The WebGPU queue for resource uploads
    pub fn new(
        device: StSystem<Device>,
        buffer_state: StSystem<BufferState>,
        queue: StSystem<Queue>,
    ) -> Self {
        let mut bind_groups = HashMap::new();
        let mut bind_group_layouts = HashMap::new();

        let device = device.get();

        let (camera_bind_group, camera_bind_group_layout) =
            Self::generate_camera_bindgroups(&device, &buffer_state.get());
        bind_groups.insert(CAMERA_BIND_GROUP, camera_bind_group);
        bind_group_layouts.insert(CAMERA_BIND_GROUP_LAYOUT, camera_bind_group_layout);

        let (texture_bind_group, texture_bind_group_layout) =
            Self::generate_texture_bindgroups(&device, &queue.get());
        bind_groups.insert(TEXTURE_BIND_GROUP, texture_bind_group);
        bind_group_layouts.insert(TEXTURE_BIND_GROUP_LAYOUT, texture_bind_group_layout);

        Self {
            bind_groups,
            bind_group_layouts,
        }
    }

    /// Retrieves a bind group by name.
    ///
    /// # Panics
    /// Panics if no bind group with the given name exists.
    pub fn get_bind_group(&self, name: &'static str) -> &wgpu::BindGroup {
        self.bind_groups.get(name).unwrap()
    }

    /// Retrieves a bind group layout by name.
    ///
    /// # Panics
    /// Panics if no bind group layout with the given name exists.
    pub fn get_bind_group_layout(&self, name: &'static str) -> &wgpu::BindGroupLayout {
        self.bind_group_layouts.get(name).unwrap()
    }

    /// Creates the bind group for camera uniforms, visible to both shader
    /// stages.
    fn generate_camera_bindgroups(
        device: &Device,
        buffer_state: &BufferState,
    ) -> (BindGroup, BindGroupLayout) {
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some(CAMERA_BIND_GROUP_LAYOUT),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer_state.get_entire_binding(CAMERA_BUFFER_NAME),
            }],
            label: Some(CAMERA_BIND_GROUP),
        });

        (camera_bind_group, camera_bind_group_layout)
    }

    /// Creates the bind group for the surface texture array and its sampler.
    ///
    /// A layered `texture_2d_array` is used rather than a binding array, so
    /// the same layout works on WebGL as well as native backends.
    fn generate_texture_bindgroups(
        device: &Device,
        queue: &Queue,
    ) -> (BindGroup, BindGroupLayout) {
        let texture = Texture::create_surface_texture_array(device, queue);

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2Array,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        // This should match the filterable field of the corresponding Texture entry above.
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
                label: Some(TEXTURE_BIND_GROUP_LAYOUT),
            });

        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
            label: Some(TEXTURE_BIND_GROUP),
        });

        (texture_bind_group, texture_bind_group_layout)
    }
}
