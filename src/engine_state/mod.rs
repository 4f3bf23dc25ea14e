//! # Engine State Module
//!
//! The central coordinator of the block editor. `EngineState` owns every
//! subsystem (world, placement, camera, rendering) and translates processed
//! input into editor actions each frame.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the editor
//! * `grid` - Grid snapping math
//! * `picking` - Cursor rays and the ground probe
//! * `placement` - Hover preview, commits, and the fall animation
//! * `world` - The object registry, fixtures, and scenery
//! * `camera_state` - Compass viewpoints and the scenic orbit
//! * `rendering` - Instance batching and the WebGPU pipelines

use camera_state::{camera, CameraState, CompassDirection};
use rendering::{PreviewInstance, SceneRendererManager};
use web_time::Duration;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::keyboard::KeyCode;

use crate::{
    application_state::input_state::ProcessedInputState,
    core::StSystem,
};

use grid::GridConfig;
use placement::PlacementController;
use settings::WorldSettings;
use world::object::GeometryKind;
use world::World;

pub mod animation;
pub mod buffer_state;
pub mod camera_state;
pub mod grid;
pub mod picking;
pub mod placement;
pub mod rendering;
pub mod settings;
pub mod world;

/// Flags controlling editor behavior
pub struct EngineFlags {
    /// Whether placements settle downward after a commit
    pub gravity_active: bool,
    /// Whether the scenic orbit is running (building is paused while it is)
    pub scenic_view_active: bool,
}

impl Default for EngineFlags {
    fn default() -> Self {
        Self {
            gravity_active: true,
            scenic_view_active: false,
        }
    }
}

/// The main state container for the block editor
///
/// This struct maintains references to all major subsystems and coordinates
/// their interactions: input translation, placement, camera movement, and
/// rendering.
pub struct EngineState {
    /// Camera state managing viewpoints and the scenic orbit
    pub camera_state: CameraState,
    /// Current editor actions derived from input
    pub editor_actions: EditorAction,
    /// Buffer state for managing GPU buffers
    pub buffer_state: StSystem<buffer_state::BufferState>,
    /// Manager for scene rendering operations
    pub render_manager: SceneRendererManager,
    /// The world of placed blocks, fixtures, and scenery
    pub world: World,
    /// Hover preview, selection, and fall bookkeeping
    pub placement: PlacementController,
    /// Grid configuration loaded at startup
    pub grid: GridConfig,
    /// Reference to the GPU device
    pub device: StSystem<Device>,
    /// Reference to the GPU queue
    pub queue: StSystem<Queue>,
    /// Editor configuration flags
    flags: EngineFlags,
    /// Time since startup, drives the scenic orbit and balloon loop
    elapsed: Duration,
}

impl EngineState {
    /// Creates a new engine state with all subsystems initialized
    ///
    /// # Arguments
    ///
    /// * `surface` - The rendering surface
    /// * `surface_config` - Configuration for the rendering surface
    /// * `device` - The GPU device
    /// * `queue` - The GPU command queue
    /// * `shader_string` - WGSL shader code for the renderers
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        shader_string: String,
    ) -> Self {
        let device = StSystem::new(device);
        let queue = StSystem::new(queue);

        let buffer_state = StSystem::new(buffer_state::BufferState::new(
            device.clone(),
            queue.clone(),
        ));

        let settings = WorldSettings::load();
        let grid = settings.grid();

        let camera_projection = camera::Projection::new(
            surface_config.width,
            surface_config.height,
            cgmath::Deg(45.0),
            1.0,
            1000.0,
        );

        let camera_state = CameraState::new(buffer_state.clone(), &camera_projection);

        let render_manager = SceneRendererManager::new(
            surface,
            surface_config,
            &shader_string,
            camera_projection,
            device.clone(),
            queue.clone(),
            buffer_state.clone(),
            &grid,
        );

        Self {
            camera_state,
            editor_actions: EditorAction::default(),
            buffer_state,
            render_manager,
            world: World::new(),
            placement: PlacementController::new(),
            grid,
            device,
            queue,
            flags: EngineFlags::default(),
            elapsed: Duration::ZERO,
        }
    }

    /// Resizes the rendering surface when the window size changes
    ///
    /// # Arguments
    ///
    /// * `size` - The new physical size of the window
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.render_manager.resize_surface(size);
    }

    /// Renders the current frame
    pub fn render(&mut self) {
        let preview = if self.flags.scenic_view_active {
            None
        } else {
            self.placement
                .preview_position()
                .zip(self.placement.selection.geometry)
                .map(|(position, geometry)| PreviewInstance { position, geometry })
        };

        self.render_manager.render(
            &self.world,
            preview,
            &self.grid,
            !self.flags.scenic_view_active,
        );
    }

    /// Processes the pending editor actions and advances the frame
    ///
    /// # Arguments
    ///
    /// * `wait_duration` - The time elapsed since the last frame
    pub fn process_input(&mut self, wait_duration: Duration) {
        self.elapsed += wait_duration;
        let actions = std::mem::take(&mut self.editor_actions);

        if actions.toggle_gravity {
            self.flags.gravity_active = !self.flags.gravity_active;
            log::info!(
                "Gravity {}",
                if self.flags.gravity_active { "on" } else { "off" }
            );
        }
        if actions.toggle_scenic {
            self.flags.scenic_view_active = !self.flags.scenic_view_active;
        }
        if actions.toggle_top_down {
            self.camera_state.toggle_top_down();
        }
        if let Some(direction) = actions.compass {
            self.camera_state.set_compass(direction);
        }
        if let Some(geometry) = actions.select_geometry {
            self.placement.select_geometry(geometry);
        }
        if actions.cycle_surface {
            self.placement.cycle_surface();
        }
        if actions.reset_world {
            self.world.reset();
            self.placement.reset();
            self.camera_state.reset();
        }

        // Building is paused while the scenic orbit runs.
        if !self.flags.scenic_view_active {
            if let Some(cursor) = actions.cursor_position {
                if let Some(ray) = self.screen_ray(cursor) {
                    self.placement.hover(ray, &self.world, &self.grid);
                    if actions.commit_click {
                        self.placement.commit(
                            ray,
                            &mut self.world,
                            &self.grid,
                            actions.delete_mode,
                            self.flags.gravity_active,
                        );
                    }
                }
            }
        }

        self.placement.advance_fall(&mut self.world, wait_duration);

        let scenic_elapsed = self.flags.scenic_view_active.then_some(self.elapsed);
        self.camera_state
            .update(scenic_elapsed, &self.render_manager.camera_projection);

        if self.flags.scenic_view_active {
            self.world.scenery.animate(self.elapsed);
        }
    }

    /// Builds the picking ray under a cursor position for the current camera.
    fn screen_ray(&self, cursor: (f64, f64)) -> Option<picking::Ray> {
        picking::Ray::from_screen(
            cursor,
            (
                self.render_manager.surface_config.width,
                self.render_manager.surface_config.height,
            ),
            self.camera_state.view_proj_inverse(),
            self.camera_state.camera.eye,
        )
    }

    /// Sets the input commands for the engine state.
    ///
    /// # Arguments
    /// * `input` - The processed input state to use for setting commands
    pub fn set_input_commands(&mut self, input: ProcessedInputState) {
        self.editor_actions = self.translate_processed_input(input);

        if self.editor_actions.log_buffer_data {
            log::info!(
                "Total allocated memory: {}",
                self.buffer_state.get().get_total_allocated_memory()
            );
            log::info!(
                "Total used memory: {}",
                self.buffer_state.get().get_total_used_memory()
            );
        }
    }

    /// Translates the processed input state into editor actions.
    ///
    /// # Arguments
    /// * `input` - The processed input state to translate
    fn translate_processed_input(&mut self, input: ProcessedInputState) -> EditorAction {
        let mut action = EditorAction::default();

        // Delete is level triggered: placing clicks turn into deletes for as
        // long as the key is down.
        action.delete_mode = input.get_key_state(KeyCode::Space).is_active();
        action.commit_click = input
            .get_mouse_button_state(winit::event::MouseButton::Left)
            .is_just_pressed();
        action.cursor_position = input.get_cursor_position();

        action.toggle_gravity = input.get_key_state(KeyCode::KeyG).is_just_pressed();
        action.toggle_scenic = input.get_key_state(KeyCode::KeyV).is_just_pressed();
        action.toggle_top_down = input.get_key_state(KeyCode::KeyT).is_just_pressed();
        action.reset_world = input.get_key_state(KeyCode::KeyR).is_just_pressed();
        action.log_buffer_data = input.get_key_state(KeyCode::KeyB).is_just_pressed();

        for (key, direction) in [
            (KeyCode::KeyN, CompassDirection::North),
            (KeyCode::KeyE, CompassDirection::East),
            (KeyCode::KeyS, CompassDirection::South),
            (KeyCode::KeyW, CompassDirection::West),
        ] {
            if input.get_key_state(key).is_just_pressed() {
                action.compass = Some(direction);
            }
        }

        for (key, slot) in [
            (KeyCode::Digit1, 0),
            (KeyCode::Digit2, 1),
            (KeyCode::Digit3, 2),
            (KeyCode::Digit4, 3),
        ] {
            if input.get_key_state(key).is_just_pressed() {
                action.select_geometry = num_traits::FromPrimitive::from_usize(slot);
            }
        }

        action.cycle_surface = input.get_key_state(KeyCode::Tab).is_just_pressed();

        action
    }
}

/// Represents editor actions derived from input
///
/// Flags for everything the player asked for this frame: clicks, mode
/// toggles, viewpoint switches, and selection changes.
#[derive(Default)]
pub struct EditorAction {
    /// Whether clicks delete instead of placing
    delete_mode: bool,
    /// Whether the left button was clicked this frame
    commit_click: bool,
    /// Last known cursor position in physical pixels
    cursor_position: Option<(f64, f64)>,

    // Edge-triggered toggles, set only on the press frame.
    toggle_gravity: bool,
    toggle_scenic: bool,
    toggle_top_down: bool,
    reset_world: bool,
    cycle_surface: bool,
    log_buffer_data: bool,

    /// Compass viewpoint requested this frame
    compass: Option<CompassDirection>,
    /// Geometry selection requested this frame
    select_geometry: Option<GeometryKind>,
}
