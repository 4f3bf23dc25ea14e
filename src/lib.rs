#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Block Builder
//!
//! A browser-friendly block building sandbox rendered with Rust and WGPU.
//!
//! Blocks snap to a ground-level grid and settle under gravity with a short
//! fall animation; a translucent preview follows the cursor; fixed compass
//! viewpoints and a scenic orbit frame the build area. The same crate runs
//! natively and as WebAssembly.
//!
//! ## Key Modules
//!
//! * `application_state` - Manages the application lifecycle and window management
//! * `core` - Shared utilities used throughout the editor
//! * `engine_state` - The editor itself: world, placement, camera, and rendering
//!
//! ## Usage
//!
//! ```rust,no_run
//! // Native application initialization
//! fn main() {
//!     block_builder::run();
//! }
//! ```

use application_state::{
    graphics_resources_builder::{GraphicsBuilder, MaybeGraphics},
    ApplicationState,
};
#[cfg(target_family = "wasm")]
use wasm_bindgen::prelude::wasm_bindgen;

use winit::event_loop::EventLoop;

#[cfg(not(target_family = "wasm"))]
use log::info;

mod application_state;
mod core;
mod engine_state;

#[cfg(target_family = "wasm")]
const CANVAS_ID: &str = "wgpu-canvas";

/// Runs the editor natively.
#[cfg(not(target_family = "wasm"))]
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
    let event_loop = EventLoop::with_user_event().build().unwrap();

    let mut state: ApplicationState = ApplicationState {
        graphics: MaybeGraphics::Builder(GraphicsBuilder::new(event_loop.create_proxy())),
        state: None,
        web_window_size: None,
    };

    let _ = event_loop.run_app(&mut state);
}

/// Entry point for the WebAssembly build, called from JavaScript.
#[cfg(target_family = "wasm")]
#[wasm_bindgen]
pub fn run_web() {
    use winit::platform::web::EventLoopExtWebSys;

    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    console_log::init_with_level(log::Level::Info).expect("Couldn't initialize logger");

    let event_loop = EventLoop::with_user_event().build().unwrap();

    let state: ApplicationState = ApplicationState {
        graphics: MaybeGraphics::Builder(GraphicsBuilder::new(event_loop.create_proxy())),
        state: None,
        web_window_size: None,
    };

    event_loop.spawn_app(state);
}
