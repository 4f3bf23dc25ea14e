//! # Block Builder Application Entry Point
//!
//! This is the main entry point for the native application version of the block
//! builder. It simply calls into the library's `run()` function to initialize
//! and start the editor.
//!
//! For web applications, see the `run_web()` function in the library.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release
//! ```

fn main() {
    #[cfg(not(target_family = "wasm"))]
    block_builder::run();
}
