//! # Core Module
//!
//! Shared single-threaded plumbing used throughout the editor. Everything
//! here runs on the winit event loop thread, so interior mutability via
//! `RefCell` is all that is needed.

pub mod st_system;

pub use st_system::StSystem;
