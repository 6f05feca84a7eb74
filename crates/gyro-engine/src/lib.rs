//! Gyro engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the viewer:
//! window/event-loop runtime, device and surface management, keyboard input,
//! frame timing, GPU program compilation, and the text-overlay subsystem
//! (font-atlas baking, glyph layout, glyph-quad rendering).

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod text;
pub mod time;
pub mod window;
