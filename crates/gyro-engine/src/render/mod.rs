//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers, bind groups) and
//! issue commands through a [`RenderTarget`] borrowed from the current frame.
//! Pipelines are built through [`program::compile`], which surfaces stage
//! compile and link diagnostics as errors instead of rendering with a broken
//! program.

mod ctx;
pub mod program;
mod text;

pub use ctx::{RenderCtx, RenderTarget};
pub use program::{GpuProgram, ProgramDesc, ProgramError, ShaderStage};
pub use text::TextRenderer;
