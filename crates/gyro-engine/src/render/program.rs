//! GPU program compilation.
//!
//! A "program" is a vertex + fragment source pair compiled and validated
//! into an executable [`wgpu::RenderPipeline`]. Each stage is compiled
//! inside its own wgpu validation error scope so backend diagnostics are
//! captured per stage; pipeline creation ("linking") gets a scope of its
//! own. A [`GpuProgram`] therefore never wraps an unusable pipeline: on
//! any failure the error is returned to the caller, which must not enter
//! the frame loop.

use std::fmt;

/// Shader stage identifier, used in compile diagnostics.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Error returned by [`compile`].
#[derive(Debug, Clone)]
pub enum ProgramError {
    /// A shader stage failed to compile; `log` carries the backend
    /// diagnostic text.
    Compile { stage: ShaderStage, log: String },
    /// The pipeline failed validation against the compiled stages.
    Link { log: String },
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::Compile { stage, log } => {
                write!(f, "{stage} shader compilation failed: {log}")
            }
            ProgramError::Link { log } => write!(f, "program link failed: {log}"),
        }
    }
}

impl std::error::Error for ProgramError {}

/// Everything needed to build an executable program: the two stage sources
/// plus the fixed-function state the pipeline is validated against.
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    pub vertex_source: &'a str,
    pub fragment_source: &'a str,
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub color_format: wgpu::TextureFormat,
    pub blend: Option<wgpu::BlendState>,
    pub depth_stencil: Option<wgpu::DepthStencilState>,
}

/// Opaque handle to a linked, executable program.
pub struct GpuProgram {
    pipeline: wgpu::RenderPipeline,
}

impl GpuProgram {
    /// The validated pipeline, ready to bind.
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}

/// Compiles and links a vertex + fragment source pair.
///
/// The per-stage shader modules are locals of this function: they are
/// released when it returns, whether linking succeeded or not.
pub fn compile(device: &wgpu::Device, desc: &ProgramDesc<'_>) -> Result<GpuProgram, ProgramError> {
    let vertex = compile_stage(device, desc.label, ShaderStage::Vertex, desc.vertex_source)?;
    let fragment = compile_stage(device, desc.label, ShaderStage::Fragment, desc.fragment_source)?;

    let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: desc.bind_group_layouts,
        immediate_size: 0,
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &vertex,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: desc.vertex_buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: &fragment,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.color_format,
                blend: desc.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: desc.depth_stencil.clone(),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    if let Some(err) = pollster::block_on(error_scope.pop()) {
        return Err(ProgramError::Link { log: err.to_string() });
    }

    Ok(GpuProgram { pipeline })
}

fn compile_stage(
    device: &wgpu::Device,
    label: &str,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, ProgramError> {
    let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{label} {stage}")),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    match pollster::block_on(error_scope.pop()) {
        Some(err) => Err(ProgramError::Compile {
            stage,
            log: err.to_string(),
        }),
        None => Ok(module),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_names_the_stage() {
        let err = ProgramError::Compile {
            stage: ShaderStage::Fragment,
            log: "unknown identifier".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("fragment"));
        assert!(msg.contains("unknown identifier"));
    }

    #[test]
    fn link_error_formats() {
        let err = ProgramError::Link { log: "interface mismatch".into() };
        assert_eq!(err.to_string(), "program link failed: interface mismatch");
    }
}
