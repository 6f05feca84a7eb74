//! GPU side of the cube: program, static mesh buffers, depth buffer, and
//! the per-frame draw.

use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use gyro_engine::render::{self, GpuProgram, ProgramDesc, ProgramError, RenderCtx, RenderTarget};

use crate::scene::{CUBE_INDICES, CUBE_VERTICES, CubeVertex};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Background behind the cube.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.1,
    a: 1.0,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MvpUniform {
    mvp: [[f32; 4]; 4],
}

impl CubeVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CubeVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Depth attachment sized to the framebuffer; recreated on resize.
struct DepthBuffer {
    view: wgpu::TextureView,
    size: PhysicalSize<u32>,
}

impl DepthBuffer {
    fn new(device: &wgpu::Device, size: PhysicalSize<u32>) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("gyro cube depth"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            size,
        }
    }
}

/// Renderer for the cube mesh.
///
/// All resources are created once in [`CubeRenderer::new`]; only the depth
/// buffer is ever recreated, when the framebuffer size changes.
pub struct CubeRenderer {
    program: GpuProgram,
    vertex_buf: wgpu::Buffer,
    index_buf: wgpu::Buffer,
    mvp_buf: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    depth: DepthBuffer,
}

impl CubeRenderer {
    /// Compiles the cube program and uploads the static mesh.
    ///
    /// A [`ProgramError`] here aborts startup; the frame loop is never
    /// entered with an invalid program.
    pub fn new(ctx: &RenderCtx<'_>) -> Result<Self, ProgramError> {
        let bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("gyro cube bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<MvpUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let program = render::program::compile(
            ctx.device,
            &ProgramDesc {
                label: "gyro cube program",
                vertex_source: include_str!("shaders/cube_vs.wgsl"),
                fragment_source: include_str!("shaders/cube_fs.wgsl"),
                bind_group_layouts: &[&bgl],
                vertex_buffers: &[CubeVertex::layout()],
                color_format: ctx.surface_format,
                blend: None,
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
            },
        )?;

        let vertex_buf = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("gyro cube vbo"),
                contents: bytemuck::cast_slice(&CUBE_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buf = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("gyro cube ibo"),
                contents: bytemuck::cast_slice(&CUBE_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            });

        let mvp_buf = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gyro cube mvp"),
            size: std::mem::size_of::<MvpUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gyro cube bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: mvp_buf.as_entire_binding(),
            }],
        });

        let depth = DepthBuffer::new(ctx.device, ctx.size);

        Ok(Self {
            program,
            vertex_buf,
            index_buf,
            mvp_buf,
            bind_group,
            depth,
        })
    }

    /// Clears color + depth and draws the cube with `mvp`.
    ///
    /// This is the frame's first pass; the text overlay loads on top of it.
    pub fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, mvp: Mat4) {
        if self.depth.size != ctx.size {
            self.depth = DepthBuffer::new(ctx.device, ctx.size);
        }

        ctx.queue.write_buffer(
            &self.mvp_buf,
            0,
            bytemuck::bytes_of(&MvpUniform {
                mvp: mvp.to_cols_array_2d(),
            }),
        );

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("gyro cube pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(self.program.pipeline());
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buf.slice(..));
        rpass.set_index_buffer(self.index_buf.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..CUBE_INDICES.len() as u32, 0, 0..1);
    }
}
