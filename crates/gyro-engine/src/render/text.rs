use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::text::{AtlasTexture, TextRun};

use super::ctx::{RenderCtx, RenderTarget};
use super::program::{self, GpuProgram, ProgramDesc, ProgramError};

/// Renderer for laid-out glyph quads.
///
/// Owns the text program, the atlas bind group, and one shared dynamic
/// vertex buffer. Each frame the run's quads are written into the buffer
/// (overwriting the previous frame's contents) and one two-triangle draw is
/// issued per quad, strictly sequentially, with straight-alpha blending:
/// the glyph coverage sampled from the atlas becomes the fragment alpha.
pub struct TextRenderer {
    program: GpuProgram,
    atlas: AtlasTexture,
    uniform_buf: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_buf: wgpu::Buffer,
    quad_capacity: usize,
}

/// Vertex layout: screen-space position + atlas uv, six vertices per quad.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TextVertex {
    pos: [f32; 2],
    uv: [f32; 2],
}

impl TextVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TextVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Uniforms shared by both stages: the screen-space orthographic projection
/// (+Y down, recomputed by the caller every frame) and the text color.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TextUniform {
    projection: [[f32; 4]; 4],
    color: [f32; 4],
}

const VERTICES_PER_QUAD: usize = 6;
const INITIAL_QUAD_CAPACITY: usize = 64;

fn straight_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

impl TextRenderer {
    /// Builds the text program and binds `atlas` to it.
    ///
    /// Fails with a [`ProgramError`] if either shader stage or the pipeline
    /// fails validation; the caller must not enter the frame loop.
    pub fn new(ctx: &RenderCtx<'_>, atlas: AtlasTexture) -> Result<Self, ProgramError> {
        let bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("gyro text bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(
                                std::mem::size_of::<TextUniform>() as u64,
                            ),
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let program = program::compile(
            ctx.device,
            &ProgramDesc {
                label: "gyro text program",
                vertex_source: include_str!("shaders/text_vs.wgsl"),
                fragment_source: include_str!("shaders/text_fs.wgsl"),
                bind_group_layouts: &[&bgl],
                vertex_buffers: &[TextVertex::layout()],
                color_format: ctx.surface_format,
                blend: Some(straight_alpha_blend()),
                depth_stencil: None,
            },
        )?;

        let uniform_buf = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gyro text uniform"),
            size: std::mem::size_of::<TextUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gyro text bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(atlas.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(atlas.sampler()),
                },
            ],
        });

        let vertex_buf = Self::create_vertex_buffer(ctx.device, INITIAL_QUAD_CAPACITY);

        Ok(Self {
            program,
            atlas,
            uniform_buf,
            bind_group,
            vertex_buf,
            quad_capacity: INITIAL_QUAD_CAPACITY,
        })
    }

    /// Draws `run` over whatever the target already contains.
    ///
    /// `projection` must map screen-space pixels (+Y down) to clip space for
    /// the current framebuffer size.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        run: &TextRun,
        projection: Mat4,
        color: [f32; 4],
    ) {
        if run.quads.is_empty() {
            return;
        }

        self.ensure_capacity(ctx, run.quads.len());

        let mut vertices = Vec::with_capacity(run.quads.len() * VERTICES_PER_QUAD);
        for q in &run.quads {
            vertices.extend_from_slice(&[
                TextVertex { pos: [q.x0, q.y0], uv: [q.s0, q.t0] },
                TextVertex { pos: [q.x0, q.y1], uv: [q.s0, q.t1] },
                TextVertex { pos: [q.x1, q.y1], uv: [q.s1, q.t1] },
                TextVertex { pos: [q.x0, q.y0], uv: [q.s0, q.t0] },
                TextVertex { pos: [q.x1, q.y1], uv: [q.s1, q.t1] },
                TextVertex { pos: [q.x1, q.y0], uv: [q.s1, q.t0] },
            ]);
        }

        ctx.queue
            .write_buffer(&self.vertex_buf, 0, bytemuck::cast_slice(&vertices));
        ctx.queue.write_buffer(
            &self.uniform_buf,
            0,
            bytemuck::bytes_of(&TextUniform {
                projection: projection.to_cols_array_2d(),
                color,
            }),
        );

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("gyro text pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(self.program.pipeline());
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buf.slice(..));

        // One draw per glyph quad, in layout order.
        for i in 0..run.quads.len() {
            let start = (i * VERTICES_PER_QUAD) as u32;
            rpass.draw(start..start + VERTICES_PER_QUAD as u32, 0..1);
        }
    }

    fn ensure_capacity(&mut self, ctx: &RenderCtx<'_>, quads: usize) {
        if quads <= self.quad_capacity {
            return;
        }
        let new_capacity = quads.next_power_of_two();
        self.vertex_buf = Self::create_vertex_buffer(ctx.device, new_capacity);
        self.quad_capacity = new_capacity;
    }

    fn create_vertex_buffer(device: &wgpu::Device, quads: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gyro text vbo"),
            size: (quads * VERTICES_PER_QUAD * std::mem::size_of::<TextVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// The atlas texture this renderer samples from.
    pub fn atlas(&self) -> &AtlasTexture {
        &self.atlas
    }
}
