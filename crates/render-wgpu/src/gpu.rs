use crate::error::RenderError;
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use colorbot_scene::{ColorCube, DrawList, PART_COUNT};
use glam::Mat4;
use wgpu::util::DeviceExt;

/// Size of one attribute element: a vec4<f32>.
const ATTRIBUTE_STRIDE: u64 = std::mem::size_of::<[f32; 4]>() as u64;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    pvm: [[f32; 4]; 4],
}

const UNIFORM_SIZE: u64 = std::mem::size_of::<Uniforms>() as u64;

/// Distance between per-part uniform slots, rounded up to the device's
/// dynamic offset alignment.
fn uniform_stride(alignment: u32) -> u64 {
    let alignment = u64::from(alignment.max(1));
    UNIFORM_SIZE.div_ceil(alignment) * alignment
}

/// Lay out one PVM matrix per slot, zero padded to `stride`.
fn pack_uniforms<'a>(matrices: impl IntoIterator<Item = &'a Mat4>, stride: u64) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(PART_COUNT * stride as usize);
    for m in matrices {
        let start = bytes.len();
        bytes.extend_from_slice(bytemuck::bytes_of(&Uniforms {
            pvm: m.to_cols_array_2d(),
        }));
        bytes.resize(start + stride as usize, 0);
    }
    bytes
}

/// wgpu-based robot renderer.
///
/// The cube mesh is uploaded once into a single buffer (positions followed by
/// colors). Each frame the part matrices are written into their uniform slots
/// and every part is drawn from the same mesh.
pub struct RobotRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniform_stride: u64,
    mesh_buffer: wgpu::Buffer,
    colors_offset: u64,
    vertex_count: u32,
    depth_texture: wgpu::TextureView,
}

impl RobotRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        mesh: &ColorCube,
        shader_source: &str,
    ) -> Result<Self, RenderError> {
        // Mesh buffer: positions, then colors
        let position_bytes = mesh.position_bytes();
        let color_bytes = mesh.color_bytes();
        let mut contents = Vec::with_capacity(position_bytes.len() + color_bytes.len());
        contents.extend_from_slice(position_bytes);
        contents.extend_from_slice(color_bytes);
        let mesh_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_mesh_buffer"),
            contents: &contents,
            usage: wgpu::BufferUsages::VERTEX,
        });
        let colors_offset = position_bytes.len() as u64;

        // Uniform buffer: one slot per part
        let uniform_stride =
            uniform_stride(device.limits().min_uniform_buffer_offset_alignment);
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pvm_uniform_buffer"),
            size: uniform_stride * PART_COUNT as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pvm_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(UNIFORM_SIZE),
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pvm_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(UNIFORM_SIZE),
                }),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("robot_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        // Shader compilation and pipeline creation report errors through the
        // device; capture them so a bad program aborts startup with a Result.
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("robot_shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("robot_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(shaders::VS_ENTRY),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: ATTRIBUTE_STRIDE,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x4],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: ATTRIBUTE_STRIDE,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![1 => Float32x4],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(shaders::FS_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::Shader(err.to_string()));
        }

        let depth_texture = Self::create_depth_texture(device, width, height);

        tracing::debug!(
            vertex_count = mesh.vertex_count(),
            uniform_stride,
            "robot renderer ready"
        );

        Ok(Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            uniform_stride,
            mesh_buffer,
            colors_offset,
            vertex_count: mesh.vertex_count(),
            depth_texture,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Render one frame: clear to black, then one cube per part.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        draws: &DrawList,
    ) {
        let uniforms = pack_uniforms(draws.iter().map(|d| &d.pvm), self.uniform_stride);
        queue.write_buffer(&self.uniform_buffer, 0, &uniforms);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("robot_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_vertex_buffer(0, self.mesh_buffer.slice(..self.colors_offset));
            pass.set_vertex_buffer(1, self.mesh_buffer.slice(self.colors_offset..));

            for slot in 0..draws.len() {
                let offset = (slot as u64 * self.uniform_stride) as wgpu::DynamicOffset;
                pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
                pass.draw(0..self.vertex_count, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}
