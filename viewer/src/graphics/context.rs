//! wgpu implementation of the core render context
//!
//! Draw calls are recorded during [`RenderContext`] calls and replayed in a
//! single render pass by [`WgpuContext::submit`]. Uniform state is sticky,
//! so every draw snapshots the current frame and draw blocks into slots of
//! two dynamically offset uniform buffers. The frame block only gets a new
//! slot when a frame uniform changed since the previous draw.

use bytemuck::bytes_of;
use glam::{Mat4, Vec3, Vec4};
use kennel_core::{
    BufferId, FlagUniform, MatrixUniform, MeshBuffers, RenderContext, RenderError, ScalarUniform,
    VectorUniform,
};
use wgpu::util::DeviceExt;

use super::pipeline::{DrawUniforms, FrameUniforms, aligned_stride};

/// Initial uniform slots per buffer
const INITIAL_SLOTS: u64 = 256;

/// One recorded draw call
#[derive(Debug, Clone, Copy)]
struct DrawCommand {
    mesh: MeshBuffers,
    first: u32,
    count: u32,
    indexed: bool,
    frame_slot: u32,
    draw_slot: u32,
}

/// A dynamically offset uniform buffer with a CPU staging copy
struct UniformRing {
    label: &'static str,
    buffer: wgpu::Buffer,
    stride: u64,
    capacity: u64,
    staging: Vec<u8>,
}

impl UniformRing {
    fn new(device: &wgpu::Device, label: &'static str, stride: u64) -> Self {
        Self {
            label,
            buffer: Self::create_buffer(device, label, stride * INITIAL_SLOTS),
            stride,
            capacity: INITIAL_SLOTS,
            staging: Vec::new(),
        }
    }

    fn create_buffer(device: &wgpu::Device, label: &'static str, size: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn len(&self) -> u64 {
        self.staging.len() as u64 / self.stride
    }

    /// Append a block, returning its slot
    fn push(&mut self, bytes: &[u8]) -> u32 {
        let slot = self.len() as u32;
        let start = self.staging.len();
        self.staging.resize(start + self.stride as usize, 0);
        self.staging[start..start + bytes.len()].copy_from_slice(bytes);
        slot
    }

    fn offset(&self, slot: u32) -> u32 {
        (u64::from(slot) * self.stride) as u32
    }

    /// Grow the GPU buffer to hold every staged slot; returns whether it was replaced
    fn reserve(&mut self, device: &wgpu::Device) -> bool {
        let needed = self.len();
        if needed <= self.capacity {
            return false;
        }
        self.capacity = needed.next_power_of_two();
        self.buffer = Self::create_buffer(device, self.label, self.capacity * self.stride);
        tracing::debug!("{} grown to {} slots", self.label, self.capacity);
        true
    }

    fn upload(&self, queue: &wgpu::Queue) {
        if !self.staging.is_empty() {
            queue.write_buffer(&self.buffer, 0, &self.staging);
        }
    }

    fn clear(&mut self) {
        self.staging.clear();
    }
}

/// Render context backed by a wgpu device
pub struct WgpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
    buffers: Vec<wgpu::Buffer>,
    frame_ring: UniformRing,
    draw_ring: UniformRing,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    frame: FrameUniforms,
    draw: DrawUniforms,
    /// Slot holding the current frame block, if unchanged since it was staged
    frame_slot: Option<u32>,
    commands: Vec<DrawCommand>,
    clear_color: Vec4,
}

impl WgpuContext {
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        bind_group_layout: wgpu::BindGroupLayout,
    ) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment;
        let frame_ring = UniformRing::new(
            &device,
            "Frame Uniforms",
            aligned_stride(size_of::<FrameUniforms>(), alignment),
        );
        let draw_ring = UniformRing::new(
            &device,
            "Draw Uniforms",
            aligned_stride(size_of::<DrawUniforms>(), alignment),
        );
        let bind_group = create_bind_group(&device, &bind_group_layout, &frame_ring, &draw_ring);

        Self {
            device,
            queue,
            buffers: Vec::new(),
            frame_ring,
            draw_ring,
            bind_group_layout,
            bind_group,
            frame: FrameUniforms::default(),
            draw: DrawUniforms::default(),
            frame_slot: None,
            commands: Vec::new(),
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Forget last frame's draws and uniform snapshots
    pub fn begin_frame(&mut self) {
        self.commands.clear();
        self.frame_ring.clear();
        self.draw_ring.clear();
        self.frame_slot = None;
    }

    /// Number of draws recorded since [`begin_frame`](Self::begin_frame)
    pub fn draw_count(&self) -> usize {
        self.commands.len()
    }

    fn create_buffer(
        &mut self,
        kind: &'static str,
        contents: &[u8],
        len: usize,
        usage: wgpu::BufferUsages,
    ) -> Result<BufferId, RenderError> {
        if contents.is_empty() {
            return Err(RenderError::EmptyBuffer(kind));
        }
        let limit = self.device.limits().max_buffer_size;
        if contents.len() as u64 > limit {
            return Err(RenderError::BufferTooLarge { kind, len, limit });
        }
        let id = u32::try_from(self.buffers.len()).map_err(|_| RenderError::BufferCreation {
            kind,
            reason: "buffer handles exhausted".to_string(),
        })?;

        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(kind),
                contents,
                usage,
            });
        self.buffers.push(buffer);
        Ok(BufferId(id))
    }

    fn buffer(&self, id: BufferId) -> Option<&wgpu::Buffer> {
        self.buffers.get(id.0 as usize)
    }

    fn invalidate_frame(&mut self) {
        self.frame_slot = None;
    }

    fn record(&mut self, mesh: &MeshBuffers, first: u32, count: u32, indexed: bool) {
        if count == 0 {
            return;
        }
        let frame_slot = match self.frame_slot {
            Some(slot) => slot,
            None => {
                let slot = self.frame_ring.push(bytes_of(&self.frame));
                self.frame_slot = Some(slot);
                slot
            }
        };
        let draw_slot = self.draw_ring.push(bytes_of(&self.draw));
        self.commands.push(DrawCommand {
            mesh: *mesh,
            first,
            count,
            indexed,
            frame_slot,
            draw_slot,
        });
    }

    /// Encode every recorded draw into one pass over `target` and submit it
    pub fn submit(
        &mut self,
        target: &wgpu::TextureView,
        depth: &wgpu::TextureView,
        pipeline: &wgpu::RenderPipeline,
    ) {
        let grown = self.frame_ring.reserve(&self.device) | self.draw_ring.reserve(&self.device);
        if grown {
            self.bind_group = create_bind_group(
                &self.device,
                &self.bind_group_layout,
                &self.frame_ring,
                &self.draw_ring,
            );
        }
        self.frame_ring.upload(&self.queue);
        self.draw_ring.upload(&self.queue);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let c = self.clear_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: c.x as f64,
                            g: c.y as f64,
                            b: c.z as f64,
                            a: c.w as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(pipeline);
            for cmd in &self.commands {
                let (Some(positions), Some(normals)) =
                    (self.buffer(cmd.mesh.positions), self.buffer(cmd.mesh.normals))
                else {
                    tracing::warn!("Draw references unknown vertex buffers, skipping");
                    continue;
                };

                pass.set_bind_group(
                    0,
                    &self.bind_group,
                    &[
                        self.frame_ring.offset(cmd.frame_slot),
                        self.draw_ring.offset(cmd.draw_slot),
                    ],
                );
                pass.set_vertex_buffer(0, positions.slice(..));
                pass.set_vertex_buffer(1, normals.slice(..));

                if cmd.indexed {
                    let Some(indices) = cmd.mesh.indices.and_then(|id| self.buffer(id)) else {
                        tracing::warn!("Indexed draw without an index buffer, skipping");
                        continue;
                    };
                    pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint16);
                    pass.draw_indexed(0..cmd.count, 0, 0..1);
                } else {
                    pass.draw(cmd.first..cmd.first + cmd.count, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    frame: &UniformRing,
    draw: &UniformRing,
) -> wgpu::BindGroup {
    fn binding(ring: &UniformRing, size: usize) -> wgpu::BindingResource<'_> {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &ring.buffer,
            offset: 0,
            size: wgpu::BufferSize::new(size as u64),
        })
    }

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Scene Uniforms"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: binding(frame, size_of::<FrameUniforms>()),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: binding(draw, size_of::<DrawUniforms>()),
            },
        ],
    })
}

impl RenderContext for WgpuContext {
    fn create_vertex_buffer(&mut self, data: &[f32]) -> Result<BufferId, RenderError> {
        self.create_buffer(
            "vertex",
            bytemuck::cast_slice(data),
            data.len(),
            wgpu::BufferUsages::VERTEX,
        )
    }

    fn create_index_buffer(&mut self, data: &[u16]) -> Result<BufferId, RenderError> {
        self.create_buffer(
            "index",
            bytemuck::cast_slice(data),
            data.len(),
            wgpu::BufferUsages::INDEX,
        )
    }

    fn set_matrix(&mut self, uniform: MatrixUniform, value: Mat4) {
        match uniform {
            MatrixUniform::Model => self.draw.model = value,
            MatrixUniform::Normal => self.draw.normal = value,
            MatrixUniform::View => {
                self.frame.view = value;
                self.invalidate_frame();
            }
            MatrixUniform::Projection => {
                self.frame.projection = value;
                self.invalidate_frame();
            }
        }
    }

    fn set_vector(&mut self, uniform: VectorUniform, value: Vec3) {
        let slot = match uniform {
            VectorUniform::LightPosition => &mut self.frame.light_position,
            VectorUniform::SpotPosition => &mut self.frame.spot_position,
            VectorUniform::SpotDirection => &mut self.frame.spot_direction,
            VectorUniform::CameraPosition => &mut self.frame.camera_position,
        };
        *slot = value.extend(0.0);
        self.invalidate_frame();
    }

    fn set_color(&mut self, color: Vec4) {
        self.draw.color = color;
    }

    fn set_scalar(&mut self, uniform: ScalarUniform, value: f32) {
        match uniform {
            ScalarUniform::SpotInnerCutoff => self.frame.params.x = value,
            ScalarUniform::SpotOuterCutoff => self.frame.params.y = value,
        }
        self.invalidate_frame();
    }

    fn set_flag(&mut self, uniform: FlagUniform, value: bool) {
        let value = if value { 1.0 } else { 0.0 };
        match uniform {
            FlagUniform::LightingEnabled => self.frame.params.z = value,
            FlagUniform::NormalDebug => self.frame.params.w = value,
        }
        self.invalidate_frame();
    }

    fn draw_arrays(&mut self, mesh: &MeshBuffers, first: u32, count: u32) {
        self.record(mesh, first, count, false);
    }

    fn draw_indexed(&mut self, mesh: &MeshBuffers, index_count: u32) {
        self.record(mesh, 0, index_count, true);
    }

    fn clear(&mut self, color: Vec4) {
        self.clear_color = color;
        self.commands.clear();
    }
}
