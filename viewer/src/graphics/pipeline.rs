//! Scene pipeline and uniform layout
//!
//! One pipeline draws everything. Vertex data comes from two buffers
//! (positions, normals). Uniforms live in two dynamically offset blocks:
//! the per-frame block (camera and lights) and the per-draw block (model,
//! normal matrix, color).

use std::mem::size_of;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

/// Depth buffer format
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Camera and light values, matching `Frame` in scene.wgsl
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view: Mat4,
    pub projection: Mat4,
    pub light_position: Vec4,
    pub spot_position: Vec4,
    pub spot_direction: Vec4,
    pub camera_position: Vec4,
    /// inner cutoff, outer cutoff, lighting enabled, normal debug
    pub params: Vec4,
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            light_position: Vec4::ZERO,
            spot_position: Vec4::ZERO,
            spot_direction: Vec4::NEG_Y,
            camera_position: Vec4::ZERO,
            params: Vec4::new(1.0, 1.0, 1.0, 0.0),
        }
    }
}

/// Per-draw values, matching `Draw` in scene.wgsl
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DrawUniforms {
    pub model: Mat4,
    pub normal: Mat4,
    pub color: Vec4,
}

impl Default for DrawUniforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            normal: Mat4::IDENTITY,
            color: Vec4::ONE,
        }
    }
}

/// Round `size` up to a multiple of `alignment`
pub fn aligned_stride(size: usize, alignment: u32) -> u64 {
    let alignment = u64::from(alignment.max(1));
    (size as u64).div_ceil(alignment) * alignment
}

fn uniform_entry(binding: u32, size: usize) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: true,
            min_binding_size: wgpu::BufferSize::new(size as u64),
        },
        count: None,
    }
}

pub fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Scene Uniforms Layout"),
        entries: &[
            uniform_entry(0, size_of::<FrameUniforms>()),
            uniform_entry(1, size_of::<DrawUniforms>()),
        ],
    })
}

fn vertex_layout(location: u32) -> wgpu::VertexBufferLayout<'static> {
    static POSITION: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
    static NORMAL: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];

    wgpu::VertexBufferLayout {
        array_stride: (3 * size_of::<f32>()) as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: if location == 0 { &POSITION } else { &NORMAL },
    }
}

/// Create the scene pipeline
///
/// Culling is off: the sky box is drawn inside out.
pub fn create_pipeline(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
    shader_module: &wgpu::ShaderModule,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Scene Pipeline Layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Scene Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader_module,
            entry_point: Some("vs"),
            buffers: &[vertex_layout(0), vertex_layout(1)],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader_module,
            entry_point: Some("fs"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_block_sizes() {
        // std140 layout: matrices and vec4s only, no padding
        assert_eq!(size_of::<FrameUniforms>(), 2 * 64 + 5 * 16);
        assert_eq!(size_of::<DrawUniforms>(), 2 * 64 + 16);
    }

    #[test]
    fn test_aligned_stride() {
        assert_eq!(aligned_stride(size_of::<FrameUniforms>(), 256), 256);
        assert_eq!(aligned_stride(size_of::<DrawUniforms>(), 256), 256);
        assert_eq!(aligned_stride(300, 256), 512);
        assert_eq!(aligned_stride(64, 64), 64);
    }

    #[test]
    fn test_shader_declares_entry_points() {
        let source = include_str!("../../shaders/scene.wgsl");
        assert!(source.contains("fn vs("));
        assert!(source.contains("fn fs("));
    }
}
