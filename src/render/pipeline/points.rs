//! Point sprites: one camera-facing quad per point

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::render::texture::depth::depth_stencil_state;
use crate::scene::PointsMaterial;

/// Vertices per point quad (two triangles, no index buffer)
pub const QUAD_VERTICES: u32 = 6;

/// Per-cloud uniform data (must match `Cloud` in points.wgsl)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PointsUniform {
    /// Model matrix (64 bytes, offset 0)
    pub model: [[f32; 4]; 4],
    /// Linear color (12 bytes, offset 64)
    pub color: [f32; 3],
    /// Opacity (4 bytes, offset 76)
    pub opacity: f32,
    /// Quad side in world units (4 bytes, offset 80)
    pub size: f32,
    /// Padding to 96 bytes
    pub _pad: [f32; 3],
}

impl PointsUniform {
    pub fn new(world: Mat4, material: &PointsMaterial) -> Self {
        Self {
            model: world.to_cols_array_2d(),
            color: material.color.to_linear(),
            opacity: material.opacity,
            size: material.size,
            _pad: [0.0; 3],
        }
    }
}

/// Alpha-blended point sprite pipeline
pub struct PointsPipeline {
    pipeline: wgpu::RenderPipeline,
    cloud_layout: wgpu::BindGroupLayout,
}

impl PointsPipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        frame_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("points_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/points.wgsl").into()),
        });

        let cloud_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("points_cloud_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("points_pipeline_layout"),
            bind_group_layouts: &[frame_layout, &cloud_layout],
            immediate_size: 0,
        });

        // Point centers advance once per quad
        let point_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            }],
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("points_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[point_layout],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(depth_stencil_state(false)),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            cloud_layout,
        }
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Layout of the per-cloud bind group (group 1)
    pub fn cloud_layout(&self) -> &wgpu::BindGroupLayout {
        &self.cloud_layout
    }
}
