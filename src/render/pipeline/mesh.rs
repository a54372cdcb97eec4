//! Forward-shaded mesh pipeline

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::geometry::Vertex;
use crate::render::texture::depth::depth_stencil_state;
use crate::scene::{Material, Shading};

/// Per-draw instance data (must match `InstanceInput` in mesh.wgsl)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MeshInstance {
    /// Model matrix (64 bytes, offset 0)
    pub model: [[f32; 4]; 4],
    /// Linear base color (12 bytes, offset 64)
    pub color: [f32; 3],
    /// Opacity (4 bytes, offset 76)
    pub opacity: f32,
    /// Roughness in [0, 1] (4 bytes, offset 80)
    pub roughness: f32,
    /// 1.0 skips lighting (4 bytes, offset 84)
    pub unlit: f32,
    /// Padding to 96 bytes
    pub _pad: [f32; 2],
}

impl MeshInstance {
    pub fn new(world: Mat4, material: &Material) -> Self {
        Self {
            model: world.to_cols_array_2d(),
            color: material.color.to_linear(),
            opacity: material.opacity,
            roughness: material.roughness,
            unlit: match material.shading {
                Shading::Standard => 0.0,
                Shading::Unlit => 1.0,
            },
            _pad: [0.0; 2],
        }
    }
}

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32x3, // normal
];

const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
    2 => Float32x4, // model col 0
    3 => Float32x4, // model col 1
    4 => Float32x4, // model col 2
    5 => Float32x4, // model col 3
    6 => Float32x4, // color + opacity
    7 => Float32,   // roughness
    8 => Float32,   // unlit
];

/// Opaque and translucent variants of the mesh pipeline
pub struct MeshPipeline {
    opaque: wgpu::RenderPipeline,
    transparent: wgpu::RenderPipeline,
}

impl MeshPipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        frame_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/mesh.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[frame_layout],
            immediate_size: 0,
        });

        let opaque = Self::create_pipeline(
            device,
            &shader,
            &pipeline_layout,
            surface_format,
            "mesh_opaque_pipeline",
            None,
            true,
            Some(wgpu::Face::Back),
        );
        // Translucent surfaces are thin (the sun disc), so draw both sides
        let transparent = Self::create_pipeline(
            device,
            &shader,
            &pipeline_layout,
            surface_format,
            "mesh_transparent_pipeline",
            Some(wgpu::BlendState::ALPHA_BLENDING),
            false,
            None,
        );

        Self { opaque, transparent }
    }

    #[allow(clippy::too_many_arguments)]
    fn create_pipeline(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        layout: &wgpu::PipelineLayout,
        surface_format: wgpu::TextureFormat,
        label: &str,
        blend: Option<wgpu::BlendState>,
        depth_write: bool,
        cull_mode: Option<wgpu::Face>,
    ) -> wgpu::RenderPipeline {
        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_ATTRIBUTES,
        };

        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &INSTANCE_ATTRIBUTES,
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout, instance_layout],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode,
                ..Default::default()
            },
            depth_stencil: Some(depth_stencil_state(depth_write)),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview_mask: None,
            cache: None,
        })
    }

    pub fn opaque(&self) -> &wgpu::RenderPipeline {
        &self.opaque
    }

    pub fn transparent(&self) -> &wgpu::RenderPipeline {
        &self.transparent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Color;

    #[test]
    fn test_instance_size() {
        assert_eq!(std::mem::size_of::<MeshInstance>(), 96);
    }

    #[test]
    fn test_instance_attributes_cover_struct() {
        let last = INSTANCE_ATTRIBUTES[INSTANCE_ATTRIBUTES.len() - 1];
        assert_eq!(last.offset, 84);
        assert_eq!(VERTEX_ATTRIBUTES[1].offset, 12);
    }

    #[test]
    fn test_instance_from_material() {
        let material = Material::unlit(Color::WHITE).with_opacity(0.9);
        let instance = MeshInstance::new(Mat4::IDENTITY, &material);
        assert_eq!(instance.unlit, 1.0);
        assert_eq!(instance.opacity, 0.9);
        assert_eq!(instance.model, Mat4::IDENTITY.to_cols_array_2d());

        let lit = MeshInstance::new(Mat4::IDENTITY, &Material::standard(Color::WHITE).with_roughness(0.2));
        assert_eq!(lit.unlit, 0.0);
        assert_eq!(lit.roughness, 0.2);
    }
}
