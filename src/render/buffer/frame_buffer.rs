//! GPU uniform buffer for per-frame camera, fog and lighting data

use bytemuck::{Pod, Zeroable};
use crate::core::camera::Camera;
use crate::scene::Environment;

/// Per-frame uniform data for GPU (must match `Frame` in the shaders)
/// WGSL vec3 has 16-byte alignment, so each vec3 is paired with a scalar
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniform {
    /// View-projection matrix (64 bytes, offset 0)
    pub view_proj: [[f32; 4]; 4],
    /// Camera position in world space (12 bytes, offset 64)
    pub camera_position: [f32; 3],
    /// Distance where fog starts (4 bytes, offset 76)
    pub fog_near: f32,
    /// Linear fog color (12 bytes, offset 80)
    pub fog_color: [f32; 3],
    /// Distance where fog is fully opaque (4 bytes, offset 92)
    pub fog_far: f32,
    /// Ambient light, color times intensity (12 bytes, offset 96)
    pub ambient: [f32; 3],
    /// 1.0 when fog is applied (4 bytes, offset 108)
    pub fog_enabled: f32,
    /// Unit vector from surfaces toward the directional light (offset 112)
    pub light_dir: [f32; 3],
    pub _pad0: f32,
    /// Directional light, color times intensity (offset 128)
    pub light_color: [f32; 3],
    pub _pad1: f32,
    /// Camera right vector for billboards (offset 144)
    pub camera_right: [f32; 3],
    pub _pad2: f32,
    /// Camera up vector for billboards (offset 160)
    pub camera_up: [f32; 3],
    pub _pad3: f32,
}

fn scaled(color: [f32; 3], intensity: f32) -> [f32; 3] {
    color.map(|c| c * intensity)
}

impl FrameUniform {
    /// Build the uniform from the camera and scene environment
    pub fn new(camera: &Camera, environment: &Environment) -> Self {
        let (fog_color, fog_near, fog_far, fog_enabled) = match &environment.fog {
            Some(fog) => (fog.color.to_linear(), fog.near, fog.far, 1.0),
            None => ([0.0; 3], 0.0, 0.0, 0.0),
        };

        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_position: camera.position.to_array(),
            fog_near,
            fog_color,
            fog_far,
            ambient: scaled(environment.ambient.color.to_linear(), environment.ambient.intensity),
            fog_enabled,
            light_dir: environment.sun.direction_to_light().to_array(),
            _pad0: 0.0,
            light_color: scaled(environment.sun.color.to_linear(), environment.sun.intensity),
            _pad1: 0.0,
            camera_right: camera.right().to_array(),
            _pad2: 0.0,
            camera_up: camera.up().to_array(),
            _pad3: 0.0,
        }
    }
}

/// GPU buffer for the frame uniform
pub struct FrameBuffer {
    /// Uniform buffer
    buffer: wgpu::Buffer,
    /// Bind group layout
    bind_group_layout: wgpu::BindGroupLayout,
    /// Bind group
    bind_group: wgpu::BindGroup,
}

impl FrameBuffer {
    /// Create new frame buffer
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_uniform"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
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

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group_layout,
            bind_group,
        }
    }

    /// Upload this frame's camera and environment
    pub fn update(&self, queue: &wgpu::Queue, camera: &Camera, environment: &Environment) {
        let uniform = FrameUniform::new(camera, environment);
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Get bind group layout
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Get bind group
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size() {
        // Must be exactly 176 bytes to match WGSL struct layout
        let size = std::mem::size_of::<FrameUniform>();
        assert_eq!(size, 176, "FrameUniform must be exactly 176 bytes, got {} bytes", size);
    }

    #[test]
    fn test_from_camera_and_environment() {
        let camera = Camera::default();
        let environment = Environment::default();
        let uniform = FrameUniform::new(&camera, &environment);

        assert_eq!(uniform.camera_position, camera.position.to_array());
        assert_eq!(uniform.fog_near, 10.0);
        assert_eq!(uniform.fog_far, 40.0);
        assert_eq!(uniform.fog_enabled, 1.0);
        assert!(uniform.ambient.iter().all(|c| (c - 0.8).abs() < 1e-5));
        assert!(uniform.light_color.iter().all(|c| (c - 0.6).abs() < 1e-5));

        let dir = glam::Vec3::from_array(uniform.light_dir);
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.y > 0.0);
    }

    #[test]
    fn test_fog_disabled() {
        let environment = Environment {
            fog: None,
            ..Default::default()
        };
        let uniform = FrameUniform::new(&Camera::default(), &environment);
        assert_eq!(uniform.fog_enabled, 0.0);
    }

    #[test]
    fn test_clip_w_is_view_depth() {
        // Fog in the shaders reads view depth from clip w
        let mut camera = Camera::default();
        camera.position = glam::Vec3::new(15.0, 2.0, 0.0);
        camera.look_at_target(glam::Vec3::new(0.0, 0.5, 0.0));
        let uniform = FrameUniform::new(&camera, &Environment::default());
        let view_proj = glam::Mat4::from_cols_array_2d(&uniform.view_proj);

        // Off-axis point: radial distance differs from depth
        let point = glam::Vec3::new(-10.0, 0.5, 12.0);
        let clip = view_proj * point.extend(1.0);
        let depth = -camera.view_matrix().transform_point3(point).z;
        assert!((clip.w - depth).abs() < 1e-3);
        assert!((point - camera.position).length() - depth > 1.0);
    }
}
