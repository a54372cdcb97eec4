//! Forward renderer for flattened scene frames

use std::collections::HashMap;
use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::core::camera::Camera;
use crate::core::types::Result;
use crate::garden::FrameSink;
use crate::geometry::{MeshData, MeshId};
use crate::scene::{DrawItem, DrawKind, Environment, PointCloud, SceneNodeId};

use super::buffer::FrameBuffer;
use super::context::GpuContext;
use super::pipeline::points::QUAD_VERTICES;
use super::pipeline::{MeshInstance, MeshPipeline, PointsPipeline, PointsUniform};
use super::texture::DepthTexture;
use super::viewport::DrawingSurface;

/// Initial capacity of the per-frame instance buffer, in instances
const INITIAL_INSTANCE_CAPACITY: usize = 256;

/// Mesh buffers uploaded once per [`MeshId`]
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Point cloud buffers, one per scene node
struct GpuPointCloud {
    vertex_buffer: wgpu::Buffer,
    point_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Draws [`DrawItem`]s to the window surface.
///
/// Opaque meshes are drawn first with depth writes, then translucent meshes
/// and point clouds back to front with depth writes off.
pub struct Renderer {
    gpu: GpuContext,
    depth: DepthTexture,
    frame: FrameBuffer,
    mesh_pipeline: MeshPipeline,
    points_pipeline: PointsPipeline,
    meshes: HashMap<MeshId, GpuMesh>,
    clouds: HashMap<SceneNodeId, GpuPointCloud>,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    environment: Environment,
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("mesh_instances"),
        size: (capacity * std::mem::size_of::<MeshInstance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl Renderer {
    pub fn new(gpu: GpuContext, environment: Environment) -> Self {
        let (width, height) = gpu.size();
        let format = gpu.format();

        let depth = DepthTexture::new(&gpu.device, width, height);
        let frame = FrameBuffer::new(&gpu.device);
        let mesh_pipeline = MeshPipeline::new(&gpu.device, format, frame.bind_group_layout());
        let points_pipeline = PointsPipeline::new(&gpu.device, format, frame.bind_group_layout());
        let instance_buffer = create_instance_buffer(&gpu.device, INITIAL_INSTANCE_CAPACITY);

        Self {
            gpu,
            depth,
            frame,
            mesh_pipeline,
            points_pipeline,
            meshes: HashMap::new(),
            clouds: HashMap::new(),
            instance_buffer,
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            environment,
        }
    }

    fn clear_color(&self) -> wgpu::Color {
        let [r, g, b] = self.environment.background.to_linear();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }

    fn upload_mesh(&mut self, mesh: &Arc<MeshData>) {
        if self.meshes.contains_key(&mesh.id()) || mesh.indices.is_empty() {
            return;
        }

        let device = &self.gpu.device;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertices"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "Uploaded mesh {:?}: {} vertices, {} triangles",
            mesh.id(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        self.meshes.insert(
            mesh.id(),
            GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: mesh.indices.len() as u32,
            },
        );
    }

    fn upload_cloud(&mut self, node: SceneNodeId, cloud: &Arc<PointCloud>) {
        if self.clouds.contains_key(&node) || cloud.is_empty() {
            return;
        }

        let device = &self.gpu.device;
        let positions: Vec<[f32; 3]> = cloud.positions.iter().map(|p| p.to_array()).collect();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("point_cloud_positions"),
            contents: bytemuck::cast_slice(&positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("point_cloud_uniform"),
            size: std::mem::size_of::<PointsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("point_cloud_bind_group"),
            layout: self.points_pipeline.cloud_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        self.clouds.insert(
            node,
            GpuPointCloud {
                vertex_buffer,
                point_count: cloud.len() as u32,
                uniform_buffer,
                bind_group,
            },
        );
    }

    /// Grow the instance buffer to hold at least `count` instances
    fn reserve_instances(&mut self, count: usize) {
        if count <= self.instance_capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        self.instance_buffer = create_instance_buffer(&self.gpu.device, capacity);
        self.instance_capacity = capacity;
        log::debug!("Instance buffer grown to {} instances", capacity);
    }

    /// Upload resources and per-frame data, then record and submit one frame
    pub fn render(&mut self, items: &[DrawItem], camera: &Camera) -> Result<()> {
        for item in items {
            match &item.kind {
                DrawKind::Mesh { mesh, .. } => self.upload_mesh(mesh),
                DrawKind::Points { cloud, .. } => self.upload_cloud(item.node, cloud),
            }
        }

        let (opaque, mut transparent): (Vec<&DrawItem>, Vec<&DrawItem>) =
            items.iter().partition(|item| !item.is_transparent());
        let eye = camera.position;
        transparent.sort_by(|a, b| {
            let da = a.world_position().distance_squared(eye);
            let db = b.world_position().distance_squared(eye);
            db.total_cmp(&da)
        });
        let ordered: Vec<&DrawItem> = opaque.iter().chain(transparent.iter()).copied().collect();

        // One instance slot per mesh item, in draw order
        let mut instances = Vec::with_capacity(ordered.len());
        let mut slots = Vec::with_capacity(ordered.len());
        for item in &ordered {
            match &item.kind {
                DrawKind::Mesh { material, .. } => {
                    slots.push(Some(instances.len() as u32));
                    instances.push(MeshInstance::new(item.world, material));
                }
                DrawKind::Points { material, .. } => {
                    if let Some(cloud) = self.clouds.get(&item.node) {
                        let uniform = PointsUniform::new(item.world, material);
                        self.gpu.queue.write_buffer(&cloud.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
                    }
                    slots.push(None);
                }
            }
        }

        self.reserve_instances(instances.len());
        if !instances.is_empty() {
            self.gpu.queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
        self.frame.update(&self.gpu.queue, camera, &self.environment);

        let output = match self.gpu.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to get surface texture, skipping frame: {}", e);
                self.gpu.reconfigure();
                return Ok(());
            }
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.depth.view(),
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

            pass.set_bind_group(0, self.frame.bind_group(), &[]);

            for (index, item) in ordered.iter().enumerate() {
                let transparent_item = index >= opaque.len();
                match &item.kind {
                    DrawKind::Mesh { mesh, .. } => {
                        let (Some(gpu_mesh), Some(slot)) = (self.meshes.get(&mesh.id()), slots[index]) else {
                            continue;
                        };
                        let pipeline = if transparent_item {
                            self.mesh_pipeline.transparent()
                        } else {
                            self.mesh_pipeline.opaque()
                        };
                        pass.set_pipeline(pipeline);
                        pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
                        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                        pass.set_index_buffer(gpu_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..gpu_mesh.index_count, 0, slot..slot + 1);
                    }
                    DrawKind::Points { .. } => {
                        let Some(cloud) = self.clouds.get(&item.node) else {
                            continue;
                        };
                        pass.set_pipeline(self.points_pipeline.pipeline());
                        pass.set_bind_group(1, &cloud.bind_group, &[]);
                        pass.set_vertex_buffer(0, cloud.vertex_buffer.slice(..));
                        pass.draw(0..QUAD_VERTICES, 0..cloud.point_count);
                    }
                }
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl FrameSink for Renderer {
    fn draw(&mut self, items: &[DrawItem], camera: &Camera) -> Result<()> {
        self.render(items, camera)
    }
}

impl DrawingSurface for Renderer {
    fn resize_surface(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.depth.resize(&self.gpu.device, width, height);
    }

    fn surface_size(&self) -> (u32, u32) {
        self.gpu.size()
    }
}
