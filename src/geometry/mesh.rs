//! Indexed triangle meshes

use std::sync::atomic::{AtomicU64, Ordering};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier assigned to every mesh at construction.
///
/// The renderer uploads each id once and reuses the GPU buffers for every
/// node that shares the same mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub u64);

/// Mesh vertex (must match `mesh.wgsl` vertex input)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// CPU-side triangle list with 32-bit indices.
#[derive(Clone, Debug)]
pub struct MeshData {
    id: MeshId,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Wrap vertices and indices, assigning a fresh [`MeshId`].
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        let id = MeshId(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed));
        Self { id, vertices, indices }
    }

    pub fn id(&self) -> MeshId {
        self.id
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds of all vertex positions as (min, max).
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), v| {
                let p = Vec3::from_array(v.position);
                (min.min(p), max.max(p))
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_ids_are_unique() {
        let a = MeshData::new(Vec::new(), Vec::new());
        let b = MeshData::new(Vec::new(), Vec::new());
        assert_ne!(a.id(), b.id());
        // Clones share the id so they share GPU buffers
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }

    #[test]
    fn test_bounds() {
        let mesh = MeshData::new(
            vec![
                Vertex::new(Vec3::new(-1.0, 0.0, 2.0), Vec3::Y),
                Vertex::new(Vec3::new(3.0, -2.0, 0.5), Vec3::Y),
            ],
            vec![],
        );
        let (min, max) = mesh.bounds();
        assert_eq!(min, Vec3::new(-1.0, -2.0, 0.5));
        assert_eq!(max, Vec3::new(3.0, 0.0, 2.0));
    }
}
