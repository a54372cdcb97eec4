//! Flattened scene graph output for drawing.
//!
//! `DrawItem` is the result of walking the scene graph: one entry per visible
//! mesh or point cloud, with its world transform resolved.

use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::geometry::MeshData;

use super::material::{Material, PointsMaterial};
use super::node::{PointCloud, SceneNodeId};

/// Drawable payload of a flattened node.
#[derive(Clone, Debug)]
pub enum DrawKind {
    Mesh {
        mesh: Arc<MeshData>,
        material: Material,
    },
    Points {
        cloud: Arc<PointCloud>,
        material: PointsMaterial,
    },
}

/// One entry in the flattened visible set.
#[derive(Clone, Debug)]
pub struct DrawItem {
    /// Node this entry was produced from.
    pub node: SceneNodeId,
    /// Local-to-world transform after propagation.
    pub world: Mat4,
    pub kind: DrawKind,
}

impl DrawItem {
    /// World-space origin of the node.
    pub fn world_position(&self) -> Vec3 {
        self.world.transform_point3(Vec3::ZERO)
    }

    /// Whether this item must be drawn after opaque geometry.
    pub fn is_transparent(&self) -> bool {
        match &self.kind {
            DrawKind::Mesh { material, .. } => material.is_transparent(),
            DrawKind::Points { material, .. } => material.opacity < 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Color, sphere};

    #[test]
    fn test_draw_item_world_position() {
        let item = DrawItem {
            node: SceneNodeId(3),
            world: Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            kind: DrawKind::Mesh {
                mesh: Arc::new(sphere(1.0, 8, 6)),
                material: Material::standard(Color::WHITE),
            },
        };
        assert_eq!(item.world_position(), Vec3::new(1.0, 2.0, 3.0));
        assert!(!item.is_transparent());
    }

    #[test]
    fn test_points_transparency() {
        let item = DrawItem {
            node: SceneNodeId(1),
            world: Mat4::IDENTITY,
            kind: DrawKind::Points {
                cloud: Arc::new(PointCloud::default()),
                material: PointsMaterial { color: Color::WHITE, size: 0.06, opacity: 0.8 },
            },
        };
        assert!(item.is_transparent());
    }
}
