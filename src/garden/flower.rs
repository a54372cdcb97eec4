//! Procedural flower: a ring of petals, a center and a swirling stem

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::Vec3;

use crate::geometry::{Color, MeshData, sphere, swirl, tube};
use crate::scene::{LocalTransform, Material, NodeContent, SceneGraph, SceneNodeId};

pub const PETAL_COUNT: usize = 6;
pub const PETAL_RADIUS: f32 = 0.3;
/// Distance of each petal center from the flower's vertical axis
pub const PETAL_RING_RADIUS: f32 = 0.6;
pub const CENTER_RADIUS: f32 = 0.25;
pub const CENTER_COLOR: Color = Color::from_rgb_hex(0xffff00);
pub const SPHERE_SEGMENTS: u32 = 32;

pub const STEM_COLOR: Color = Color::from_rgb_hex(0x228b25);
pub const STEM_ROUGHNESS: f32 = 0.2;
pub const STEM_RADIUS: f32 = 0.05;
pub const STEM_SEGMENTS: u32 = 64;
pub const STEM_RADIAL_SEGMENTS: u32 = 8;

/// Tessellated parts shared by every flower.
///
/// Flowers differ only in transform and petal color, so the meshes are
/// built once and referenced from every node.
#[derive(Clone, Debug)]
pub struct FlowerMeshes {
    pub petal: Arc<MeshData>,
    pub center: Arc<MeshData>,
    pub stem: Arc<MeshData>,
}

impl FlowerMeshes {
    pub fn new() -> Self {
        Self {
            petal: Arc::new(sphere(PETAL_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS)),
            center: Arc::new(sphere(CENTER_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS)),
            stem: Arc::new(tube(swirl, STEM_SEGMENTS, STEM_RADIUS, STEM_RADIAL_SEGMENTS, false)),
        }
    }
}

impl Default for FlowerMeshes {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a flower goes and what color its petals are.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowerPlacement {
    pub x: f32,
    pub z: f32,
    pub color: Color,
}

/// Local offset of petal `index` on the ring around the flower axis.
pub fn petal_offset(index: usize) -> Vec3 {
    let angle = index as f32 / PETAL_COUNT as f32 * TAU;
    Vec3::new(angle.cos() * PETAL_RING_RADIUS, 0.0, angle.sin() * PETAL_RING_RADIUS)
}

/// Build one flower group under `parent` and return the group node.
///
/// The group origin sits at `(x, base_height, z)`; the center sphere is at
/// the origin, petals ring it in the horizontal plane and the stem hangs
/// below it.
pub fn build_flower(
    graph: &mut SceneGraph,
    parent: SceneNodeId,
    meshes: &FlowerMeshes,
    placement: FlowerPlacement,
    base_height: f32,
    name: impl Into<String>,
) -> SceneNodeId {
    let group = graph.add_child(parent, name, NodeContent::Group);
    graph.set_transform(
        group,
        LocalTransform::from_position(Vec3::new(placement.x, base_height, placement.z)),
    );

    let petal_material = Material::standard(placement.color);
    for i in 0..PETAL_COUNT {
        let petal = graph.add_child(
            group,
            format!("petal_{}", i),
            NodeContent::Mesh {
                mesh: meshes.petal.clone(),
                material: petal_material,
            },
        );
        graph.set_transform(petal, LocalTransform::from_position(petal_offset(i)));
    }

    graph.add_child(
        group,
        "center",
        NodeContent::Mesh {
            mesh: meshes.center.clone(),
            material: Material::standard(CENTER_COLOR),
        },
    );

    graph.add_child(
        group,
        "stem",
        NodeContent::Mesh {
            mesh: meshes.stem.clone(),
            material: Material::standard(STEM_COLOR).with_roughness(STEM_ROUGHNESS),
        },
    );

    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::DrawKind;

    fn build_one(x: f32, z: f32, color: Color) -> (SceneGraph, SceneNodeId) {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let meshes = FlowerMeshes::new();
        let id = build_flower(&mut graph, root, &meshes, FlowerPlacement { x, z, color }, 0.5, "flower");
        (graph, id)
    }

    #[test]
    fn test_flower_structure() {
        let (graph, flower) = build_one(1.0, -2.0, Color::from_rgb_hex(0x87ceeb));

        // group + 6 petals + center + stem under the root
        assert_eq!(graph.node_count(), 1 + 1 + PETAL_COUNT + 2);
        let children: Vec<_> = graph.children(flower).collect();
        assert_eq!(children.len(), PETAL_COUNT + 2);

        let names: Vec<_> = children.iter().map(|&c| graph.get(c).unwrap().name.clone()).collect();
        assert_eq!(names[PETAL_COUNT], "center");
        assert_eq!(names[PETAL_COUNT + 1], "stem");
    }

    #[test]
    fn test_flower_group_position() {
        let (graph, flower) = build_one(3.5, -7.25, Color::WHITE);
        let t = &graph.get(flower).unwrap().local_transform;
        assert_eq!(t.position, Vec3::new(3.5, 0.5, -7.25));
    }

    #[test]
    fn test_petals_evenly_spaced_on_ring() {
        let (graph, flower) = build_one(0.0, 0.0, Color::WHITE);
        let petals: Vec<_> = graph.children(flower).take(PETAL_COUNT).collect();

        for (i, &petal) in petals.iter().enumerate() {
            let pos = graph.get(petal).unwrap().local_transform.position;
            assert!((pos.length() - PETAL_RING_RADIUS).abs() < 1e-5);
            assert_eq!(pos.y, 0.0);
            let expected_angle = i as f32 * TAU / PETAL_COUNT as f32;
            let angle = pos.z.atan2(pos.x).rem_euclid(TAU);
            assert!((angle - expected_angle).abs() < 1e-4 || (angle - expected_angle).abs() > TAU - 1e-4);
        }
    }

    #[test]
    fn test_center_at_group_origin() {
        let (graph, flower) = build_one(2.0, 2.0, Color::WHITE);
        let center = graph.children(flower).nth(PETAL_COUNT).unwrap();
        assert_eq!(graph.get(center).unwrap().local_transform.position, Vec3::ZERO);
    }

    #[test]
    fn test_materials() {
        let petal_color = Color::from_rgb_hex(0xda70d6);
        let (mut graph, _) = build_one(0.0, 0.0, petal_color);
        let items = graph.flatten();
        assert_eq!(items.len(), PETAL_COUNT + 2);

        let materials: Vec<_> = items
            .iter()
            .map(|item| match &item.kind {
                DrawKind::Mesh { material, .. } => *material,
                DrawKind::Points { .. } => panic!("flower has no point clouds"),
            })
            .collect();

        assert!(materials[..PETAL_COUNT].iter().all(|m| m.color == petal_color && m.roughness == 1.0));
        assert_eq!(materials[PETAL_COUNT].color, CENTER_COLOR);
        assert_eq!(materials[PETAL_COUNT + 1].color, STEM_COLOR);
        assert_eq!(materials[PETAL_COUNT + 1].roughness, STEM_ROUGHNESS);
    }

    #[test]
    fn test_petals_share_one_mesh() {
        let meshes = FlowerMeshes::new();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let placement = FlowerPlacement { x: 0.0, z: 0.0, color: Color::WHITE };
        build_flower(&mut graph, root, &meshes, placement, 0.5, "a");
        build_flower(&mut graph, root, &meshes, placement, 0.5, "b");

        let petal_ids: Vec<_> = graph
            .flatten()
            .iter()
            .filter_map(|item| match &item.kind {
                DrawKind::Mesh { mesh, .. } if mesh.id() == meshes.petal.id() => Some(mesh.id()),
                _ => None,
            })
            .collect();
        assert_eq!(petal_ids.len(), 2 * PETAL_COUNT);
    }

    #[test]
    fn test_stem_hangs_below_flower() {
        let meshes = FlowerMeshes::new();
        let (min, max) = meshes.stem.bounds();
        assert!(min.y < -1.5 + 1e-3 && min.y > -1.5 - STEM_RADIUS - 1e-3);
        assert!(max.y <= STEM_RADIUS + 1e-3);
    }
}
