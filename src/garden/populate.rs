//! Scene population: scatter flowers, scatter sparkles, light the sky

use std::sync::Arc;

use glam::Vec3;
use rand::Rng;

use crate::geometry::{Color, disc};
use crate::scene::{
    FlowerConfig, GardenConfig, LocalTransform, Material, NodeContent, PointCloud,
    PointsMaterial, SceneGraph, SceneNodeId, SparkleConfig,
};

use super::flower::{FlowerMeshes, FlowerPlacement, build_flower};

/// Handle to one planted flower and its animation state.
#[derive(Clone, Debug, PartialEq)]
pub struct Flower {
    pub node: SceneNodeId,
    /// Offset into the bobbing wave, fixed at planting
    pub phase: f32,
    pub color: Color,
    /// Accumulated rotation about +Y, kept in [0, 2π)
    pub yaw: f32,
}

/// Handle to the ambient sparkle field.
#[derive(Clone, Debug, PartialEq)]
pub struct SparkleField {
    pub node: SceneNodeId,
    pub yaw: f32,
}

/// A populated garden: the scene plus handles to everything that animates.
pub struct Garden {
    pub graph: SceneGraph,
    pub flowers: Vec<Flower>,
    pub sparkles: SparkleField,
    pub sun_glow: Option<SceneNodeId>,
}

impl Garden {
    pub fn flower_count(&self) -> usize {
        self.flowers.len()
    }
}

/// Uniform sample in `[-size/2, size/2)`.
fn centered<R: Rng + ?Sized>(rng: &mut R, size: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * size
}

/// Draw flower positions and colors.
///
/// The palette must be non-empty; an empty palette yields no flowers.
pub fn sample_flowers<R: Rng + ?Sized>(config: &FlowerConfig, rng: &mut R) -> Vec<FlowerPlacement> {
    if config.palette.is_empty() {
        return Vec::new();
    }

    (0..config.count)
        .map(|_| {
            let x = centered(rng, config.field_size);
            let z = centered(rng, config.field_size);
            let color = config.palette[rng.random_range(0..config.palette.len())];
            FlowerPlacement { x, z, color }
        })
        .collect()
}

/// Scatter sparkle points through the configured box.
pub fn sample_sparkles<R: Rng + ?Sized>(config: &SparkleConfig, rng: &mut R) -> PointCloud {
    let positions = (0..config.count)
        .map(|_| {
            let x = centered(rng, config.extent.x);
            let y = rng.random::<f32>() * config.extent.y;
            let z = centered(rng, config.extent.z);
            Vec3::new(x, y, z)
        })
        .collect();
    PointCloud { positions }
}

/// Build the whole garden scene from `config`, drawing randomness from `rng`.
///
/// Flowers are created first, in order, and each gets its creation index as
/// its bobbing phase. The sparkle field and sun glow follow.
pub fn populate<R: Rng + ?Sized>(config: &GardenConfig, rng: &mut R) -> Garden {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let meshes = FlowerMeshes::new();

    let placements = sample_flowers(&config.flowers, rng);
    let flowers = placements
        .into_iter()
        .enumerate()
        .map(|(i, placement)| {
            let node = build_flower(
                &mut graph,
                root,
                &meshes,
                placement,
                config.flowers.base_height,
                format!("flower_{}", i),
            );
            Flower {
                node,
                phase: i as f32,
                color: placement.color,
                yaw: 0.0,
            }
        })
        .collect::<Vec<_>>();

    let cloud = sample_sparkles(&config.sparkles, rng);
    let sparkle_node = graph.add_child(
        root,
        "sparkles",
        NodeContent::Points {
            cloud: Arc::new(cloud),
            material: PointsMaterial {
                color: config.sparkles.color,
                size: config.sparkles.size,
                opacity: config.sparkles.opacity,
            },
        },
    );

    let sun_glow = config.environment.sun_glow.as_ref().map(|glow| {
        let node = graph.add_child(
            root,
            "sun_glow",
            NodeContent::Mesh {
                mesh: Arc::new(disc(glow.radius, glow.segments)),
                material: Material::unlit(glow.color).with_opacity(glow.opacity),
            },
        );
        graph.set_transform(node, LocalTransform::from_position(glow.position));
        node
    });

    log::info!(
        "Planted {} flowers and {} sparkles",
        flowers.len(),
        config.sparkles.count
    );

    Garden {
        graph,
        flowers,
        sparkles: SparkleField {
            node: sparkle_node,
            yaw: 0.0,
        },
        sun_glow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{DrawKind, Shading};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_default_population() {
        let config = GardenConfig::default();
        let garden = populate(&config, &mut seeded(1));

        assert_eq!(garden.flower_count(), 30);
        assert!(garden.sun_glow.is_some());
        let sparkles = garden.graph.get(garden.sparkles.node).unwrap();
        match &sparkles.content {
            NodeContent::Points { cloud, material } => {
                assert_eq!(cloud.len(), 200);
                assert_eq!(material.size, 0.06);
                assert_eq!(material.opacity, 0.8);
            }
            other => panic!("sparkles should be a point cloud, got {:?}", other),
        }
    }

    #[test]
    fn test_flower_positions_within_field() {
        let config = FlowerConfig::default();
        let placements = sample_flowers(&config, &mut seeded(42));
        assert_eq!(placements.len(), 30);
        for p in &placements {
            assert!(p.x >= -12.5 && p.x <= 12.5, "x out of field: {}", p.x);
            assert!(p.z >= -12.5 && p.z <= 12.5, "z out of field: {}", p.z);
            assert!(config.palette.contains(&p.color));
        }
    }

    #[test]
    fn test_flowers_placed_at_base_height() {
        let config = GardenConfig::default();
        let garden = populate(&config, &mut seeded(3));
        for flower in &garden.flowers {
            let t = &garden.graph.get(flower.node).unwrap().local_transform;
            assert_eq!(t.position.y, 0.5);
        }
    }

    #[test]
    fn test_phase_is_creation_index() {
        let garden = populate(&GardenConfig::default(), &mut seeded(9));
        for (i, flower) in garden.flowers.iter().enumerate() {
            assert_eq!(flower.phase, i as f32);
            assert_eq!(flower.yaw, 0.0);
        }
    }

    #[test]
    fn test_sparkles_within_box() {
        let config = SparkleConfig::default();
        let cloud = sample_sparkles(&config, &mut seeded(5));
        assert_eq!(cloud.len(), 200);
        for p in &cloud.positions {
            assert!(p.x.abs() <= 25.0);
            assert!(p.z.abs() <= 25.0);
            assert!(p.y >= 0.0 && p.y <= 15.0);
        }
    }

    #[test]
    fn test_same_seed_same_garden() {
        let config = GardenConfig::default();
        let a = sample_flowers(&config.flowers, &mut seeded(77));
        let b = sample_flowers(&config.flowers, &mut seeded(77));
        assert_eq!(a, b);

        let c = sample_flowers(&config.flowers, &mut seeded(78));
        assert_ne!(a, c);
    }

    #[test]
    fn test_zero_flowers() {
        let mut config = GardenConfig::default();
        config.flowers.count = 0;
        let mut garden = populate(&config, &mut seeded(0));
        assert!(garden.flowers.is_empty());

        // Only sparkles and the sun glow are left to draw
        assert_eq!(garden.graph.flatten().len(), 2);
    }

    #[test]
    fn test_empty_palette_plants_nothing() {
        let mut config = FlowerConfig::default();
        config.palette.clear();
        assert!(sample_flowers(&config, &mut seeded(0)).is_empty());
    }

    #[test]
    fn test_sun_glow_is_unlit_and_translucent() {
        let config = GardenConfig::default();
        let garden = populate(&config, &mut seeded(2));
        let glow = garden.graph.get(garden.sun_glow.unwrap()).unwrap();
        assert_eq!(glow.local_transform.position, Vec3::new(-10.0, 15.0, -20.0));
        match &glow.content {
            NodeContent::Mesh { material, .. } => {
                assert_eq!(material.shading, Shading::Unlit);
                assert_eq!(material.opacity, 0.9);
                assert!(material.is_transparent());
            }
            other => panic!("sun glow should be a mesh, got {:?}", other),
        }
    }

    #[test]
    fn test_no_sun_glow_when_disabled() {
        let mut config = GardenConfig::default();
        config.environment.sun_glow = None;
        let mut garden = populate(&config, &mut seeded(2));
        assert!(garden.sun_glow.is_none());
        assert!(!garden
            .graph
            .flatten()
            .iter()
            .any(|item| matches!(&item.kind, DrawKind::Mesh { material, .. } if material.shading == Shading::Unlit)));
    }
}
