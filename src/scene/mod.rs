//! Retained-mode scene: node hierarchy, materials, environment and config

pub mod config;
pub mod environment;
pub mod flatten;
pub mod graph;
pub mod material;
pub mod node;

pub use config::{CameraConfig, FlowerConfig, GardenConfig, SparkleConfig, SpinRate};
pub use environment::{AmbientLight, DirectionalLight, Environment, Fog, SunGlow};
pub use flatten::{DrawItem, DrawKind};
pub use graph::SceneGraph;
pub use material::{Material, PointsMaterial, Shading};
pub use node::{LocalTransform, NodeContent, PointCloud, SceneNode, SceneNodeId};
