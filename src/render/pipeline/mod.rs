//! Render pipelines

pub mod mesh;
pub mod points;

pub use mesh::{MeshInstance, MeshPipeline};
pub use points::{PointsPipeline, PointsUniform};
