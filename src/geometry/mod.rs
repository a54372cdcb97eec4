//! Procedural mesh generation
//!
//! Everything here is pure CPU-side tessellation: functions take shape
//! parameters and return [`MeshData`] ready to be attached to a scene node.

pub mod color;
pub mod mesh;
pub mod shapes;
pub mod tube;

pub use color::Color;
pub use mesh::{MeshData, MeshId, Vertex};
pub use shapes::{disc, sphere};
pub use tube::{swirl, tube};
