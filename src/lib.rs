//! Posy - an ambient 3D flower garden

pub mod core;
pub mod geometry;
pub mod scene;
pub mod garden;
pub mod render;
