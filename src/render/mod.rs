//! Rendering system and GPU interfaces

pub mod window;
pub mod context;
pub mod buffer;
pub mod pipeline;
pub mod texture;
pub mod renderer;
pub mod viewport;

pub use renderer::Renderer;
pub use viewport::{DrawingSurface, apply_resize};
pub use window::{WindowConfig, run};
