//! Viewport adapter: keeps the camera and drawing surface in step with the host

use crate::core::camera::Camera;

/// A render target whose pixel size follows the host viewport.
pub trait DrawingSurface {
    fn resize_surface(&mut self, width: u32, height: u32);
    fn surface_size(&self) -> (u32, u32);
}

/// Apply a viewport size to the camera and the drawing surface.
///
/// Sets the aspect ratio to `width / height`, recomputes the projection and
/// resizes the surface to exactly `width x height`. Zero-area sizes (a
/// minimized window) are ignored and return false.
pub fn apply_resize<S: DrawingSurface + ?Sized>(
    camera: &mut Camera,
    surface: &mut S,
    width: u32,
    height: u32,
) -> bool {
    if width == 0 || height == 0 {
        log::debug!("Ignoring zero-area resize to {}x{}", width, height);
        return false;
    }

    camera.set_aspect(width as f32, height as f32);
    camera.update_projection();
    surface.resize_surface(width, height);
    log::debug!("Viewport resized to {}x{}", width, height);
    true
}
