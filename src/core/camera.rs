//! Perspective camera

use crate::core::types::{Mat3, Mat4, Quat, Vec3};

/// Camera with position, rotation, and projection parameters
#[derive(Clone, Debug)]
pub struct Camera {
    /// World position
    pub position: Vec3,
    /// Rotation as quaternion
    pub rotation: Quat,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
    /// Projection derived from fov/aspect/near/far
    projection: Mat4,
}

impl Camera {
    /// Create a new camera looking down -Z
    pub fn new(position: Vec3, fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position,
            rotation: Quat::IDENTITY,
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near,
            far,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    /// Rotate the camera in place so it faces `target`.
    ///
    /// Leaves the rotation unchanged when `target` is the camera position.
    /// Looking straight up or down uses +Z as the reference up axis.
    pub fn look_at_target(&mut self, target: Vec3) {
        let Some(forward) = (target - self.position).try_normalize() else {
            return;
        };
        let right = forward
            .cross(Vec3::Y)
            .try_normalize()
            .unwrap_or_else(|| forward.cross(Vec3::Z).normalize());
        let up = right.cross(forward);

        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, up, -forward));
    }

    /// Get view matrix (world to camera space)
    pub fn view_matrix(&self) -> Mat4 {
        let rotation_matrix = Mat4::from_quat(self.rotation.conjugate());
        let translation_matrix = Mat4::from_translation(-self.position);
        rotation_matrix * translation_matrix
    }

    /// Get projection matrix (camera to clip space)
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Recompute the projection from the current intrinsics
    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far);
    }

    /// Get combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Get forward direction (negative Z in camera space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get right direction (positive X in camera space)
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get up direction (positive Y in camera space)
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Update aspect ratio (call on window resize)
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        self.aspect = width / height;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 2.0, 8.0), 50.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions() {
        let camera = Camera::default();

        let forward = camera.forward();
        assert!((forward.z - (-1.0)).abs() < 0.001);

        let right = camera.right();
        assert!((right.x - 1.0).abs() < 0.001);

        let up = camera.up();
        assert!((up.y - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_look_at_target_faces_target() {
        let mut camera = Camera::default();
        camera.position = Vec3::new(15.0, 2.0, 0.0);
        let target = Vec3::new(0.0, 0.5, 0.0);
        camera.look_at_target(target);

        let expected = (target - camera.position).normalize();
        assert!((camera.forward() - expected).length() < 1e-4);
        // Target projects to the center of the screen
        let clip = camera.view_projection() * target.extend(1.0);
        assert!((clip.x / clip.w).abs() < 1e-4);
        assert!((clip.y / clip.w).abs() < 1e-4);
    }

    #[test]
    fn test_look_at_target_straight_down() {
        let mut camera = Camera::default();
        camera.position = Vec3::new(0.0, 10.0, 0.0);
        let target = Vec3::ZERO;
        camera.look_at_target(target);

        assert!(camera.rotation.is_finite());
        assert!((camera.forward() - Vec3::NEG_Y).length() < 1e-4);
        assert!(camera.view_projection().is_finite());

        camera.position = Vec3::new(0.0, -3.0, 0.0);
        camera.look_at_target(target);
        assert!((camera.forward() - Vec3::Y).length() < 1e-4);
        assert!(camera.view_projection().is_finite());
    }

    #[test]
    fn test_look_at_own_position_keeps_rotation() {
        let mut camera = Camera::default();
        camera.look_at_target(Vec3::new(3.0, 0.0, 0.0));
        let before = camera.rotation;
        camera.look_at_target(camera.position);
        assert_eq!(camera.rotation, before);
    }

    #[test]
    fn test_view_matrix_translation() {
        let mut camera = Camera::default();
        camera.position = Vec3::new(10.0, 0.0, 0.0);

        let view = camera.view_matrix();
        let origin_in_camera = view.transform_point3(Vec3::ZERO);
        assert!((origin_in_camera.x - (-10.0)).abs() < 0.001);
    }

    #[test]
    fn test_projection_follows_aspect_after_update() {
        let mut camera = Camera::default();
        camera.set_aspect(800.0, 400.0);
        assert_eq!(camera.aspect, 2.0);

        camera.update_projection();
        let expected = Mat4::perspective_rh(camera.fov_y, 2.0, camera.near, camera.far);
        assert_eq!(camera.projection_matrix(), expected);
    }
}
