//! Per-frame animation: flowers bob and spin, sparkles drift, camera orbits

use std::f32::consts::TAU;

use glam::Vec3;

use crate::core::camera::Camera;
use crate::core::time::FrameTime;
use crate::scene::{CameraConfig, FlowerConfig, GardenConfig, SparkleConfig};

pub use crate::scene::SpinRate;

use super::populate::Garden;

/// Height of a flower's origin at `elapsed` seconds.
pub fn bob_height(base: f32, amplitude: f32, elapsed: f32, phase: f32) -> f32 {
    base + (elapsed + phase).sin() * amplitude
}

/// Camera position on its orbit, at a fixed `height`.
pub fn orbit_position(radius: f32, rate: f32, elapsed: f32, height: f32) -> Vec3 {
    let (sin, cos) = (elapsed * rate).sin_cos();
    Vec3::new(cos * radius, height, sin * radius)
}

/// Vertical offset of the whole sparkle field.
pub fn sparkle_drift(amplitude: f32, rate: f32, elapsed: f32) -> f32 {
    (elapsed * rate).sin() * amplitude
}

fn advance_yaw(yaw: f32, step: f32) -> f32 {
    (yaw + step).rem_euclid(TAU)
}

/// Applies the garden's motion rules to the scene and camera.
#[derive(Clone, Debug)]
pub struct Animator {
    flowers: FlowerConfig,
    sparkles: SparkleConfig,
    camera: CameraConfig,
}

impl Animator {
    pub fn new(config: &GardenConfig) -> Self {
        Self {
            flowers: config.flowers.clone(),
            sparkles: config.sparkles.clone(),
            camera: config.camera.clone(),
        }
    }

    /// Camera at its configured starting pose, aimed at the orbit target.
    pub fn initial_camera(&self, aspect: f32) -> Camera {
        let cfg = &self.camera;
        let mut camera = Camera::new(cfg.position, cfg.fov_degrees, aspect, cfg.near, cfg.far);
        camera.look_at_target(cfg.target);
        camera
    }

    /// Advance every animated object by one tick.
    ///
    /// Positions are pure functions of `time.elapsed`; yaw accumulates
    /// through the configured [`SpinRate`](crate::scene::SpinRate).
    pub fn update(&self, garden: &mut Garden, camera: &mut Camera, time: FrameTime) {
        let flower_step = self.flowers.spin.step(time.delta);
        for flower in &mut garden.flowers {
            flower.yaw = advance_yaw(flower.yaw, flower_step);
            if let Some(transform) = garden.graph.transform_mut(flower.node) {
                transform.position.y = bob_height(
                    self.flowers.base_height,
                    self.flowers.bob_amplitude,
                    time.elapsed,
                    flower.phase,
                );
                transform.set_yaw(flower.yaw);
            }
        }

        let sparkles = &mut garden.sparkles;
        sparkles.yaw = advance_yaw(sparkles.yaw, self.sparkles.spin.step(time.delta));
        if let Some(transform) = garden.graph.transform_mut(sparkles.node) {
            transform.position.y =
                sparkle_drift(self.sparkles.drift_amplitude, self.sparkles.drift_rate, time.elapsed);
            transform.set_yaw(sparkles.yaw);
        }

        camera.position = orbit_position(
            self.camera.orbit_radius,
            self.camera.orbit_rate,
            time.elapsed,
            camera.position.y,
        );
        camera.look_at_target(self.camera.target);
    }
}
