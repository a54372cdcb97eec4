//! Background, fog, lights and the sun glow

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::geometry::Color;

/// Linear fog over view depth, blending toward `color` between `near` and `far`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

/// Light arriving from `position` toward the origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
}

impl DirectionalLight {
    /// Unit vector pointing from the scene toward the light.
    pub fn direction_to_light(&self) -> Vec3 {
        self.position.normalize_or(Vec3::Y)
    }
}

/// Flat glowing disc hung in the sky.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SunGlow {
    pub color: Color,
    pub radius: f32,
    pub segments: u32,
    pub opacity: f32,
    pub position: Vec3,
}

/// Everything about the scene's surroundings that is not a node transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub background: Color,
    pub fog: Option<Fog>,
    pub ambient: AmbientLight,
    pub sun: DirectionalLight,
    pub sun_glow: Option<SunGlow>,
}

impl Default for Environment {
    fn default() -> Self {
        let dusk = Color::from_rgb_hex(0x0d0912);
        Self {
            background: dusk,
            fog: Some(Fog { color: dusk, near: 10.0, far: 40.0 }),
            ambient: AmbientLight { color: Color::WHITE, intensity: 0.8 },
            sun: DirectionalLight {
                color: Color::WHITE,
                intensity: 0.6,
                position: Vec3::new(5.0, 10.0, 7.0),
            },
            sun_glow: Some(SunGlow {
                color: Color::from_rgb_hex(0xfff9c4),
                radius: 2.0,
                segments: 64,
                opacity: 0.9,
                position: Vec3::new(-10.0, 15.0, -20.0),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_direction_is_normalized() {
        let dir = Environment::default().sun.direction_to_light();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.y > 0.0);
    }
}
