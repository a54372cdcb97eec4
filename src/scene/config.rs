//! Garden configuration

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::geometry::Color;

use super::environment::Environment;

/// Flower petal colors picked from at random.
pub const DEFAULT_PALETTE: [Color; 9] = [
    Color::from_rgb_hex(0xff69b3),
    Color::from_rgb_hex(0xffc1e4),
    Color::from_rgb_hex(0x87ceeb),
    Color::from_rgb_hex(0xffd703),
    Color::from_rgb_hex(0xe3ffc8),
    Color::from_rgb_hex(0xffa07a),
    Color::from_rgb_hex(0xda70d6),
    Color::from_rgb_hex(0xffb6c1),
    Color::from_rgb_hex(0xadd8e6),
];

/// How fast a spinning node turns.
///
/// `PerTick` advances a fixed angle every frame, so apparent speed follows
/// the display refresh rate. `PerSecond` scales by the frame delta and is
/// refresh-rate independent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinRate {
    PerTick(f32),
    PerSecond(f32),
}

impl SpinRate {
    /// Angle to add this frame given the frame delta in seconds.
    pub fn step(self, delta_secs: f32) -> f32 {
        match self {
            SpinRate::PerTick(radians) => radians,
            SpinRate::PerSecond(radians_per_sec) => radians_per_sec * delta_secs,
        }
    }
}

/// Flower placement and motion
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerConfig {
    /// Number of flowers planted at startup
    pub count: usize,
    /// Side length of the square (centered at origin) flowers are planted in
    pub field_size: f32,
    /// Petal colors, sampled uniformly
    pub palette: Vec<Color>,
    /// Resting height of each flower's origin above the ground
    pub base_height: f32,
    /// Peak vertical offset of the bobbing motion
    pub bob_amplitude: f32,
    pub spin: SpinRate,
}

impl Default for FlowerConfig {
    fn default() -> Self {
        Self {
            count: 30,
            field_size: 25.0,
            palette: DEFAULT_PALETTE.to_vec(),
            base_height: 0.5,
            bob_amplitude: 0.2,
            spin: SpinRate::PerTick(0.005),
        }
    }
}

/// Ambient sparkle field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkleConfig {
    pub count: usize,
    /// Box the points are scattered in: x and z centered, y starting at ground
    pub extent: Vec3,
    pub color: Color,
    /// Point size in world units
    pub size: f32,
    pub opacity: f32,
    pub spin: SpinRate,
    /// Peak vertical drift of the whole field
    pub drift_amplitude: f32,
    /// Angular rate of the drift, in radians per second
    pub drift_rate: f32,
}

impl Default for SparkleConfig {
    fn default() -> Self {
        Self {
            count: 200,
            extent: Vec3::new(50.0, 15.0, 50.0),
            color: Color::from_rgb_hex(0xfffeee),
            size: 0.06,
            opacity: 0.8,
            spin: SpinRate::PerTick(0.0005),
            drift_amplitude: 0.5,
            drift_rate: 0.2,
        }
    }
}

/// Perspective camera and its orbit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting position; the orbit keeps its height
    pub position: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub orbit_radius: f32,
    /// Orbit angular rate in radians per second
    pub orbit_rate: f32,
    /// Point the camera always looks at
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 8.0),
            fov_degrees: 50.0,
            near: 0.1,
            far: 1000.0,
            orbit_radius: 15.0,
            orbit_rate: 0.1,
            target: Vec3::new(0.0, 0.5, 0.0),
        }
    }
}

/// Configuration for the whole garden scene
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenConfig {
    /// Random seed for placement; a fresh seed is drawn when unset
    pub seed: Option<u64>,
    pub flowers: FlowerConfig,
    pub sparkles: SparkleConfig,
    pub camera: CameraConfig,
    pub environment: Environment,
}

impl GardenConfig {
    /// Load a config from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: GardenConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the scene cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if self.flowers.palette.is_empty() {
            return Err(Error::Config("flower palette must not be empty".into()));
        }
        if !(self.flowers.field_size >= 0.0) {
            return Err(Error::Config(format!(
                "flower field size must be non-negative, got {}",
                self.flowers.field_size
            )));
        }
        if self.sparkles.extent.min_element() < 0.0 {
            return Err(Error::Config(format!(
                "sparkle extent must be non-negative, got {}",
                self.sparkles.extent
            )));
        }
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            return Err(Error::Config(format!(
                "camera clip planes must satisfy 0 < near < far, got {} / {}",
                self.camera.near, self.camera.far
            )));
        }
        if !(self.camera.orbit_radius > 0.0) {
            return Err(Error::Config(format!(
                "camera orbit radius must be positive, got {}",
                self.camera.orbit_radius
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GardenConfig::default();
        assert_eq!(config.flowers.count, 30);
        assert_eq!(config.flowers.palette.len(), 9);
        assert_eq!(config.sparkles.count, 200);
        assert_eq!(config.camera.orbit_radius, 15.0);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_spin_rate_step() {
        assert_eq!(SpinRate::PerTick(0.005).step(0.5), 0.005);
        assert_eq!(SpinRate::PerSecond(0.3).step(0.5), 0.15);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{ "seed": 7, "flowers": {{ "count": 5, "palette": ["#ff0000"] }},
                 "sparkles": {{ "spin": {{ "per_second": 0.03 }} }} }}"##
        )
        .unwrap();

        let config = GardenConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.flowers.count, 5);
        assert_eq!(config.flowers.palette, vec![Color::new(255, 0, 0)]);
        assert_eq!(config.flowers.field_size, 25.0);
        assert_eq!(config.sparkles.spin, SpinRate::PerSecond(0.03));
        assert_eq!(config.sparkles.count, 200);
        assert_eq!(config.environment, Environment::default());
    }

    #[test]
    fn test_empty_palette_rejected() {
        let mut config = GardenConfig::default();
        config.flowers.palette.clear();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_bad_clip_planes_rejected() {
        let mut config = GardenConfig::default();
        config.camera.near = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_degenerate_orbit_rejected() {
        let mut config = GardenConfig::default();
        config.camera.orbit_radius = 0.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        config.camera.orbit_radius = -2.0;
        assert!(config.validate().is_err());
        config.camera.orbit_radius = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GardenConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = GardenConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
