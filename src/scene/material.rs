//! Surface descriptions attached to scene nodes

use crate::geometry::Color;

/// How a mesh responds to scene lighting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Shading {
    /// Ambient + directional diffuse with a roughness-controlled highlight.
    #[default]
    Standard,
    /// Flat color, ignores lights.
    Unlit,
}

/// Mesh material. Plain value: nodes that share a look carry equal copies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    /// 0 = mirror-like highlight, 1 = fully diffuse
    pub roughness: f32,
    pub opacity: f32,
    pub shading: Shading,
}

impl Material {
    /// Lit material with full roughness and opacity.
    pub fn standard(color: Color) -> Self {
        Self {
            color,
            roughness: 1.0,
            opacity: 1.0,
            shading: Shading::Standard,
        }
    }

    /// Unlit, flat-colored material.
    pub fn unlit(color: Color) -> Self {
        Self {
            shading: Shading::Unlit,
            ..Self::standard(color)
        }
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Whether the material needs blending and a back-to-front pass.
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Material for point clouds, drawn as camera-facing squares.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointsMaterial {
    pub color: Color,
    /// Edge length of each point in world units
    pub size: f32,
    pub opacity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_defaults() {
        let m = Material::standard(Color::WHITE);
        assert_eq!(m.roughness, 1.0);
        assert_eq!(m.opacity, 1.0);
        assert_eq!(m.shading, Shading::Standard);
        assert!(!m.is_transparent());
    }

    #[test]
    fn test_builders() {
        let m = Material::unlit(Color::from_rgb_hex(0xfff9c4)).with_opacity(0.9);
        assert_eq!(m.shading, Shading::Unlit);
        assert!(m.is_transparent());

        let m = Material::standard(Color::from_rgb_hex(0x228b25)).with_roughness(0.2);
        assert_eq!(m.roughness, 0.2);
    }
}
