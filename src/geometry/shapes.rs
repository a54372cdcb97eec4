//! Primitive shapes: UV spheres and flat discs

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::mesh::{MeshData, Vertex};

/// Generate a UV sphere centered at the origin.
///
/// Vertices are laid out as a `(width_segments + 1) x (height_segments + 1)`
/// grid from the north pole (+Y) to the south pole, duplicating the seam
/// column. Degenerate pole triangles are skipped.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let columns = width_segments + 1;

    let mut vertices = Vec::with_capacity((columns * (height_segments + 1)) as usize);
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let (sin_theta, cos_theta) = (v * PI).sin_cos();

        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let (sin_phi, cos_phi) = (u * TAU).sin_cos();

            let normal = Vec3::new(-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
            vertices.push(Vertex::new(normal * radius, normal));
        }
    }

    let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * columns + ix + 1;
            let b = iy * columns + ix;
            let c = (iy + 1) * columns + ix;
            let d = (iy + 1) * columns + ix + 1;

            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    MeshData::new(vertices, indices)
}

/// Generate a filled circle in the XY plane facing +Z.
pub fn disc(radius: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);

    let mut vertices = Vec::with_capacity(segments as usize + 2);
    vertices.push(Vertex::new(Vec3::ZERO, Vec3::Z));
    for i in 0..=segments {
        let angle = i as f32 / segments as f32 * TAU;
        let (sin, cos) = angle.sin_cos();
        vertices.push(Vertex::new(Vec3::new(cos * radius, sin * radius, 0.0), Vec3::Z));
    }

    let indices = (1..=segments).flat_map(|i| [i, i + 1, 0]).collect();

    MeshData::new(vertices, indices)
}
