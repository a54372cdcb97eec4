//! Tubes swept along parametric paths

use std::f32::consts::TAU;

use glam::Vec3;

use super::mesh::{MeshData, Vertex};

/// Radius of the stem swirl around the vertical axis.
pub const SWIRL_RADIUS: f32 = 0.2;
/// Vertical drop of the swirl over one full revolution.
pub const SWIRL_DROP: f32 = 1.5;

/// Downward spiral used for flower stems.
///
/// One full revolution of radius [`SWIRL_RADIUS`] over t in [0, 1],
/// descending [`SWIRL_DROP`] units.
pub fn swirl(t: f32) -> Vec3 {
    let (sin, cos) = (t * TAU).sin_cos();
    Vec3::new(cos * SWIRL_RADIUS, -t * SWIRL_DROP, sin * SWIRL_RADIUS)
}

/// Step used for finite-difference tangents.
const TANGENT_DELTA: f32 = 1e-4;

/// A sampled point on the path with its moving frame.
#[derive(Clone, Copy, Debug)]
struct PathFrame {
    pos: Vec3,
    tangent: Vec3,
    normal: Vec3,
    binormal: Vec3,
}

fn tangent_at(path: &impl Fn(f32) -> Vec3, t: f32) -> Vec3 {
    let t0 = (t - TANGENT_DELTA).max(0.0);
    let t1 = (t + TANGENT_DELTA).min(1.0);
    (path(t1) - path(t0)).normalize()
}

/// Sample `segments + 1` frames along the path.
///
/// Normals are rotation-minimising (double reflection), so the tube does not
/// twist around its own axis.
fn sample_frames(path: &impl Fn(f32) -> Vec3, segments: u32) -> Vec<PathFrame> {
    let mut frames: Vec<PathFrame> = (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            PathFrame {
                pos: path(t),
                tangent: tangent_at(path, t),
                normal: Vec3::ZERO,
                binormal: Vec3::ZERO,
            }
        })
        .collect();

    let t0 = frames[0].tangent;
    let arbitrary = if t0.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    frames[0].normal = t0.cross(arbitrary).normalize();
    frames[0].binormal = t0.cross(frames[0].normal).normalize();

    for i in 0..frames.len() - 1 {
        let (current, next) = (frames[i], frames[i + 1]);

        let v1 = next.pos - current.pos;
        let c1 = v1.dot(v1);
        if c1 < 1e-10 {
            frames[i + 1].normal = current.normal;
            frames[i + 1].binormal = current.binormal;
            continue;
        }

        let r_l = current.normal - (2.0 / c1) * v1.dot(current.normal) * v1;
        let t_l = current.tangent - (2.0 / c1) * v1.dot(current.tangent) * v1;

        let v2 = next.tangent - t_l;
        let c2 = v2.dot(v2);
        let r_next = if c2 < 1e-10 {
            r_l
        } else {
            r_l - (2.0 / c2) * v2.dot(r_l) * v2
        };

        let normal = (r_next - next.tangent * next.tangent.dot(r_next)).normalize();
        frames[i + 1].normal = normal;
        frames[i + 1].binormal = next.tangent.cross(normal).normalize();
    }

    frames
}

/// Sweep a circular cross-section along `path`.
///
/// The path is sampled at `tubular_segments + 1` evenly spaced parameters in
/// [0, 1]; each sample gets a ring of `radial_segments + 1` vertices (the seam
/// is duplicated). When `closed` is set the last ring reuses the first
/// sample so the tube joins up with itself. No end caps are generated.
pub fn tube(
    path: impl Fn(f32) -> Vec3,
    tubular_segments: u32,
    radius: f32,
    radial_segments: u32,
    closed: bool,
) -> MeshData {
    let tubular_segments = tubular_segments.max(1);
    let radial_segments = radial_segments.max(3);
    let ring = radial_segments + 1;

    let frames = sample_frames(&path, tubular_segments);

    let mut vertices = Vec::with_capacity((ring * (tubular_segments + 1)) as usize);
    for i in 0..=tubular_segments {
        let frame = if closed && i == tubular_segments {
            frames[0]
        } else {
            frames[i as usize]
        };

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * TAU;
            let (sin, cos) = v.sin_cos();
            let normal = (frame.normal * -cos + frame.binormal * sin).normalize();
            vertices.push(Vertex::new(frame.pos + normal * radius, normal));
        }
    }

    let mut indices = Vec::with_capacity((tubular_segments * radial_segments * 6) as usize);
    for j in 1..=tubular_segments {
        for i in 1..=radial_segments {
            let a = ring * (j - 1) + (i - 1);
            let b = ring * j + (i - 1);
            let c = ring * j + i;
            let d = ring * (j - 1) + i;
            indices.extend_from_slice(&[a, b, d]);
            indices.extend_from_slice(&[b, c, d]);
        }
    }

    MeshData::new(vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_swirl_endpoints() {
        assert!(approx(swirl(0.0), Vec3::new(0.2, 0.0, 0.0)));
        assert!(approx(swirl(1.0), Vec3::new(0.2, -1.5, 0.0)));
        assert!(approx(swirl(0.5), Vec3::new(-0.2, -0.75, 0.0)));
    }

    #[test]
    fn test_swirl_is_deterministic() {
        for i in 0..=20 {
            let t = i as f32 / 20.0;
            assert_eq!(swirl(t), swirl(t));
            let p = swirl(t);
            assert!(((p.x * p.x + p.z * p.z).sqrt() - SWIRL_RADIUS).abs() < 1e-5);
        }
    }

    #[test]
    fn test_tube_counts() {
        let mesh = tube(swirl, 64, 0.05, 8, false);
        assert_eq!(mesh.vertex_count(), 65 * 9);
        assert_eq!(mesh.triangle_count(), 64 * 8 * 2);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn test_tube_vertices_at_radius_from_path() {
        let segments = 64;
        let radius = 0.05;
        let mesh = tube(swirl, segments, radius, 8, false);
        for (i, ring) in mesh.vertices.chunks(9).enumerate() {
            let center = swirl(i as f32 / segments as f32);
            for v in ring {
                let d = (Vec3::from_array(v.position) - center).length();
                assert!((d - radius).abs() < 1e-4, "ring {} off by {}", i, d - radius);
            }
        }
    }

    #[test]
    fn test_tube_normals_perpendicular_to_path() {
        let line = |t: f32| Vec3::new(0.0, t * 2.0, 0.0);
        let mesh = tube(line, 4, 0.1, 6, false);
        for v in &mesh.vertices {
            let n = Vec3::from_array(v.normal);
            assert!(n.dot(Vec3::Y).abs() < 1e-4);
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_closed_tube_reuses_first_ring() {
        let circle = |t: f32| {
            let (s, c) = (t * TAU).sin_cos();
            Vec3::new(c, 0.0, s)
        };
        let mesh = tube(circle, 16, 0.1, 6, true);
        let ring = 7;
        let first = &mesh.vertices[..ring];
        let last = &mesh.vertices[mesh.vertex_count() - ring..];
        assert_eq!(first, last);
    }
}
