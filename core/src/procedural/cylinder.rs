//! Unit cylinder with radial side normals

use glam::Vec3;
use std::f32::consts::TAU;
use tracing::warn;

use super::Mesh;

const RADIUS: f32 = 0.5;

/// Generate a radius 0.5 cylinder spanning `y = 0` to `y = 1`
///
/// # Arguments
/// * `segments` - Number of radial divisions (min 3, max 256)
///
/// # Layout
/// Unindexed triangle list: all side triangles (two per segment), then the
/// top cap fan, then the bottom cap fan. Side vertices carry the outward
/// radial normal of their own angle, so the sides shade smoothly while the
/// caps stay flat.
pub fn generate_cylinder(segments: u32) -> Mesh {
    let clamped = segments.clamp(3, 256);
    if clamped != segments {
        warn!(
            "generate_cylinder: segments {} out of range, clamping to {}",
            segments, clamped
        );
    }
    let segments = clamped;

    let ring: Vec<(f32, f32)> = (0..=segments)
        .map(|i| {
            let angle = i as f32 / segments as f32 * TAU;
            (angle.cos(), angle.sin())
        })
        .collect();

    let mut mesh = Mesh::with_capacity(segments as usize * 12, 0);

    // Sides
    for pair in ring.windows(2) {
        let (c1, s1) = pair[0];
        let (c2, s2) = pair[1];
        let n1 = Vec3::new(c1, 0.0, s1);
        let n2 = Vec3::new(c2, 0.0, s2);
        let bottom1 = Vec3::new(RADIUS * c1, 0.0, RADIUS * s1);
        let bottom2 = Vec3::new(RADIUS * c2, 0.0, RADIUS * s2);
        let top1 = bottom1 + Vec3::Y;
        let top2 = bottom2 + Vec3::Y;

        mesh.add_vertex(bottom1, n1);
        mesh.add_vertex(top1, n1);
        mesh.add_vertex(bottom2, n2);

        mesh.add_vertex(top1, n1);
        mesh.add_vertex(top2, n2);
        mesh.add_vertex(bottom2, n2);
    }

    // Top cap
    for pair in ring.windows(2) {
        let (c1, s1) = pair[0];
        let (c2, s2) = pair[1];
        mesh.add_flat_triangle(
            [
                Vec3::Y,
                Vec3::new(RADIUS * c2, 1.0, RADIUS * s2),
                Vec3::new(RADIUS * c1, 1.0, RADIUS * s1),
            ],
            Vec3::Y,
        );
    }

    // Bottom cap, reversed winding
    for pair in ring.windows(2) {
        let (c1, s1) = pair[0];
        let (c2, s2) = pair[1];
        mesh.add_flat_triangle(
            [
                Vec3::ZERO,
                Vec3::new(RADIUS * c1, 0.0, RADIUS * s1),
                Vec3::new(RADIUS * c2, 0.0, RADIUS * s2),
            ],
            Vec3::NEG_Y,
        );
    }

    mesh
}
