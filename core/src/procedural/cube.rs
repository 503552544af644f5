//! Flat-shaded unit cube

use glam::Vec3;

use super::Mesh;

/// Vertices per cube face (two triangles)
pub const CUBE_FACE_VERTICES: u32 = 6;

/// Brightness multiplier applied to each face, in face order
///
/// Fakes a fixed directional shade so the cube reads as a solid even with
/// lighting switched off.
pub const CUBE_FACE_SHADE: [f32; 6] = [1.0, 0.9, 0.8, 0.4, 0.7, 0.6];

/// Face order: front, top, bottom, left, right, back.
///
/// Corners wind counter-clockwise seen from outside the cube.
const FACES: [(Vec3, [Vec3; 4]); 6] = [
    // Front (-Z)
    (
        Vec3::NEG_Z,
        [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ],
    ),
    // Top (+Y)
    (
        Vec3::Y,
        [
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 0.0),
        ],
    ),
    // Bottom (-Y)
    (
        Vec3::NEG_Y,
        [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ],
    ),
    // Left (-X)
    (
        Vec3::NEG_X,
        [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
    ),
    // Right (+X)
    (
        Vec3::X,
        [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
        ],
    ),
    // Back (+Z)
    (
        Vec3::Z,
        [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ],
    ),
];

/// Generate the unit cube spanning `[0, 1]^3`
///
/// 36 unindexed vertices, six per face, every vertex of a face carrying the
/// face normal.
pub fn generate_cube() -> Mesh {
    let mut mesh = Mesh::with_capacity(36, 0);

    for (normal, [a, b, c, d]) in FACES {
        mesh.add_flat_triangle([a, b, c], normal);
        mesh.add_flat_triangle([a, c, d], normal);
    }

    mesh
}
