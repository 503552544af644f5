//! Procedural mesh generation
//!
//! Pure, deterministic generators for the primitive shapes the dog is built
//! from. Identical parameters always give bit-identical output, which is
//! what lets [`GeometryCache`](crate::GeometryCache) generate each shape once
//! and share it.

mod cube;
mod cylinder;
mod sphere;
mod types;


pub use cube::{CUBE_FACE_SHADE, CUBE_FACE_VERTICES, generate_cube};
pub use cylinder::generate_cylinder;
pub use sphere::generate_sphere;
pub use types::{DEFAULT_CYLINDER_SEGMENTS, DEFAULT_SPHERE_BANDS, Mesh, ShapeKind};

/// Generate the mesh for a shape kind
pub fn generate(kind: ShapeKind) -> Mesh {
    match kind {
        ShapeKind::Cube => generate_cube(),
        ShapeKind::Cylinder { segments } => generate_cylinder(segments),
        ShapeKind::Sphere {
            latitude_bands,
            longitude_bands,
        } => generate_sphere(latitude_bands, longitude_bands),
    }
}
