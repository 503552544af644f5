//! Indexed UV sphere

use glam::Vec3;
use std::f32::consts::{PI, TAU};
use tracing::warn;

use super::Mesh;

const RADIUS: f32 = 0.5;

/// Generate a radius 0.5 sphere centred on the origin
///
/// # Arguments
/// * `latitude_bands` - Rings from pole to pole (min 2, max 128)
/// * `longitude_bands` - Slices around the Y axis (min 3, max 128)
///
/// # Returns
/// Indexed mesh with `(lat + 1) × (lon + 1)` vertices and `lat × lon × 6`
/// indices. The seam column is duplicated so each row is contiguous.
pub fn generate_sphere(latitude_bands: u32, longitude_bands: u32) -> Mesh {
    let lat_bands = clamp_bands("latitude_bands", latitude_bands, 2);
    let lon_bands = clamp_bands("longitude_bands", longitude_bands, 3);

    let vertex_count = ((lat_bands + 1) * (lon_bands + 1)) as usize;
    let index_count = (lat_bands * lon_bands * 6) as usize;
    let mut mesh = Mesh::with_capacity(vertex_count, index_count);

    for lat in 0..=lat_bands {
        let theta = lat as f32 * PI / lat_bands as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for lon in 0..=lon_bands {
            let phi = lon as f32 * TAU / lon_bands as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let unit = Vec3::new(cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
            mesh.add_vertex(unit * RADIUS, unit);
        }
    }

    for lat in 0..lat_bands {
        for lon in 0..lon_bands {
            let first = (lat * (lon_bands + 1) + lon) as u16;
            let second = first + lon_bands as u16 + 1;

            mesh.add_triangle(first, second, first + 1);
            mesh.add_triangle(second, second + 1, first + 1);
        }
    }

    mesh
}

fn clamp_bands(name: &str, bands: u32, min: u32) -> u32 {
    let clamped = bands.clamp(min, 128);
    if clamped != bands {
        warn!(
            "generate_sphere: {} {} out of range, clamping to {}",
            name, bands, clamped
        );
    }
    clamped
}
