//! Procedural mesh types
//!
//! Shared types for procedural mesh generation.

use bytemuck::cast_slice;
use glam::Vec3;

/// Default radial divisions for [`ShapeKind::Cylinder`]
pub const DEFAULT_CYLINDER_SEGMENTS: u32 = 12;

/// Default latitude and longitude bands for [`ShapeKind::Sphere`]
pub const DEFAULT_SPHERE_BANDS: u32 = 20;

/// Shape generated by [`generate`](super::generate)
///
/// Doubles as the geometry cache key, so two primitives with equal
/// parameters share one set of GPU buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Unit cube spanning `[0, 1]` on every axis, flat shaded
    Cube,
    /// Radius 0.5 cylinder from `y = 0` to `y = 1`
    Cylinder { segments: u32 },
    /// Radius 0.5 sphere centred on the origin
    Sphere {
        latitude_bands: u32,
        longitude_bands: u32,
    },
}

impl ShapeKind {
    /// Cylinder with the default segment count
    pub const fn cylinder() -> Self {
        Self::Cylinder {
            segments: DEFAULT_CYLINDER_SEGMENTS,
        }
    }

    /// Sphere with the default band counts
    pub const fn sphere() -> Self {
        Self::Sphere {
            latitude_bands: DEFAULT_SPHERE_BANDS,
            longitude_bands: DEFAULT_SPHERE_BANDS,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cube => "cube",
            Self::Cylinder { .. } => "cylinder",
            Self::Sphere { .. } => "sphere",
        }
    }
}

/// Triangle-list mesh with index-aligned positions and normals
///
/// `indices` is empty for non-indexed meshes, which are drawn as a plain
/// vertex range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Create an empty mesh with room for `vertices` vertices
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    /// Add a vertex with position and normal, returning its index
    ///
    /// The returned index is only meaningful for meshes that stay below
    /// `u16::MAX` vertices; generators clamp their parameters to guarantee it.
    pub fn add_vertex(&mut self, position: Vec3, normal: Vec3) -> u16 {
        let index = self.positions.len() as u16;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        index
    }

    /// Add a triangle using three vertex indices
    pub fn add_triangle(&mut self, i0: u16, i1: u16, i2: u16) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    /// Add an unindexed triangle sharing one normal
    pub fn add_flat_triangle(&mut self, corners: [Vec3; 3], normal: Vec3) {
        for corner in corners {
            self.add_vertex(corner, normal);
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions as a flat `x, y, z, ...` slice ready for upload
    pub fn position_data(&self) -> &[f32] {
        cast_slice(&self.positions)
    }

    /// Normals as a flat `x, y, z, ...` slice ready for upload
    pub fn normal_data(&self) -> &[f32] {
        cast_slice(&self.normals)
    }
}
