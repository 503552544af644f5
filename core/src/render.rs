//! Render context boundary
//!
//! The core never talks to a graphics API directly. Everything it needs from
//! the GPU goes through [`RenderContext`]: buffer creation, uniform updates,
//! triangle-list draws and a clear. The viewer implements it on wgpu; tests
//! implement it with a recorder.

use glam::{Mat4, Vec3, Vec4};
use thiserror::Error;

use crate::procedural::Mesh;

/// Opaque handle to a buffer owned by the render context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

/// Per-draw and per-frame matrix uniforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixUniform {
    Model,
    /// Inverse-transpose of the model matrix
    Normal,
    View,
    Projection,
}

/// Per-frame vector uniforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorUniform {
    LightPosition,
    SpotPosition,
    SpotDirection,
    CameraPosition,
}

/// Per-frame scalar uniforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarUniform {
    /// Cosine of the spotlight's full-intensity half-angle
    SpotInnerCutoff,
    /// Cosine of the spotlight's zero-intensity half-angle
    SpotOuterCutoff,
}

/// Per-frame boolean uniforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagUniform {
    LightingEnabled,
    NormalDebug,
}

/// Errors from GPU resource creation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error("refusing to create an empty {0} buffer")]
    EmptyBuffer(&'static str),
    #[error("{kind} buffer of {len} elements exceeds the device limit of {limit} bytes")]
    BufferTooLarge {
        kind: &'static str,
        len: usize,
        limit: u64,
    },
    #[error("failed to create {kind} buffer: {reason}")]
    BufferCreation { kind: &'static str, reason: String },
}

/// GPU buffers holding one uploaded mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshBuffers {
    pub positions: BufferId,
    pub normals: BufferId,
    /// Present for indexed meshes only
    pub indices: Option<BufferId>,
    pub vertex_count: u32,
    pub index_count: u32,
}

/// A mesh upload that may span several attempts
///
/// Buffers created before a failure are kept, so a retry only creates the
/// ones still missing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MeshUpload {
    positions: Option<BufferId>,
    normals: Option<BufferId>,
    indices: Option<BufferId>,
    complete: Option<MeshBuffers>,
}

fn ensure_buffer(
    slot: &mut Option<BufferId>,
    create: impl FnOnce() -> Result<BufferId, RenderError>,
) -> Result<BufferId, RenderError> {
    if let Some(id) = *slot {
        return Ok(id);
    }
    let id = create()?;
    *slot = Some(id);
    Ok(id)
}

impl MeshUpload {
    /// The finished buffers, once every buffer exists
    pub fn buffers(&self) -> Option<MeshBuffers> {
        self.complete
    }

    /// Create whatever buffers of `mesh` are still missing
    pub fn upload(
        &mut self,
        ctx: &mut dyn RenderContext,
        mesh: &Mesh,
    ) -> Result<MeshBuffers, RenderError> {
        if let Some(buffers) = self.complete {
            return Ok(buffers);
        }

        let positions = ensure_buffer(&mut self.positions, || {
            ctx.create_vertex_buffer(mesh.position_data())
        })?;
        let normals = ensure_buffer(&mut self.normals, || {
            ctx.create_vertex_buffer(mesh.normal_data())
        })?;
        let indices = if mesh.is_indexed() {
            Some(ensure_buffer(&mut self.indices, || {
                ctx.create_index_buffer(&mesh.indices)
            })?)
        } else {
            None
        };

        let buffers = MeshBuffers {
            positions,
            normals,
            indices,
            vertex_count: mesh.vertex_count() as u32,
            index_count: mesh.index_count() as u32,
        };
        self.complete = Some(buffers);
        Ok(buffers)
    }
}

impl MeshBuffers {
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Draw every triangle in the mesh
    pub fn draw_all(&self, ctx: &mut dyn RenderContext) {
        if self.is_indexed() {
            ctx.draw_indexed(self, self.index_count);
        } else {
            ctx.draw_arrays(self, 0, self.vertex_count);
        }
    }
}

/// Capabilities the core needs from a graphics backend
///
/// Uniform setters are sticky: a value stays bound until set again, and each
/// draw call uses whatever values are bound when it is issued.
pub trait RenderContext {
    /// Create a vertex buffer from a flat `x, y, z, ...` array
    fn create_vertex_buffer(&mut self, data: &[f32]) -> Result<BufferId, RenderError>;

    /// Create an index buffer
    fn create_index_buffer(&mut self, data: &[u16]) -> Result<BufferId, RenderError>;

    fn set_matrix(&mut self, uniform: MatrixUniform, value: Mat4);

    fn set_vector(&mut self, uniform: VectorUniform, value: Vec3);

    /// Set the base color for subsequent draws
    fn set_color(&mut self, color: Vec4);

    fn set_scalar(&mut self, uniform: ScalarUniform, value: f32);

    fn set_flag(&mut self, uniform: FlagUniform, value: bool);

    /// Draw `count` vertices of a triangle list starting at `first`
    fn draw_arrays(&mut self, mesh: &MeshBuffers, first: u32, count: u32);

    /// Draw the first `index_count` indices of an indexed triangle list
    fn draw_indexed(&mut self, mesh: &MeshBuffers, index_count: u32);

    /// Clear color and depth
    fn clear(&mut self, color: Vec4);
}
