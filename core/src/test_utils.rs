//! Shared test utilities for unit tests

use glam::{Mat4, Vec3, Vec4};

use crate::render::{
    BufferId, FlagUniform, MatrixUniform, MeshBuffers, RenderContext, RenderError, ScalarUniform,
    VectorUniform,
};

// ============================================================================
// Recording Render Context
// ============================================================================

/// One recorded draw call with the state bound when it was issued
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub buffers: MeshBuffers,
    pub first: u32,
    pub count: u32,
    pub indexed: bool,
    pub model: Mat4,
    pub normal: Mat4,
    pub color: Vec4,
}

/// Render context that records calls instead of drawing
#[derive(Debug, Default)]
pub struct RecordingContext {
    next_buffer: u32,
    pub vertex_buffers: Vec<Vec<f32>>,
    pub index_buffers: Vec<Vec<u16>>,
    pub draws: Vec<RecordedDraw>,
    pub clears: usize,
    pub matrices: Vec<(MatrixUniform, Mat4)>,
    pub vectors: Vec<(VectorUniform, Vec3)>,
    pub scalars: Vec<(ScalarUniform, f32)>,
    pub flags: Vec<(FlagUniform, bool)>,
    /// Number of upcoming buffer creations to fail
    pub fail_next: usize,
    /// Buffer creations that still succeed before `fail_next` applies
    pub fail_after: usize,
    model: Mat4,
    normal: Mat4,
    color: Vec4,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, kind: &'static str) -> Result<BufferId, RenderError> {
        if self.fail_after > 0 {
            self.fail_after -= 1;
        } else if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(RenderError::BufferCreation {
                kind,
                reason: "out of memory".to_string(),
            });
        }
        let id = BufferId(self.next_buffer);
        self.next_buffer += 1;
        Ok(id)
    }

    pub fn buffer_count(&self) -> usize {
        self.vertex_buffers.len() + self.index_buffers.len()
    }
}

impl RenderContext for RecordingContext {
    fn create_vertex_buffer(&mut self, data: &[f32]) -> Result<BufferId, RenderError> {
        let id = self.allocate("vertex")?;
        self.vertex_buffers.push(data.to_vec());
        Ok(id)
    }

    fn create_index_buffer(&mut self, data: &[u16]) -> Result<BufferId, RenderError> {
        let id = self.allocate("index")?;
        self.index_buffers.push(data.to_vec());
        Ok(id)
    }

    fn set_matrix(&mut self, uniform: MatrixUniform, value: Mat4) {
        match uniform {
            MatrixUniform::Model => self.model = value,
            MatrixUniform::Normal => self.normal = value,
            _ => {}
        }
        self.matrices.push((uniform, value));
    }

    fn set_vector(&mut self, uniform: VectorUniform, value: Vec3) {
        self.vectors.push((uniform, value));
    }

    fn set_color(&mut self, color: Vec4) {
        self.color = color;
    }

    fn set_scalar(&mut self, uniform: ScalarUniform, value: f32) {
        self.scalars.push((uniform, value));
    }

    fn set_flag(&mut self, uniform: FlagUniform, value: bool) {
        self.flags.push((uniform, value));
    }

    fn draw_arrays(&mut self, mesh: &MeshBuffers, first: u32, count: u32) {
        self.draws.push(RecordedDraw {
            buffers: *mesh,
            first,
            count,
            indexed: false,
            model: self.model,
            normal: self.normal,
            color: self.color,
        });
    }

    fn draw_indexed(&mut self, mesh: &MeshBuffers, index_count: u32) {
        self.draws.push(RecordedDraw {
            buffers: *mesh,
            first: 0,
            count: index_count,
            indexed: true,
            model: self.model,
            normal: self.normal,
            color: self.color,
        });
    }

    fn clear(&mut self, _color: Vec4) {
        self.clears += 1;
    }
}
