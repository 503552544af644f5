//! Renderable primitive instances

use glam::{Mat4, Vec4};

use crate::geometry_cache::GeometryCache;
use crate::procedural::{CUBE_FACE_SHADE, CUBE_FACE_VERTICES, ShapeKind};
use crate::render::{MatrixUniform, RenderContext, RenderError};
use crate::transform::Transform;

/// A shared shape drawn with its own transform and color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    pub shape: ShapeKind,
    pub color: Vec4,
    /// Darken cube faces by [`CUBE_FACE_SHADE`]
    pub face_shading: bool,
    transform: Transform,
    normal_matrix: Mat4,
}

impl Primitive {
    pub fn new(shape: ShapeKind, color: Vec4) -> Self {
        Self {
            shape,
            color,
            face_shading: true,
            transform: Transform::IDENTITY,
            normal_matrix: Mat4::IDENTITY,
        }
    }

    /// Disable the per-face cube shade
    #[must_use]
    pub fn without_face_shading(mut self) -> Self {
        self.face_shading = false;
        self
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Inverse-transpose of the current transform
    pub fn normal_matrix(&self) -> Mat4 {
        self.normal_matrix
    }

    /// Replace the model transform, refreshing the normal matrix
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.normal_matrix = transform.normal_matrix();
    }

    /// Upload this instance's matrices and issue its draw calls
    ///
    /// Cubes draw face by face so each face can carry its shade; other
    /// shapes draw in one call.
    pub fn draw(
        &self,
        cache: &mut GeometryCache,
        ctx: &mut dyn RenderContext,
    ) -> Result<(), RenderError> {
        let buffers = cache.buffers(self.shape, ctx)?;

        ctx.set_matrix(MatrixUniform::Model, self.transform.matrix());
        ctx.set_matrix(MatrixUniform::Normal, self.normal_matrix);

        match self.shape {
            ShapeKind::Cube if self.face_shading => {
                for (face, shade) in CUBE_FACE_SHADE.iter().enumerate() {
                    ctx.set_color(shaded(self.color, *shade));
                    ctx.draw_arrays(&buffers, face as u32 * CUBE_FACE_VERTICES, CUBE_FACE_VERTICES);
                }
            }
            _ => {
                ctx.set_color(self.color);
                buffers.draw_all(ctx);
            }
        }

        Ok(())
    }
}

/// Scale RGB by `shade`, keeping alpha
fn shaded(color: Vec4, shade: f32) -> Vec4 {
    (color.truncate() * shade).extend(color.w)
}
