//! Affine node transforms
//!
//! A [`Transform`] is a local-to-parent matrix built by post-multiplying
//! translate, rotate and scale steps. Each step is applied in the frame the
//! previous steps produced, so `translate(..).rotate(..).scale(..)` reads in
//! the same order the hierarchy describes a node.

use glam::{Mat4, Vec3};

/// Determinant magnitude below which a matrix is treated as singular
const SINGULAR_EPSILON: f32 = 1e-12;

/// Local-to-parent affine transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Mat4> for Transform {
    fn from(matrix: Mat4) -> Self {
        Self { matrix }
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        matrix: Mat4::IDENTITY,
    };

    /// The underlying column-major matrix
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Post-multiply a translation
    #[must_use]
    pub fn translate(self, offset: Vec3) -> Self {
        self.then(Mat4::from_translation(offset))
    }

    /// Post-multiply a rotation of `degrees` about `axis`
    ///
    /// A zero-length axis leaves the transform unchanged.
    #[must_use]
    pub fn rotate(self, degrees: f32, axis: Vec3) -> Self {
        match axis.try_normalize() {
            Some(axis) => self.then(Mat4::from_axis_angle(axis, degrees.to_radians())),
            None => self,
        }
    }

    /// Post-multiply a (possibly non-uniform) scale
    #[must_use]
    pub fn scale(self, factors: Vec3) -> Self {
        self.then(Mat4::from_scale(factors))
    }

    /// Post-multiply an arbitrary matrix
    #[must_use]
    pub fn then(self, local: impl Into<Mat4>) -> Self {
        Self {
            matrix: self.matrix * local.into(),
        }
    }

    /// Whether the matrix has a usable inverse
    pub fn is_invertible(&self) -> bool {
        self.matrix.determinant().abs() > SINGULAR_EPSILON
    }

    /// Inverse-transpose of the matrix, for transforming normals
    ///
    /// Falls back to identity for a singular matrix (a zero scale collapses
    /// the surface, so there is no meaningful normal to keep).
    pub fn normal_matrix(&self) -> Mat4 {
        if self.is_invertible() {
            self.matrix.inverse().transpose()
        } else {
            Mat4::IDENTITY
        }
    }

    /// Transform a point (w = 1)
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.matrix.transform_point3(point)
    }
}

impl From<Transform> for Mat4 {
    fn from(transform: Transform) -> Self {
        transform.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_mat(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(b, EPSILON)
    }

    // ============================================================
    // Composition
    // ============================================================

    #[test]
    fn test_identity_default() {
        assert_eq!(Transform::default().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_translate_rotate_scale_matches_manual_product() {
        let offset = Vec3::new(0.3, -1.2, 4.0);
        let axis = Vec3::new(1.0, 2.0, -0.5);
        let scale = Vec3::new(0.5, 0.3, 0.65);

        let chained = Transform::IDENTITY
            .translate(offset)
            .rotate(37.0, axis)
            .scale(scale)
            .matrix();

        let manual = Mat4::from_translation(offset)
            * Mat4::from_axis_angle(axis.normalize(), 37f32.to_radians())
            * Mat4::from_scale(scale);

        assert!(approx_mat(chained, manual));
    }

    #[test]
    fn test_composition_is_associative() {
        let a = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let b = Mat4::from_rotation_z(0.7);
        let c = Mat4::from_scale(Vec3::new(2.0, 1.0, 0.5));

        let left = Transform::from(a).then(b).then(c).matrix();
        let right = Transform::from(a).then(b * c).matrix();
        assert!(approx_mat(left, right));
    }

    #[test]
    fn test_rotate_zero_axis_is_noop() {
        let t = Transform::IDENTITY.translate(Vec3::X);
        assert_eq!(t.rotate(45.0, Vec3::ZERO), t);
    }

    #[test]
    fn test_rotate_degrees() {
        let t = Transform::IDENTITY.rotate(90.0, Vec3::Z);
        let p = t.transform_point(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::Y, EPSILON));
    }

    // ============================================================
    // Normal matrix
    // ============================================================

    #[test]
    fn test_normal_matrix_uniform_scale_keeps_direction() {
        let t = Transform::IDENTITY
            .rotate(30.0, Vec3::Y)
            .scale(Vec3::splat(2.5));
        let normal = Vec3::new(0.0, 0.6, 0.8);

        let by_model = t.matrix().transform_vector3(normal).normalize();
        let by_normal = t.normal_matrix().transform_vector3(normal).normalize();
        assert!(by_model.abs_diff_eq(by_normal, EPSILON));
    }

    #[test]
    fn test_normal_matrix_non_uniform_scale_stays_perpendicular() {
        let t = Transform::IDENTITY.scale(Vec3::new(3.0, 1.0, 1.0));

        // Surface along the diagonal of the XY plane
        let tangent = Vec3::new(1.0, -1.0, 0.0);
        let normal = Vec3::new(1.0, 1.0, 0.0);

        let tangent_world = t.matrix().transform_vector3(tangent);
        let naive = t.matrix().transform_vector3(normal);
        let corrected = t.normal_matrix().transform_vector3(normal);

        assert!(tangent_world.dot(naive).abs() > 0.1);
        assert!(tangent_world.dot(corrected).abs() < EPSILON);
    }

    #[test]
    fn test_normal_matrix_axis_normal_unaffected_by_stretch() {
        let t = Transform::IDENTITY.scale(Vec3::new(4.0, 1.0, 1.0));
        let n = t.normal_matrix().transform_vector3(Vec3::Y).normalize();
        assert!(n.abs_diff_eq(Vec3::Y, EPSILON));
    }

    #[test]
    fn test_normal_matrix_singular_falls_back_to_identity() {
        let t = Transform::IDENTITY.scale(Vec3::new(1.0, 0.0, 1.0));
        assert!(!t.is_invertible());
        assert_eq!(t.normal_matrix(), Mat4::IDENTITY);
    }
}
