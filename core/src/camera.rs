//! Orbit camera
//!
//! Two Euler angles around the origin at a fixed distance, driven by pointer
//! drags.

use glam::{Mat4, Vec2, Vec3};

/// Default camera field of view in degrees
pub const DEFAULT_CAMERA_FOV: f32 = 60.0;

/// Pitch limit in degrees
pub const PITCH_LIMIT: f32 = 90.0;

/// Pointer travel (in pixels, per axis) a drag must exceed to register
pub const DRAG_THRESHOLD: f32 = 1.0;

/// Camera orbiting the origin
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Degrees about Y, wrapped into `(-360, 360)`
    pub yaw: f32,
    /// Degrees about X, clamped to `[-90, 90]`
    pub pitch: f32,
    /// Distance from the origin
    pub distance: f32,
    /// Field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Degrees per pixel of drag
    pub sensitivity: f32,
    /// Last pointer position that moved the camera, while dragging
    anchor: Option<Vec2>,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: -35.0,
            pitch: 20.0,
            distance: 2.5,
            fov: DEFAULT_CAMERA_FOV,
            near: 0.1,
            far: 100.0,
            sensitivity: 0.5,
            anchor: None,
        }
    }
}

impl OrbitCamera {
    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    /// Start a drag at a pointer position
    pub fn begin_drag(&mut self, position: Vec2) {
        self.anchor = Some(position);
    }

    pub fn end_drag(&mut self) {
        self.anchor = None;
    }

    /// Continue a drag to `position`
    ///
    /// Moves of [`DRAG_THRESHOLD`] pixels or less on both axes are ignored
    /// and keep the old anchor, so slow drags still accumulate. Returns
    /// whether the camera moved.
    pub fn drag_to(&mut self, position: Vec2) -> bool {
        let Some(anchor) = self.anchor else {
            return false;
        };

        let delta = position - anchor;
        if delta.x.abs() <= DRAG_THRESHOLD && delta.y.abs() <= DRAG_THRESHOLD {
            return false;
        }

        self.rotate(delta.x * self.sensitivity, delta.y * self.sensitivity);
        self.anchor = Some(position);
        true
    }

    /// Add to yaw and pitch, wrapping yaw and clamping pitch
    pub fn rotate(&mut self, yaw_deg: f32, pitch_deg: f32) {
        self.yaw = (self.yaw + yaw_deg) % 360.0;
        self.pitch = (self.pitch + pitch_deg).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// World-to-camera transform: back off by `distance`, then pitch, then yaw
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
            * Mat4::from_rotation_x(self.pitch.to_radians())
            * Mat4::from_rotation_y(self.yaw.to_radians())
    }

    /// Compute the projection matrix for a given aspect ratio
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect_ratio, self.near, self.far)
    }

    /// Compute the combined view-projection matrix
    pub fn view_projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        self.projection_matrix(aspect_ratio) * self.view_matrix()
    }

    /// Camera position in world space, for specular highlights
    pub fn eye_position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.to_radians().sin_cos();
        Vec3::new(
            -self.distance * cos_pitch * sin_yaw,
            self.distance * sin_pitch,
            self.distance * cos_pitch * cos_yaw,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_camera_default() {
        let camera = OrbitCamera::default();
        assert_eq!(camera.yaw, -35.0);
        assert_eq!(camera.pitch, 20.0);
        assert_eq!(camera.distance, 2.5);
        assert_eq!(camera.fov, DEFAULT_CAMERA_FOV);
        assert!(!camera.is_dragging());
    }

    // ============================================================
    // Angles
    // ============================================================

    #[test]
    fn test_yaw_wraps() {
        let mut camera = OrbitCamera::default();
        camera.yaw = 350.0;
        camera.rotate(20.0, 0.0);
        assert!((camera.yaw - 10.0).abs() < EPSILON);

        camera.yaw = -350.0;
        camera.rotate(-20.0, 0.0);
        assert!((camera.yaw + 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_wrapped_yaw_gives_same_view() {
        let mut wrapped = OrbitCamera::default();
        wrapped.yaw = 10.0;
        let mut unwrapped = OrbitCamera::default();
        unwrapped.yaw = 370.0;

        assert!(
            wrapped
                .view_matrix()
                .abs_diff_eq(unwrapped.view_matrix(), EPSILON)
        );
        assert!(
            wrapped
                .eye_position()
                .abs_diff_eq(unwrapped.eye_position(), EPSILON)
        );
    }

    #[test]
    fn test_pitch_clamps() {
        let mut camera = OrbitCamera::default();
        camera.rotate(0.0, 1000.0);
        assert_eq!(camera.pitch, 90.0);
        camera.rotate(0.0, -5000.0);
        assert_eq!(camera.pitch, -90.0);
    }

    // ============================================================
    // Dragging
    // ============================================================

    #[test]
    fn test_drag_scales_delta() {
        let mut camera = OrbitCamera::default();
        camera.begin_drag(Vec2::new(100.0, 100.0));
        assert!(camera.drag_to(Vec2::new(110.0, 96.0)));
        assert!((camera.yaw - (-30.0)).abs() < EPSILON);
        assert!((camera.pitch - 18.0).abs() < EPSILON);
    }

    #[test]
    fn test_drag_ignores_tiny_moves_and_keeps_anchor() {
        let mut camera = OrbitCamera::default();
        camera.begin_drag(Vec2::new(0.0, 0.0));
        assert!(!camera.drag_to(Vec2::new(1.0, -1.0)));
        assert_eq!(camera.yaw, -35.0);

        // Measured from the original anchor, not the ignored move
        assert!(camera.drag_to(Vec2::new(2.0, 0.0)));
        assert!((camera.yaw - (-34.0)).abs() < EPSILON);
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let mut camera = OrbitCamera::default();
        assert!(!camera.drag_to(Vec2::new(500.0, 500.0)));
        camera.begin_drag(Vec2::ZERO);
        camera.end_drag();
        assert!(!camera.drag_to(Vec2::new(500.0, 500.0)));
        assert_eq!(camera.yaw, -35.0);
    }

    // ============================================================
    // Matrices
    // ============================================================

    #[test]
    fn test_eye_position_matches_view() {
        let mut camera = OrbitCamera::default();
        for (yaw, pitch) in [(-35.0, 20.0), (0.0, 0.0), (120.0, -60.0), (359.0, 89.0)] {
            camera.yaw = yaw;
            camera.pitch = pitch;
            let from_view = camera.view_matrix().inverse().transform_point3(Vec3::ZERO);
            assert!(
                from_view.abs_diff_eq(camera.eye_position(), EPSILON),
                "yaw {} pitch {}",
                yaw,
                pitch
            );
        }
    }

    #[test]
    fn test_origin_in_front_of_camera() {
        let camera = OrbitCamera::default();
        let view_space = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert!((view_space.z + camera.distance).abs() < EPSILON);
    }

    #[test]
    fn test_projection_matrix_aspect_ratio() {
        let camera = OrbitCamera::default();
        assert_ne!(
            camera.projection_matrix(16.0 / 9.0),
            camera.projection_matrix(4.0 / 3.0)
        );
    }

    #[test]
    fn test_view_projection_matrix() {
        let camera = OrbitCamera::default();
        let aspect = 16.0 / 9.0;
        let expected = camera.projection_matrix(aspect) * camera.view_matrix();
        assert_eq!(camera.view_projection_matrix(aspect), expected);
    }
}
