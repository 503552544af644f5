//! End-to-end frame tests against a counting render context.
//!
//! These drive the public API only: config in, frames out.

use std::time::{Duration, Instant};

use glam::{Mat4, Vec3, Vec4};
use kennel_core::skeleton::LIMB_UNIT;
use kennel_core::{
    BufferId, Config, FlagUniform, FrameDriver, InputEvent, Joint, Leg, MatrixUniform, MeshBuffers,
    ModelStatus, Part, RenderContext, RenderError, ScalarUniform, VectorUniform,
};

/// Counts calls and keeps only the state the assertions need
#[derive(Default)]
struct CountingContext {
    buffers: u32,
    draws: usize,
    indexed_draws: usize,
    clears: usize,
    lighting_enabled: Option<bool>,
    spot_cutoffs: (f32, f32),
    last_color: Vec4,
    last_model: Mat4,
}

impl RenderContext for CountingContext {
    fn create_vertex_buffer(&mut self, data: &[f32]) -> Result<BufferId, RenderError> {
        if data.is_empty() {
            return Err(RenderError::EmptyBuffer("vertex"));
        }
        self.buffers += 1;
        Ok(BufferId(self.buffers))
    }

    fn create_index_buffer(&mut self, data: &[u16]) -> Result<BufferId, RenderError> {
        if data.is_empty() {
            return Err(RenderError::EmptyBuffer("index"));
        }
        self.buffers += 1;
        Ok(BufferId(self.buffers))
    }

    fn set_matrix(&mut self, uniform: MatrixUniform, value: Mat4) {
        if uniform == MatrixUniform::Model {
            self.last_model = value;
        }
    }

    fn set_vector(&mut self, _uniform: VectorUniform, _value: Vec3) {}

    fn set_color(&mut self, color: Vec4) {
        self.last_color = color;
    }

    fn set_scalar(&mut self, uniform: ScalarUniform, value: f32) {
        match uniform {
            ScalarUniform::SpotInnerCutoff => self.spot_cutoffs.0 = value,
            ScalarUniform::SpotOuterCutoff => self.spot_cutoffs.1 = value,
        }
    }

    fn set_flag(&mut self, uniform: FlagUniform, value: bool) {
        if uniform == FlagUniform::LightingEnabled {
            self.lighting_enabled = Some(value);
        }
    }

    fn draw_arrays(&mut self, _mesh: &MeshBuffers, _first: u32, _count: u32) {
        self.draws += 1;
    }

    fn draw_indexed(&mut self, _mesh: &MeshBuffers, _index_count: u32) {
        self.draws += 1;
        self.indexed_draws += 1;
    }

    fn clear(&mut self, _color: Vec4) {
        self.clears += 1;
    }
}

const PYRAMID: &str = "\
v 0 0 0
v 1 0 0
v 1 0 1
v 0 0 1
v 0.5 1 0.5
f 1 2 3 4
f 1 5 2
f 2 5 3
f 3 5 4
f 4 5 1
";

#[test]
fn test_configured_model_appears_once_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pyramid.obj");
    std::fs::write(&path, PYRAMID).unwrap();

    let mut config = Config::default();
    config.scene.model_path = Some(path);
    config.scene.light_marker = false;

    let mut driver = FrameDriver::from_config(&config);
    let mut ctx = CountingContext::default();

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut now = 0.0;
    loop {
        let stats = driver.frame(now, 4.0 / 3.0, &mut ctx);
        assert_eq!(stats.parts_drawn, 21);
        if stats.model_drawn {
            break;
        }
        assert_eq!(driver.model_status(), Some(ModelStatus::Loading));
        assert!(Instant::now() < deadline, "model never became ready");
        std::thread::sleep(Duration::from_millis(5));
        now += 1.0 / 60.0;
    }

    assert_eq!(driver.model_status(), Some(ModelStatus::Ready));
    // Placement and color come from the config
    assert_eq!(ctx.last_color, config.scene.model_color());
    assert_eq!(ctx.last_model, config.scene.model_transform().matrix());
}

#[test]
fn test_broken_model_never_drawn() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.obj");
    std::fs::write(&path, "v 1 2\nf 1 1 1\n").unwrap();

    let mut config = Config::default();
    config.scene.model_path = Some(path);
    let mut driver = FrameDriver::from_config(&config);
    let mut ctx = CountingContext::default();

    let deadline = Instant::now() + Duration::from_secs(5);
    while driver.model_status() != Some(ModelStatus::Failed) {
        assert!(!driver.frame(0.0, 1.0, &mut ctx).model_drawn);
        assert!(Instant::now() < deadline, "model load never settled");
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(!driver.frame(0.0, 1.0, &mut ctx).model_drawn);
}

#[test]
fn test_default_frame_with_light_marker() {
    let mut driver = FrameDriver::from_config(&Config::default());
    let mut ctx = CountingContext::default();
    driver.frame(0.0, 1.0, &mut ctx);

    assert_eq!(ctx.clears, 1);
    // Sky + 121 body draws + marker sphere
    assert_eq!(ctx.draws, 123);
    assert_eq!(ctx.indexed_draws, 1);
    // Cube, cylinder and sphere (with indices)
    assert_eq!(ctx.buffers, 7);
    assert_eq!(ctx.lighting_enabled, Some(true));
    assert!((ctx.spot_cutoffs.0 - 15f32.to_radians().cos()).abs() < 1e-6);
    assert!((ctx.spot_cutoffs.1 - 25f32.to_radians().cos()).abs() < 1e-6);
}

#[test]
fn test_walking_moves_paws() {
    let mut config = Config::default();
    config.scene.animate = true;
    let mut driver = FrameDriver::from_config(&config);
    let mut ctx = CountingContext::default();

    let paw = |driver: &FrameDriver| {
        driver
            .skeleton()
            .transform(Part::Paw(Leg::FrontLeft))
            .unwrap()
            .pivot
            .transform_point(Vec3::ZERO)
    };

    driver.frame(0.0, 1.0, &mut ctx);
    let start = paw(&driver);
    driver.frame(0.5, 1.0, &mut ctx);
    let later = paw(&driver);

    assert!(start.distance(later) > LIMB_UNIT * 0.1);
    assert!(driver.scene.angles.get(Joint::Upper(Leg::FrontLeft)).abs() > 1.0);

    // Stopping freezes the pose where it is
    driver.handle_input(InputEvent::StopLocomotion, 0.5);
    driver.frame(1.0, 1.0, &mut ctx);
    assert_eq!(paw(&driver), later);
}

#[test]
fn test_lights_off_reaches_context() {
    let mut driver = FrameDriver::default();
    let mut ctx = CountingContext::default();
    driver.handle_input(InputEvent::SetLighting(false), 0.0);
    driver.frame(0.0, 1.0, &mut ctx);
    assert_eq!(ctx.lighting_enabled, Some(false));
}
