//! Per-frame orchestration
//!
//! [`FrameDriver`] owns the scene and runs one frame against a
//! [`RenderContext`]: advance the animation, pose the skeleton, bind camera
//! and lighting uniforms, then draw the sky, the dog, the light marker and
//! the external model in that order. Input is applied between frames
//! through [`FrameDriver::handle_input`].

use glam::{Vec3, Vec4};
use tracing::{debug, warn};

use crate::animation::Animator;
use crate::camera::OrbitCamera;
use crate::config::Config;
use crate::fps::FpsCounter;
use crate::geometry_cache::GeometryCache;
use crate::input::InputEvent;
use crate::lighting::{LightState, SKY_COLOR};
use crate::model::{ExternalModel, ModelStatus};
use crate::primitive::Primitive;
use crate::procedural::ShapeKind;
use crate::render::{MatrixUniform, RenderContext};
use crate::skeleton::{JointAngles, Skeleton};
use crate::transform::Transform;

/// Half the edge length of the sky box
pub const SKY_EXTENT: f32 = 2.5;

/// Radius multiplier of the light marker sphere
const LIGHT_MARKER_SCALE: f32 = 0.1;
const LIGHT_MARKER_COLOR: Vec4 = Vec4::new(1.0, 0.95, 0.6, 1.0);

/// Clear color behind the sky box
pub const DEFAULT_CLEAR_COLOR: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);

/// Everything the user can change between frames
#[derive(Debug, Clone)]
pub struct SceneState {
    pub angles: JointAngles,
    pub animator: Animator,
    pub camera: OrbitCamera,
    pub lights: LightState,
    /// Color surfaces by their normals
    pub normal_debug: bool,
    pub clear_color: Vec4,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            angles: JointAngles::default(),
            animator: Animator::new(),
            camera: OrbitCamera::default(),
            lights: LightState::default(),
            normal_debug: false,
            clear_color: DEFAULT_CLEAR_COLOR,
        }
    }
}

impl SceneState {
    pub fn from_config(config: &Config) -> Self {
        let mut animator = Animator::new();
        if config.scene.animate {
            animator.start_locomotion();
        }
        Self {
            animator,
            camera: config.camera.to_camera(),
            lights: config.lighting.to_light_state(),
            normal_debug: config.scene.normal_debug,
            ..Self::default()
        }
    }
}

/// Result of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Body parts drawn (parts whose upload failed are skipped)
    pub parts_drawn: usize,
    pub model_drawn: bool,
    /// New frames-per-second readout, once per second
    pub fps: Option<u32>,
}

/// The backdrop: an inside-out unshaded cube around the origin
fn sky_primitive() -> Primitive {
    let mut sky = Primitive::new(ShapeKind::Cube, SKY_COLOR.extend(1.0)).without_face_shading();
    sky.set_transform(
        Transform::IDENTITY
            .translate(Vec3::splat(SKY_EXTENT))
            .scale(Vec3::splat(-2.0 * SKY_EXTENT)),
    );
    sky
}

/// Drives the scene one frame at a time
pub struct FrameDriver {
    pub scene: SceneState,
    skeleton: Skeleton,
    sky: Primitive,
    light_marker: Option<Primitive>,
    model: Option<ExternalModel>,
    cache: GeometryCache,
    fps: FpsCounter,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(SceneState::default())
    }
}

impl FrameDriver {
    pub fn new(scene: SceneState) -> Self {
        Self {
            scene,
            skeleton: Skeleton::new(),
            sky: sky_primitive(),
            light_marker: None,
            model: None,
            cache: GeometryCache::new(),
            fps: FpsCounter::new(),
        }
    }

    /// Build the scene described by `config`, starting the model load if one
    /// is configured
    pub fn from_config(config: &Config) -> Self {
        let mut driver = Self::new(SceneState::from_config(config));
        if config.scene.light_marker {
            driver.enable_light_marker();
        }
        if let Some(path) = &config.scene.model_path {
            debug!("Loading external model from {}", path.display());
            let mut model = ExternalModel::load(path);
            model.color = config.scene.model_color();
            model.set_transform(config.scene.model_transform());
            driver.model = Some(model);
        }
        driver
    }

    /// Add (or replace) the external model
    #[must_use]
    pub fn with_model(mut self, model: ExternalModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Draw a small sphere at the point light
    pub fn enable_light_marker(&mut self) {
        self.light_marker = Some(
            Primitive::new(ShapeKind::sphere(), LIGHT_MARKER_COLOR).without_face_shading(),
        );
    }

    /// Apply one input event at time `now` (seconds since program start)
    pub fn handle_input(&mut self, event: InputEvent, now: f64) {
        let scene = &mut self.scene;
        match event {
            InputEvent::SetJoint { joint, degrees } => {
                let stored = scene.angles.set_clamped(joint, degrees);
                debug!("{} = {:.1}", joint, stored);
            }
            InputEvent::ResetPose => scene.angles.reset(),
            InputEvent::StartLocomotion => scene.animator.start_locomotion(),
            InputEvent::StopLocomotion => scene.animator.stop_locomotion(),
            InputEvent::SetNormalDebug(on) => scene.normal_debug = on,
            InputEvent::SetLighting(on) => scene.lights.enabled = on,
            InputEvent::SetLightOrbit(on) => scene.lights.orbit = on,
            InputEvent::SetLightAxis { axis, value } => scene.lights.set_axis(axis, value),
            InputEvent::PointerPress { position, shift } => {
                if shift && scene.animator.trigger_poke(now) {
                    scene.camera.end_drag();
                    return;
                }
                if !scene.animator.is_poking() {
                    scene.camera.begin_drag(position);
                }
            }
            InputEvent::PointerMove { position } => {
                if !scene.animator.is_poking() {
                    scene.camera.drag_to(position);
                }
            }
            InputEvent::PointerRelease | InputEvent::PointerLeave => scene.camera.end_drag(),
        }
    }

    /// Render one frame at `now` seconds since program start
    pub fn frame(&mut self, now: f64, aspect_ratio: f32, ctx: &mut dyn RenderContext) -> FrameStats {
        let fps = self.fps.tick(now);
        if let Some(fps) = fps {
            debug!("{} fps", fps);
        }

        let scene = &mut self.scene;
        if scene.animator.advance(now, &mut scene.angles) {
            scene.camera.end_drag();
        }
        self.skeleton.update(&scene.angles);

        ctx.clear(scene.clear_color);
        ctx.set_matrix(MatrixUniform::View, scene.camera.view_matrix());
        ctx.set_matrix(
            MatrixUniform::Projection,
            scene.camera.projection_matrix(aspect_ratio),
        );

        let lighting = scene
            .lights
            .uniforms(now, scene.camera.eye_position(), scene.normal_debug);
        lighting.submit(ctx);

        if let Err(e) = self.sky.draw(&mut self.cache, ctx) {
            warn!("Skipping sky this frame: {}", e);
        }

        let parts_drawn = self.skeleton.draw(&mut self.cache, ctx);

        if let Some(marker) = self.light_marker.as_mut() {
            marker.set_transform(
                Transform::IDENTITY
                    .translate(lighting.point_position)
                    .scale(Vec3::splat(LIGHT_MARKER_SCALE)),
            );
            if let Err(e) = marker.draw(&mut self.cache, ctx) {
                warn!("Skipping light marker this frame: {}", e);
            }
        }

        let model_drawn = match self.model.as_mut() {
            Some(model) => {
                model.poll() == ModelStatus::Ready
                    && model.draw(ctx).unwrap_or_else(|e| {
                        warn!("Skipping model this frame: {}", e);
                        false
                    })
            }
            None => false,
        };

        FrameStats {
            parts_drawn,
            model_drawn,
            fps,
        }
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// Most recent frames-per-second readout
    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    pub fn model_status(&self) -> Option<ModelStatus> {
        self.model.as_ref().map(ExternalModel::status)
    }
}
