//! Kennel Core - articulated dog model pipeline
//!
//! Everything needed to pose, light and draw the dog, independent of any
//! particular graphics backend.
//!
//! # Architecture
//!
//! - [`procedural`] - Cube, cylinder and sphere generators
//! - [`Transform`] - Affine node transforms and normal matrices
//! - [`Skeleton`] - The fixed body hierarchy with explicit pivot chaining
//! - [`Animator`] - Idle / locomotion / poke state machine
//! - [`LightState`] - Point light + spotlight, with a CPU reference shader
//! - [`FrameDriver`] - Per-frame orchestration against a [`RenderContext`]

pub mod animation;
pub mod camera;
pub mod config;
pub mod fps;
pub mod frame;
pub mod geometry_cache;
pub mod input;
pub mod lighting;
pub mod model;
pub mod obj;
pub mod primitive;
pub mod procedural;
pub mod render;
pub mod skeleton;
pub mod transform;

#[cfg(test)]
pub mod test_utils;

pub use animation::{AnimationMode, Animator, POKE_DURATION};
pub use camera::OrbitCamera;
pub use config::{Config, ConfigError};
pub use fps::FpsCounter;
pub use frame::{FrameDriver, FrameStats, SceneState};
pub use geometry_cache::GeometryCache;
pub use input::{InputEvent, LightAxis};
pub use lighting::{LightState, LightingUniforms, Spotlight};
pub use model::{ExternalModel, ModelError, ModelStatus};
pub use obj::{ObjError, parse_obj};
pub use primitive::Primitive;
pub use procedural::{Mesh, ShapeKind, generate};
pub use render::{
    BufferId, FlagUniform, MatrixUniform, MeshBuffers, MeshUpload, RenderContext, RenderError,
    ScalarUniform, VectorUniform,
};
pub use skeleton::{Joint, JointAngles, Leg, Part, Skeleton};
pub use transform::Transform;
