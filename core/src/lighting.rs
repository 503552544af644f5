//! Point light + spotlight Phong lighting
//!
//! [`LightState`] is the user-facing light setup. Each frame it resolves to a
//! [`LightingUniforms`] snapshot, which is both what gets submitted to the
//! render context and what [`LightingUniforms::shade`] evaluates on the CPU.
//! The WGSL fragment shader implements the same model.

use glam::{Vec3, Vec4};

use crate::input::LightAxis;
use crate::render::{FlagUniform, RenderContext, ScalarUniform, VectorUniform};

/// Specular exponent for both lights
pub const SHININESS: f32 = 5.0;
/// Fraction of the base color always visible
pub const AMBIENT: f32 = 0.3;
/// Weight of the spotlight's diffuse term
pub const SPOT_DIFFUSE_WEIGHT: f32 = 0.5;

/// Base color recognised as the sky backdrop (no specular)
pub const SKY_COLOR: Vec3 = Vec3::new(0.5, 0.7, 1.0);

/// Conical light with a smooth edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spotlight {
    pub position: Vec3,
    /// Unit vector the cone points along
    pub direction: Vec3,
    /// Cosine of the full-intensity half-angle
    pub inner_cos: f32,
    /// Cosine of the zero-intensity half-angle
    pub outer_cos: f32,
}

impl Spotlight {
    /// Build from cone half-angles in degrees
    ///
    /// The angles are swapped if given in the wrong order. A zero direction
    /// points the cone straight down.
    pub fn new(position: Vec3, direction: Vec3, inner_deg: f32, outer_deg: f32) -> Self {
        let (inner, outer) = if inner_deg <= outer_deg {
            (inner_deg, outer_deg)
        } else {
            (outer_deg, inner_deg)
        };
        Self {
            position,
            direction: direction.try_normalize().unwrap_or(Vec3::NEG_Y),
            inner_cos: inner.to_radians().cos(),
            outer_cos: outer.to_radians().cos(),
        }
    }

    /// Cone falloff for a fragment whose unit direction to the light is `to_light`
    pub fn intensity(&self, to_light: Vec3) -> f32 {
        cone_intensity(to_light, self.direction, self.inner_cos, self.outer_cos)
    }
}

/// Smooth cone falloff: 1 inside the inner cone, 0 outside the outer cone
pub fn cone_intensity(to_light: Vec3, spot_direction: Vec3, inner_cos: f32, outer_cos: f32) -> f32 {
    let theta = to_light.dot(-spot_direction);
    let edge = inner_cos - outer_cos;
    if edge <= f32::EPSILON {
        return if theta >= inner_cos { 1.0 } else { 0.0 };
    }
    ((theta - outer_cos) / edge).clamp(0.0, 1.0)
}

/// Whether `base` falls in the sky's light-blue range
pub fn is_sky(base: Vec3) -> bool {
    (0.45..=0.55).contains(&base.x) && (0.65..=0.75).contains(&base.y) && base.z >= 0.95
}

fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

/// Light setup controlled by the user
#[derive(Debug, Clone, PartialEq)]
pub struct LightState {
    /// Point light position set by the user
    pub point: Vec3,
    pub spot: Spotlight,
    pub enabled: bool,
    /// Circle the point light around the Y axis
    pub orbit: bool,
    pub orbit_radius: f32,
    /// Radians per second
    pub orbit_speed: f32,
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            point: Vec3::new(1.0, 1.5, 1.5),
            spot: Spotlight::new(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y, 15.0, 25.0),
            enabled: true,
            orbit: false,
            orbit_radius: 2.0,
            orbit_speed: 0.5,
        }
    }
}

impl LightState {
    /// Point light position at time `t` seconds
    pub fn point_position(&self, t: f64) -> Vec3 {
        if !self.orbit {
            return self.point;
        }
        let angle = (t * self.orbit_speed as f64) as f32;
        Vec3::new(
            self.orbit_radius * angle.cos(),
            self.point.y,
            self.orbit_radius * angle.sin(),
        )
    }

    /// Set one axis of the point light, which also stops orbiting
    pub fn set_axis(&mut self, axis: LightAxis, value: f32) {
        if !value.is_finite() {
            return;
        }
        self.orbit = false;
        match axis {
            LightAxis::X => self.point.x = value,
            LightAxis::Y => self.point.y = value,
            LightAxis::Z => self.point.z = value,
        }
    }

    /// Resolve the frame's lighting values
    pub fn uniforms(&self, t: f64, camera_position: Vec3, normal_debug: bool) -> LightingUniforms {
        LightingUniforms {
            point_position: self.point_position(t),
            spot: self.spot,
            camera_position,
            enabled: self.enabled,
            normal_debug,
        }
    }
}

/// Lighting values for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingUniforms {
    pub point_position: Vec3,
    pub spot: Spotlight,
    pub camera_position: Vec3,
    pub enabled: bool,
    /// Replace base colors with the normal visualisation
    pub normal_debug: bool,
}

impl LightingUniforms {
    /// Bind every lighting uniform
    pub fn submit(&self, ctx: &mut dyn RenderContext) {
        ctx.set_vector(VectorUniform::LightPosition, self.point_position);
        ctx.set_vector(VectorUniform::SpotPosition, self.spot.position);
        ctx.set_vector(VectorUniform::SpotDirection, self.spot.direction);
        ctx.set_vector(VectorUniform::CameraPosition, self.camera_position);
        ctx.set_scalar(ScalarUniform::SpotInnerCutoff, self.spot.inner_cos);
        ctx.set_scalar(ScalarUniform::SpotOuterCutoff, self.spot.outer_cos);
        ctx.set_flag(FlagUniform::LightingEnabled, self.enabled);
        ctx.set_flag(FlagUniform::NormalDebug, self.normal_debug);
    }

    /// Shade one fragment
    ///
    /// `position` is in world space and `normal` is the world-space unit
    /// normal. Alpha passes through untouched.
    pub fn shade(&self, base: Vec4, position: Vec3, normal: Vec3) -> Vec4 {
        let sky = is_sky(base.truncate());
        let color = if self.normal_debug {
            (normal + Vec3::ONE) * 0.5
        } else {
            base.truncate()
        };

        if !self.enabled {
            return color.extend(base.w);
        }

        let view = (self.camera_position - position).normalize_or_zero();

        let to_point = (self.point_position - position).normalize_or_zero();
        let diffuse_point = normal.dot(to_point).max(0.0);
        let specular_point = view.dot(reflect(-to_point, normal)).max(0.0).powf(SHININESS);

        let to_spot = (self.spot.position - position).normalize_or_zero();
        let diffuse_spot = normal.dot(to_spot).max(0.0);
        let intensity = self.spot.intensity(to_spot);
        let specular_spot =
            view.dot(reflect(-to_spot, normal)).max(0.0).powf(SHININESS) * intensity;

        let specular = if sky {
            0.0
        } else {
            specular_point + specular_spot
        };

        let lit = AMBIENT * color
            + color * (diffuse_point + diffuse_spot * intensity * SPOT_DIFFUSE_WEIGHT)
            + Vec3::splat(specular);
        lit.extend(base.w)
    }
}
