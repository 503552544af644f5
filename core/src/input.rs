//! User input events
//!
//! Backend-neutral commands the frame driver consumes. The viewer maps
//! window events and key bindings onto these.

use glam::Vec2;

use crate::skeleton::Joint;

/// Axis of the point light position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightAxis {
    X,
    Y,
    Z,
}

/// A discrete input command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Assign a joint angle in degrees (clamped to ±90)
    SetJoint { joint: Joint, degrees: f32 },
    /// Zero every joint
    ResetPose,
    StartLocomotion,
    StopLocomotion,
    /// Color surfaces by their normals
    SetNormalDebug(bool),
    SetLighting(bool),
    SetLightOrbit(bool),
    SetLightAxis { axis: LightAxis, value: f32 },
    /// Pointer pressed at a client position; shift triggers a poke
    PointerPress { position: Vec2, shift: bool },
    PointerMove { position: Vec2 },
    PointerRelease,
    PointerLeave,
}
