//! The dog's body plan
//!
//! Placement, shape and color of every part, relative to its parent's pivot.
//! Front is -Z. Legs hang from undrawn mounts whose pivot carries a uniform
//! [`LIMB_UNIT`] scale, so leg offsets read in limb units.

use glam::{Vec3, Vec4};
use smallvec::{SmallVec, smallvec};

use super::joints::{JointAngles, Leg};
use crate::procedural::ShapeKind;
use crate::transform::Transform;

/// World size of one limb unit
pub const LIMB_UNIT: f32 = 0.25;

/// A node in the body hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Body,
    Tail,
    Head,
    MouthRoof,
    MouthFloor,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    /// Undrawn attachment frame for a leg
    LegMount(Leg),
    UpperLeg(Leg),
    LowerLeg(Leg),
    Paw(Leg),
}

impl Part {
    pub fn parent(self) -> Option<Part> {
        match self {
            Part::Body => None,
            Part::Tail | Part::Head | Part::LegMount(_) => Some(Part::Body),
            Part::MouthRoof
            | Part::MouthFloor
            | Part::LeftEye
            | Part::RightEye
            | Part::LeftEar
            | Part::RightEar => Some(Part::Head),
            Part::UpperLeg(leg) => Some(Part::LegMount(leg)),
            Part::LowerLeg(leg) => Some(Part::UpperLeg(leg)),
            Part::Paw(leg) => Some(Part::LowerLeg(leg)),
        }
    }

    pub fn shape(self) -> Option<ShapeKind> {
        match self {
            Part::LegMount(_) => None,
            Part::Tail => Some(ShapeKind::cylinder()),
            _ => Some(ShapeKind::Cube),
        }
    }

    pub fn color(self) -> Vec4 {
        let rgb = match self {
            Part::Body => Vec3::new(0.45, 0.3, 0.0),
            Part::Tail => Vec3::new(0.4, 0.2, 0.0),
            Part::Head | Part::MouthFloor | Part::LeftEar | Part::RightEar => {
                Vec3::new(0.5, 0.3, 0.0)
            }
            Part::MouthRoof => Vec3::new(0.5, 0.2, 0.0),
            Part::LeftEye | Part::RightEye | Part::LegMount(_) => Vec3::ZERO,
            Part::UpperLeg(Leg::BackRight) => Vec3::new(0.65, 0.4, 0.0),
            Part::UpperLeg(_) => Vec3::new(0.6, 0.4, 0.0),
            Part::LowerLeg(Leg::BackRight) => Vec3::new(0.55, 0.35, 0.0),
            Part::LowerLeg(_) => Vec3::new(0.65, 0.35, 0.0),
            Part::Paw(Leg::BackLeft) => Vec3::new(0.5, 0.35, 0.0),
            Part::Paw(Leg::BackRight) => Vec3::new(0.5, 0.3, 0.0),
            Part::Paw(_) => Vec3::new(0.7, 0.5, 0.0),
        };
        rgb.extend(1.0)
    }

    /// Every part, parents before children, in draw order
    pub fn all() -> Vec<Part> {
        let mut parts = vec![
            Part::Body,
            Part::Tail,
            Part::Head,
            Part::MouthRoof,
            Part::MouthFloor,
            Part::LeftEye,
            Part::RightEye,
            Part::LeftEar,
            Part::RightEar,
        ];
        for leg in Leg::ALL {
            parts.extend([
                Part::LegMount(leg),
                Part::UpperLeg(leg),
                Part::LowerLeg(leg),
                Part::Paw(leg),
            ]);
        }
        parts
    }
}

/// Where a leg mount sits in the body's pivot frame
fn mount_offset(leg: Leg) -> Vec3 {
    match leg {
        Leg::FrontLeft => Vec3::new(0.495, 0.0375, 0.05),
        Leg::FrontRight => Vec3::new(0.11, 0.0375, 0.05),
        Leg::BackLeft => Vec3::new(0.11, 0.0375, 0.55),
        Leg::BackRight => Vec3::new(0.495, 0.0375, 0.55),
    }
}

/// A part's placement relative to its parent's pivot
#[derive(Debug, Clone, PartialEq)]
pub struct LocalPose {
    pub translate: Vec3,
    /// Applied in order, each as `(degrees, axis)`
    pub rotations: SmallVec<[(f32, Vec3); 3]>,
    /// Uniform scale that children inherit
    pub pivot_scale: f32,
    /// The part's own scale, never inherited
    pub scale: Vec3,
}

impl LocalPose {
    fn new(translate: Vec3, rotations: SmallVec<[(f32, Vec3); 3]>, scale: Vec3) -> Self {
        Self {
            translate,
            rotations,
            pivot_scale: 1.0,
            scale,
        }
    }

    /// Compose onto the parent's pivot, returning `(pivot, model)`
    pub fn apply(&self, parent_pivot: Transform) -> (Transform, Transform) {
        let mut pivot = parent_pivot.translate(self.translate);
        for &(degrees, axis) in &self.rotations {
            pivot = pivot.rotate(degrees, axis);
        }
        if self.pivot_scale != 1.0 {
            pivot = pivot.scale(Vec3::splat(self.pivot_scale));
        }
        (pivot, pivot.scale(self.scale))
    }
}

/// Local pose of `part` for the given joint angles
pub fn local_pose(part: Part, angles: &JointAngles) -> LocalPose {
    let head_part = Vec3::new(0.15, 0.075, 0.2);
    let eye = Vec3::splat(0.05);
    let ear = Vec3::new(0.1, 0.1, 0.05);

    match part {
        Part::Body => LocalPose::new(
            Vec3::new(-0.25, -0.2, -0.05),
            smallvec![(angles.body, Vec3::X)],
            Vec3::new(0.5, 0.3, 0.65),
        ),
        Part::Tail => LocalPose::new(
            Vec3::new(0.25, 0.25, 0.55),
            smallvec![(45.0, Vec3::X), (angles.tail, Vec3::Z)],
            Vec3::new(0.1, 0.4, 0.1),
        ),
        Part::Head => LocalPose::new(
            Vec3::new(0.075, 0.225, -0.1),
            SmallVec::new(),
            Vec3::new(0.35, 0.25, 0.2),
        ),
        Part::MouthRoof => {
            LocalPose::new(Vec3::new(0.1, 0.05, -0.15), SmallVec::new(), head_part)
        }
        Part::MouthFloor => LocalPose::new(
            Vec3::new(0.25, 0.0, 0.05),
            smallvec![(180.0, Vec3::Y), (10.0, Vec3::X), (angles.mouth, Vec3::X)],
            head_part,
        ),
        Part::LeftEye => LocalPose::new(Vec3::new(0.25, 0.15, -0.001), SmallVec::new(), eye),
        Part::RightEye => LocalPose::new(Vec3::new(0.05, 0.15, -0.001), SmallVec::new(), eye),
        Part::LeftEar => LocalPose::new(
            Vec3::new(0.25, 0.175, 0.1),
            smallvec![(45.0, Vec3::Z)],
            ear,
        ),
        Part::RightEar => LocalPose::new(
            Vec3::new(0.1, 0.175, 0.1),
            smallvec![(45.0, Vec3::Z)],
            ear,
        ),
        Part::LegMount(leg) => LocalPose {
            translate: mount_offset(leg),
            rotations: SmallVec::new(),
            pivot_scale: LIMB_UNIT,
            scale: Vec3::ONE,
        },
        // Flipped about Z so the leg grows downward
        Part::UpperLeg(leg) => LocalPose::new(
            Vec3::ZERO,
            smallvec![
                (180.0, Vec3::Z),
                (-15.0, Vec3::X),
                (angles.leg(leg).upper, Vec3::X)
            ],
            Vec3::new(0.42, 1.1, 0.4),
        ),
        Part::LowerLeg(leg) => LocalPose::new(
            Vec3::Y,
            smallvec![(30.0, Vec3::X), (angles.leg(leg).lower, Vec3::X)],
            Vec3::new(0.42, 1.0, 0.4),
        ),
        Part::Paw(leg) => LocalPose::new(
            Vec3::new(-0.014, 1.0, 0.4),
            smallvec![(180.0, Vec3::X), (angles.leg(leg).paw, Vec3::X)],
            Vec3::new(0.476, 0.2, 0.8),
        ),
    }
}
