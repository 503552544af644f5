//! Joint names and the joint-angle set

use std::fmt;

/// Limit applied to user-assigned joint angles, in degrees
pub const JOINT_LIMIT: f32 = 90.0;

/// One of the four legs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leg {
    FrontLeft,
    FrontRight,
    BackLeft,
    BackRight,
}

impl Leg {
    pub const ALL: [Leg; 4] = [Leg::FrontLeft, Leg::FrontRight, Leg::BackLeft, Leg::BackRight];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Leg::FrontLeft => "front-left",
            Leg::FrontRight => "front-right",
            Leg::BackLeft => "back-left",
            Leg::BackRight => "back-right",
        }
    }
}

/// An animatable joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joint {
    /// Pitch of the whole body about its front edge
    Body,
    Mouth,
    Tail,
    Upper(Leg),
    Lower(Leg),
    Paw(Leg),
}

impl Joint {
    /// Every joint, body first, then each leg's upper, lower and paw
    pub const ALL: [Joint; 15] = [
        Joint::Body,
        Joint::Mouth,
        Joint::Tail,
        Joint::Upper(Leg::FrontLeft),
        Joint::Lower(Leg::FrontLeft),
        Joint::Paw(Leg::FrontLeft),
        Joint::Upper(Leg::FrontRight),
        Joint::Lower(Leg::FrontRight),
        Joint::Paw(Leg::FrontRight),
        Joint::Upper(Leg::BackLeft),
        Joint::Lower(Leg::BackLeft),
        Joint::Paw(Leg::BackLeft),
        Joint::Upper(Leg::BackRight),
        Joint::Lower(Leg::BackRight),
        Joint::Paw(Leg::BackRight),
    ];
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Joint::Body => f.write_str("body"),
            Joint::Mouth => f.write_str("mouth"),
            Joint::Tail => f.write_str("tail"),
            Joint::Upper(leg) => write!(f, "{} upper", leg.name()),
            Joint::Lower(leg) => write!(f, "{} lower", leg.name()),
            Joint::Paw(leg) => write!(f, "{} paw", leg.name()),
        }
    }
}

/// Angles of one leg's three links, in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LegAngles {
    pub upper: f32,
    pub lower: f32,
    pub paw: f32,
}

/// Current angle of every joint, in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointAngles {
    pub body: f32,
    pub mouth: f32,
    pub tail: f32,
    pub legs: [LegAngles; 4],
}

impl JointAngles {
    pub fn leg(&self, leg: Leg) -> &LegAngles {
        &self.legs[leg.index()]
    }

    pub fn leg_mut(&mut self, leg: Leg) -> &mut LegAngles {
        &mut self.legs[leg.index()]
    }

    pub fn get(&self, joint: Joint) -> f32 {
        match joint {
            Joint::Body => self.body,
            Joint::Mouth => self.mouth,
            Joint::Tail => self.tail,
            Joint::Upper(leg) => self.leg(leg).upper,
            Joint::Lower(leg) => self.leg(leg).lower,
            Joint::Paw(leg) => self.leg(leg).paw,
        }
    }

    fn slot_mut(&mut self, joint: Joint) -> &mut f32 {
        match joint {
            Joint::Body => &mut self.body,
            Joint::Mouth => &mut self.mouth,
            Joint::Tail => &mut self.tail,
            Joint::Upper(leg) => &mut self.leg_mut(leg).upper,
            Joint::Lower(leg) => &mut self.leg_mut(leg).lower,
            Joint::Paw(leg) => &mut self.leg_mut(leg).paw,
        }
    }

    /// Set a joint without limits (used by the animator)
    pub fn set(&mut self, joint: Joint, degrees: f32) {
        *self.slot_mut(joint) = degrees;
    }

    /// Set a joint from user input, clamped to `[-JOINT_LIMIT, JOINT_LIMIT]`
    ///
    /// Non-finite input is ignored. Returns the stored value.
    pub fn set_clamped(&mut self, joint: Joint, degrees: f32) -> f32 {
        let slot = self.slot_mut(joint);
        if degrees.is_finite() {
            *slot = degrees.clamp(-JOINT_LIMIT, JOINT_LIMIT);
        }
        *slot
    }

    /// Zero every joint
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_rest_pose(&self) -> bool {
        Joint::ALL.iter().all(|&joint| self.get(joint) == 0.0)
    }
}
