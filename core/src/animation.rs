//! Animation state machine
//!
//! Three modes drive the joint angles:
//!
//! - **Idle**: angles are whatever the user last set
//! - **Locomotion**: a continuous gait keyed to time since program start
//! - **Poke**: a scripted 3.5 s sit-and-bark reaction
//!
//! A poke takes priority over locomotion while it runs. It can only start
//! while locomotion is off, but locomotion may be switched on mid-poke, in
//! which case the end-of-poke reset is skipped and the gait carries on.

use tracing::debug;

use crate::skeleton::{JointAngles, Leg};

/// Length of the poke reaction in seconds
pub const POKE_DURATION: f32 = 3.5;

/// Fraction of the poke spent settling into the sit
const SIT_END: f32 = 0.3;
/// Fraction of the poke at which recovery begins
const BARK_END: f32 = 0.7;

// Peak sit pose, in degrees
const SIT_BODY: f32 = 25.0;
const SIT_BACK_UPPER: f32 = -30.0;
const SIT_BACK_LOWER: f32 = 15.0;
const SIT_FRONT_UPPER: f32 = -15.0;
const SIT_MOUTH: f32 = 12.0;
const SIT_TAIL: f32 = 15.0;

/// Current animation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationMode {
    Idle,
    Locomotion,
    Poke,
}

/// Time-driven joint animation
#[derive(Debug, Clone, Default)]
pub struct Animator {
    locomotion: bool,
    /// Start time of the running poke, in seconds since program start
    poke_start: Option<f64>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> AnimationMode {
        if self.poke_start.is_some() {
            AnimationMode::Poke
        } else if self.locomotion {
            AnimationMode::Locomotion
        } else {
            AnimationMode::Idle
        }
    }

    pub fn is_locomotion_active(&self) -> bool {
        self.locomotion
    }

    pub fn is_poking(&self) -> bool {
        self.poke_start.is_some()
    }

    /// Whether joints are under animator control this frame
    pub fn is_animating(&self) -> bool {
        self.mode() != AnimationMode::Idle
    }

    pub fn start_locomotion(&mut self) {
        self.locomotion = true;
    }

    pub fn stop_locomotion(&mut self) {
        self.locomotion = false;
    }

    /// Start a poke at `now`
    ///
    /// Ignored while locomotion is on or a poke is already running. Returns
    /// whether a poke started.
    pub fn trigger_poke(&mut self, now: f64) -> bool {
        if self.locomotion || self.poke_start.is_some() {
            return false;
        }
        debug!("Poke started at {:.3}s", now);
        self.poke_start = Some(now);
        true
    }

    /// Seconds into the running poke
    pub fn poke_elapsed(&self, now: f64) -> Option<f32> {
        self.poke_start.map(|start| (now - start).max(0.0) as f32)
    }

    /// Advance to `now` (seconds since program start), writing joint angles
    ///
    /// Returns `true` on the frame a poke completes.
    pub fn advance(&mut self, now: f64, angles: &mut JointAngles) -> bool {
        if let Some(elapsed) = self.poke_elapsed(now) {
            if elapsed > POKE_DURATION {
                self.poke_start = None;
                if self.locomotion {
                    locomotion_pose(now, angles);
                } else {
                    angles.reset();
                }
                debug!("Poke finished");
                return true;
            }
            poke_pose(elapsed, angles);
        } else if self.locomotion {
            locomotion_pose(now, angles);
        }
        false
    }
}

/// Write the gait for time `t` (seconds since program start)
///
/// Only the upper legs and tail move; every other joint keeps its value.
pub fn locomotion_pose(t: f64, angles: &mut JointAngles) {
    let swing = |phase: f64| (30.0 * (3.0 * t + phase).sin()) as f32;

    angles.leg_mut(Leg::FrontLeft).upper = swing(0.0);
    angles.leg_mut(Leg::FrontRight).upper = swing(10.0);
    angles.leg_mut(Leg::BackLeft).upper = swing(10.5);
    angles.leg_mut(Leg::BackRight).upper = swing(0.5);
    angles.tail = swing(0.0);
}

/// Write the poke pose `elapsed` seconds into the reaction
pub fn poke_pose(elapsed: f32, angles: &mut JointAngles) {
    let progress = elapsed / POKE_DURATION;

    // Weight of the sit pose, plus mouth and tail values
    let (weight, mouth, tail) = if progress < SIT_END {
        let k = progress / SIT_END;
        (k, SIT_MOUTH * k, SIT_TAIL * k)
    } else if progress < BARK_END {
        let bark = (progress - SIT_END) / SIT_END;
        (
            1.0,
            SIT_MOUTH + 3.0 * (bark * 5.0).sin(),
            SIT_TAIL + 10.0 * (bark * 20.0).sin(),
        )
    } else {
        let rest = 1.0 - ((progress - BARK_END) / SIT_END).min(1.0);
        (rest, SIT_MOUTH * rest, SIT_TAIL * rest)
    };

    angles.body = SIT_BODY * weight;
    for leg in [Leg::BackLeft, Leg::BackRight] {
        let angles = angles.leg_mut(leg);
        angles.upper = SIT_BACK_UPPER * weight;
        angles.lower = SIT_BACK_LOWER * weight;
    }
    for leg in [Leg::FrontLeft, Leg::FrontRight] {
        angles.leg_mut(leg).upper = SIT_FRONT_UPPER * weight;
    }
    angles.mouth = mouth;
    angles.tail = tail;
}
