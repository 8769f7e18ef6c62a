//! Joint angle sets.
//!
//! All angles are in degrees. A [`Pose`] is a plain value: every factory
//! returns a fresh one, so callers can tweak it freely without affecting any
//! other pose.

use std::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::leg::{Joint, LEG_COUNT, LegId};
use crate::{HexapodError, Result};

/// Joint angles of a single leg, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LegPose {
    /// Hip yaw (alpha).
    pub coxia: f64,
    /// Femur pitch (beta).
    pub femur: f64,
    /// Tibia pitch from perpendicular (gamma).
    pub tibia: f64,
}

impl LegPose {
    /// Create a leg pose from its three angles.
    #[must_use]
    pub const fn new(coxia: f64, femur: f64, tibia: f64) -> Self {
        Self {
            coxia,
            femur,
            tibia,
        }
    }

    /// Angle of one joint.
    #[must_use]
    pub const fn angle(&self, joint: Joint) -> f64 {
        match joint {
            Joint::Coxia => self.coxia,
            Joint::Femur => self.femur,
            Joint::Tibia => self.tibia,
        }
    }
}

/// Joint angles for all six legs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    legs: [LegPose; LEG_COUNT],
}

impl Pose {
    /// Create a pose from per-leg angles in [`LegId`] order.
    #[must_use]
    pub const fn new(legs: [LegPose; LEG_COUNT]) -> Self {
        Self { legs }
    }

    /// All joints at zero: femurs horizontal, tibias straight down.
    #[must_use]
    pub fn neutral() -> Self {
        Self::default()
    }

    /// The same angles on every leg.
    #[must_use]
    pub fn uniform(leg: LegPose) -> Self {
        Self {
            legs: [leg; LEG_COUNT],
        }
    }

    /// Neutral pose offset by a hip stance and a leg stance.
    ///
    /// The front and back hips swing towards the middle legs by `hip_stance`,
    /// the middle hips stay put. Every femur is raised by `leg_stance` and
    /// every tibia turned in by the same amount.
    #[must_use]
    pub fn stance(hip_stance: f64, leg_stance: f64) -> Self {
        let mut pose = Self::uniform(LegPose::new(0.0, leg_stance, -leg_stance));
        pose[LegId::RightFront].coxia = -hip_stance;
        pose[LegId::LeftFront].coxia = hip_stance;
        pose[LegId::LeftBack].coxia = -hip_stance;
        pose[LegId::RightBack].coxia = hip_stance;
        pose
    }

    /// Angles of one leg.
    #[must_use]
    pub fn get(&self, leg: LegId) -> &LegPose {
        &self.legs[leg.index()]
    }

    /// Replace the angles of one leg.
    pub fn set(&mut self, leg: LegId, pose: LegPose) {
        self.legs[leg.index()] = pose;
    }

    /// Builder-style variant of [`Self::set`].
    #[must_use]
    pub fn with_leg(mut self, leg: LegId, pose: LegPose) -> Self {
        self.set(leg, pose);
        self
    }

    /// Iterate over `(leg, angles)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (LegId, &LegPose)> {
        LegId::ALL.into_iter().zip(self.legs.iter())
    }

    /// Validate that every angle is finite.
    pub fn validate(&self) -> Result<()> {
        for (leg, pose) in self.iter() {
            for joint in [Joint::Coxia, Joint::Femur, Joint::Tibia] {
                let value = pose.angle(joint);
                if !value.is_finite() {
                    return Err(HexapodError::invalid_config(format!(
                        "{leg} {joint} angle must be finite, got {value}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Index<LegId> for Pose {
    type Output = LegPose;

    fn index(&self, leg: LegId) -> &LegPose {
        &self.legs[leg.index()]
    }
}

impl IndexMut<LegId> for Pose {
    fn index_mut(&mut self, leg: LegId) -> &mut LegPose {
        &mut self.legs[leg.index()]
    }
}

impl From<[LegPose; LEG_COUNT]> for Pose {
    fn from(legs: [LegPose; LEG_COUNT]) -> Self {
        Self::new(legs)
    }
}
