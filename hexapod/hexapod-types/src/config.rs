//! Configuration for the kinematics engine.
//!
//! Everything here has a sensible [`Default`]; callers override individual
//! settings with the `with_*` builders and check the result with
//! [`KinematicsConfig::validate`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::leg::{Joint, LegId};
use crate::{HexapodError, Result};

/// Top-level configuration shared by the forward and inverse paths.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KinematicsConfig {
    /// Joint angle ranges enforced by the IK solver.
    pub angle_limits: AngleLimits,
    /// Ground-contact search settings.
    pub support: SupportConfig,
    /// What a forward update does when no support plane exists.
    pub unstable_policy: UnstablePolicy,
    /// Re-check every solved leg against its own geometry.
    pub sanity_checks: bool,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            angle_limits: AngleLimits::default(),
            support: SupportConfig::default(),
            unstable_policy: UnstablePolicy::default(),
            sanity_checks: cfg!(debug_assertions),
        }
    }
}

impl KinematicsConfig {
    /// Set the joint angle limits.
    #[must_use]
    pub fn with_angle_limits(mut self, angle_limits: AngleLimits) -> Self {
        self.angle_limits = angle_limits;
        self
    }

    /// Set the support search configuration.
    #[must_use]
    pub fn with_support(mut self, support: SupportConfig) -> Self {
        self.support = support;
        self
    }

    /// Set the unstable pose policy.
    #[must_use]
    pub fn with_unstable_policy(mut self, policy: UnstablePolicy) -> Self {
        self.unstable_policy = policy;
        self
    }

    /// Enable or disable the per-leg IK sanity checks.
    #[must_use]
    pub fn with_sanity_checks(mut self, enabled: bool) -> Self {
        self.sanity_checks = enabled;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.angle_limits.validate()?;
        self.support.validate()
    }
}

/// Symmetric joint angle limits, in degrees.
///
/// A joint is in range when `|angle| <= limit`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AngleLimits {
    /// Hip yaw limit.
    pub coxia: f64,
    /// Femur pitch limit.
    pub femur: f64,
    /// Tibia pitch limit.
    pub tibia: f64,
}

impl Default for AngleLimits {
    fn default() -> Self {
        Self {
            coxia: 90.0,
            femur: 180.0,
            tibia: 180.0,
        }
    }
}

impl AngleLimits {
    /// Create limits for the three joints.
    #[must_use]
    pub fn new(coxia: f64, femur: f64, tibia: f64) -> Self {
        Self {
            coxia,
            femur,
            tibia,
        }
    }

    /// Limit of one joint.
    #[must_use]
    pub fn limit(&self, joint: Joint) -> f64 {
        match joint {
            Joint::Coxia => self.coxia,
            Joint::Femur => self.femur,
            Joint::Tibia => self.tibia,
        }
    }

    /// Check an angle against the limit of its joint.
    pub fn check(&self, leg: LegId, joint: Joint, value: f64) -> Result<()> {
        let limit = self.limit(joint);
        if value.abs() > limit {
            return Err(HexapodError::AngleOutOfRange {
                leg,
                joint,
                value,
                limit,
            });
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        for (name, limit) in [
            ("coxia", self.coxia),
            ("femur", self.femur),
            ("tibia", self.tibia),
        ] {
            if limit.is_nan() || limit < 0.0 {
                return Err(HexapodError::invalid_config(format!(
                    "{name} angle limit must be non-negative, got {limit}"
                )));
            }
        }
        Ok(())
    }
}

/// Settings for the ground-contact stability search.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SupportConfig {
    /// Slack on the barycentric coordinates when testing whether the center
    /// of gravity projects inside a support triangle.
    pub containment_tolerance: f64,
    /// Height difference under which a leg counts as touching the support
    /// plane.
    pub ground_tolerance: f64,
    /// Order in which candidate leg trios are tried.
    pub trio_order: TrioOrder,
    /// Which points of a leg may touch the ground.
    pub contact_search: ContactSearch,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            containment_tolerance: 0.001,
            ground_tolerance: 1.0,
            trio_order: TrioOrder::Fixed,
            contact_search: ContactSearch::Extremity,
        }
    }
}

impl SupportConfig {
    /// Set the trio order.
    #[must_use]
    pub fn with_trio_order(mut self, trio_order: TrioOrder) -> Self {
        self.trio_order = trio_order;
        self
    }

    /// Set the contact search mode.
    #[must_use]
    pub fn with_contact_search(mut self, contact_search: ContactSearch) -> Self {
        self.contact_search = contact_search;
        self
    }

    /// Set the ground tolerance.
    #[must_use]
    pub fn with_ground_tolerance(mut self, tolerance: f64) -> Self {
        self.ground_tolerance = tolerance;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.containment_tolerance.is_finite() || self.containment_tolerance < 0.0 {
            return Err(HexapodError::invalid_config(format!(
                "containment tolerance must be non-negative and finite, got {}",
                self.containment_tolerance
            )));
        }
        if !self.ground_tolerance.is_finite() || self.ground_tolerance < 0.0 {
            return Err(HexapodError::invalid_config(format!(
                "ground tolerance must be non-negative and finite, got {}",
                self.ground_tolerance
            )));
        }
        Ok(())
    }
}

/// Order in which the support search tries leg trios.
///
/// Non-adjacent trios always come before the six trios of neighbouring legs.
/// Several trios can be valid for the same pose; the order only decides
/// which one gets reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TrioOrder {
    /// Lexicographic order within each group.
    #[default]
    Fixed,
    /// Non-adjacent trios shuffled with a seeded generator.
    Seeded(u64),
}

/// Which leg points the support search considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ContactSearch {
    /// One candidate per leg: its lowest joint.
    #[default]
    Extremity,
    /// Any of the coxia joint, femur joint or foot tip of every leg.
    AllJoints,
}

/// Behavior of a forward update when no three legs can carry the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnstablePolicy {
    /// Leave the model unrotated in its body frame and report it as floating.
    #[default]
    KeepUnrotated,
    /// Fail the update with [`HexapodError::UnstablePose`].
    Error,
}
