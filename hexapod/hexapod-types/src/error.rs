//! Error types for hexapod kinematics.

use thiserror::Error;

use crate::leg::{Joint, LegId, Limb};

/// Errors that can occur while building or posing a hexapod.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HexapodError {
    /// A body or leg dimension is not a positive, finite number.
    #[error("invalid dimension {field}: {value} (must be positive and finite)")]
    InvalidDimensions {
        /// Name of the offending dimension.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// The requested body transform pushes the torso below a planted foot.
    #[error("{leg}: body contact point is below its foot tip (body on ground)")]
    BodyOnGround {
        /// The leg whose body contact went below its foot.
        leg: LegId,
    },

    /// The hip joint would end up below the foot tip.
    #[error("{leg}: coxia joint is below its foot tip (coxia on ground)")]
    CoxiaOnGround {
        /// The leg whose coxia joint went below its foot.
        leg: LegId,
    },

    /// One limb is too short to bridge the gap even when fully extended.
    #[error("{leg}: cannot reach target ground point, {limb} is too short")]
    UnreachableTarget {
        /// The leg that cannot reach.
        leg: LegId,
        /// The limb that is too short.
        limb: Limb,
    },

    /// The femur joint would end up below the foot tip.
    #[error("{leg}: cannot reach target ground point, femur joint is blocking")]
    BlockingCollision {
        /// The blocked leg.
        leg: LegId,
    },

    /// Too many legs would be lifted off the ground to stay upright.
    #[error("too many legs up in the air: {}", format_legs(.legs))]
    TooManyLegsUp {
        /// Every leg that was in the air when the solve gave up.
        legs: Vec<LegId>,
    },

    /// A computed joint angle is outside its configured range.
    #[error("{leg}: {joint} angle {value:.2} is beyond the limit of ±{limit:.2} degrees")]
    AngleOutOfRange {
        /// The leg carrying the joint.
        leg: LegId,
        /// The joint that went out of range.
        joint: Joint,
        /// The computed angle in degrees.
        value: f64,
        /// The configured magnitude limit in degrees.
        limit: f64,
    },

    /// No three legs form a support plane under the center of gravity.
    #[error("pose is unstable: center of gravity is outside every support triangle")]
    UnstablePose,

    /// A solved leg does not reproduce its own geometry.
    #[error("{leg}: inconsistent solution: {reason}")]
    InconsistentSolution {
        /// The leg that failed its sanity check.
        leg: LegId,
        /// What did not match.
        reason: String,
    },
}

fn format_legs(legs: &[LegId]) -> String {
    legs.iter()
        .map(|leg| leg.name())
        .collect::<Vec<_>>()
        .join(", ")
}

impl HexapodError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create an inconsistent solution error.
    #[must_use]
    pub fn inconsistent(leg: LegId, reason: impl Into<String>) -> Self {
        Self::InconsistentSolution {
            leg,
            reason: reason.into(),
        }
    }

    /// The leg this error is about, if it names exactly one.
    ///
    /// [`Self::TooManyLegsUp`] is about a group of legs and returns `None`;
    /// read its `legs` field instead.
    #[must_use]
    pub fn leg(&self) -> Option<LegId> {
        match self {
            Self::BodyOnGround { leg }
            | Self::CoxiaOnGround { leg }
            | Self::UnreachableTarget { leg, .. }
            | Self::BlockingCollision { leg }
            | Self::AngleOutOfRange { leg, .. }
            | Self::InconsistentSolution { leg, .. } => Some(*leg),
            Self::TooManyLegsUp { .. }
            | Self::InvalidDimensions { .. }
            | Self::InvalidConfig { .. }
            | Self::UnstablePose => None,
        }
    }

    /// Check if this error comes out of the inverse kinematics solve.
    #[must_use]
    pub fn is_ik_failure(&self) -> bool {
        matches!(
            self,
            Self::BodyOnGround { .. }
                | Self::CoxiaOnGround { .. }
                | Self::UnreachableTarget { .. }
                | Self::BlockingCollision { .. }
                | Self::TooManyLegsUp { .. }
                | Self::AngleOutOfRange { .. }
                | Self::InconsistentSolution { .. }
        )
    }

    /// Check if this is a configuration or dimension error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. } | Self::InvalidDimensions { .. }
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HexapodError::UnreachableTarget {
            leg: LegId::LeftBack,
            limb: Limb::Tibia,
        };
        assert_eq!(
            err.to_string(),
            "left-back: cannot reach target ground point, tibia is too short"
        );

        let err = HexapodError::AngleOutOfRange {
            leg: LegId::RightMiddle,
            joint: Joint::Coxia,
            value: -102.234,
            limit: 90.0,
        };
        let message = err.to_string();
        assert!(message.contains("right-middle"));
        assert!(message.contains("-102.23"));

        let err = HexapodError::TooManyLegsUp {
            legs: vec![LegId::LeftFront, LegId::LeftMiddle, LegId::LeftBack],
        };
        assert!(err.to_string().ends_with("left-front, left-middle, left-back"));
    }

    #[test]
    fn test_error_predicates() {
        let err = HexapodError::BlockingCollision {
            leg: LegId::RightFront,
        };
        assert!(err.is_ik_failure());
        assert!(!err.is_config_error());
        assert_eq!(err.leg(), Some(LegId::RightFront));

        let err = HexapodError::invalid_config("negative tolerance");
        assert!(err.is_config_error());
        assert!(!err.is_ik_failure());
        assert_eq!(err.leg(), None);

        assert!(!HexapodError::UnstablePose.is_ik_failure());

        let err = HexapodError::TooManyLegsUp {
            legs: vec![LegId::RightFront, LegId::RightMiddle, LegId::RightBack],
        };
        assert!(err.is_ik_failure());
        assert_eq!(err.leg(), None);
    }
}
