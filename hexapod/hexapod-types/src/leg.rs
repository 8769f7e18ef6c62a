//! Leg identifiers and joint naming.
//!
//! Legs are numbered counter-clockwise starting from the right-middle leg,
//! which matches the angular layout of the body's attachment vertices.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of legs on the robot.
pub const LEG_COUNT: usize = 6;

/// One of the six legs, in the fixed order used everywhere in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum LegId {
    /// Leg attached at 0 degrees.
    RightMiddle = 0,
    /// Leg attached at 45 degrees.
    RightFront = 1,
    /// Leg attached at 135 degrees.
    LeftFront = 2,
    /// Leg attached at 180 degrees.
    LeftMiddle = 3,
    /// Leg attached at 225 degrees.
    LeftBack = 4,
    /// Leg attached at 315 degrees.
    RightBack = 5,
}

impl LegId {
    /// All legs in index order.
    pub const ALL: [Self; LEG_COUNT] = [
        Self::RightMiddle,
        Self::RightFront,
        Self::LeftFront,
        Self::LeftMiddle,
        Self::LeftBack,
        Self::RightBack,
    ];

    /// Index of this leg (0..6).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a leg by index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < LEG_COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Kebab-case name, e.g. `"right-middle"`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RightMiddle => "right-middle",
            Self::RightFront => "right-front",
            Self::LeftFront => "left-front",
            Self::LeftMiddle => "left-middle",
            Self::LeftBack => "left-back",
            Self::RightBack => "right-back",
        }
    }

    /// Which side of the body the leg is on.
    #[must_use]
    pub const fn side(self) -> LegSide {
        match self {
            Self::RightMiddle | Self::RightFront | Self::RightBack => LegSide::Right,
            Self::LeftFront | Self::LeftMiddle | Self::LeftBack => LegSide::Left,
        }
    }

    /// Reference heading of the leg's coxia relative to the body x axis, in degrees.
    #[must_use]
    pub const fn coxia_axis(self) -> f64 {
        match self {
            Self::RightMiddle => 0.0,
            Self::RightFront => 45.0,
            Self::LeftFront => 135.0,
            Self::LeftMiddle => 180.0,
            Self::LeftBack => 225.0,
            Self::RightBack => 315.0,
        }
    }

    /// Whether `other` is attached next to this leg around the body.
    #[must_use]
    pub const fn is_adjacent_to(self, other: Self) -> bool {
        let diff = (self.index() + LEG_COUNT - other.index()) % LEG_COUNT;
        diff == 1 || diff == LEG_COUNT - 1
    }
}

impl std::fmt::Display for LegId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Body side of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LegSide {
    /// Negative x.
    Left,
    /// Positive x.
    Right,
}

/// The four tracked points of a leg, innermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointRole {
    /// p0: where the leg attaches to the body.
    BodyContact = 0,
    /// p1: joint between coxia and femur.
    CoxiaJoint = 1,
    /// p2: joint between femur and tibia.
    FemurJoint = 2,
    /// p3: end of the tibia.
    FootTip = 3,
}

impl JointRole {
    /// The three roles that can touch the ground, innermost first.
    pub const GROUND_CANDIDATES: [Self; 3] = [Self::CoxiaJoint, Self::FemurJoint, Self::FootTip];

    /// Index into a leg's point array.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for JointRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BodyContact => write!(f, "body-contact"),
            Self::CoxiaJoint => write!(f, "coxia"),
            Self::FemurJoint => write!(f, "femur"),
            Self::FootTip => write!(f, "tibia"),
        }
    }
}

/// A rotational joint of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Joint {
    /// Hip yaw (alpha).
    Coxia,
    /// Femur pitch (beta).
    Femur,
    /// Tibia pitch relative to perpendicular (gamma).
    Tibia,
}

impl std::fmt::Display for Joint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Coxia => write!(f, "coxia"),
            Self::Femur => write!(f, "femur"),
            Self::Tibia => write!(f, "tibia"),
        }
    }
}

/// One of the two outer limbs of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Limb {
    /// Middle link.
    Femur,
    /// Outer link.
    Tibia,
}

impl std::fmt::Display for Limb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Femur => write!(f, "femur"),
            Self::Tibia => write!(f, "tibia"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leg_index_round_trip() {
        for (i, leg) in LegId::ALL.iter().enumerate() {
            assert_eq!(leg.index(), i);
            assert_eq!(LegId::from_index(i), Some(*leg));
        }
        assert_eq!(LegId::from_index(LEG_COUNT), None);
    }

    #[test]
    fn test_leg_sides() {
        let left: Vec<_> = LegId::ALL
            .iter()
            .filter(|leg| leg.side() == LegSide::Left)
            .collect();
        assert_eq!(
            left,
            [&LegId::LeftFront, &LegId::LeftMiddle, &LegId::LeftBack]
        );
    }

    #[test]
    fn test_adjacency_wraps_around() {
        assert!(LegId::RightMiddle.is_adjacent_to(LegId::RightFront));
        assert!(LegId::RightMiddle.is_adjacent_to(LegId::RightBack));
        assert!(LegId::RightBack.is_adjacent_to(LegId::RightMiddle));
        assert!(!LegId::RightMiddle.is_adjacent_to(LegId::LeftFront));
        assert!(!LegId::LeftMiddle.is_adjacent_to(LegId::LeftMiddle));
    }

    #[test]
    fn test_names() {
        assert_eq!(LegId::LeftBack.to_string(), "left-back");
        assert_eq!(JointRole::FootTip.to_string(), "tibia");
        assert_eq!(Joint::Femur.to_string(), "femur");
    }
}
