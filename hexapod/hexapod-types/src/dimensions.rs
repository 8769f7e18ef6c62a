//! Body and leg dimensions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{HexapodError, Result};

/// Size of the hexagonal body and the three links of every leg.
///
/// The body is described by half-extents: `front` is the x offset of the
/// front and back vertices, `side` their y offset, and `middle` the x offset
/// of the two middle vertices. All six legs share the same link lengths.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dimensions {
    /// X offset of the front/back leg attachments.
    pub front: f64,
    /// Y offset of the front/back leg attachments.
    pub side: f64,
    /// X offset of the middle leg attachments.
    pub middle: f64,
    /// Coxia link length.
    pub coxia: f64,
    /// Femur link length.
    pub femur: f64,
    /// Tibia link length.
    pub tibia: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            front: 100.0,
            side: 100.0,
            middle: 100.0,
            coxia: 100.0,
            femur: 100.0,
            tibia: 100.0,
        }
    }
}

impl Dimensions {
    /// Create dimensions from body and leg sizes.
    #[must_use]
    pub fn new(front: f64, side: f64, middle: f64, coxia: f64, femur: f64, tibia: f64) -> Self {
        Self {
            front,
            side,
            middle,
            coxia,
            femur,
            tibia,
        }
    }

    /// Name/value pairs in declaration order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, f64); 6] {
        [
            ("front", self.front),
            ("side", self.side),
            ("middle", self.middle),
            ("coxia", self.coxia),
            ("femur", self.femur),
            ("tibia", self.tibia),
        ]
    }

    /// Validate that every dimension is positive and finite.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in self.fields() {
            if !value.is_finite() || value <= 0.0 {
                return Err(HexapodError::InvalidDimensions { field, value });
            }
        }
        Ok(())
    }

    /// Maximum distance the femur and tibia can span together.
    #[must_use]
    pub fn reach(&self) -> f64 {
        self.femur + self.tibia
    }
}
