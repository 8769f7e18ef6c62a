//! Inverse kinematics request parameters.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dimensions::Dimensions;
use crate::{HexapodError, Result};

/// Target body pose for the inverse kinematics solver.
///
/// Translation is given as a fraction of a body or leg dimension so the same
/// parameters scale with the robot: x by `middle`, y by `side`, z by `tibia`.
/// Rotations are in degrees about the body axes, applied x then y then z.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IkParameters {
    /// Hip yaw offset for the reference stance.
    pub hip_stance: f64,
    /// Femur/tibia offset for the reference stance.
    pub leg_stance: f64,
    /// Body shift along x, as a fraction of `middle`.
    pub percent_x: f64,
    /// Body shift along y, as a fraction of `side`.
    pub percent_y: f64,
    /// Body shift along z, as a fraction of `tibia`.
    pub percent_z: f64,
    /// Body rotation about x, degrees.
    pub rot_x: f64,
    /// Body rotation about y, degrees.
    pub rot_y: f64,
    /// Body rotation about z, degrees.
    pub rot_z: f64,
}

impl IkParameters {
    /// Set the reference stance.
    #[must_use]
    pub fn with_stance(mut self, hip_stance: f64, leg_stance: f64) -> Self {
        self.hip_stance = hip_stance;
        self.leg_stance = leg_stance;
        self
    }

    /// Set the body shift fractions.
    #[must_use]
    pub fn with_translation(mut self, percent_x: f64, percent_y: f64, percent_z: f64) -> Self {
        self.percent_x = percent_x;
        self.percent_y = percent_y;
        self.percent_z = percent_z;
        self
    }

    /// Set the body rotation.
    #[must_use]
    pub fn with_rotation(mut self, rot_x: f64, rot_y: f64, rot_z: f64) -> Self {
        self.rot_x = rot_x;
        self.rot_y = rot_y;
        self.rot_z = rot_z;
        self
    }

    /// Name/value pairs in declaration order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, f64); 8] {
        [
            ("hip_stance", self.hip_stance),
            ("leg_stance", self.leg_stance),
            ("percent_x", self.percent_x),
            ("percent_y", self.percent_y),
            ("percent_z", self.percent_z),
            ("rot_x", self.rot_x),
            ("rot_y", self.rot_y),
            ("rot_z", self.rot_z),
        ]
    }

    /// Validate that every parameter is finite.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in self.fields() {
            if !value.is_finite() {
                return Err(HexapodError::invalid_config(format!(
                    "ik parameter {field} must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Absolute body shift for the given robot.
    #[must_use]
    pub fn translation(&self, dimensions: &Dimensions) -> Vector3<f64> {
        Vector3::new(
            self.percent_x * dimensions.middle,
            self.percent_y * dimensions.side,
            self.percent_z * dimensions.tibia,
        )
    }

    /// Body rotation as `(x, y, z)` degrees.
    #[must_use]
    pub fn rotation(&self) -> Vector3<f64> {
        Vector3::new(self.rot_x, self.rot_y, self.rot_z)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_translation_scales_with_dimensions() {
        let dims = Dimensions::new(70.0, 115.0, 120.0, 60.0, 130.0, 150.0);
        let params = IkParameters::default().with_translation(0.35, 0.25, -0.2);
        assert_relative_eq!(
            params.translation(&dims),
            Vector3::new(42.0, 28.75, -30.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        assert!(IkParameters::default().validate().is_ok());
        assert!(
            IkParameters::default()
                .with_rotation(10.0, -5.0, 30.0)
                .validate()
                .is_ok()
        );

        let err = IkParameters::default()
            .with_rotation(f64::NAN, 0.0, 0.0)
            .validate()
            .unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("rot_x"));

        let err = IkParameters::default()
            .with_translation(f64::INFINITY, 0.0, 0.0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("percent_x"));
    }
}
