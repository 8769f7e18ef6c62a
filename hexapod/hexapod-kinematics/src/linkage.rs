//! Forward kinematics of a single three-joint leg.
//!
//! A leg is a coxia (hip yaw), a femur and a tibia. Its four tracked points
//! are, innermost first:
//!
//! - p0: body contact, the fixed attachment on the body
//! - p1: coxia joint, between coxia and femur
//! - p2: femur joint, between femur and tibia
//! - p3: foot tip
//!
//! With every angle at zero the coxia and femur point straight out along the
//! leg's heading and the tibia hangs straight down.

use hexapod_types::{Dimensions, JointRole, LegId, LegPose};
use nalgebra::Point3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::frame::Transform;

/// A point of a specific leg, tagged with the joint it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LegPoint {
    /// Owning leg.
    pub leg: LegId,
    /// Which of the leg's points this is.
    pub role: JointRole,
    /// Coordinates.
    pub position: Point3<f64>,
}

impl LegPoint {
    /// Whether both points name the same joint of the same leg.
    #[must_use]
    pub fn same_joint(&self, other: &Self) -> bool {
        self.leg == other.leg && self.role == other.role
    }
}

/// One leg: fixed link lengths and attachment, current angles and points.
#[derive(Debug, Clone, PartialEq)]
pub struct Linkage {
    id: LegId,
    coxia: f64,
    femur: f64,
    tibia: f64,
    origin: Point3<f64>,
    pose: LegPose,
    points: [Point3<f64>; 4],
}

impl Linkage {
    /// Create a leg in the neutral pose, attached at `origin` in body frame.
    #[must_use]
    pub fn new(id: LegId, dimensions: &Dimensions, origin: Point3<f64>) -> Self {
        let mut leg = Self {
            id,
            coxia: dimensions.coxia,
            femur: dimensions.femur,
            tibia: dimensions.tibia,
            origin,
            pose: LegPose::default(),
            points: [origin; 4],
        };
        leg.change_pose(LegPose::default());
        leg
    }

    /// Recompute all four points in body frame from the given angles.
    pub fn change_pose(&mut self, pose: LegPose) {
        self.pose = pose;

        // frame_ab is the pose of frame b relative to frame a
        let frame_01 = Transform::y_rotation_x_translation(-pose.femur, self.coxia);
        let frame_12 = Transform::y_rotation_x_translation(90.0 - pose.tibia, self.femur);
        let frame_23 = Transform::y_rotation_x_translation(0.0, self.tibia);

        let frame_02 = frame_01 * frame_12;
        let frame_03 = frame_02 * frame_23;

        let placement = Transform::z_rotation_xy_translation(
            self.id.coxia_axis() + pose.coxia,
            self.origin.x,
            self.origin.y,
        );

        let local = Point3::origin();
        self.points = [
            self.origin,
            (placement * frame_01).transform_point(&local),
            (placement * frame_02).transform_point(&local),
            (placement * frame_03).transform_point(&local),
        ];
    }

    /// Which joint touches the ground first if the leg is lowered.
    ///
    /// Only meaningful in body frame. Heights are measured as `-z`, so a
    /// larger height is lower. A leg folded so far up that both femur joint
    /// and foot tip are above the body plane rests on its coxia joint.
    #[must_use]
    pub fn ground_contact_role(&self) -> JointRole {
        let tip_height = -self.foot_tip().z;
        let femur_height = -self.femur_point().z;

        if tip_height <= 0.0 && femur_height <= 0.0 {
            JointRole::CoxiaJoint
        } else if tip_height >= femur_height {
            JointRole::FootTip
        } else {
            JointRole::FemurJoint
        }
    }

    /// The point this leg would stand on.
    #[must_use]
    pub fn ground_contact(&self) -> LegPoint {
        self.leg_point(self.ground_contact_role())
    }

    /// A tagged copy of one of the leg's points.
    #[must_use]
    pub fn leg_point(&self, role: JointRole) -> LegPoint {
        LegPoint {
            leg: self.id,
            role,
            position: *self.point(role),
        }
    }

    /// Which leg this is.
    #[must_use]
    pub fn id(&self) -> LegId {
        self.id
    }

    /// Current joint angles.
    #[must_use]
    pub fn pose(&self) -> &LegPose {
        &self.pose
    }

    /// Current hip yaw.
    #[must_use]
    pub fn coxia_angle(&self) -> f64 {
        self.pose.coxia
    }

    /// All four points, innermost first.
    #[must_use]
    pub fn points(&self) -> &[Point3<f64>; 4] {
        &self.points
    }

    /// One point by role.
    #[must_use]
    pub fn point(&self, role: JointRole) -> &Point3<f64> {
        &self.points[role.index()]
    }

    /// p0.
    #[must_use]
    pub fn body_contact(&self) -> &Point3<f64> {
        &self.points[0]
    }

    /// p1.
    #[must_use]
    pub fn coxia_point(&self) -> &Point3<f64> {
        &self.points[1]
    }

    /// p2.
    #[must_use]
    pub fn femur_point(&self) -> &Point3<f64> {
        &self.points[2]
    }

    /// p3.
    #[must_use]
    pub fn foot_tip(&self) -> &Point3<f64> {
        &self.points[3]
    }

    /// Link lengths `[coxia, femur, tibia]`.
    #[must_use]
    pub fn link_lengths(&self) -> [f64; 3] {
        [self.coxia, self.femur, self.tibia]
    }

    /// Measured distances p0-p1, p1-p2, p2-p3.
    #[must_use]
    pub fn segment_lengths(&self) -> [f64; 3] {
        let [p0, p1, p2, p3] = &self.points;
        [(p1 - p0).norm(), (p2 - p1).norm(), (p3 - p2).norm()]
    }

    pub(crate) fn transform(&mut self, frame: &Transform, height: f64) {
        for point in &mut self.points {
            frame.apply_in_place(point, height);
        }
    }

    /// Overwrite the points with an externally solved configuration.
    pub(crate) fn set_solution(&mut self, pose: LegPose, points: [Point3<f64>; 4]) {
        self.pose = pose;
        self.points = points;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dims() -> Dimensions {
        Dimensions::new(75.0, 100.0, 125.0, 50.0, 130.0, 200.0)
    }

    #[test]
    fn test_neutral_leg() {
        let leg = Linkage::new(LegId::RightMiddle, &dims(), Point3::new(125.0, 0.0, 0.0));
        assert_relative_eq!(*leg.coxia_point(), Point3::new(175.0, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(*leg.femur_point(), Point3::new(305.0, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(*leg.foot_tip(), Point3::new(305.0, 0.0, -200.0), epsilon = 1e-9);
        assert_eq!(leg.ground_contact_role(), JointRole::FootTip);
    }

    #[test]
    fn test_heading_and_hip_yaw() {
        // Left-middle points along -x; a 90 degree hip yaw swings it to -y.
        let mut leg = Linkage::new(LegId::LeftMiddle, &dims(), Point3::new(-125.0, 0.0, 0.0));
        assert_relative_eq!(*leg.coxia_point(), Point3::new(-175.0, 0.0, 0.0), epsilon = 1e-9);

        leg.change_pose(LegPose::new(90.0, 0.0, 0.0));
        assert_relative_eq!(*leg.coxia_point(), Point3::new(-125.0, -50.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(*leg.body_contact(), Point3::new(-125.0, 0.0, 0.0));
    }

    #[test]
    fn test_femur_and_tibia_angles() {
        let mut leg = Linkage::new(LegId::RightMiddle, &dims(), Point3::origin());
        // Femur up 90, tibia straight out along the femur.
        leg.change_pose(LegPose::new(0.0, 90.0, 90.0));
        assert_relative_eq!(*leg.femur_point(), Point3::new(50.0, 0.0, 130.0), epsilon = 1e-9);
        assert_relative_eq!(*leg.foot_tip(), Point3::new(50.0, 0.0, 330.0), epsilon = 1e-9);
    }

    #[test]
    fn test_ground_contact_candidates() {
        let mut leg = Linkage::new(LegId::RightMiddle, &dims(), Point3::origin());

        // Femur pointing down with the tibia folded back up: the knee is lowest.
        leg.change_pose(LegPose::new(0.0, -60.0, 170.0));
        assert!(leg.femur_point().z < leg.foot_tip().z);
        assert_eq!(leg.ground_contact_role(), JointRole::FemurJoint);

        // Everything folded above the body: the coxia joint is the contact.
        leg.change_pose(LegPose::new(0.0, 60.0, 60.0));
        assert!(leg.femur_point().z > 0.0 && leg.foot_tip().z > 0.0);
        assert_eq!(leg.ground_contact_role(), JointRole::CoxiaJoint);
        assert_eq!(leg.ground_contact().position, *leg.coxia_point());
    }

    #[test]
    fn test_segment_lengths_preserved() {
        let mut leg = Linkage::new(LegId::LeftBack, &dims(), Point3::new(-75.0, -100.0, 0.0));
        leg.change_pose(LegPose::new(-23.0, 47.0, -81.0));
        let lengths = leg.segment_lengths();
        for (measured, expected) in lengths.iter().zip(leg.link_lengths()) {
            assert_relative_eq!(*measured, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_change_pose_is_from_scratch() {
        let mut a = Linkage::new(LegId::RightFront, &dims(), Point3::new(75.0, 100.0, 0.0));
        a.change_pose(LegPose::new(10.0, 20.0, 30.0));
        a.change_pose(LegPose::new(-5.0, 15.0, 0.0));

        let mut b = Linkage::new(LegId::RightFront, &dims(), Point3::new(75.0, 100.0, 0.0));
        b.change_pose(LegPose::new(-5.0, 15.0, 0.0));
        assert_eq!(a, b);
    }
}
