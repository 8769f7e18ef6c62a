//! The whole robot: one body, six legs and the rest-on-ground update.

use hexapod_types::{
    Dimensions, HexapodError, JointRole, KinematicsConfig, LEG_COUNT, LegId, Pose, Result,
    UnstablePolicy,
};
use nalgebra::{Point3, Vector3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::body::Hexagon;
use crate::frame::{Transform, signed_angle};
use crate::linkage::{LegPoint, Linkage};
use crate::stability::{SupportPlane, find_support};

/// Outcome of a forward update.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Support {
    /// The body rests on this plane. The plane is expressed in body frame,
    /// before the model was rotated onto it.
    Grounded(SupportPlane),
    /// No three legs can carry the body; the model was left unrotated.
    Floating,
}

impl Support {
    /// Whether a support plane was found.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        matches!(self, Self::Grounded(_))
    }

    /// The support plane, if any.
    #[must_use]
    pub fn plane(&self) -> Option<&SupportPlane> {
        match self {
            Self::Grounded(plane) => Some(plane),
            Self::Floating => None,
        }
    }
}

/// The body's own axes expressed in world frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalAxes {
    /// Body right.
    pub x: Vector3<f64>,
    /// Body forward.
    pub y: Vector3<f64>,
    /// Body up.
    pub z: Vector3<f64>,
}

/// A hexapod posed in world frame.
///
/// World frame has the ground at `z = 0`. Every forward update rebuilds the
/// legs in body frame, finds the support plane, then rotates and lifts the
/// whole model so that plane becomes the ground.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualHexapod {
    dimensions: Dimensions,
    config: KinematicsConfig,
    body: Hexagon,
    legs: [Linkage; LEG_COUNT],
    pose: Pose,
    orientation: Transform,
    ground_contacts: SmallVec<[LegPoint; LEG_COUNT]>,
}

impl VirtualHexapod {
    /// Build a hexapod in the neutral pose with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HexapodError::InvalidDimensions`] if any dimension is not
    /// positive and finite.
    pub fn new(dimensions: Dimensions) -> Result<Self> {
        Self::with_config(dimensions, KinematicsConfig::default())
    }

    /// Build a hexapod in the neutral pose.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions or the configuration are invalid.
    pub fn with_config(dimensions: Dimensions, config: KinematicsConfig) -> Result<Self> {
        dimensions.validate()?;
        config.validate()?;

        let body = Hexagon::new(&dimensions);
        let legs = LegId::ALL.map(|leg| Linkage::new(leg, &dimensions, *body.vertex(leg)));
        let mut hexapod = Self {
            dimensions,
            config,
            body,
            legs,
            pose: Pose::neutral(),
            orientation: Transform::identity(),
            ground_contacts: SmallVec::new(),
        };
        hexapod.rest_on_ground(&Pose::neutral())?;
        Ok(hexapod)
    }

    /// Pose every leg and let the robot settle on the ground.
    ///
    /// If no support plane exists the outcome depends on
    /// [`KinematicsConfig::unstable_policy`]: the model is either left in
    /// body frame and [`Support::Floating`] is returned, or
    /// [`HexapodError::UnstablePose`] is returned and nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`HexapodError::InvalidConfig`] if an angle is not finite, and
    /// [`HexapodError::UnstablePose`] under [`UnstablePolicy::Error`].
    pub fn update(&mut self, pose: &Pose) -> Result<Support> {
        pose.validate()?;
        self.rest_on_ground(pose)
    }

    /// Apply a stance: hip offsets on the corner legs, uniform femur and tibia
    /// offsets on all legs.
    ///
    /// # Errors
    ///
    /// Same as [`update`](Self::update).
    pub fn update_stance(&mut self, hip_stance: f64, leg_stance: f64) -> Result<Support> {
        self.update(&Pose::stance(hip_stance, leg_stance))
    }

    /// Rotate (degrees about x, then y, then z) and translate the body alone,
    /// leaving every leg point where it is.
    ///
    /// The rotation is about the world origin, the ground point under the
    /// resting center of gravity.
    pub fn detach_body_rotate_and_translate(
        &mut self,
        rotation: &Vector3<f64>,
        translation: &Vector3<f64>,
    ) {
        let frame = Transform::rotation_xyz(rotation.x, rotation.y, rotation.z);
        self.body.transform(&frame, 0.0);
        self.body.translate(translation);
        self.orientation = frame * self.orientation;
    }

    fn rest_on_ground(&mut self, pose: &Pose) -> Result<Support> {
        let pivoting = self
            .ground_contacts
            .iter()
            .filter(|contact| {
                let old = self.legs[contact.leg.index()].coxia_angle();
                (pose[contact.leg].coxia - old).abs() > f64::EPSILON
            })
            .count();
        let may_twist = pivoting >= 3;

        let mut legs = self.legs.clone();
        for leg in &mut legs {
            leg.change_pose(pose[leg.id()]);
        }
        let plane = find_support(&legs, &self.config.support);

        if plane.is_none() && self.config.unstable_policy == UnstablePolicy::Error {
            debug!("rejecting unstable pose");
            return Err(HexapodError::UnstablePose);
        }

        let previous_contacts = std::mem::take(&mut self.ground_contacts);
        self.legs = legs;
        self.pose = *pose;
        self.body.reset();
        self.orientation = Transform::identity();

        let Some(plane) = plane else {
            warn!("no support plane under the center of gravity; leaving pose unrotated");
            return Ok(Support::Floating);
        };

        let frame = Transform::aligning(&plane.normal, &Vector3::z());
        self.apply(&frame, plane.height);
        self.ground_contacts = self.locate(&plane.contacts);

        if may_twist {
            self.correct_twist(&previous_contacts);
        }
        Ok(Support::Grounded(plane))
    }

    /// Undo the yaw that ground alignment introduces when planted feet pivot.
    ///
    /// The first contact that is the same joint of the same leg before and
    /// after the update is rotated about world z back over its old position.
    fn correct_twist(&mut self, previous_contacts: &[LegPoint]) {
        let matched = previous_contacts.iter().find_map(|old| {
            self.ground_contacts
                .iter()
                .find(|new| new.same_joint(old))
                .map(|new| (old, new.position))
        });
        let Some((old, new_position)) = matched else {
            return;
        };

        let before = Vector3::new(old.position.x, old.position.y, 0.0);
        let after = Vector3::new(new_position.x, new_position.y, 0.0);
        if before.norm() <= f64::EPSILON || after.norm() <= f64::EPSILON {
            return;
        }

        let angle = -signed_angle(&before, &after, &Vector3::z());
        if angle.abs() <= f64::EPSILON {
            return;
        }

        debug!(leg = %old.leg, angle, "twist correction applied");
        let frame = Transform::rotation_z(angle);
        self.apply(&frame, 0.0);
        self.ground_contacts = self.locate(&self.ground_contacts);
    }

    fn apply(&mut self, frame: &Transform, height: f64) {
        self.body.transform(frame, height);
        for leg in &mut self.legs {
            leg.transform(frame, height);
        }
        self.orientation = *frame * self.orientation;
    }

    /// Re-read contact positions from the legs' current points.
    fn locate(&self, contacts: &[LegPoint]) -> SmallVec<[LegPoint; LEG_COUNT]> {
        contacts
            .iter()
            .map(|contact| self.legs[contact.leg.index()].leg_point(contact.role))
            .collect()
    }

    /// Body and leg dimensions.
    #[must_use]
    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &KinematicsConfig {
        &self.config
    }

    /// The torso.
    #[must_use]
    pub fn body(&self) -> &Hexagon {
        &self.body
    }

    /// All six legs in [`LegId`] order.
    #[must_use]
    pub fn legs(&self) -> &[Linkage; LEG_COUNT] {
        &self.legs
    }

    /// One leg.
    #[must_use]
    pub fn leg(&self, id: LegId) -> &Linkage {
        &self.legs[id.index()]
    }

    /// Joint angles of the last update.
    #[must_use]
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Points currently resting on the ground, in leg order.
    #[must_use]
    pub fn ground_contacts(&self) -> &[LegPoint] {
        &self.ground_contacts
    }

    /// Whether `leg` is resting on the ground.
    #[must_use]
    pub fn is_on_ground(&self, leg: LegId) -> bool {
        self.ground_contacts.iter().any(|contact| contact.leg == leg)
    }

    /// Rotation taking body frame to world frame.
    #[must_use]
    pub fn orientation(&self) -> &Transform {
        &self.orientation
    }

    /// The body's axes in world frame.
    #[must_use]
    pub fn local_axes(&self) -> LocalAxes {
        LocalAxes {
            x: self.orientation.transform_vector(&Vector3::x()),
            y: self.orientation.transform_vector(&Vector3::y()),
            z: self.orientation.transform_vector(&Vector3::z()),
        }
    }

    /// Center of gravity in world frame.
    #[must_use]
    pub fn cog(&self) -> &Point3<f64> {
        self.body.cog()
    }

    pub(crate) fn commit_solution(
        &mut self,
        pose: Pose,
        points: [[Point3<f64>; 4]; LEG_COUNT],
        grounded: impl Iterator<Item = LegId>,
    ) {
        for (leg, leg_points) in self.legs.iter_mut().zip(points) {
            leg.set_solution(pose[leg.id()], leg_points);
        }
        self.pose = pose;
        self.ground_contacts = grounded
            .map(|leg| self.legs[leg.index()].leg_point(JointRole::FootTip))
            .collect();
    }
}
