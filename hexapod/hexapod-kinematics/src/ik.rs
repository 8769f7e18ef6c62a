//! Inverse kinematics.
//!
//! The robot first takes the requested stance, then its body alone is moved
//! to the requested rotation and translation. Feet stay where the stance put
//! them; each leg is solved independently to bridge the gap from its moved
//! body contact to its planted foot.
//!
//! Per leg, in the leg's own vertical plane (x along the coxia, z along body
//! up):
//!
//! ```text
//!              p2
//!             /  \
//!      femur /    \ tibia
//!           /      \
//!   p0 --- p1       \
//!    coxia           p3
//! ```
//!
//! The femur angle comes from the law of cosines on the triangle
//! `(femur, tibia, |p1 p3|)`. A foot out of reach leaves its leg stretched
//! toward the foot and lifted; too many lifted legs make the pose unstable.

use hexapod_types::{
    Dimensions, HexapodError, IkParameters, Joint, LEG_COUNT, LegId, LegPose, Limb, Pose, Result,
};
use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;
use tracing::debug;

use crate::body::Hexagon;
use crate::frame::{
    Transform, angle_between, angle_opposite_of_last_side, is_triangle, normalize_degrees,
    project_onto_plane, signed_angle,
};
use crate::hexapod::{LocalAxes, VirtualHexapod};
use crate::linkage::Linkage;

/// Result of a successful inverse kinematics solve.
#[derive(Debug, Clone, PartialEq)]
pub struct IkSolution {
    /// Joint angles of every leg.
    pub pose: Pose,
    /// The posed robot.
    pub hexapod: VirtualHexapod,
    /// Legs that could not reach their foot and were lifted.
    pub legs_in_air: SmallVec<[LegId; LEG_COUNT]>,
}

/// Solve the joint angles for `parameters`, starting from `hexapod`.
///
/// `hexapod` itself is never modified; the posed copy is returned in the
/// solution.
///
/// # Errors
///
/// Returns [`HexapodError::InvalidConfig`] if a parameter is not finite.
/// Otherwise returns the first failure met: [`HexapodError::BodyOnGround`],
/// [`HexapodError::CoxiaOnGround`], [`HexapodError::UnreachableTarget`],
/// [`HexapodError::BlockingCollision`], [`HexapodError::AngleOutOfRange`] or
/// [`HexapodError::TooManyLegsUp`]. With sanity checks enabled a leg that
/// does not reproduce its own geometry yields
/// [`HexapodError::InconsistentSolution`].
pub fn inverse_kinematics_update(
    hexapod: &VirtualHexapod,
    parameters: &IkParameters,
) -> Result<IkSolution> {
    solve(hexapod.clone(), parameters).inspect_err(|err| {
        debug!(%err, "inverse kinematics rejected");
    })
}

impl VirtualHexapod {
    /// Solve inverse kinematics and take the resulting pose.
    ///
    /// On failure `self` is left untouched.
    ///
    /// # Errors
    ///
    /// See [`inverse_kinematics_update`].
    pub fn inverse_kinematics_update(&mut self, parameters: &IkParameters) -> Result<Pose> {
        let solution = inverse_kinematics_update(self, parameters)?;
        *self = solution.hexapod;
        Ok(solution.pose)
    }
}

fn solve(mut hexapod: VirtualHexapod, parameters: &IkParameters) -> Result<IkSolution> {
    parameters.validate()?;
    let dimensions = *hexapod.dimensions();
    hexapod.update_stance(parameters.hip_stance, parameters.leg_stance)?;
    hexapod.detach_body_rotate_and_translate(&parameters.rotation(), &parameters.translation(&dimensions));

    for leg in LegId::ALL {
        if hexapod.body().vertex(leg).z < hexapod.leg(leg).foot_tip().z {
            return Err(HexapodError::BodyOnGround { leg });
        }
    }

    let solver = LegSolver::new(&hexapod);
    let mut pose = Pose::neutral();
    let mut points = [[Point3::origin(); 4]; LEG_COUNT];
    let mut legs_in_air = SmallVec::<[LegId; LEG_COUNT]>::new();

    for leg in LegId::ALL {
        let solution = solver.solve(leg)?;
        pose[leg] = solution.pose;
        points[leg.index()] = solution.points;
        if solution.in_air {
            legs_in_air.push(leg);
        }
    }
    check_legs_in_air(&legs_in_air)?;

    let grounded = LegId::ALL.into_iter().filter(|leg| !legs_in_air.contains(leg));
    hexapod.commit_solution(pose, points, grounded);

    Ok(IkSolution {
        pose,
        hexapod,
        legs_in_air,
    })
}

/// Four or more lifted legs, or three lifted on the same side, tip the robot.
fn check_legs_in_air(legs: &[LegId]) -> Result<()> {
    let one_side = legs.len() == 3 && legs.iter().all(|leg| leg.side() == legs[0].side());
    if legs.len() >= 4 || one_side {
        return Err(HexapodError::TooManyLegsUp {
            legs: legs.to_vec(),
        });
    }
    Ok(())
}

struct LegSolution {
    pose: LegPose,
    points: [Point3<f64>; 4],
    in_air: bool,
}

/// Per-leg solve against a body already moved into place.
struct LegSolver<'a> {
    hexapod: &'a VirtualHexapod,
    dimensions: Dimensions,
    axes: LocalAxes,
    orientation: Transform,
}

impl<'a> LegSolver<'a> {
    fn new(hexapod: &'a VirtualHexapod) -> Self {
        Self {
            hexapod,
            dimensions: *hexapod.dimensions(),
            axes: hexapod.local_axes(),
            orientation: *hexapod.orientation(),
        }
    }

    fn solve(&self, leg: LegId) -> Result<LegSolution> {
        let Dimensions {
            coxia,
            femur,
            tibia,
            ..
        } = self.dimensions;
        let limits = &self.hexapod.config().angle_limits;

        let body_contact = *self.hexapod.body().vertex(leg);
        let foot_tip = *self.hexapod.leg(leg).foot_tip();
        let body_to_foot = foot_tip - body_contact;
        let coxia_direction = self.coxia_direction(leg, &body_to_foot);

        let coxia_point = body_contact + coxia_direction * coxia;
        if coxia_point.z < foot_tip.z {
            return Err(HexapodError::CoxiaOnGround { leg });
        }

        // Leg plane: x along the coxia, z along body up, body contact at the origin.
        let p0 = Point3::origin();
        let p1 = Point3::new(coxia, 0.0, 0.0);
        let target = Point3::new(body_to_foot.dot(&coxia_direction), 0.0, body_to_foot.dot(&self.axes.z));
        let coxia_to_foot = target - p1;
        let distance = coxia_to_foot.norm();

        let (beta, gamma, p2, p3, in_air) = if is_triangle(tibia, femur, distance) {
            let theta = angle_opposite_of_last_side(distance, femur, tibia);
            let phi = angle_between(&coxia_to_foot, &Vector3::x());
            let beta = if target.z > 0.0 { theta + phi } else { theta - phi };

            let (sin, cos) = beta.to_radians().sin_cos();
            let p2 = Point3::new(coxia + femur * cos, 0.0, femur * sin);
            let gamma = 90.0 - angle_between(&(p2 - p1), &(target - p2));
            if p2.z < target.z {
                return Err(HexapodError::BlockingCollision { leg });
            }
            (beta, gamma, p2, target, false)
        } else {
            if distance + tibia < femur {
                return Err(HexapodError::UnreachableTarget {
                    leg,
                    limb: Limb::Femur,
                });
            }
            if distance + femur < tibia {
                return Err(HexapodError::UnreachableTarget {
                    leg,
                    limb: Limb::Tibia,
                });
            }
            let direction = coxia_to_foot.try_normalize(f64::EPSILON).ok_or(
                HexapodError::UnreachableTarget {
                    leg,
                    limb: Limb::Femur,
                },
            )?;

            debug!(%leg, distance, "foot out of reach, leg left in the air");
            let p2 = p1 + direction * femur;
            let p3 = p2 + direction * tibia;
            let elevation = angle_between(&Vector3::x(), &direction);
            let beta = if direction.z < 0.0 { -elevation } else { elevation };
            (beta, 0.0, p2, p3, true)
        };

        limits.check(leg, Joint::Femur, beta)?;
        limits.check(leg, Joint::Tibia, gamma)?;

        let twist = self.twist(&coxia_direction);
        let alpha = normalize_degrees(twist - leg.coxia_axis());
        limits.check(leg, Joint::Coxia, alpha)?;

        let to_world = Transform::translation(body_contact.x, body_contact.y, body_contact.z)
            * self.orientation
            * Transform::rotation_z(twist);
        let points = [p0, p1, p2, p3].map(|point| to_world.transform_point(&point));
        let pose = LegPose::new(alpha, beta, gamma);

        if self.hexapod.config().sanity_checks {
            self.check_solution(leg, &pose, &points, in_air, &foot_tip)?;
        }

        Ok(LegSolution {
            pose,
            points,
            in_air,
        })
    }

    /// Horizontal direction from the body contact toward the foot.
    ///
    /// A foot straight below its body contact has no such direction; the
    /// leg's previous coxia heading is kept instead.
    fn coxia_direction(&self, leg: LegId, body_to_foot: &Vector3<f64>) -> Vector3<f64> {
        let linkage = self.hexapod.leg(leg);
        let previous = linkage.coxia_point() - linkage.body_contact();
        project_onto_plane(body_to_foot, &self.axes.z)
            .try_normalize(f64::EPSILON)
            .or_else(|| project_onto_plane(&previous, &self.axes.z).try_normalize(f64::EPSILON))
            .unwrap_or(self.axes.x)
    }

    /// Signed rotation about body up taking body x onto `direction`, degrees.
    fn twist(&self, direction: &Vector3<f64>) -> f64 {
        signed_angle(&self.axes.x, direction, &self.axes.z)
    }

    /// Recheck a solved leg: segment lengths, planted foot, and agreement with
    /// forward kinematics of the solved angles.
    fn check_solution(
        &self,
        leg: LegId,
        pose: &LegPose,
        points: &[Point3<f64>; 4],
        in_air: bool,
        foot_tip: &Point3<f64>,
    ) -> Result<()> {
        let tolerance = 1e-6 * self.dimensions.reach().max(1.0);
        let [p0, p1, p2, p3] = points;

        let expected = [self.dimensions.coxia, self.dimensions.femur, self.dimensions.tibia];
        let measured = [(p1 - p0).norm(), (p2 - p1).norm(), (p3 - p2).norm()];
        for (name, (expected, measured)) in ["coxia", "femur", "tibia"]
            .into_iter()
            .zip(expected.into_iter().zip(measured))
        {
            if (expected - measured).abs() > tolerance {
                return Err(HexapodError::inconsistent(
                    leg,
                    format!("{name} length {measured:.6} differs from {expected:.6}"),
                ));
            }
        }

        if in_air {
            return Ok(());
        }

        if (p3 - foot_tip).norm() > tolerance {
            return Err(HexapodError::inconsistent(leg, "foot tip moved off its ground point"));
        }

        let body = Hexagon::new(&self.dimensions);
        let mut forward = Linkage::new(leg, &self.dimensions, *body.vertex(leg));
        forward.change_pose(*pose);
        let to_body = self.orientation.inverse();
        let forward_points = forward.points();
        for (index, point) in points.iter().enumerate().skip(1) {
            let solved = to_body.transform_vector(&(point - p0));
            let reference = forward_points[index] - forward_points[0];
            if (solved - reference).norm() > tolerance {
                return Err(HexapodError::inconsistent(
                    leg,
                    format!("joint {index} disagrees with forward kinematics of {pose:?}"),
                ));
            }
        }
        Ok(())
    }
}
