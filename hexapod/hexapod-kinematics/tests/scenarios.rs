//! End-to-end scenarios for the forward and inverse paths.
//!
//! Reference values come from hand-checked robot configurations.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use approx::assert_relative_eq;
use hexapod_kinematics::{
    ContactSearch, Dimensions, HexapodError, IkParameters, Joint, KinematicsConfig, LegId,
    LegPose, Limb, Point3, Pose, SupportConfig, UnstablePolicy, Vector3, VirtualHexapod,
    inverse_kinematics_update,
};

// =============================================================================
// Fixtures
// =============================================================================

fn forward_dimensions() -> Dimensions {
    Dimensions::new(75.0, 100.0, 125.0, 50.0, 130.0, 200.0)
}

fn forward_pose() -> Pose {
    Pose::new([
        LegPose::new(-40.0, 19.0, 6.0),
        LegPose::new(33.0, 85.0, -60.0),
        LegPose::new(-20.0, 90.0, -13.0),
        LegPose::new(-12.0, -25.0, 3.0),
        LegPose::new(0.0, 94.0, -70.0),
        LegPose::new(-5.0, 17.0, 2.0),
    ])
}

fn ik_dimensions() -> Dimensions {
    Dimensions::new(70.0, 115.0, 120.0, 60.0, 130.0, 150.0)
}

fn ik_parameters() -> IkParameters {
    IkParameters {
        hip_stance: 7.0,
        leg_stance: 32.0,
        percent_x: 0.35,
        percent_y: 0.25,
        percent_z: -0.2,
        rot_x: 2.5,
        rot_y: -9.0,
        rot_z: 14.0,
    }
}

fn checked(dimensions: Dimensions) -> VirtualHexapod {
    let config = KinematicsConfig::default().with_sanity_checks(true);
    VirtualHexapod::with_config(dimensions, config).unwrap()
}

fn assert_leg_lengths(hexapod: &VirtualHexapod) {
    for leg in hexapod.legs() {
        for (measured, expected) in leg.segment_lengths().iter().zip(leg.link_lengths()) {
            assert_relative_eq!(*measured, expected, epsilon = 1e-9);
        }
    }
}

/// Foot tips relative to the center of gravity, expressed in body frame.
fn body_frame_feet(hexapod: &VirtualHexapod) -> Vec<Vector3<f64>> {
    let to_body = hexapod.orientation().inverse();
    hexapod
        .legs()
        .iter()
        .map(|leg| to_body.transform_vector(&(leg.foot_tip() - hexapod.cog())))
        .collect()
}

fn stance_failure(hip_stance: f64, leg_stance: f64, percent_z: f64) -> HexapodError {
    let parameters = IkParameters::default()
        .with_stance(hip_stance, leg_stance)
        .with_translation(0.0, 0.0, percent_z)
        .with_rotation(-40.0, 0.0, 0.0);
    let mut hexapod = checked(ik_dimensions());
    let before = hexapod.clone();
    let err = hexapod.inverse_kinematics_update(&parameters).unwrap_err();
    assert_eq!(hexapod, before);
    err
}

// =============================================================================
// Forward Path
// =============================================================================

#[test]
fn forward_scenario_rests_on_three_legs() {
    for search in [ContactSearch::Extremity, ContactSearch::AllJoints] {
        let config = KinematicsConfig::default()
            .with_support(SupportConfig::default().with_contact_search(search));
        let mut hexapod = VirtualHexapod::with_config(forward_dimensions(), config).unwrap();
        let support = hexapod.update(&forward_pose()).unwrap();
        assert!(support.is_grounded());

        assert_relative_eq!(*hexapod.cog(), Point3::new(0.0, 0.0, 159.78), epsilon = 0.01);
        assert_relative_eq!(
            *hexapod.body().vertex(LegId::RightMiddle),
            Point3::new(97.74, 69.20, 123.97),
            epsilon = 0.01
        );

        let grounded: Vec<_> = hexapod.ground_contacts().iter().map(|c| c.leg).collect();
        assert_eq!(grounded, [LegId::RightMiddle, LegId::RightFront, LegId::LeftMiddle]);
        for contact in hexapod.ground_contacts() {
            assert_relative_eq!(contact.position.z, 0.0, epsilon = 1e-9);
        }
        assert_leg_lengths(&hexapod);
    }
}

#[test]
fn forward_scenario_nothing_below_ground() {
    let mut hexapod = VirtualHexapod::new(forward_dimensions()).unwrap();
    hexapod.update(&forward_pose()).unwrap();
    for leg in hexapod.legs() {
        for point in leg.points() {
            assert!(point.z >= -1.0, "{} is underground", leg.id());
        }
    }
}

#[test]
fn neutral_hexapod_stands_on_all_feet() {
    let mut hexapod = VirtualHexapod::new(forward_dimensions()).unwrap();
    for leg in hexapod.legs() {
        assert_relative_eq!(leg.foot_tip().z, 0.0, epsilon = 1e-9);
    }

    let support = hexapod.update(&Pose::neutral()).unwrap();
    let plane = support.plane().unwrap();
    assert_relative_eq!(plane.normal, Vector3::z(), epsilon = 1e-12);
    assert_eq!(hexapod.ground_contacts().len(), 6);
    for leg in hexapod.legs() {
        assert_relative_eq!(leg.foot_tip().z, 0.0, epsilon = 1e-9);
    }
}

#[test]
fn unstable_forward_pose_under_error_policy() {
    let config = KinematicsConfig::default().with_unstable_policy(UnstablePolicy::Error);
    let mut hexapod = VirtualHexapod::with_config(forward_dimensions(), config).unwrap();

    let mut pose = Pose::neutral();
    for leg in LegId::ALL {
        pose[leg] = LegPose::new(90.0 - leg.coxia_axis(), 0.0, 0.0);
    }
    assert_eq!(hexapod.update(&pose).unwrap_err(), HexapodError::UnstablePose);
}

// =============================================================================
// Inverse Path
// =============================================================================

#[test]
fn ik_scenario_right_middle_angles() {
    let solution = inverse_kinematics_update(&checked(ik_dimensions()), &ik_parameters()).unwrap();
    let right_middle = solution.pose[LegId::RightMiddle];
    assert_relative_eq!(right_middle.coxia, -36.90, epsilon = 0.01);
    assert_relative_eq!(right_middle.femur, 26.28, epsilon = 0.01);
    assert_relative_eq!(right_middle.tibia, -38.40, epsilon = 0.01);

    assert!(solution.legs_in_air.is_empty());
    assert_eq!(solution.hexapod.ground_contacts().len(), 6);
    assert_leg_lengths(&solution.hexapod);
}

#[test]
fn ik_round_trip_through_forward_update() {
    let solution = inverse_kinematics_update(&checked(ik_dimensions()), &ik_parameters()).unwrap();

    let mut replay = VirtualHexapod::new(ik_dimensions()).unwrap();
    replay.update(&solution.pose).unwrap();

    // Same feet around the body, and the same standing height.
    for (a, b) in body_frame_feet(&solution.hexapod).iter().zip(body_frame_feet(&replay)) {
        assert_relative_eq!(*a, b, epsilon = 1e-6);
    }
    assert_relative_eq!(solution.hexapod.cog().z, replay.cog().z, epsilon = 1e-6);
    assert_relative_eq!(replay.cog().z, 50.04, epsilon = 0.01);
    for leg in replay.legs() {
        assert_relative_eq!(leg.foot_tip().z, 0.0, epsilon = 1e-6);
    }
}

#[test]
fn ik_unreachable_target_names_leg() {
    let dimensions = Dimensions::new(70.0, 115.0, 120.0, 60.0, 200.0, 40.0);
    let parameters = IkParameters::default().with_translation(0.5, 0.0, 0.0);
    let err = inverse_kinematics_update(&checked(dimensions), &parameters).unwrap_err();
    assert_eq!(
        err,
        HexapodError::UnreachableTarget {
            leg: LegId::RightMiddle,
            limb: Limb::Femur,
        }
    );
    assert!(err.is_ik_failure());
    assert!(err.to_string().contains("right-middle"));
}

#[test]
fn ik_three_legs_up_on_one_side() {
    let parameters = IkParameters::default().with_translation(1.2, 0.0, 0.0);
    let err = inverse_kinematics_update(&checked(ik_dimensions()), &parameters).unwrap_err();
    assert_eq!(
        err,
        HexapodError::TooManyLegsUp {
            legs: vec![LegId::LeftFront, LegId::LeftMiddle, LegId::LeftBack],
        }
    );
}

#[test]
fn ik_hip_angle_out_of_range() {
    let parameters = IkParameters::default().with_rotation(0.0, 0.0, 80.0);
    let err = inverse_kinematics_update(&checked(ik_dimensions()), &parameters).unwrap_err();
    match err {
        HexapodError::AngleOutOfRange {
            leg,
            joint,
            value,
            limit,
        } => {
            assert_eq!(leg, LegId::RightMiddle);
            assert_eq!(joint, Joint::Coxia);
            assert_relative_eq!(value, -102.23, epsilon = 0.01);
            assert_eq!(limit, 90.0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn ik_body_on_ground() {
    let parameters = IkParameters::default().with_translation(0.0, 0.0, -1.2);
    let mut hexapod = checked(ik_dimensions());
    let before = hexapod.clone();
    let err = hexapod.inverse_kinematics_update(&parameters).unwrap_err();
    assert!(matches!(err, HexapodError::BodyOnGround { .. }));
    assert_eq!(hexapod, before);
}

// A hard body roll over a low, pinched stance drives the right-front leg into
// each of its geometric failures in turn.

#[test]
fn ik_coxia_on_ground() {
    let err = stance_failure(-40.0, -30.0, -0.6);
    assert_eq!(
        err,
        HexapodError::CoxiaOnGround {
            leg: LegId::RightFront,
        }
    );
    assert_eq!(err.leg(), Some(LegId::RightFront));
}

#[test]
fn ik_femur_joint_blocking() {
    let err = stance_failure(-40.0, -60.0, -0.6);
    assert_eq!(
        err,
        HexapodError::BlockingCollision {
            leg: LegId::RightFront,
        }
    );
    assert!(err.to_string().contains("blocking"));
}

#[test]
fn ik_tibia_too_short() {
    let err = stance_failure(-40.0, -30.0, -0.3);
    assert_eq!(
        err,
        HexapodError::UnreachableTarget {
            leg: LegId::RightFront,
            limb: Limb::Tibia,
        }
    );
    assert!(err.is_ik_failure());
}
