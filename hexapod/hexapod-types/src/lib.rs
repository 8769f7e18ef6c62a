//! Core types for hexapod kinematics.
//!
//! This crate provides the plain data shared by the kinematics engine and
//! its callers:
//!
//! - [`LegId`] - The six legs in their fixed order
//! - [`Dimensions`] - Body half-extents and leg link lengths
//! - [`Pose`] - Joint angles for every leg
//! - [`IkParameters`] - Target body translation/rotation for inverse kinematics
//! - [`KinematicsConfig`] - Angle limits, support search and failure policy
//! - [`HexapodError`] - Everything that can go wrong
//!
//! These types carry no geometry. The `hexapod-kinematics` crate builds the
//! leg and body models on top of them.
//!
//! # Coordinate System
//!
//! - X: right
//! - Y: forward
//! - Z: up
//! - Right-handed, angles in degrees
//!
//! # Example
//!
//! ```
//! use hexapod_types::{Dimensions, LegId, LegPose, Pose};
//!
//! let dims = Dimensions::new(75.0, 100.0, 125.0, 50.0, 130.0, 200.0);
//! assert!(dims.validate().is_ok());
//!
//! let pose = Pose::stance(10.0, 20.0).with_leg(LegId::LeftBack, LegPose::new(0.0, 90.0, 0.0));
//! assert_eq!(pose[LegId::RightFront].coxia, -10.0);
//! assert_eq!(pose[LegId::LeftBack].femur, 90.0);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that conflict with API design choices
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)] // Not all technical terms need backticks
#![allow(clippy::missing_errors_doc)] // Error docs added where non-obvious
#![allow(clippy::missing_const_for_fn)] // Many methods can't be const due to nalgebra

mod config;
mod dimensions;
mod error;
mod ik;
mod leg;
mod pose;

pub use config::{
    AngleLimits, ContactSearch, KinematicsConfig, SupportConfig, TrioOrder, UnstablePolicy,
};
pub use dimensions::Dimensions;
pub use error::HexapodError;
pub use ik::IkParameters;
pub use leg::{Joint, JointRole, LEG_COUNT, LegId, LegSide, Limb};
pub use pose::{LegPose, Pose};

// Re-export math types for convenience
pub use nalgebra::{Point3, Vector3};

/// Result type for hexapod operations.
pub type Result<T> = std::result::Result<T, HexapodError>;
