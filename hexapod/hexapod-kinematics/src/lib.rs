//! Kinematics engine for a six-legged robot.
//!
//! This crate computes how a hexapod rests under gravity for a given set of
//! joint angles, and which joint angles realize a requested body pose while
//! the feet stay planted:
//!
//! - [`VirtualHexapod`] composes a [`Hexagon`] body and six [`Linkage`] legs
//!   and owns the forward update (pose, find support, rest on ground)
//! - [`find_support`] searches leg trios for a plane that carries the body
//! - [`inverse_kinematics_update`] derives the 18 joint angles for
//!   [`IkParameters`]
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     VirtualHexapod                        │
//! │   update(pose) ──► Linkage::change_pose (x6)              │
//! │                ──► find_support ──► align, lift, untwist  │
//! └───────────────────────────┬──────────────────────────────┘
//!                             │ update_stance + detach body
//!                             ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │              inverse_kinematics_update                    │
//! │   per leg: coxia heading ──► law of cosines ──► limits    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! All state is in memory and every operation is synchronous and bounded.
//! The library emits `tracing` events but installs no subscriber.
//!
//! # Features
//!
//! - `serde`: derives `Serialize`/`Deserialize` on the re-exported data types
//!   and on [`Support`], [`SupportPlane`], [`LegPoint`] and [`LocalAxes`]
//!
//! # Quick Start
//!
//! ```
//! use hexapod_kinematics::{Dimensions, IkParameters, LegId, Pose, VirtualHexapod};
//!
//! let dims = Dimensions::new(75.0, 100.0, 125.0, 50.0, 130.0, 200.0);
//! let mut hexapod = VirtualHexapod::new(dims)?;
//!
//! // Forward: set angles, let the robot settle.
//! let support = hexapod.update(&Pose::stance(0.0, 15.0))?;
//! assert!(support.is_grounded());
//!
//! // Inverse: ask for a body pose, get the angles back.
//! let parameters = IkParameters::default().with_translation(0.1, 0.0, 0.1);
//! let pose = hexapod.inverse_kinematics_update(&parameters)?;
//! assert!(pose[LegId::RightMiddle].femur.abs() < 90.0);
//! # Ok::<(), hexapod_kinematics::HexapodError>(())
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that conflict with API design choices
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]
// Allow single-char names in math-heavy code (p0..p3, law of cosines sides)
#![allow(clippy::many_single_char_names)]
#![allow(clippy::doc_markdown)] // Not all technical terms need backticks
// Allow some nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)] // Many methods can't be const due to nalgebra
#![allow(clippy::suboptimal_flops)] // mul_add style changes aren't always clearer
#![allow(clippy::too_many_lines)]

pub mod body;
pub mod frame;
pub mod hexapod;
pub mod ik;
pub mod linkage;
pub mod stability;

pub use body::Hexagon;
pub use frame::Transform;
pub use hexapod::{LocalAxes, Support, VirtualHexapod};
pub use ik::{IkSolution, inverse_kinematics_update};
pub use linkage::{LegPoint, Linkage};
pub use stability::{SupportPlane, find_support};

// Re-export the data types so callers depend on one crate
pub use hexapod_types::{
    AngleLimits, ContactSearch, Dimensions, HexapodError, IkParameters, Joint, JointRole,
    KinematicsConfig, LEG_COUNT, LegId, LegPose, LegSide, Limb, Point3, Pose, Result,
    SupportConfig, TrioOrder, UnstablePolicy, Vector3,
};
