//! Ground-contact stability search.
//!
//! Finds three legs whose contact points span a plane that can carry the
//! body: the center of gravity projects inside their triangle and no other
//! leg reaches below the plane. Everything is evaluated in body frame, where
//! the center of gravity is the origin.
//!
//! Two searches are available (see [`ContactSearch`]):
//!
//! - **Extremity**: one candidate point per leg, its lowest joint. Tries at
//!   most 20 leg trios.
//! - **All joints**: the coxia joint, femur joint and foot tip of every leg
//!   are all candidates, giving 20 x 27 = 540 combinations. Needed when the
//!   lowest joint of a leg is not necessarily the one it stands on.
//!
//! Non-adjacent trios are always tried first because a tripod spanning the
//! body is the typical support. Several trios can be valid for one pose;
//! [`TrioOrder`] decides which one is reported.

use hexapod_types::{ContactSearch, JointRole, LEG_COUNT, LegId, SupportConfig, TrioOrder};
use nalgebra::{Point3, Vector3};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::frame::unit_normal;
use crate::linkage::{LegPoint, Linkage};

/// Number of unordered leg trios.
pub const TRIO_COUNT: usize = 20;

/// Order in which a candidate leg's joints are matched against the plane when
/// reporting extra contacts: the foot first.
const CONTACT_PREFERENCE: [JointRole; 3] =
    [JointRole::FootTip, JointRole::FemurJoint, JointRole::CoxiaJoint];

/// A plane carrying the body, expressed in the frame the search ran in.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SupportPlane {
    /// Unit normal pointing from the ground toward the body.
    pub normal: Vector3<f64>,
    /// Distance from the center of gravity down to the plane.
    pub height: f64,
    /// The three legs that define the plane.
    pub trio: [LegId; 3],
    /// Every leg point resting on the plane, in leg order. Always includes the
    /// trio.
    pub contacts: SmallVec<[LegPoint; LEG_COUNT]>,
}

impl SupportPlane {
    /// Legs touching the plane.
    pub fn legs(&self) -> impl Iterator<Item = LegId> + '_ {
        self.contacts.iter().map(|contact| contact.leg)
    }

    /// Whether `leg` touches the plane.
    #[must_use]
    pub fn is_on_ground(&self, leg: LegId) -> bool {
        self.contacts.iter().any(|contact| contact.leg == leg)
    }

    /// Height of `point` above the plane.
    #[must_use]
    pub fn elevation(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&point.coords) + self.height
    }
}

/// Whether the three legs sit next to each other around the body.
#[must_use]
pub fn is_adjacent_trio(trio: &[LegId; 3]) -> bool {
    let [a, b, c] = *trio;
    let neighbours =
        usize::from(a.is_adjacent_to(b)) + usize::from(b.is_adjacent_to(c)) + usize::from(a.is_adjacent_to(c));
    neighbours >= 2
}

/// All 20 trios in search order: non-adjacent first, then the six adjacent
/// ones.
///
/// Each trio lists its legs in ascending [`LegId`] order, which walks the
/// body counter-clockwise.
#[must_use]
pub fn trio_order(order: TrioOrder) -> [[LegId; 3]; TRIO_COUNT] {
    let mut non_adjacent: SmallVec<[[LegId; 3]; 14]> = SmallVec::new();
    let mut adjacent: SmallVec<[[LegId; 3]; 6]> = SmallVec::new();

    for i in 0..LEG_COUNT {
        for j in (i + 1)..LEG_COUNT {
            for k in (j + 1)..LEG_COUNT {
                let trio = [LegId::ALL[i], LegId::ALL[j], LegId::ALL[k]];
                if is_adjacent_trio(&trio) {
                    adjacent.push(trio);
                } else {
                    non_adjacent.push(trio);
                }
            }
        }
    }

    if let TrioOrder::Seeded(seed) = order {
        let mut rng = StdRng::seed_from_u64(seed);
        non_adjacent.shuffle(&mut rng);
    }

    let mut trios = [[LegId::RightMiddle; 3]; TRIO_COUNT];
    for (slot, trio) in trios.iter_mut().zip(non_adjacent.into_iter().chain(adjacent)) {
        *slot = trio;
    }
    trios
}

/// Search for a support plane under the origin.
///
/// Returns `None` when no trio can carry the body.
#[must_use]
pub fn find_support(legs: &[Linkage; LEG_COUNT], config: &SupportConfig) -> Option<SupportPlane> {
    let plane = match config.contact_search {
        ContactSearch::Extremity => find_extremity_support(legs, config),
        ContactSearch::AllJoints => find_joint_support(legs, config),
    };

    match &plane {
        Some(plane) => debug!(
            trio = ?plane.trio,
            height = plane.height,
            contacts = plane.contacts.len(),
            "support trio accepted"
        ),
        None => debug!("no support trio found"),
    }
    plane
}

fn find_extremity_support(legs: &[Linkage; LEG_COUNT], config: &SupportConfig) -> Option<SupportPlane> {
    let candidates = legs.each_ref().map(Linkage::ground_contact);

    trio_order(config.trio_order).into_iter().find_map(|trio| {
        let [a, b, c] = trio.map(|leg| candidates[leg.index()].position);
        let (normal, height) = carrying_plane(&a, &b, &c, config.containment_tolerance)?;

        let sinks = candidates
            .iter()
            .any(|candidate| depth_below(&normal, height, &candidate.position) > config.ground_tolerance);
        if sinks {
            return None;
        }

        let contacts = candidates
            .iter()
            .filter(|candidate| depth_below(&normal, height, &candidate.position).abs() <= config.ground_tolerance)
            .copied()
            .collect();

        Some(SupportPlane {
            normal,
            height,
            trio,
            contacts,
        })
    })
}

fn find_joint_support(legs: &[Linkage; LEG_COUNT], config: &SupportConfig) -> Option<SupportPlane> {
    for trio in trio_order(config.trio_order) {
        for roles in role_combinations() {
            let chosen: [LegPoint; 3] =
                std::array::from_fn(|n| legs[trio[n].index()].leg_point(roles[n]));
            let [a, b, c] = chosen.map(|point| point.position);
            let Some((normal, height)) = carrying_plane(&a, &b, &c, config.containment_tolerance) else {
                continue;
            };

            let sinks = legs.iter().any(|leg| {
                JointRole::GROUND_CANDIDATES
                    .iter()
                    .any(|&role| depth_below(&normal, height, leg.point(role)) > config.ground_tolerance)
            });
            if sinks {
                continue;
            }

            let contacts = legs
                .iter()
                .filter_map(|leg| {
                    if let Some(point) = chosen.iter().find(|point| point.leg == leg.id()) {
                        return Some(*point);
                    }
                    CONTACT_PREFERENCE
                        .iter()
                        .find(|&&role| {
                            depth_below(&normal, height, leg.point(role)).abs() <= config.ground_tolerance
                        })
                        .map(|&role| leg.leg_point(role))
                })
                .collect();

            return Some(SupportPlane {
                normal,
                height,
                trio,
                contacts,
            });
        }
    }
    None
}

/// The 27 ways of picking one ground candidate for each leg of a trio.
fn role_combinations() -> impl Iterator<Item = [JointRole; 3]> {
    let roles = JointRole::GROUND_CANDIDATES;
    (0..27).map(move |n| [roles[n / 9], roles[(n / 3) % 3], roles[n % 3]])
}

/// How far `point` lies below the plane, as seen from the origin.
fn depth_below(normal: &Vector3<f64>, height: f64, point: &Point3<f64>) -> f64 {
    -normal.dot(&point.coords) - height
}

/// Plane through `a`, `b`, `c` if it can carry the origin.
///
/// The normal is oriented toward body up (+z) and `height = -normal . a`.
fn carrying_plane(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    tolerance: f64,
) -> Option<(Vector3<f64>, f64)> {
    if !contains_origin_projection(a, b, c, tolerance) {
        return None;
    }
    let mut normal = unit_normal(a, b, c)?;
    if normal.z < 0.0 {
        normal = -normal;
    }
    let height = -normal.dot(&a.coords);
    Some((normal, height))
}

/// Whether the origin, projected onto the plane of the triangle, falls
/// inside it. Barycentric coordinates may exceed `[0, 1]` by `tolerance`.
#[must_use]
pub fn contains_origin_projection(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    tolerance: f64,
) -> bool {
    let u = b - a;
    let v = c - a;
    let w = -a.coords;
    let n = u.cross(&v);
    let n_squared = n.norm_squared();
    if n_squared <= f64::EPSILON {
        return false;
    }

    let gamma = u.cross(&w).dot(&n) / n_squared;
    let beta = w.cross(&v).dot(&n) / n_squared;
    let alpha = 1.0 - gamma - beta;
    let inside = |coefficient: f64| (-tolerance..=1.0 + tolerance).contains(&coefficient);
    inside(alpha) && inside(beta) && inside(gamma)
}
