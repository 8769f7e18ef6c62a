//! Homogeneous transforms and the few vector helpers nalgebra lacks.
//!
//! Angles cross this module's boundary in degrees and are converted to
//! radians internally.

use std::ops::Mul;

use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

/// Pose of one frame relative to another as a 4x4 homogeneous matrix.
///
/// The bottom row is always `[0, 0, 0, 1]`: every constructor builds a
/// rotation followed by a translation, and composition preserves that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform(Matrix4<f64>);

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    /// Build from a rotation and a translation applied after it.
    #[must_use]
    pub fn from_parts(rotation: &Rotation3<f64>, translation: Vector3<f64>) -> Self {
        let mut matrix = rotation.to_homogeneous();
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
        Self(matrix)
    }

    /// Pure translation.
    #[must_use]
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self(Matrix4::new_translation(&Vector3::new(x, y, z)))
    }

    /// Rotate about x.
    #[must_use]
    pub fn rotation_x(degrees: f64) -> Self {
        Self::from_parts(
            &Rotation3::from_axis_angle(&Vector3::x_axis(), degrees.to_radians()),
            Vector3::zeros(),
        )
    }

    /// Rotate about y.
    #[must_use]
    pub fn rotation_y(degrees: f64) -> Self {
        Self::from_parts(
            &Rotation3::from_axis_angle(&Vector3::y_axis(), degrees.to_radians()),
            Vector3::zeros(),
        )
    }

    /// Rotate about z.
    #[must_use]
    pub fn rotation_z(degrees: f64) -> Self {
        Self::z_rotation_xy_translation(degrees, 0.0, 0.0)
    }

    /// Rotate about x, then y, then z, each about the original axes of the
    /// frame being rotated (`Rx * Ry * Rz`).
    #[must_use]
    pub fn rotation_xyz(rx: f64, ry: f64, rz: f64) -> Self {
        Self::rotation_x(rx) * Self::rotation_y(ry) * Self::rotation_z(rz)
    }

    /// Rotate about y, then translate along x. Used for the leg segments.
    #[must_use]
    pub fn y_rotation_x_translation(degrees: f64, x: f64) -> Self {
        Self::from_parts(
            &Rotation3::from_axis_angle(&Vector3::y_axis(), degrees.to_radians()),
            Vector3::new(x, 0.0, 0.0),
        )
    }

    /// Rotate about z, then translate in the xy plane. Used to place a leg
    /// on the body.
    #[must_use]
    pub fn z_rotation_xy_translation(degrees: f64, x: f64, y: f64) -> Self {
        Self::from_parts(
            &Rotation3::from_axis_angle(&Vector3::z_axis(), degrees.to_radians()),
            Vector3::new(x, y, 0.0),
        )
    }

    /// Smallest rotation taking direction `from` onto direction `to`.
    ///
    /// Returns the identity when the two are parallel or antiparallel, or
    /// when either is zero.
    #[must_use]
    pub fn aligning(from: &Vector3<f64>, to: &Vector3<f64>) -> Self {
        if from.cross(to).norm() <= f64::EPSILON {
            return Self::identity();
        }
        Rotation3::rotation_between(from, to)
            .map_or_else(Self::identity, |rotation| {
                Self::from_parts(&rotation, Vector3::zeros())
            })
    }

    /// Inverse of a rigid transform: `[R | t]` becomes `[R^T | -R^T t]`.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let rotation = self.0.fixed_view::<3, 3>(0, 0).transpose();
        let translation = -(rotation * self.0.fixed_view::<3, 1>(0, 3));
        let mut matrix = Matrix4::identity();
        matrix.fixed_view_mut::<3, 3>(0, 0).copy_from(&rotation);
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
        Self(matrix)
    }

    /// The underlying matrix.
    #[must_use]
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.0
    }

    /// Compose: the result applies `other` first, then `self`.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        Self(self.0 * other.0)
    }

    /// Map a point to a new point.
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from_homogeneous(self.0 * point.to_homogeneous()).unwrap_or(*point)
    }

    /// Rotate a direction, ignoring translation.
    #[must_use]
    pub fn transform_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.0.fixed_view::<3, 3>(0, 0) * vector
    }

    /// Map a point in place, then raise it by `height` along world z.
    pub fn apply_in_place(&self, point: &mut Point3<f64>, height: f64) {
        *point = self.transform_point(point);
        point.z += height;
    }
}

impl Mul for Transform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.compose(&rhs)
    }
}

/// Unit normal of the plane through `a`, `b`, `c`, oriented by the right-hand
/// rule on that order. `None` for collinear points.
#[must_use]
pub fn unit_normal(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<Vector3<f64>> {
    (b - a).cross(&(c - a)).try_normalize(f64::EPSILON)
}

/// Component of `vector` lying in the plane with normal `normal`.
///
/// `normal` must be non-zero.
#[must_use]
pub fn project_onto_plane(vector: &Vector3<f64>, normal: &Vector3<f64>) -> Vector3<f64> {
    vector - normal * (vector.dot(normal) / normal.norm_squared())
}

/// Unsigned angle between two vectors, in degrees.
///
/// Both vectors must be non-zero.
#[must_use]
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.cross(b).norm().atan2(a.dot(b)).to_degrees()
}

/// Angle of a triangle with sides `a`, `b`, `c` that is opposite `c`, in
/// degrees (law of cosines).
#[must_use]
pub fn angle_opposite_of_last_side(a: f64, b: f64, c: f64) -> f64 {
    let ratio = (a * a + b * b - c * c) / (2.0 * a * b);
    ratio.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Whether three lengths satisfy the strict triangle inequality.
#[must_use]
pub fn is_triangle(a: f64, b: f64, c: f64) -> bool {
    a + b > c && a + c > b && b + c > a
}

/// Signed angle from `a` to `b` about the unit vector `axis`, in degrees.
/// Positive is counter-clockwise seen from the tip of `axis`.
#[must_use]
pub fn signed_angle(a: &Vector3<f64>, b: &Vector3<f64>, axis: &Vector3<f64>) -> f64 {
    a.cross(b).dot(axis).atan2(a.dot(b)).to_degrees()
}

/// Wrap an angle in degrees into `(-180, 180]`.
#[must_use]
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
