//! Hexagonal body model.

use hexapod_types::{Dimensions, LEG_COUNT, LegId};
use nalgebra::{Point3, Vector3};

use crate::frame::Transform;

/// The torso: six leg attachment vertices, center of gravity and head.
///
/// In body frame the center of gravity is the origin and the head sits at
/// `(0, side, 0)`, straight ahead.
#[derive(Debug, Clone, PartialEq)]
pub struct Hexagon {
    front: f64,
    middle: f64,
    side: f64,
    vertices: [Point3<f64>; LEG_COUNT],
    cog: Point3<f64>,
    head: Point3<f64>,
}

impl Hexagon {
    /// Build the body in its own frame.
    #[must_use]
    pub fn new(dimensions: &Dimensions) -> Self {
        let front = dimensions.front;
        let middle = dimensions.middle;
        let side = dimensions.side;
        Self {
            front,
            middle,
            side,
            vertices: LegId::ALL.map(|leg| Self::neutral_vertex(leg, front, middle, side)),
            cog: Point3::origin(),
            head: Point3::new(0.0, side, 0.0),
        }
    }

    fn neutral_vertex(leg: LegId, front: f64, middle: f64, side: f64) -> Point3<f64> {
        match leg {
            LegId::RightMiddle => Point3::new(middle, 0.0, 0.0),
            LegId::RightFront => Point3::new(front, side, 0.0),
            LegId::LeftFront => Point3::new(-front, side, 0.0),
            LegId::LeftMiddle => Point3::new(-middle, 0.0, 0.0),
            LegId::LeftBack => Point3::new(-front, -side, 0.0),
            LegId::RightBack => Point3::new(front, -side, 0.0),
        }
    }

    /// Put every point back in body frame.
    pub fn reset(&mut self) {
        *self = Self::new(&Dimensions {
            front: self.front,
            middle: self.middle,
            side: self.side,
            ..Dimensions::default()
        });
    }

    /// Attachment point of one leg.
    #[must_use]
    pub fn vertex(&self, leg: LegId) -> &Point3<f64> {
        &self.vertices[leg.index()]
    }

    /// All six attachment points in [`LegId`] order.
    #[must_use]
    pub fn vertices(&self) -> &[Point3<f64>; LEG_COUNT] {
        &self.vertices
    }

    /// Center of gravity.
    #[must_use]
    pub fn cog(&self) -> &Point3<f64> {
        &self.cog
    }

    /// Head reference point.
    #[must_use]
    pub fn head(&self) -> &Point3<f64> {
        &self.head
    }

    /// Vertices as a closed polygon, first vertex repeated at the end.
    #[must_use]
    pub fn outline(&self) -> Vec<Point3<f64>> {
        let mut outline = self.vertices.to_vec();
        outline.push(self.vertices[0]);
        outline
    }

    /// Every body-owned point: vertices, then center of gravity, then head.
    pub fn points(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.vertices
            .iter()
            .chain(std::iter::once(&self.cog))
            .chain(std::iter::once(&self.head))
    }

    fn points_mut(&mut self) -> impl Iterator<Item = &mut Point3<f64>> {
        self.vertices
            .iter_mut()
            .chain(std::iter::once(&mut self.cog))
            .chain(std::iter::once(&mut self.head))
    }

    pub(crate) fn transform(&mut self, frame: &Transform, height: f64) {
        for point in self.points_mut() {
            frame.apply_in_place(point, height);
        }
    }

    pub(crate) fn translate(&mut self, offset: &Vector3<f64>) {
        for point in self.points_mut() {
            *point += offset;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vertex_layout() {
        let body = Hexagon::new(&Dimensions::new(75.0, 100.0, 125.0, 1.0, 1.0, 1.0));
        assert_eq!(*body.vertex(LegId::RightMiddle), Point3::new(125.0, 0.0, 0.0));
        assert_eq!(*body.vertex(LegId::RightFront), Point3::new(75.0, 100.0, 0.0));
        assert_eq!(*body.vertex(LegId::LeftFront), Point3::new(-75.0, 100.0, 0.0));
        assert_eq!(*body.vertex(LegId::LeftMiddle), Point3::new(-125.0, 0.0, 0.0));
        assert_eq!(*body.vertex(LegId::LeftBack), Point3::new(-75.0, -100.0, 0.0));
        assert_eq!(*body.vertex(LegId::RightBack), Point3::new(75.0, -100.0, 0.0));
        assert_eq!(*body.head(), Point3::new(0.0, 100.0, 0.0));
        assert_eq!(body.points().count(), 8);
    }

    #[test]
    fn test_outline_is_closed() {
        let body = Hexagon::new(&Dimensions::default());
        let outline = body.outline();
        assert_eq!(outline.len(), LEG_COUNT + 1);
        assert_eq!(outline.first(), outline.last());
    }

    #[test]
    fn test_transform_and_reset() {
        let mut body = Hexagon::new(&Dimensions::default());
        body.transform(&Transform::rotation_z(90.0), 10.0);
        assert_relative_eq!(*body.vertex(LegId::RightMiddle), Point3::new(0.0, 100.0, 10.0), epsilon = 1e-9);
        assert_relative_eq!(*body.cog(), Point3::new(0.0, 0.0, 10.0));

        body.translate(&Vector3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(*body.cog(), Point3::new(1.0, 2.0, 13.0));

        body.reset();
        assert_eq!(body, Hexagon::new(&Dimensions::default()));
    }
}
