//! Cubic Bezier span.

use duct_core::traits::BoundingBox;
use duct_core::{DuctError, Result, Tolerance};
use duct_math::{Aabb3, Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::Curve;

/// A cubic Bezier segment, parameterized over `[0, 1]`.
///
/// Spans of a [`Spline`](crate::Spline) are handed out as `CubicBezier`
/// values; editing one does not touch the spline it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub start_point: Point3,
    pub start_control_point: Point3,
    pub end_control_point: Point3,
    pub end_point: Point3,
}

impl CubicBezier {
    pub fn new(
        start_point: Point3,
        start_control_point: Point3,
        end_control_point: Point3,
        end_point: Point3,
    ) -> Self {
        Self {
            start_point,
            start_control_point,
            end_control_point,
            end_point,
        }
    }

    /// Control points in order `[start, start control, end control, end]`.
    pub fn control_points(&self) -> [Point3; 4] {
        [
            self.start_point,
            self.start_control_point,
            self.end_control_point,
            self.end_point,
        ]
    }

    pub fn control_point(&self, index: usize) -> Result<Point3> {
        self.control_points()
            .get(index)
            .copied()
            .ok_or_else(|| DuctError::out_of_range("span control point", index, 4))
    }

    /// The same segment traversed from end to start.
    pub fn reversed(&self) -> Self {
        Self::new(
            self.end_point,
            self.end_control_point,
            self.start_control_point,
            self.start_point,
        )
    }
}

impl Curve for CubicBezier {
    fn point_at(&self, t: f64) -> Point3 {
        let [p0, p1, p2, p3] = self.control_points();
        let s = 1.0 - t;
        p0 * (s * s * s) + p1 * (3.0 * s * s * t) + p2 * (3.0 * s * t * t) + p3 * (t * t * t)
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        let [p0, p1, p2, p3] = self.control_points();
        let s = 1.0 - t;
        (p1 - p0) * (3.0 * s * s) + (p2 - p1) * (6.0 * s * t) + (p3 - p2) * (3.0 * t * t)
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn is_closed(&self) -> bool {
        Tolerance::default().is_zero((self.end_point - self.start_point).length())
    }
}

impl BoundingBox for CubicBezier {
    type Point = Point3;

    /// Bounds of the control hull, which contains the curve.
    fn bounding_box(&self) -> (Point3, Point3) {
        let [p0, p1, p2, p3] = self.control_points();
        let aabb = Aabb3::new(p0.min(p1).min(p2).min(p3), p0.max(p1).max(p2).max(p3));
        (aabb.min, aabb.max)
    }
}
