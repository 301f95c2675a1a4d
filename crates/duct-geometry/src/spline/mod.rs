//! Knot-based piecewise cubic splines.
//!
//! A [`Spline`] is an ordered list of [`SplinePoint`] knots. Span `i` runs from
//! knot `i` to knot `i + 1` and is a cubic Bezier whose inner control points
//! are the knots' outgoing and incoming tangent handles.
//!
//! The first knot never carries an incoming tangent and the last knot never
//! carries an outgoing one. An outgoing tangent given to the last knot is held
//! back by the spline and handed to the knot once a successor is appended.
//! Every mutating method keeps that invariant, and every mutating method
//! either succeeds or leaves the spline untouched.

mod edit;
mod fairing;
mod point;
mod reverse;

use std::mem;
use std::ops::Index;

use duct_core::traits::{BoundingBox, Validate};
use duct_core::{DuctError, Result, Side};
use duct_math::{Aabb3, Point3, Transform, Vector3};
use serde::{Deserialize, Serialize};

pub use fairing::FairingConfig;
pub use point::{SplinePoint, Tangent, TangentValue};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spline {
    points: Vec<SplinePoint>,
    fairing: FairingConfig,
    /// Outgoing tangent of the last knot, waiting for a successor.
    #[serde(default)]
    held_after: Tangent,
}

impl Spline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a spline from knots in curve order, as if each were [`push`]ed.
    ///
    /// The incoming tangent of the first knot is dropped; the outgoing tangent
    /// of the last knot is held (see [`held_after`](Self::held_after)).
    ///
    /// [`push`]: Self::push
    pub fn from_points(points: impl IntoIterator<Item = SplinePoint>) -> Self {
        let mut spline = Self::new();
        for point in points {
            spline.push(point);
        }
        spline
    }

    pub fn with_fairing(mut self, fairing: FairingConfig) -> Self {
        self.fairing = fairing;
        self
    }

    pub fn fairing(&self) -> &FairingConfig {
        &self.fairing
    }

    pub fn set_fairing(&mut self, fairing: FairingConfig) -> Result<()> {
        fairing.validate()?;
        self.fairing = fairing;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of Bezier spans (`len - 1`, or 0 for an empty spline).
    pub fn span_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn get(&self, index: usize) -> Option<&SplinePoint> {
        self.points.get(index)
    }

    pub fn first(&self) -> Option<&SplinePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&SplinePoint> {
        self.points.last()
    }

    pub fn points(&self) -> &[SplinePoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SplinePoint> {
        self.points.iter()
    }

    pub fn positions(&self) -> impl Iterator<Item = Point3> + '_ {
        self.points.iter().map(|p| p.position)
    }

    /// The outgoing tangent given to the last knot.
    ///
    /// It is not part of any span until another knot is appended, at which
    /// point it becomes the outgoing tangent of its knot unchanged.
    pub fn held_after(&self) -> &Tangent {
        &self.held_after
    }

    /// Append a knot without fairing.
    ///
    /// The previous last knot gets back its held outgoing tangent, and the
    /// new knot's outgoing tangent is held in turn.
    pub fn push(&mut self, mut point: SplinePoint) {
        let held = mem::replace(&mut self.held_after, mem::take(&mut point.after));
        match self.points.last_mut() {
            Some(last) => last.after = held,
            None => point.before = Tangent::default(),
        }
        self.points.push(point);
    }

    /// Remove the last knot, with its held outgoing tangent.
    ///
    /// The new last knot's outgoing tangent is held again, so `pop` undoes
    /// [`push`](Self::push).
    pub fn pop(&mut self) -> Option<SplinePoint> {
        let mut popped = self.points.pop()?;
        let held = match self.points.last_mut() {
            Some(last) => mem::take(&mut last.after),
            None => Tangent::default(),
        };
        popped.after = mem::replace(&mut self.held_after, held);
        Some(popped)
    }

    pub fn set_position(&mut self, index: usize, position: Point3) -> Result<()> {
        self.check_index(index)?;
        self.points[index].position = position;
        Ok(())
    }

    /// Constrain the tangent on `side` of knot `index`.
    ///
    /// Fails for the incoming tangent of the first knot and the outgoing
    /// tangent of the last knot.
    pub fn set_tangent(
        &mut self,
        index: usize,
        side: Side,
        direction: Vector3,
        magnitude: f64,
    ) -> Result<()> {
        self.check_side(index, side)?;
        *self.points[index].tangent_mut(side) = Tangent::constrained(direction, magnitude);
        Ok(())
    }

    /// Release both tangents of knot `index` back to fairing.
    pub fn free_tangents(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.points[index].free_tangents();
        if index + 1 == self.points.len() {
            self.held_after = Tangent::default();
        }
        Ok(())
    }

    /// Apply a rigid transform to every knot.
    pub fn transform(&mut self, transform: &Transform) {
        for point in &mut self.points {
            point.position = transform.transform_point(point.position);
            for tangent in [&mut point.before, &mut point.after] {
                tangent.direction = tangent.direction.map(|d| transform.transform_vector(d));
            }
        }
        self.held_after.direction = self
            .held_after
            .direction
            .map(|d| transform.transform_vector(d));
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<()> {
        if index < self.points.len() {
            Ok(())
        } else {
            Err(DuctError::out_of_range("knot", index, self.points.len()))
        }
    }

    pub(crate) fn check_span(&self, span: usize) -> Result<()> {
        if span < self.span_count() {
            Ok(())
        } else {
            Err(DuctError::out_of_range("span", span, self.span_count()))
        }
    }

    /// Whether knot `index` may carry a tangent on `side`.
    pub(crate) fn has_side(&self, index: usize, side: Side) -> bool {
        match side {
            Side::Before => index > 0 && index < self.points.len(),
            Side::After => index + 1 < self.points.len(),
        }
    }

    fn check_side(&self, index: usize, side: Side) -> Result<()> {
        self.check_index(index)?;
        if self.has_side(index, side) {
            Ok(())
        } else {
            Err(DuctError::InvalidOperation(format!(
                "knot {index} of {} has no {side} tangent",
                self.points.len()
            )))
        }
    }

    /// Drop tangents outside the curve, including a held one.
    fn clear_outer_tangents(&mut self) {
        if let Some(first) = self.points.first_mut() {
            first.before = Tangent::default();
        }
        if let Some(last) = self.points.last_mut() {
            last.after = Tangent::default();
        }
        self.held_after = Tangent::default();
    }

    /// Control-hull bounds of every span, or the knot bounds where a span's
    /// tangents are unresolved.
    pub fn bounding_box(&self) -> Option<Aabb3> {
        let knots: Vec<Point3> = self.positions().collect();
        let bounds = Aabb3::from_points(&knots)?;
        Some(
            (0..self.span_count())
                .filter_map(|span| self.bezier(span).ok())
                .fold(bounds, |acc, bezier| {
                    let (min, max) = bezier.bounding_box();
                    acc.merge(&Aabb3::new(min, max))
                }),
        )
    }
}

impl Index<usize> for Spline {
    type Output = SplinePoint;

    fn index(&self, index: usize) -> &SplinePoint {
        &self.points[index]
    }
}

impl<'a> IntoIterator for &'a Spline {
    type Item = &'a SplinePoint;
    type IntoIter = std::slice::Iter<'a, SplinePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl FromIterator<SplinePoint> for Spline {
    fn from_iter<I: IntoIterator<Item = SplinePoint>>(iter: I) -> Self {
        Self::from_points(iter)
    }
}

impl Validate for Spline {
    fn validate(&self) -> Result<()> {
        self.fairing.validate()?;
        let n = self.points.len();
        for (i, point) in self.points.iter().enumerate() {
            if !point.position.is_finite() {
                return Err(DuctError::Geometry(format!("knot {i} has a non-finite position")));
            }
            for side in [Side::Before, Side::After] {
                let tangent = point.tangent(side);
                if !self.has_side(i, side) && !tangent.is_unset() {
                    return Err(DuctError::InvalidOperation(format!(
                        "knot {i} of {n} carries a {side} tangent"
                    )));
                }
                if !is_finite(tangent) {
                    return Err(DuctError::Geometry(format!(
                        "knot {i} has a non-finite {side} tangent"
                    )));
                }
            }
        }
        if !is_finite(&self.held_after) {
            return Err(DuctError::Geometry("held outgoing tangent is non-finite".into()));
        }
        Ok(())
    }
}

fn is_finite(tangent: &Tangent) -> bool {
    tangent.direction.value().map_or(true, |d| d.is_finite())
        && tangent.magnitude.value().map_or(true, f64::is_finite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use duct_math::DVec3;

    fn full_point(p: DVec3) -> SplinePoint {
        SplinePoint::with_tangents(p, DVec3::X, 1.0, DVec3::Y, 2.0)
    }

    #[test]
    fn test_from_points_drops_outer_tangents() {
        let spline = Spline::from_points(vec![
            full_point(DVec3::ZERO),
            full_point(DVec3::X),
            full_point(DVec3::Y),
        ]);
        assert!(spline[0].before.is_unset());
        assert!(!spline[0].after.is_unset());
        assert!(!spline[1].before.is_unset());
        assert!(spline[2].after.is_unset());
        spline.validate().unwrap();
    }

    #[test]
    fn test_push_keeps_invariant() {
        let mut spline = Spline::new();
        spline.push(full_point(DVec3::ZERO));
        assert!(spline[0].before.is_unset());
        assert!(spline[0].after.is_unset());
        spline.push(full_point(DVec3::X));
        assert_eq!(spline.len(), 2);
        assert_eq!(spline.span_count(), 1);
        assert!(spline[1].after.is_unset());
        spline.validate().unwrap();
    }

    #[test]
    fn test_set_tangent_rejects_outer_sides() {
        let mut spline = Spline::from_points(vec![
            SplinePoint::new(DVec3::ZERO),
            SplinePoint::new(DVec3::X),
        ]);
        assert!(spline.set_tangent(0, Side::Before, DVec3::X, 1.0).is_err());
        assert!(spline.set_tangent(1, Side::After, DVec3::X, 1.0).is_err());
        assert!(matches!(
            spline.set_tangent(2, Side::Before, DVec3::X, 1.0),
            Err(DuctError::OutOfRange { .. })
        ));
        spline.set_tangent(0, Side::After, DVec3::X, 1.0).unwrap();
        assert_eq!(spline[0].magnitude_after(), Some(1.0));
    }

    #[test]
    fn test_pop_clears_new_last() {
        let mut spline = Spline::from_points(vec![
            full_point(DVec3::ZERO),
            full_point(DVec3::X),
            full_point(DVec3::Y),
        ]);
        spline.pop();
        assert!(spline[1].after.is_unset());
        assert_eq!(spline.held_after().magnitude, TangentValue::Constrained(2.0));
        spline.validate().unwrap();
    }

    #[test]
    fn test_push_hands_held_tangent_to_predecessor() {
        let mut spline = Spline::new();
        spline.push(full_point(DVec3::ZERO));
        assert!(spline[0].after.is_unset());
        assert_eq!(spline.held_after().direction, TangentValue::Constrained(DVec3::Y));

        spline.push(SplinePoint::new(DVec3::X));
        assert_eq!(spline[0].after, Tangent::constrained(DVec3::Y, 2.0));
        assert!(spline.held_after().is_unset());
        spline.validate().unwrap();
    }

    #[test]
    fn test_pop_undoes_push() {
        let mut spline = Spline::from_points(vec![full_point(DVec3::ZERO), full_point(DVec3::X)]);
        let before = spline.clone();
        let pushed = full_point(DVec3::Y);
        spline.push(pushed.clone());
        assert_eq!(spline.pop(), Some(pushed));
        assert_eq!(spline.points(), before.points());
        assert_eq!(spline.held_after(), before.held_after());
    }

    #[test]
    fn test_free_tangents_releases_held() {
        let mut spline = Spline::from_points(vec![full_point(DVec3::ZERO), full_point(DVec3::X)]);
        spline.free_tangents(1).unwrap();
        assert!(spline.held_after().is_unset());
    }

    #[test]
    fn test_transform_moves_positions_and_turns_directions() {
        let mut spline = Spline::from_points(vec![
            full_point(DVec3::ZERO),
            full_point(DVec3::new(1.0, 0.0, 0.0)),
        ]);
        let rot = Transform::from_axis_angle(DVec3::Z, std::f64::consts::FRAC_PI_2)
            .then(&Transform::from_translation(DVec3::new(0.0, 0.0, 5.0)));
        spline.transform(&rot);
        assert!((spline[1].position - DVec3::new(0.0, 1.0, 5.0)).length() < 1e-10);
        let d = spline[0].direction_after().unwrap();
        assert!((d - DVec3::new(-1.0, 0.0, 0.0)).length() < 1e-10);
        assert_eq!(spline[0].magnitude_after(), Some(2.0));
    }

    #[test]
    fn test_bounding_box_covers_handles() {
        let spline = Spline::from_points(vec![
            SplinePoint::with_tangents(DVec3::ZERO, DVec3::X, 1.0, DVec3::Z, 4.0),
            SplinePoint::with_tangents(DVec3::X, DVec3::X, 1.0, DVec3::X, 1.0),
        ]);
        let aabb = spline.bounding_box().unwrap();
        assert_eq!(aabb.min, DVec3::ZERO);
        assert_eq!(aabb.max, DVec3::new(1.0, 0.0, 4.0));
        assert!(Spline::new().bounding_box().is_none());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let spline = Spline::from_points(vec![
            SplinePoint::new(DVec3::new(f64::NAN, 0.0, 0.0)),
            SplinePoint::new(DVec3::X),
        ]);
        assert!(matches!(spline.validate(), Err(DuctError::Geometry(_))));
    }
}
