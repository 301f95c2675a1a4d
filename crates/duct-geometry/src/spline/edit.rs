//! Span queries and inverse editing of span control points.

use duct_core::{DuctError, Result, Side};
use duct_math::{Point3, Vector3};
use tracing::trace;

use super::{Spline, Tangent};
use crate::curve::{CubicBezier, Curve};

impl Spline {
    /// The Bezier form of span `span`, between knots `span` and `span + 1`.
    pub fn bezier(&self, span: usize) -> Result<CubicBezier> {
        self.check_span(span)?;
        let start = &self.points[span];
        let end = &self.points[span + 1];
        let out_handle = self.resolved_handle(span, Side::After)?;
        let in_handle = self.resolved_handle(span + 1, Side::Before)?;
        Ok(CubicBezier::new(
            start.position,
            start.position + out_handle,
            end.position - in_handle,
            end.position,
        ))
    }

    /// Every span in curve order.
    pub fn beziers(&self) -> Result<Vec<CubicBezier>> {
        (0..self.span_count()).map(|span| self.bezier(span)).collect()
    }

    /// Evaluate the curve at global parameter `t` in `[0, span_count]`.
    ///
    /// The integer part selects the span, the fraction is the span parameter.
    pub fn point_at(&self, t: f64) -> Result<Point3> {
        let spans = self.span_count();
        if spans == 0 || !(0.0..=spans as f64).contains(&t) {
            return Err(DuctError::InvalidOperation(format!(
                "parameter {t} outside [0, {spans}]"
            )));
        }
        let span = (t.floor() as usize).min(spans - 1);
        Ok(self.bezier(span)?.point_at(t - span as f64))
    }

    /// Control point `index` (0..=3) of span `span`.
    pub fn span_control_point(&self, span: usize, index: usize) -> Result<Point3> {
        self.check_span(span)?;
        check_control_index(index)?;
        self.bezier(span)?.control_point(index)
    }

    /// Move control point `index` of span `span` to `value`.
    ///
    /// Only the knot data behind that control point changes; the other three
    /// control points of the span keep their positions. Moving an end point
    /// (index 0 or 3) drags the knot and re-solves its tangent so the adjacent
    /// handle stays put. Moving a handle (index 1 or 2) re-solves the tangent.
    /// The solved tangent is constrained.
    pub fn set_span_control_point(&mut self, value: Point3, span: usize, index: usize) -> Result<()> {
        self.check_span(span)?;
        check_control_index(index)?;
        let bezier = self.bezier(span)?;

        let (knot, side) = match index {
            0 | 1 => (span, Side::After),
            _ => (span + 1, Side::Before),
        };
        let (position, handle) = match index {
            0 => (value, bezier.start_control_point - value),
            1 => (bezier.start_point, value - bezier.start_point),
            2 => (bezier.end_point, bezier.end_point - value),
            _ => (value, value - bezier.end_control_point),
        };

        let point = &mut self.points[knot];
        let fallback = point
            .tangent(side)
            .direction
            .value()
            .ok_or(DuctError::UnresolvedTangent { knot, side })?;
        point.position = position;
        *point.tangent_mut(side) = Tangent::solve(handle, fallback);
        trace!(span, index, knot, "moved span control point");
        Ok(())
    }

    /// `direction * magnitude` on `side` of knot `index`, or an unresolved error.
    fn resolved_handle(&self, index: usize, side: Side) -> Result<Vector3> {
        self.points[index]
            .tangent(side)
            .vector()
            .ok_or(DuctError::UnresolvedTangent { knot: index, side })
    }
}

fn check_control_index(index: usize) -> Result<()> {
    if index < 4 {
        Ok(())
    } else {
        Err(DuctError::out_of_range("span control point", index, 4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SplinePoint, TangentValue};
    use duct_math::{DVec3, EqualsToPlaces};

    fn faired() -> Spline {
        let mut spline: Spline = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(10.0, 5.0, 2.0),
            DVec3::new(20.0, 9.0, 5.0),
        ]
        .into_iter()
        .map(SplinePoint::new)
        .collect();
        spline.free_curve_directions().unwrap();
        spline.free_curve_magnitudes().unwrap();
        spline
    }

    #[test]
    fn test_bezier_from_control_points() {
        let start = DVec3::ZERO;
        let start_control = DVec3::new(1.0, 2.0, 3.0);
        let end = DVec3::new(4.0, 5.0, 6.0);
        let end_control = DVec3::new(3.0, 3.0, 4.0);

        let mut spline = Spline::new();
        spline.push(SplinePoint::from_control_points(start, None, Some(start_control)).unwrap());
        spline.push(SplinePoint::from_control_points(end, Some(end_control), None).unwrap());

        let bezier = spline.bezier(0).unwrap();
        assert!(bezier.start_point.equals_to_places(&start, 10));
        assert!(bezier.start_control_point.equals_to_places(&start_control, 10));
        assert!(bezier.end_control_point.equals_to_places(&end_control, 10));
        assert!(bezier.end_point.equals_to_places(&end, 10));
        assert!(spline
            .span_control_point(0, 1)
            .unwrap()
            .equals_to_places(&start_control, 10));
    }

    #[test]
    fn test_appended_handles_survive_end_fairing() {
        let start_control = DVec3::new(1.0, 2.0, 3.0);
        let end_control = DVec3::new(3.0, 3.0, 4.0);

        let mut spline = Spline::new();
        spline
            .add_point_to_end(
                SplinePoint::from_control_points(DVec3::ZERO, None, Some(start_control)).unwrap(),
                true,
            )
            .unwrap();
        spline
            .add_point_to_end(
                SplinePoint::from_control_points(DVec3::new(4.0, 5.0, 6.0), Some(end_control), None)
                    .unwrap(),
                true,
            )
            .unwrap();

        assert!(matches!(spline[0].after.direction, TangentValue::Constrained(_)));
        assert!(spline
            .span_control_point(0, 1)
            .unwrap()
            .equals_to_places(&start_control, 10));
        assert!(spline
            .span_control_point(0, 2)
            .unwrap()
            .equals_to_places(&end_control, 10));
    }

    #[test]
    fn test_span_index_out_of_range() {
        let spline = faired();
        assert!(matches!(spline.bezier(2), Err(DuctError::OutOfRange { index: 2, len: 2, .. })));
        assert!(matches!(
            spline.span_control_point(0, 4),
            Err(DuctError::OutOfRange { index: 4, .. })
        ));
    }

    #[test]
    fn test_unfaired_span_is_unresolved() {
        let spline: Spline = [DVec3::ZERO, DVec3::X].into_iter().map(SplinePoint::new).collect();
        assert!(matches!(
            spline.bezier(0),
            Err(DuctError::UnresolvedTangent { knot: 0, side: Side::After })
        ));
    }

    #[test]
    fn test_handles_match_tangents() {
        let spline = faired();
        let expected_start = spline[0].position
            + spline[0].direction_after().unwrap() * spline[0].magnitude_after().unwrap();
        let expected_end = spline[1].position
            - spline[1].direction_before().unwrap() * spline[1].magnitude_before().unwrap();
        assert_eq!(spline.span_control_point(0, 1).unwrap(), expected_start);
        assert_eq!(spline.span_control_point(0, 2).unwrap(), expected_end);
    }

    #[test]
    fn test_set_each_control_point_is_local() {
        let target = DVec3::new(9.0, 9.0, 0.0);
        for index in 0..4 {
            let original = faired().bezier(0).unwrap();
            let mut edited = faired();
            edited.set_span_control_point(target, 0, index).unwrap();
            let after = edited.bezier(0).unwrap();
            for other in 0..4 {
                let got = after.control_point(other).unwrap();
                if other == index {
                    assert!(got.equals_to_places(&target, 9), "index {index}");
                } else {
                    let want = original.control_point(other).unwrap();
                    assert!(got.equals_to_places(&want, 9), "index {index} moved {other}");
                }
            }
        }
    }

    #[test]
    fn test_edit_constrains_tangent() {
        let mut spline = faired();
        spline.set_span_control_point(DVec3::new(2.0, 2.0, 0.0), 0, 2).unwrap();
        assert!(matches!(spline[1].before.direction, TangentValue::Constrained(_)));
        assert!(matches!(spline[1].after.direction, TangentValue::Faired(_)));

        // A later fairing pass leaves the edited handle alone.
        let handle = spline.span_control_point(0, 2).unwrap();
        spline.free_curve_directions().unwrap();
        spline.free_curve_magnitudes().unwrap();
        assert!(spline.span_control_point(0, 2).unwrap().equals_to_places(&handle, 12));
    }

    #[test]
    fn test_move_end_point_onto_handle_keeps_direction() {
        let mut spline = faired();
        let handle = spline.span_control_point(0, 2).unwrap();
        let direction = spline[1].direction_before().unwrap();
        spline.set_span_control_point(handle, 0, 3).unwrap();
        assert_eq!(spline[1].magnitude_before(), Some(0.0));
        assert!(spline[1].direction_before().unwrap().equals_to_places(&direction.normalize(), 12));
    }

    #[test]
    fn test_point_at_hits_knots() {
        let spline = faired();
        for i in 0..spline.len() {
            let p = spline.point_at(i as f64).unwrap();
            assert!(p.equals_to_places(&spline[i].position, 10));
        }
        assert!(spline.point_at(2.5).is_err());
        assert!(spline.point_at(-0.1).is_err());
    }
}
