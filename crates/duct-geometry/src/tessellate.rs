//! Tessellation of curves and splines into polylines.

use duct_core::Result;
use duct_math::Point3;

use crate::curve::Curve;
use crate::spline::Spline;

/// Convert a curve to a polyline using adaptive subdivision.
///
/// Segments are split while the curve midpoint deviates from the chord
/// midpoint by more than `tolerance`.
pub fn curve_to_polyline(curve: &dyn Curve, tolerance: f64) -> Vec<Point3> {
    let (t_min, t_max) = curve.domain();
    let mut points = vec![curve.point_at(t_min)];
    subdivide_curve(curve, t_min, t_max, tolerance, &mut points, 0);
    points
}

/// Polyline through every span of `spline`, sharing the knot between spans.
///
/// Fails if any span still has an unresolved tangent.
pub fn spline_to_polyline(spline: &Spline, tolerance: f64) -> Result<Vec<Point3>> {
    let mut points: Vec<Point3> = spline.first().map(|p| p.position).into_iter().collect();
    for bezier in spline.beziers()? {
        let span = curve_to_polyline(&bezier, tolerance);
        points.extend(span.into_iter().skip(1));
    }
    Ok(points)
}

/// Maximum recursion depth for adaptive subdivision.
const MAX_DEPTH: u32 = 12;

/// Depth before which a segment is always split; a cubic can cross its own
/// chord midpoint.
const MIN_DEPTH: u32 = 2;

fn subdivide_curve(
    curve: &dyn Curve,
    t0: f64,
    t1: f64,
    tolerance: f64,
    points: &mut Vec<Point3>,
    depth: u32,
) {
    if depth >= MAX_DEPTH {
        points.push(curve.point_at(t1));
        return;
    }

    let t_mid = (t0 + t1) * 0.5;
    let p0 = curve.point_at(t0);
    let p1 = curve.point_at(t1);
    let p_mid = curve.point_at(t_mid);

    let chord_mid = (p0 + p1) * 0.5;
    let deviation = (p_mid - chord_mid).length();

    if depth < MIN_DEPTH || deviation > tolerance {
        subdivide_curve(curve, t0, t_mid, tolerance, points, depth + 1);
        subdivide_curve(curve, t_mid, t1, tolerance, points, depth + 1);
    } else {
        points.push(p1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CubicBezier, SplinePoint};
    use duct_math::DVec3;

    #[test]
    fn test_straight_bezier_is_coarse() {
        let line = CubicBezier::new(
            DVec3::ZERO,
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(3.0, 0.0, 0.0),
        );
        let pts = curve_to_polyline(&line, 1e-6);
        assert_eq!(pts.len(), 5);
        assert!((pts[4] - line.end_point).length() < 1e-12);
    }

    #[test]
    fn test_curved_bezier_refines() {
        let arc = CubicBezier::new(
            DVec3::ZERO,
            DVec3::new(0.0, 5.0, 0.0),
            DVec3::new(5.0, 5.0, 0.0),
            DVec3::new(5.0, 0.0, 0.0),
        );
        let coarse = curve_to_polyline(&arc, 0.5);
        let fine = curve_to_polyline(&arc, 0.001);
        assert!(fine.len() > coarse.len());
    }

    #[test]
    fn test_spline_polyline_passes_through_knots() {
        let mut spline: Spline = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(10.0, 5.0, 2.0),
            DVec3::new(20.0, 9.0, 5.0),
        ]
        .into_iter()
        .map(SplinePoint::new)
        .collect();
        assert!(spline_to_polyline(&spline, 0.01).is_err());

        spline.free_curve_directions().unwrap();
        spline.free_curve_magnitudes().unwrap();
        let pts = spline_to_polyline(&spline, 0.01).unwrap();
        for knot in &spline {
            assert!(pts.iter().any(|p| (*p - knot.position).length() < 1e-9));
        }
        assert!((pts[pts.len() - 1] - spline[2].position).length() < 1e-9);
    }
}
