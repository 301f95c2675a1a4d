//! Curve reversal.

use std::mem;

use duct_core::{DuctError, Result};
use tracing::debug;

use super::{Spline, SplinePoint, Tangent};

impl Spline {
    /// Reverse the direction of travel of the whole curve.
    ///
    /// Knot order is mirrored; each knot's incoming tangent becomes the
    /// negated outgoing tangent and vice versa. Magnitudes and constraint
    /// state move with their tangent. Applying this twice restores the curve.
    /// A [held](Self::held_after) outgoing tangent would point before the new
    /// first knot and is dropped.
    pub fn reverse(&mut self) {
        self.points.reverse();
        self.points.iter_mut().for_each(flip_tangents);
        self.clear_outer_tangents();
        debug!(knots = self.len(), "reversed curve");
    }

    /// Reverse knots `start..=end` in place.
    ///
    /// Knots outside the range are untouched, including the tangents of the
    /// knots on either side of it, so the curve may lose tangent continuity
    /// at the splice. Tangents that end up pointing outside the curve are
    /// dropped. When the range reaches the last knot, its held outgoing
    /// tangent moves with it and becomes an incoming tangent.
    pub fn reverse_range(&mut self, start: usize, end: usize) -> Result<()> {
        self.check_index(end)?;
        if start > end {
            return Err(DuctError::out_of_range("reversal start", start, end + 1));
        }
        let reaches_end = end + 1 == self.len();
        if reaches_end {
            self.points[end].after = mem::take(&mut self.held_after);
        }
        let range = &mut self.points[start..=end];
        range.reverse();
        range.iter_mut().for_each(flip_tangents);
        if reaches_end {
            self.clear_outer_tangents();
        } else {
            self.points[0].before = Tangent::default();
        }
        debug!(start, end, "reversed curve range");
        Ok(())
    }
}

fn flip_tangents(point: &mut SplinePoint) {
    let before = point.before.reversed();
    point.before = point.after.reversed();
    point.after = before;
}
