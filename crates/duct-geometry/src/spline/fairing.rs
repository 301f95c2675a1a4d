//! Fairing: estimating free tangents from the knot positions.
//!
//! Directions follow the chord through the neighbouring knots, so a faired
//! curve is tangent-continuous at every interior knot. Magnitudes start from a
//! fixed fraction of the adjacent chord and shrink as the direction turns away
//! from that chord, which keeps sharp corners from overshooting.

use std::ops::Range;

use duct_core::{DuctError, Result, Side};
use duct_math::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{Spline, SplinePoint};

/// Calibration of the magnitude estimate.
///
/// For a chord `c` to the adjacent knot and an angle `phi` between the knot
/// direction and that chord:
///
/// `magnitude = chord_fraction * |c| * (1 - angle_weight * (1 - cos(phi)) / 2)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FairingConfig {
    /// Share of the chord length used when direction and chord coincide.
    pub chord_fraction: f64,
    /// How strongly turning away from the chord shortens the tangent, in `[0, 1]`.
    pub angle_weight: f64,
}

impl FairingConfig {
    pub const DEFAULT_CHORD_FRACTION: f64 = 1.0 / 3.0;
    pub const DEFAULT_ANGLE_WEIGHT: f64 = 1.0;

    pub fn validate(&self) -> Result<()> {
        if !(self.chord_fraction.is_finite() && self.chord_fraction > 0.0) {
            return Err(DuctError::InvalidOperation(format!(
                "chord fraction must be positive, got {}",
                self.chord_fraction
            )));
        }
        if !(0.0..=1.0).contains(&self.angle_weight) {
            return Err(DuctError::InvalidOperation(format!(
                "angle weight must lie in [0, 1], got {}",
                self.angle_weight
            )));
        }
        Ok(())
    }

    /// Magnitude for a tangent `direction` whose span has chord `chord`.
    pub fn magnitude(&self, direction: Vector3, chord: Vector3) -> Result<f64> {
        let length = chord.length();
        if length == 0.0 {
            return Ok(0.0);
        }
        let unit = direction
            .try_normalize()
            .ok_or_else(|| DuctError::Geometry("zero-length tangent direction".into()))?;
        let cos = unit.dot(chord / length).clamp(-1.0, 1.0);
        Ok(self.chord_fraction * length * (1.0 - self.angle_weight * (1.0 - cos) * 0.5))
    }
}

impl Default for FairingConfig {
    fn default() -> Self {
        Self {
            chord_fraction: Self::DEFAULT_CHORD_FRACTION,
            angle_weight: Self::DEFAULT_ANGLE_WEIGHT,
        }
    }
}

const SIDES: [Side; 2] = [Side::Before, Side::After];

impl Spline {
    /// Resolve every free tangent direction.
    pub fn free_curve_directions(&mut self) -> Result<()> {
        let staged = self.stage(0..self.len(), true, false)?;
        debug!(knots = self.len(), "faired curve directions");
        self.commit(staged);
        Ok(())
    }

    /// Resolve every free tangent magnitude. Directions must be resolved.
    pub fn free_curve_magnitudes(&mut self) -> Result<()> {
        let staged = self.stage(0..self.len(), false, true)?;
        debug!(knots = self.len(), "faired curve magnitudes");
        self.commit(staged);
        Ok(())
    }

    /// Resolve the free directions of knot `index` only.
    pub fn free_point_directions(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        let staged = self.stage(index..index + 1, true, false)?;
        self.commit(staged);
        Ok(())
    }

    /// Resolve the free magnitudes of knot `index` only.
    ///
    /// Running this for every knot gives the same result as
    /// [`free_curve_magnitudes`](Self::free_curve_magnitudes).
    pub fn free_point_magnitudes(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        let staged = self.stage(index..index + 1, false, true)?;
        self.commit(staged);
        Ok(())
    }

    /// Append a knot, optionally fairing the new end of the curve.
    ///
    /// With `free_end`, free tangents on the new knot and on its predecessor
    /// are resolved exactly as a full fairing pass over the longer curve
    /// would resolve them. If fairing fails the knot is not appended.
    pub fn add_point_to_end(&mut self, point: SplinePoint, free_end: bool) -> Result<()> {
        self.push(point);
        if !free_end || self.len() < 2 {
            return Ok(());
        }
        let n = self.len();
        match self.stage(n - 2..n, true, true) {
            Ok(staged) => {
                trace!(knots = n, "faired new curve end");
                self.commit(staged);
                Ok(())
            }
            Err(err) => {
                self.pop();
                Err(err)
            }
        }
    }

    /// Faired copies of the knots in `range`. Nothing is written back.
    fn stage(
        &self,
        range: Range<usize>,
        directions: bool,
        magnitudes: bool,
    ) -> Result<Vec<(usize, SplinePoint)>> {
        let mut staged = Vec::with_capacity(range.len());
        for index in range {
            let mut point = self.points[index].clone();
            for side in SIDES {
                if !self.has_side(index, side) {
                    continue;
                }
                if directions && point.tangent(side).direction.is_free() {
                    let direction = self.chord_direction(index)?;
                    point.tangent_mut(side).direction.fair(direction);
                }
                if magnitudes && point.tangent(side).magnitude.is_free() {
                    let direction = point
                        .tangent(side)
                        .direction
                        .value()
                        .ok_or(DuctError::UnresolvedTangent { knot: index, side })?;
                    let magnitude = self.fairing.magnitude(direction, self.side_chord(index, side))?;
                    point.tangent_mut(side).magnitude.fair(magnitude);
                }
            }
            staged.push((index, point));
        }
        Ok(staged)
    }

    fn commit(&mut self, staged: Vec<(usize, SplinePoint)>) {
        for (index, point) in staged {
            self.points[index] = point;
        }
    }

    /// Unit chord through the neighbours of knot `index`.
    ///
    /// Interior knots use the chord from the previous to the next knot; end
    /// knots use the chord of their single span.
    fn chord_direction(&self, index: usize) -> Result<Vector3> {
        let last = self.len() - 1;
        let (from, to) = if index == 0 {
            (0, 1)
        } else if index == last {
            (last - 1, last)
        } else {
            (index - 1, index + 1)
        };
        (self.points[to].position - self.points[from].position)
            .try_normalize()
            .ok_or_else(|| {
                DuctError::Geometry(format!("knots {from} and {to} coincide; no chord direction"))
            })
    }

    /// Chord of the span adjacent to knot `index` on `side`, in curve direction.
    fn side_chord(&self, index: usize, side: Side) -> Vector3 {
        match side {
            Side::Before => self.points[index].position - self.points[index - 1].position,
            Side::After => self.points[index + 1].position - self.points[index].position,
        }
    }
}
