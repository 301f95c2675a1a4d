//! Spline knots and their tangent state.

use duct_core::{DuctError, Result, Side};
use duct_math::{EqualsToPlaces, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// State of one tangent component (a direction or a magnitude).
///
/// `Unset` and `Faired` are both free: a fairing pass may write them.
/// `Constrained` values were supplied by a caller, read from a file, or
/// produced by inverse editing, and fairing never overwrites them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum TangentValue<T> {
    #[default]
    Unset,
    Faired(T),
    Constrained(T),
}

impl<T: Copy> TangentValue<T> {
    /// The resolved value, if any.
    pub fn value(&self) -> Option<T> {
        match *self {
            TangentValue::Unset => None,
            TangentValue::Faired(v) | TangentValue::Constrained(v) => Some(v),
        }
    }

    pub fn is_free(&self) -> bool {
        !matches!(self, TangentValue::Constrained(_))
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, TangentValue::Unset)
    }

    /// Same state, value mapped through `f`.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> TangentValue<U> {
        match self {
            TangentValue::Unset => TangentValue::Unset,
            TangentValue::Faired(v) => TangentValue::Faired(f(v)),
            TangentValue::Constrained(v) => TangentValue::Constrained(f(v)),
        }
    }

    /// Replace a free value with a faired one; constrained values win.
    pub(crate) fn fair(&mut self, value: T) {
        if self.is_free() {
            *self = TangentValue::Faired(value);
        }
    }
}

/// One side of a knot: direction and magnitude are tracked separately so the
/// direction and magnitude fairing passes can run independently.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tangent {
    pub direction: TangentValue<Vector3>,
    pub magnitude: TangentValue<f64>,
}

impl Tangent {
    pub fn constrained(direction: Vector3, magnitude: f64) -> Self {
        Self {
            direction: TangentValue::Constrained(direction),
            magnitude: TangentValue::Constrained(magnitude),
        }
    }

    /// `direction * magnitude`, when both are resolved.
    pub fn vector(&self) -> Option<Vector3> {
        Some(self.direction.value()? * self.magnitude.value()?)
    }

    pub fn is_unset(&self) -> bool {
        !self.direction.is_resolved() && !self.magnitude.is_resolved()
    }

    /// Tangent for the opposite travel direction: direction negated, magnitude kept.
    pub(crate) fn reversed(self) -> Self {
        Self {
            direction: self.direction.map(|d| -d),
            magnitude: self.magnitude,
        }
    }

    /// Split `handle` into a unit direction and a length, both constrained.
    ///
    /// A zero-length handle has no direction of its own and is rejected.
    pub fn from_handle(handle: Vector3) -> Result<Self> {
        let direction = handle
            .try_normalize()
            .ok_or_else(|| DuctError::Geometry("zero-length tangent handle".into()))?;
        Ok(Self::constrained(direction, handle.length()))
    }

    /// Like [`from_handle`](Self::from_handle), but a zero-length handle
    /// keeps `fallback` as direction with magnitude 0.
    pub(crate) fn solve(handle: Vector3, fallback: Vector3) -> Self {
        Self::from_handle(handle).unwrap_or(Self::constrained(fallback, 0.0))
    }

    fn equals_to_places(&self, other: &Self, places: u32) -> bool {
        self.direction.value().equals_to_places(&other.direction.value(), places)
            && self.magnitude.value().equals_to_places(&other.magnitude.value(), places)
    }
}

/// A knot of a [`Spline`](crate::Spline): a position with optional incoming
/// and outgoing tangents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplinePoint {
    pub position: Point3,
    pub before: Tangent,
    pub after: Tangent,
}

impl SplinePoint {
    /// A knot with both tangents left free.
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            before: Tangent::default(),
            after: Tangent::default(),
        }
    }

    /// A knot with both tangents constrained.
    pub fn with_tangents(
        position: Point3,
        direction_before: Vector3,
        magnitude_before: f64,
        direction_after: Vector3,
        magnitude_after: f64,
    ) -> Self {
        Self {
            position,
            before: Tangent::constrained(direction_before, magnitude_before),
            after: Tangent::constrained(direction_after, magnitude_after),
        }
    }

    /// A knot whose tangents are given by absolute Bezier handle positions.
    ///
    /// `before_control` sits behind the knot, `after_control` ahead of it.
    /// A handle on top of the knot gives no direction and is a geometry error.
    pub fn from_control_points(
        position: Point3,
        before_control: Option<Point3>,
        after_control: Option<Point3>,
    ) -> Result<Self> {
        let mut point = Self::new(position);
        if let Some(c) = before_control {
            point.before = Tangent::from_handle(position - c)?;
        }
        if let Some(c) = after_control {
            point.after = Tangent::from_handle(c - position)?;
        }
        Ok(point)
    }

    pub fn tangent(&self, side: Side) -> &Tangent {
        match side {
            Side::Before => &self.before,
            Side::After => &self.after,
        }
    }

    pub(crate) fn tangent_mut(&mut self, side: Side) -> &mut Tangent {
        match side {
            Side::Before => &mut self.before,
            Side::After => &mut self.after,
        }
    }

    pub fn direction_before(&self) -> Option<Vector3> {
        self.before.direction.value()
    }

    pub fn magnitude_before(&self) -> Option<f64> {
        self.before.magnitude.value()
    }

    pub fn direction_after(&self) -> Option<Vector3> {
        self.after.direction.value()
    }

    pub fn magnitude_after(&self) -> Option<f64> {
        self.after.magnitude.value()
    }

    /// Constrain the incoming tangent.
    pub fn set_tangent_before(&mut self, direction: Vector3, magnitude: f64) {
        self.before = Tangent::constrained(direction, magnitude);
    }

    /// Constrain the outgoing tangent.
    pub fn set_tangent_after(&mut self, direction: Vector3, magnitude: f64) {
        self.after = Tangent::constrained(direction, magnitude);
    }

    /// Release both tangents back to fairing.
    pub fn free_tangents(&mut self) {
        self.before = Tangent::default();
        self.after = Tangent::default();
    }

    /// Tolerant comparison of position and every present tangent component.
    pub fn equals_to_places(&self, other: &Self, places: u32) -> bool {
        self.position.equals_to_places(&other.position, places)
            && self.before.equals_to_places(&other.before, places)
            && self.after.equals_to_places(&other.after, places)
    }
}

impl From<Point3> for SplinePoint {
    fn from(position: Point3) -> Self {
        Self::new(position)
    }
}
