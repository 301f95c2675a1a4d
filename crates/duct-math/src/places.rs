//! Equality to a number of decimal places.
//!
//! CAD data is usually compared "to 5 places" rather than with a relative
//! epsilon; `a.equals_to_places(&b, 5)` holds when every component differs by
//! less than `10^-5`.

use approx::AbsDiffEq;
use duct_core::Tolerance;

use crate::DVec3;

/// Largest absolute difference accepted at `places` decimal places.
pub fn places_epsilon(places: u32) -> f64 {
    Tolerance::from_decimal_places(places).linear
}

pub trait EqualsToPlaces {
    fn equals_to_places(&self, other: &Self, places: u32) -> bool;
}

impl EqualsToPlaces for f64 {
    fn equals_to_places(&self, other: &Self, places: u32) -> bool {
        self.abs_diff_eq(other, places_epsilon(places))
    }
}

impl EqualsToPlaces for DVec3 {
    fn equals_to_places(&self, other: &Self, places: u32) -> bool {
        let eps = places_epsilon(places);
        self.x.abs_diff_eq(&other.x, eps)
            && self.y.abs_diff_eq(&other.y, eps)
            && self.z.abs_diff_eq(&other.z, eps)
    }
}

impl<T: EqualsToPlaces> EqualsToPlaces for Option<T> {
    /// `None` only equals `None`.
    fn equals_to_places(&self, other: &Self, places: u32) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.equals_to_places(b, places),
            (None, None) => true,
            _ => false,
        }
    }
}
