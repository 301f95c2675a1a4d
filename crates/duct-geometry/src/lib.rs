//! duct geometry: cubic Bezier spans and knot-based splines.

pub mod curve;
pub mod spline;
pub mod tessellate;

pub use curve::{CubicBezier, Curve};
pub use spline::{FairingConfig, Spline, SplinePoint, Tangent, TangentValue};
pub use tessellate::{curve_to_polyline, spline_to_polyline};
