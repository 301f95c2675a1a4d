//! Picture file writer.

use std::fmt;

use duct_geometry::{Spline, Tangent};
use duct_math::Point3;

/// Picture text for `splines`, one curve record each.
pub fn format_picture(splines: &[Spline]) -> String {
    Picture(splines).to_string()
}

/// Display adapter emitting the picture text format.
///
/// Numbers use `f64`'s `Display`, which is locale independent and prints the
/// shortest text that reads back to the same value.
pub struct Picture<'a>(pub &'a [Spline]);

impl fmt::Display for Picture<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PICTURE {}", self.0.len())?;
        for spline in self.0 {
            write_curve(f, spline)?;
        }
        Ok(())
    }
}

fn write_curve(f: &mut fmt::Formatter<'_>, spline: &Spline) -> fmt::Result {
    writeln!(f, "CURVE {}", spline.len())?;
    let last = spline.len().saturating_sub(1);
    for (i, point) in spline.iter().enumerate() {
        write_point(f, point.position)?;
        if i > 0 {
            write_tangent(f, "B", &point.before)?;
        }
        if i < last {
            write_tangent(f, "A", &point.after)?;
        }
    }
    writeln!(f, "END")
}

fn write_point(f: &mut fmt::Formatter<'_>, p: Point3) -> fmt::Result {
    writeln!(f, "P {} {} {}", p.x, p.y, p.z)
}

/// Writes whichever tangent components are resolved; nothing when neither is.
fn write_tangent(f: &mut fmt::Formatter<'_>, tag: &str, tangent: &Tangent) -> fmt::Result {
    match (tangent.direction.value(), tangent.magnitude.value()) {
        (Some(d), Some(m)) => writeln!(f, "{tag} {} {} {} {m}", d.x, d.y, d.z),
        (Some(d), None) => writeln!(f, "{tag} {} {} {}", d.x, d.y, d.z),
        (None, Some(m)) => writeln!(f, "{tag}M {m}"),
        (None, None) => Ok(()),
    }
}
