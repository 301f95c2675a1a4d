//! Reading and writing picture files on disk.

use std::fs;
use std::path::Path;

use duct_core::{DuctError, Result};
use duct_geometry::Spline;
use tracing::{debug, warn};

use crate::parser::parse_picture;
use crate::writer::format_picture;

/// Read every curve in the picture file at `path`.
///
/// The file is read in one go and closed before parsing, so a format error
/// never leaves it open. No spline is returned unless the whole file parses.
/// Content that is not UTF-8 text is a format error like any other bad
/// content; only failing to read the file is an I/O error.
pub fn read_picture_file(path: impl AsRef<Path>) -> Result<Vec<Spline>> {
    let path = path.as_ref();
    let result = decode(fs::read(path)?).and_then(|text| parse_picture(&text));
    match result {
        Ok(curves) => {
            debug!(path = %path.display(), curves = curves.len(), "read picture file");
            Ok(curves)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "rejected picture file");
            Err(err)
        }
    }
}

/// Picture text from raw file bytes; text that is not UTF-8 is a format error
/// on the line holding the first bad byte.
fn decode(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|err| {
        let valid = &err.as_bytes()[..err.utf8_error().valid_up_to()];
        let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
        DuctError::format(0, line, "file is not valid UTF-8 text")
    })
}

/// Write `spline` as a single-curve picture file.
pub fn write_picture_file(spline: &Spline, path: impl AsRef<Path>) -> Result<()> {
    write_picture_file_all(std::slice::from_ref(spline), path)
}

/// Write `splines` as one picture file, one curve record each.
pub fn write_picture_file_all(splines: &[Spline], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, format_picture(splines))?;
    debug!(path = %path.display(), curves = splines.len(), "wrote picture file");
    Ok(())
}

/// Picture file access as associated functions of the curve type.
pub trait PictureFile: Sized {
    fn read_from_picture_file(path: impl AsRef<Path>) -> Result<Vec<Self>>;

    fn write_to_picture_file(&self, path: impl AsRef<Path>) -> Result<()>;
}

impl PictureFile for Spline {
    fn read_from_picture_file(path: impl AsRef<Path>) -> Result<Vec<Self>> {
        read_picture_file(path)
    }

    fn write_to_picture_file(&self, path: impl AsRef<Path>) -> Result<()> {
        write_picture_file(self, path)
    }
}
