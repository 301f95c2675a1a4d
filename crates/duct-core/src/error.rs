use std::fmt;

use thiserror::Error;

/// Which tangent of a knot an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    /// Incoming tangent, towards the previous knot.
    Before,
    /// Outgoing tangent, towards the next knot.
    After,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Before => f.write_str("before"),
            Side::After => f.write_str("after"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DuctError {
    #[error("Index {index} out of range for {what} (len {len})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Unresolved {side} tangent at knot {knot}")]
    UnresolvedTangent { knot: usize, side: Side },

    /// `record` is the 1-based curve record, 0 for the file header.
    #[error("Format error in record {record} (line {line}): {message}")]
    Format {
        record: usize,
        line: usize,
        message: String,
    },

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl DuctError {
    pub fn out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        Self::OutOfRange { what, index, len }
    }

    pub fn format(record: usize, line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            record,
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DuctError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_names_record() {
        let err = DuctError::format(3, 17, "expected 4 fields");
        assert_eq!(
            err.to_string(),
            "Format error in record 3 (line 17): expected 4 fields"
        );
    }

    #[test]
    fn test_unresolved_display() {
        let err = DuctError::UnresolvedTangent {
            knot: 2,
            side: Side::After,
        };
        assert_eq!(err.to_string(), "Unresolved after tangent at knot 2");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: DuctError = io.into();
        assert!(matches!(err, DuctError::Io(_)));
    }
}
