//! Error types for trajectory composition.
//!
//! Every shape precondition is checked before an operation does any work, so
//! a returned error never comes with a partially built table.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main error type for composition operations.
#[derive(Error, Debug)]
pub enum ComposeError {
    /// A row or column count precondition was violated.
    #[error("Dimension mismatch in {operation}: {detail}")]
    Dimension {
        operation: &'static str,
        detail: String,
    },

    /// An index (sequence, joint, row) is out of range.
    #[error("{what} index {index} out of range (len {len})")]
    Index {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// An index list that must select something was empty.
    #[error("Empty {0} selection")]
    EmptySelection(&'static str),

    /// Configuration or argument validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The dataset has not been composed yet.
    #[error("Dataset has not been composed yet")]
    NotComposed,

    /// Text supplied for interpolation parameters could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Filesystem access failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `.npy` file could not be decoded.
    #[error("Failed to read array from {path}: {message}")]
    NpyRead { path: PathBuf, message: String },

    /// A `.npy` or `.npz` file could not be encoded.
    #[error("Failed to write array to {path}: {message}")]
    NpyWrite { path: PathBuf, message: String },
}

/// Result type alias for composition operations.
pub type Result<T> = std::result::Result<T, ComposeError>;

impl ComposeError {
    /// Create a dimension mismatch error.
    #[must_use]
    pub fn dimension(operation: &'static str, detail: impl Into<String>) -> Self {
        Self::Dimension {
            operation,
            detail: detail.into(),
        }
    }

    /// Create an out-of-range index error.
    #[must_use]
    pub const fn index(what: &'static str, index: usize, len: usize) -> Self {
        Self::Index { what, index, len }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an I/O error carrying the offending path.
    #[must_use]
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create an array decoding error.
    #[must_use]
    pub fn npy_read(path: &Path, message: impl Into<String>) -> Self {
        Self::NpyRead {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Create an array encoding error.
    #[must_use]
    pub fn npy_write(path: &Path, message: impl Into<String>) -> Self {
        Self::NpyWrite {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Whether this error reports a shape precondition violation.
    #[must_use]
    pub const fn is_dimension_error(&self) -> bool {
        matches!(self, Self::Dimension { .. })
    }

    /// Whether this error reports a bad index or index list.
    #[must_use]
    pub const fn is_index_error(&self) -> bool {
        matches!(self, Self::Index { .. } | Self::EmptySelection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ComposeError::dimension("stack_joints", "3 rows vs 5 rows");
        let msg = err.to_string();
        assert!(msg.contains("stack_joints"));
        assert!(msg.contains("3 rows vs 5 rows"));

        let err = ComposeError::index("joint", 14, 12);
        assert!(err.to_string().contains("14"));
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn test_error_predicates() {
        assert!(ComposeError::dimension("downsample", "x").is_dimension_error());
        assert!(!ComposeError::invalid_config("x").is_dimension_error());
        assert!(ComposeError::index("sequence", 3, 2).is_index_error());
        assert!(ComposeError::EmptySelection("joint").is_index_error());
        assert!(!ComposeError::NotComposed.is_index_error());
    }

    #[test]
    fn test_io_error_keeps_path() {
        let err = ComposeError::io(
            Path::new("/tmp/missing.npy"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/tmp/missing.npy"));
    }
}
