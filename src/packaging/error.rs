//! Error types for package database loading.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Errors that can occur while loading the package database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to open or read the file.
    #[error("Failed to read package database: {path}")]
    FileRead {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The encoding label is not known to the decoder.
    #[error("Unknown text encoding: {label}")]
    UnknownEncoding {
        /// The label as configured.
        label: String,
    },

    /// The header row has too few columns.
    #[error("Package database needs at least {expected} columns, got {actual}")]
    TooFewColumns {
        /// Required column count.
        expected: usize,
        /// Column count found in the header.
        actual: usize,
    },

    /// A row could not be parsed as delimited text.
    #[error("Malformed package database row")]
    Csv {
        /// Underlying CSV error.
        #[from]
        source: csv::Error,
    },

    /// A dimension cell is not a number.
    #[error("Invalid {column} '{value}' on line {line}")]
    InvalidDimension {
        /// Column name ("length" or "width").
        column: &'static str,
        /// Offending cell content.
        value: String,
        /// 1-based line number.
        line: u64,
    },
}

impl DatabaseError {
    /// Creates a file read error.
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates an unknown encoding error.
    pub fn unknown_encoding(label: impl Into<String>) -> Self {
        Self::UnknownEncoding {
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DatabaseError::TooFewColumns {
            expected: 8,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Package database needs at least 8 columns, got 3"
        );
    }

    #[test]
    fn unknown_encoding_display() {
        let err = DatabaseError::unknown_encoding("klingon");
        assert_eq!(err.to_string(), "Unknown text encoding: klingon");
    }
}
