//! Error types for footprint-package-sizer.
//!
//! Soft outcomes ("no match", "score below threshold") are not errors; they
//! are carried as diagnostics in the batch report. The types here cover
//! failures that stop a single unit of work: loading the configuration,
//! decoding one footprint, or sizing one footprint.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors decoding footprint input documents.
#[derive(Error, Debug)]
pub enum InputError {
    /// The input file could not be read.
    #[error("failed to read footprint document: {path}")]
    ReadError {
        /// Path to the document.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON.
    #[error("malformed footprint document: {source_name}")]
    Malformed {
        /// Document name (usually its path).
        source_name: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The document has no footprint list.
    #[error("no footprint list in document: {source_name}")]
    MissingFootprints {
        /// Document name (usually its path).
        source_name: String,
    },

    /// A single footprint could not be decoded (e.g. unknown primitive type).
    #[error("invalid footprint #{index} ({package}) in {source_name}: {source}")]
    InvalidFootprint {
        /// Document name (usually its path).
        source_name: String,
        /// Position of the footprint in the document.
        index: usize,
        /// Package label, empty when the entry has none.
        package: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that prevent sizing a single footprint.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SizingError {
    /// A drawing primitive carries NaN or infinite values.
    #[error("non-finite coordinates in {kind} drawing #{index}")]
    NonFiniteDrawing {
        /// Primitive kind name.
        kind: &'static str,
        /// Position of the primitive in the footprint.
        index: usize,
    },

    /// An arc sweeps more than a full turn.
    #[error("arc drawing #{index} sweeps {sweep} degrees")]
    ArcSweepOutOfRange {
        /// Position of the primitive in the footprint.
        index: usize,
        /// The offending sweep angle.
        sweep: f64,
    },

    /// A contact carries NaN or infinite values.
    #[error("non-finite coordinates in contact #{index}")]
    NonFiniteContact {
        /// Position of the contact in the footprint.
        index: usize,
    },
}
