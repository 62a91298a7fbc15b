//! Footprint input model.
//!
//! A [`Footprint`] is a placed component's drawing geometry plus its pad set,
//! as produced by the upstream board-data normaliser. The sizing pipeline
//! only reads it.
//!
//! # Document Format
//!
//! ```text
//! {
//!   "footprints": [
//!     {
//!       "package": "SOT-23",
//!       "value": "BC847",
//!       "drawings": [{"type": "segment", "start": [0, 0], "end": [1, 0]}, ...],
//!       "contacts": [{"type": "SMD", "center": [0, 0], "size": [0.6, 0.7]}, ...]
//!     }
//!   ]
//! }
//! ```
//!
//! A bare array of footprints is accepted too.

pub mod primitives;

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use primitives::{ContactItem, ContactKind, ContactSize, DrawingPrimitive};

use crate::error::InputError;
use crate::geometry::Point;

/// A placed component footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    /// Free-text package label (e.g. "SOT-23", "C0603").
    #[serde(default)]
    pub package: String,

    /// Component value label; sometimes carries package information.
    #[serde(default, alias = "value_name")]
    pub value: String,

    /// Placement rotation in degrees.
    #[serde(default)]
    pub orientation: f64,

    /// Placement position on the board.
    #[serde(default)]
    pub position: Point,

    /// Board layer index the component sits on.
    #[serde(default)]
    pub layer: i32,

    /// Drawing primitives, in source order.
    #[serde(default)]
    pub drawings: Vec<DrawingPrimitive>,

    /// Pads, in source order.
    #[serde(default)]
    pub contacts: Vec<ContactItem>,
}

impl Footprint {
    /// Creates an empty footprint with the given package label.
    #[must_use]
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            value: String::new(),
            orientation: 0.0,
            position: Point::default(),
            layer: 0,
            drawings: Vec::new(),
            contacts: Vec::new(),
        }
    }

    /// Sets the value label.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Adds a drawing primitive.
    pub fn add_drawing(&mut self, drawing: DrawingPrimitive) {
        self.drawings.push(drawing);
    }

    /// Adds a contact.
    pub fn add_contact(&mut self, contact: ContactItem) {
        self.contacts.push(contact);
    }
}

/// Outcome of decoding a footprint document: every footprint that decoded,
/// plus one error per footprint that did not.
#[derive(Debug, Default)]
pub struct FootprintDocument {
    /// Successfully decoded footprints, in document order.
    pub footprints: Vec<Footprint>,
    /// Per-footprint decoding failures.
    pub rejected: Vec<InputError>,
}

/// Decodes a footprint document.
///
/// Each footprint is decoded on its own so that an unrecognised primitive
/// only costs that footprint.
///
/// # Errors
///
/// Returns an error if the document itself is not valid JSON or has neither
/// a `footprints` array nor a top-level array.
pub fn parse_document(source: &str, text: &str) -> Result<FootprintDocument, InputError> {
    let root: Value = serde_json::from_str(text).map_err(|e| InputError::Malformed {
        source_name: source.to_string(),
        source: e,
    })?;

    let entries = match root {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("footprints") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(InputError::MissingFootprints {
                    source_name: source.to_string(),
                })
            }
        },
        _ => {
            return Err(InputError::MissingFootprints {
                source_name: source.to_string(),
            })
        }
    };

    let mut document = FootprintDocument::default();
    for (index, entry) in entries.into_iter().enumerate() {
        let package = entry
            .get("package")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        match serde_json::from_value::<Footprint>(entry) {
            Ok(fp) => document.footprints.push(fp),
            Err(e) => {
                tracing::warn!(source, index, package = %package, error = %e, "Skipping undecodable footprint");
                document.rejected.push(InputError::InvalidFootprint {
                    source_name: source.to_string(),
                    index,
                    package,
                    source: e,
                });
            }
        }
    }
    Ok(document)
}

/// Reads and decodes a footprint document from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a footprint
/// document.
pub fn read_document(path: &Path) -> Result<FootprintDocument, InputError> {
    let text = std::fs::read_to_string(path).map_err(|e| InputError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_document(&path.display().to_string(), &text)
}
