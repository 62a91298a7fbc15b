//! Reference package database.
//!
//! Maps accepted package names (aliases) to a packaging type and nominal body
//! dimensions. The database keeps table order, which decides ties during
//! matching.
//!
//! # Table Format
//!
//! A `;`-delimited text table with a header row of at least eight columns:
//!
//! | Column | Content |
//! |--------|---------|
//! | 0 | Comma-separated aliases |
//! | 2 | Comma-separated alternate aliases |
//! | 4 | Packaging type name (e.g. "Two-terminal packages") |
//! | 6 | Nominal length in mm (empty → 0) |
//! | 7 | Nominal width in mm (empty → 0) |
//!
//! Other columns are ignored.

use std::fmt;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::error::{DatabaseError, DatabaseResult};
use crate::sizing::PackageSize;

/// Minimum number of columns in the table header.
pub const REQUIRED_COLUMNS: usize = 8;

const ALIAS_COLUMN: usize = 0;
const ALTERNATE_ALIAS_COLUMN: usize = 2;
const PACKAGING_COLUMN: usize = 4;
const LENGTH_COLUMN: usize = 6;
const WIDTH_COLUMN: usize = 7;

/// Packaging family of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackagingType {
    /// Two-terminal packages (chip resistors, capacitors, ...).
    #[serde(rename = "Two-terminal packages")]
    TwoTerminal,
    /// Through-hole packages.
    #[serde(rename = "Through-hole packages")]
    ThroughHole,
    /// Generic surface mount.
    #[serde(rename = "Surface mount")]
    SurfaceMount,
    /// Chip carriers.
    #[serde(rename = "Chip carrier")]
    ChipCarrier,
    /// Pin grid arrays.
    #[serde(rename = "Pin grid arrays")]
    PinGridArray,
    /// Flat packages.
    #[serde(rename = "Flat packages")]
    FlatPackage,
    /// Small outline packages.
    #[serde(rename = "Small outline packages")]
    SmallOutlineIc,
    /// Chip-scale packages.
    #[serde(rename = "Chip-scale packages")]
    ChipScale,
    /// Ball grid arrays.
    #[serde(rename = "Ball grid array")]
    BallGridArray,
    /// Transistor, diode and small-pin-count IC packages.
    #[serde(rename = "Transistor, diode, small-pin-count IC packages")]
    TransistorDiodeSmallPinIc,
    /// Multi-chip packages.
    #[serde(rename = "Multi-chip packages")]
    MultiChip,
    /// Tantalum capacitors.
    #[serde(rename = "Tantalum capacitors")]
    TantalumCapacitor,
    /// Aluminium capacitors.
    #[serde(rename = "Aluminum capacitors")]
    AluminumCapacitor,
    /// Non-packaged devices.
    #[serde(rename = "Non-packaged devices")]
    NonPackaged,
    /// Anything else.
    #[serde(rename = "Others")]
    Others,
}

impl PackagingType {
    /// All packaging types, in table order.
    pub const ALL: [Self; 15] = [
        Self::TwoTerminal,
        Self::ThroughHole,
        Self::SurfaceMount,
        Self::ChipCarrier,
        Self::PinGridArray,
        Self::FlatPackage,
        Self::SmallOutlineIc,
        Self::ChipScale,
        Self::BallGridArray,
        Self::TransistorDiodeSmallPinIc,
        Self::MultiChip,
        Self::TantalumCapacitor,
        Self::AluminumCapacitor,
        Self::NonPackaged,
        Self::Others,
    ];

    /// Name as written in the database table.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TwoTerminal => "Two-terminal packages",
            Self::ThroughHole => "Through-hole packages",
            Self::SurfaceMount => "Surface mount",
            Self::ChipCarrier => "Chip carrier",
            Self::PinGridArray => "Pin grid arrays",
            Self::FlatPackage => "Flat packages",
            Self::SmallOutlineIc => "Small outline packages",
            Self::ChipScale => "Chip-scale packages",
            Self::BallGridArray => "Ball grid array",
            Self::TransistorDiodeSmallPinIc => "Transistor, diode, small-pin-count IC packages",
            Self::MultiChip => "Multi-chip packages",
            Self::TantalumCapacitor => "Tantalum capacitors",
            Self::AluminumCapacitor => "Aluminum capacitors",
            Self::NonPackaged => "Non-packaged devices",
            Self::Others => "Others",
        }
    }

    /// Parses the table name of a packaging type (exact match).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for PackagingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One database entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackageEntry {
    /// Packaging family.
    pub packaging: PackagingType,
    /// Nominal body size; zero when the table leaves it empty.
    pub size: PackageSize,
}

impl PackageEntry {
    /// Creates an entry; the sides may be given in any order.
    #[must_use]
    pub fn new(packaging: PackagingType, length: f64, width: f64) -> Self {
        Self {
            packaging,
            size: PackageSize::new(length, width),
        }
    }
}

/// Insertion-ordered alias → entry mapping, read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageDatabase {
    entries: IndexMap<String, PackageEntry>,
}

/// A freshly loaded database plus the non-fatal problems found in the table.
#[derive(Debug, Clone, Default)]
pub struct DatabaseLoad {
    /// The database.
    pub database: PackageDatabase,
    /// Skipped or conflicting rows.
    pub warnings: Vec<String>,
}

impl PackageDatabase {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an alias. The first entry for an alias wins; returns `false` if
    /// the alias was already present.
    pub fn insert(&mut self, alias: impl Into<String>, entry: PackageEntry) -> bool {
        let alias = alias.into();
        if self.entries.contains_key(&alias) {
            return false;
        }
        self.entries.insert(alias, entry);
        true
    }

    /// Looks up an alias exactly.
    #[must_use]
    pub fn get(&self, alias: &str) -> Option<&PackageEntry> {
        self.entries.get(alias)
    }

    /// Aliases and entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PackageEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no aliases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads a database table from disk, decoding it with the given encoding
    /// label (e.g. "utf-8", "windows-1252").
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the encoding is unknown,
    /// or the table is malformed.
    pub fn load(path: impl AsRef<Path>, encoding: &str) -> DatabaseResult<DatabaseLoad> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| DatabaseError::file_read(path, e))?;

        let decoder = encoding_rs::Encoding::for_label(encoding.trim().as_bytes())
            .ok_or_else(|| DatabaseError::unknown_encoding(encoding))?;
        let (text, _, had_errors) = decoder.decode(&bytes);
        if had_errors {
            tracing::warn!(path = %path.display(), encoding, "Package database contains undecodable bytes");
        }

        let load = Self::from_reader(text.as_bytes())?;
        tracing::info!(
            path = %path.display(),
            aliases = load.database.len(),
            warnings = load.warnings.len(),
            "Loaded package database"
        );
        Ok(load)
    }

    /// Parses a database table from UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the header has fewer than [`REQUIRED_COLUMNS`]
    /// columns, a row is not valid delimited text, or a dimension is not a
    /// number.
    pub fn from_reader<R: Read>(reader: R) -> DatabaseResult<DatabaseLoad> {
        let mut csv = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns = csv.headers()?.len();
        if columns < REQUIRED_COLUMNS {
            return Err(DatabaseError::TooFewColumns {
                expected: REQUIRED_COLUMNS,
                actual: columns,
            });
        }

        let mut load = DatabaseLoad::default();
        for record in csv.records() {
            let record = record?;
            let line = record.position().map_or(0, csv::Position::line);
            let cell = |i: usize| record.get(i).map_or("", str::trim);

            let aliases: Vec<&str> = cell(ALIAS_COLUMN)
                .split(',')
                .chain(cell(ALTERNATE_ALIAS_COLUMN).split(','))
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .collect();
            let packaging_name = cell(PACKAGING_COLUMN);
            let length = parse_dimension(cell(LENGTH_COLUMN), "length", line)?;
            let width = parse_dimension(cell(WIDTH_COLUMN), "width", line)?;

            let packaging = PackagingType::from_name(packaging_name);
            for alias in aliases {
                let Some(packaging) = packaging else {
                    load.warnings.push(format!(
                        "Warning: could not find {packaging_name} in PackagingType for {alias}. Skipping entry."
                    ));
                    continue;
                };
                match load.database.get(alias) {
                    None => {
                        load.database
                            .insert(alias, PackageEntry::new(packaging, length, width));
                    }
                    Some(existing) if existing.packaging != packaging => {
                        load.warnings.push(format!(
                            "Conflicting entry: {alias} : {} vs {packaging}. Keeping first one.",
                            existing.packaging
                        ));
                    }
                    Some(_) => {}
                }
            }
        }

        for warning in &load.warnings {
            tracing::warn!("{warning}");
        }
        Ok(load)
    }
}

fn parse_dimension(cell: &str, column: &'static str, line: u64) -> DatabaseResult<f64> {
    if cell.is_empty() {
        return Ok(0.0);
    }
    cell.parse().map_err(|_| DatabaseError::InvalidDimension {
        column,
        value: cell.to_string(),
        line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Name;Note;Alternative;Pins;Type;Height;Length;Width\n";

    #[test]
    fn packaging_type_names_roundtrip() {
        for t in PackagingType::ALL {
            assert_eq!(PackagingType::from_name(t.name()), Some(t));
        }
        assert_eq!(PackagingType::from_name("Teapots"), None);
    }

    #[test]
    fn parse_aliases_and_dimensions() {
        let table = format!(
            "{HEADER}201, 0201;;R0201;2;Two-terminal packages;0.3;0.3;0.6\n\
             SOT-416;;;3;Transistor, diode, small-pin-count IC packages;;1.6;\n"
        );
        let load = PackageDatabase::from_reader(table.as_bytes()).unwrap();
        assert!(load.warnings.is_empty());

        let db = load.database;
        let aliases: Vec<&str> = db.iter().map(|(a, _)| a).collect();
        assert_eq!(aliases, vec!["201", "0201", "R0201", "SOT-416"]);

        let chip = db.get("0201").unwrap();
        assert_eq!(chip.packaging, PackagingType::TwoTerminal);
        // length and width are swapped so that length >= width
        assert!((chip.size.length - 0.6).abs() < f64::EPSILON);
        assert!((chip.size.width - 0.3).abs() < f64::EPSILON);

        let sot = db.get("SOT-416").unwrap();
        assert!((sot.size.length - 1.6).abs() < f64::EPSILON);
        assert!(sot.size.width.abs() < f64::EPSILON);
    }

    #[test]
    fn conflicting_and_unknown_rows_are_warnings() {
        let table = format!(
            "{HEADER}805;;;2;Two-terminal packages;;2.0;1.25\n\
             805;;;2;Others;;1.0;1.0\n\
             XYZ;;;2;Teapots;;1.0;1.0\n"
        );
        let load = PackageDatabase::from_reader(table.as_bytes()).unwrap();
        assert_eq!(load.database.len(), 1);
        assert_eq!(load.database.get("805").unwrap().packaging, PackagingType::TwoTerminal);
        assert_eq!(load.warnings.len(), 2);
        assert!(load.warnings[0].starts_with("Conflicting entry: 805"));
        assert!(load.warnings[1].contains("Teapots"));
    }

    #[test]
    fn reject_narrow_header() {
        let err = PackageDatabase::from_reader("Name;Type\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DatabaseError::TooFewColumns { actual: 2, .. }));
    }

    #[test]
    fn reject_non_numeric_dimension() {
        let table = format!("{HEADER}805;;;2;Two-terminal packages;;long;1.25\n");
        let err = PackageDatabase::from_reader(table.as_bytes()).unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidDimension { column: "length", .. }));
    }

    #[test]
    fn first_insert_wins() {
        let mut db = PackageDatabase::new();
        assert!(db.insert("SOP", PackageEntry::new(PackagingType::SmallOutlineIc, 0.0, 0.0)));
        assert!(!db.insert("SOP", PackageEntry::new(PackagingType::Others, 0.0, 0.0)));
        assert_eq!(db.get("SOP").unwrap().packaging, PackagingType::SmallOutlineIc);
    }
}
