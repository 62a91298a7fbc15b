//! footprint-package-sizer: package classification and body sizing for PCB footprints
//!
//! Given the footprints of a board, this library determines for each one
//! which standard package it represents and how large the package body is.
//!
//! # Architecture
//!
//! Two independent engines feed a batch report:
//!
//! - **Geometric sizing**: classify drawing primitives into closed regions and
//!   open line work, chain lines into rings, discard pad tracings and mounting
//!   holes, and measure the minimum-area oriented rectangle of the body
//! - **Package matching**: resolve free-text package labels ("C0603",
//!   "SOT23-5") against a reference table through a cascade of exact,
//!   substring and token-overlap strategies
//!
//! Database sizes take precedence; geometry fills in where the database has
//! no match or no dimensions.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading and validation
//! - [`error`] — Error types
//! - [`footprint`] — Footprint data model and input documents
//! - [`geometry`] — Planar geometry primitives and algorithms
//! - [`sizing`] — Body size estimation from drawings
//! - [`packaging`] — Package database and label matching
//! - [`report`] — Batch size report

pub mod config;
pub mod error;
pub mod footprint;
pub mod geometry;
pub mod packaging;
pub mod report;
pub mod sizing;

pub use footprint::{ContactItem, DrawingPrimitive, Footprint};
pub use packaging::{match_package, MatchResult, PackageDatabase};
pub use report::{build_report, SizeReport};
pub use sizing::{estimate_footprint_size, PackageSize, SizeEstimate};
