//! Package body sizing from footprint drawing geometry.
//!
//! The pipeline runs in four stages, each returning a fresh value:
//!
//! 1. [`classifier`] — split primitives into closed regions and open line work
//! 2. [`merger`] — chain open line work into closed rings where possible
//! 3. [`assigner`] — pair regions with the pads they trace
//! 4. [`selector`] — drop pad tracings and isolated circles, pick the envelope
//!
//! # Example
//!
//! ```
//! use footprint_package_sizer::footprint::{DrawingPrimitive, Footprint};
//! use footprint_package_sizer::geometry::Point;
//! use footprint_package_sizer::sizing::estimate_footprint_size;
//!
//! let mut fp = Footprint::new("BODY");
//! let corners = [(0.0, 0.0), (3.0, 0.0), (3.0, 1.5), (0.0, 1.5)];
//! for i in 0..4 {
//!     let (a, b) = (corners[i], corners[(i + 1) % 4]);
//!     fp.add_drawing(DrawingPrimitive::segment(Point::new(a.0, a.1), Point::new(b.0, b.1)));
//! }
//!
//! let estimate = estimate_footprint_size(&fp).unwrap();
//! assert!((estimate.size.length - 3.0).abs() < 1e-9);
//! assert!((estimate.size.width - 1.5).abs() < 1e-9);
//! ```

pub mod assigner;
pub mod classifier;
pub mod merger;
pub mod region;
pub mod selector;

use serde::{Deserialize, Serialize};

use crate::error::SizingError;
use crate::footprint::Footprint;

pub use assigner::{assign_pads, PadAssignment, PadClaim};
pub use classifier::{classify, Classification};
pub use merger::{merge, MergeOutcome};
pub use region::{ClosedRegion, RegionId, RegionOrigin, RegionPool, ShapeClass};
pub use selector::{cleanup, select_boundary, Boundary, BoundarySource, Cleanup};

/// Relative area deviation below which a polygon counts as a rectangle.
pub const RECTANGLE_TOLERANCE: f64 = 0.01;

/// Relative length change on closing below which a chain counts as closed.
pub const CLOSURE_TOLERANCE: f64 = 0.01;

/// Share of the overall envelope the largest region must cover to define
/// the package boundary.
pub const BOUNDARY_COVERAGE: f64 = 0.8;

/// Body size of a package, longest side first.
///
/// Serialised as a two-element `[length, width]` array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct PackageSize {
    /// Longer side (mm).
    pub length: f64,
    /// Shorter side (mm).
    pub width: f64,
}

impl PackageSize {
    /// Creates a size from two side lengths in any order.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            length: a.max(b),
            width: a.min(b),
        }
    }

    /// Returns `true` if both sides are zero (no size known).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.length == 0.0 && self.width == 0.0
    }
}

impl From<[f64; 2]> for PackageSize {
    fn from([a, b]: [f64; 2]) -> Self {
        Self::new(a, b)
    }
}

impl From<PackageSize> for [f64; 2] {
    fn from(s: PackageSize) -> Self {
        [s.length, s.width]
    }
}

/// Geometry-derived size of one footprint, with the intermediate results
/// useful for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeEstimate {
    /// Body size.
    pub size: PackageSize,
    /// Which envelope produced the size.
    pub source: BoundarySource,
    /// Pad claims made by closed regions.
    pub assignment: PadAssignment,
    /// Regions removed before boundary selection.
    pub removed_regions: Vec<RegionId>,
    /// Number of regions the boundary was chosen from.
    pub body_regions: usize,
    /// Number of open pieces left after merging.
    pub open_pieces: usize,
}

/// Estimates the package body size of a footprint from its drawings and pads.
///
/// # Errors
///
/// Returns an error if a drawing or contact has non-finite coordinates, or
/// an arc sweeps more than a full turn.
pub fn estimate_footprint_size(footprint: &Footprint) -> Result<SizeEstimate, SizingError> {
    if let Some(index) = footprint.contacts.iter().position(|c| !c.is_finite()) {
        return Err(SizingError::NonFiniteContact { index });
    }

    let classification = classify(&footprint.drawings)?;
    let merged = merge(classification);
    let assignment = assign_pads(&merged.regions, &footprint.contacts);
    let cleaned = cleanup(&merged.regions, &assignment, &merged.open);
    let boundary = select_boundary(&cleaned.regions, &merged.open);

    tracing::debug!(
        package = %footprint.package,
        length = boundary.size.length,
        width = boundary.size.width,
        source = ?boundary.source,
        "Estimated footprint size"
    );

    let mut removed_regions = cleaned.pad_tracings;
    removed_regions.extend(cleaned.isolated_circles);

    Ok(SizeEstimate {
        size: boundary.size,
        source: boundary.source,
        assignment,
        removed_regions,
        body_regions: cleaned.regions.len(),
        open_pieces: merged.open.len(),
    })
}
