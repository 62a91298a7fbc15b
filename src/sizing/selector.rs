//! Cleanup of non-body regions and selection of the package envelope.

use std::collections::BTreeSet;

use crate::geometry::ops::{polygons_intersect, polyline_intersects_polygon};
use crate::geometry::{convex_hull, minimum_area_rectangle, OrientedRect, Point, Polygon, Polyline};

use super::assigner::PadAssignment;
use super::region::{RegionId, RegionPool};
use super::{PackageSize, BOUNDARY_COVERAGE};

/// Regions left after cleanup, and what was removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cleanup {
    /// Regions that may describe the package body.
    pub regions: RegionPool,
    /// Regions removed as pad tracings.
    pub pad_tracings: Vec<RegionId>,
    /// Circles removed as isolated (typically mounting holes).
    pub isolated_circles: Vec<RegionId>,
}

/// Removes claimed pad tracings and isolated circles.
///
/// A circle survives if it touches the outline of any other surviving region
/// or the convex hull of the open line work. When nothing else is left to
/// compare against, circles are kept.
#[must_use]
pub fn cleanup(regions: &RegionPool, assignment: &PadAssignment, open: &[Polyline]) -> Cleanup {
    let pad_tracings: Vec<RegionId> = assignment.claims.iter().map(|c| c.region).collect();
    let survivors = regions.without(&pad_tracings.iter().copied().collect());

    let open_points: Vec<Point> = open.iter().flat_map(|l| l.points().iter().copied()).collect();
    let open_hull = Polygon::new(convex_hull(&open_points));
    let has_open = !open_hull.vertices().is_empty();

    let mut isolated_circles = Vec::new();
    for circle in survivors.iter().filter(|r| r.is_circle()) {
        let others: Vec<Polyline> = survivors
            .iter()
            .filter(|r| r.id() != circle.id())
            .map(|r| r.shape().boundary())
            .collect();
        if others.is_empty() && !has_open {
            continue;
        }

        let touches_region = others
            .iter()
            .any(|b| polyline_intersects_polygon(b, circle.shape()));
        let touches_open = has_open && polygons_intersect(&open_hull, circle.shape());
        if !touches_region && !touches_open {
            isolated_circles.push(circle.id());
        }
    }

    let removed: BTreeSet<RegionId> = isolated_circles.iter().copied().collect();
    let regions = survivors.without(&removed);
    tracing::debug!(
        pad_tracings = pad_tracings.len(),
        isolated_circles = isolated_circles.len(),
        remaining = regions.len(),
        "Cleaned up closed regions"
    );

    Cleanup {
        regions,
        pad_tracings,
        isolated_circles,
    }
}

/// Which rectangle was chosen as the package envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundarySource {
    /// The oriented rectangle of the largest closed region.
    LargestRegion,
    /// The oriented rectangle of all remaining geometry.
    Overall,
}

/// The selected package envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    /// Chosen envelope; `None` when there was no geometry at all.
    pub envelope: Option<OrientedRect>,
    /// Envelope of all remaining geometry.
    pub overall: Option<OrientedRect>,
    /// Which rectangle was chosen.
    pub source: BoundarySource,
    /// Body size derived from the envelope.
    pub size: PackageSize,
}

/// Chooses the package envelope from the cleaned regions and open line work.
///
/// The largest region's rectangle is used if it covers more than
/// [`BOUNDARY_COVERAGE`] of the overall rectangle's area.
#[must_use]
pub fn select_boundary(regions: &RegionPool, open: &[Polyline]) -> Boundary {
    let all_points: Vec<Point> = regions
        .iter()
        .flat_map(|r| r.shape().vertices().iter().copied())
        .chain(open.iter().flat_map(|l| l.points().iter().copied()))
        .collect();
    let overall = minimum_area_rectangle(&all_points);

    let candidate = regions.largest().and_then(|r| r.shape().minimum_rectangle());

    let (envelope, source) = match (candidate, overall) {
        (Some(c), Some(o)) if o.area() > 0.0 && c.area() / o.area() > BOUNDARY_COVERAGE => {
            (Some(c), BoundarySource::LargestRegion)
        }
        _ => (overall, BoundarySource::Overall),
    };

    let size = envelope.map_or_else(PackageSize::default, |rect| {
        let (a, b) = rect.edge_lengths();
        PackageSize::new(a, b)
    });

    Boundary {
        envelope,
        overall,
        source,
        size,
    }
}
