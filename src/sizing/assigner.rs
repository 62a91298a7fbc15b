//! Matches closed regions to the pads they trace.
//!
//! Silkscreen and courtyard layers frequently redraw pad outlines. Those
//! regions say nothing about the package body, so they are paired with pads
//! here and removed before the boundary is chosen.

use crate::footprint::ContactItem;
use crate::geometry::ops::{convex_intersection_area, polygons_intersect};
use crate::geometry::Polygon;

use super::region::{RegionId, RegionPool};

/// Both shapes must be covered at least this much by the overlap.
const MUTUAL_COVERAGE: f64 = 0.9;

/// Alternatively, the region must be covered this much...
const REGION_COVERAGE: f64 = 0.97;

/// ...while the pad is covered at least this much.
const PAD_PARTIAL_COVERAGE: f64 = 0.25;

/// A region identified as a tracing of a pad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadClaim {
    /// The region.
    pub region: RegionId,
    /// Index of the pad in the footprint's contact list.
    pub pad: usize,
    /// Mean of the region and pad coverage ratios.
    pub score: f64,
}

/// Result of pad assignment: a partial one-to-one map from regions to pads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PadAssignment {
    /// Claims, in region pool order.
    pub claims: Vec<PadClaim>,
    /// Indices of pads no region claimed.
    pub unclaimed: Vec<usize>,
}

impl PadAssignment {
    /// Returns `true` if the region claimed a pad.
    #[must_use]
    pub fn is_claimed(&self, region: RegionId) -> bool {
        self.claims.iter().any(|c| c.region == region)
    }
}

/// Outline of a pad: its size centred at its centre, rotated by its orientation.
#[must_use]
pub fn pad_outline(pad: &ContactItem) -> Polygon {
    Polygon::rotated_rectangle(pad.center, pad.size.width, pad.size.height, pad.orientation)
}

/// Greedily assigns regions to pads.
///
/// Regions are visited in pool order. For each, the still-unclaimed pads are
/// ordered by distance from the region centroid; the walk stops at the first
/// pad that does not touch the region. Among acceptable pads the best mean
/// coverage wins, the nearest on ties.
#[must_use]
pub fn assign_pads(regions: &RegionPool, contacts: &[ContactItem]) -> PadAssignment {
    let outlines: Vec<Polygon> = contacts.iter().map(pad_outline).collect();
    let areas: Vec<f64> = outlines.iter().map(Polygon::area).collect();
    let mut claimed = vec![false; outlines.len()];
    let mut claims = Vec::new();

    for region in regions.iter() {
        let shape = region.shape();
        let region_area = shape.area();
        if region_area <= 0.0 {
            continue;
        }
        let centroid = shape.centroid();

        let mut order: Vec<usize> = (0..outlines.len())
            .filter(|&i| !claimed[i] && areas[i] > 0.0)
            .collect();
        order.sort_by(|&a, &b| {
            centroid
                .distance(contacts[a].center)
                .total_cmp(&centroid.distance(contacts[b].center))
        });

        let mut best: Option<(usize, f64)> = None;
        for i in order {
            if !polygons_intersect(&outlines[i], shape) {
                break;
            }
            let overlap = convex_intersection_area(shape, &outlines[i]);
            let of_region = overlap / region_area;
            let of_pad = overlap / areas[i];

            let accepted = (of_region > MUTUAL_COVERAGE && of_pad > MUTUAL_COVERAGE)
                || (of_region > REGION_COVERAGE && of_pad > PAD_PARTIAL_COVERAGE);
            if !accepted {
                continue;
            }
            let score = 0.5 * (of_region + of_pad);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((i, score));
            }
        }

        if let Some((pad, score)) = best {
            claimed[pad] = true;
            claims.push(PadClaim {
                region: region.id(),
                pad,
                score,
            });
        }
    }

    let unclaimed = (0..outlines.len()).filter(|&i| !claimed[i]).collect();
    tracing::debug!(claimed = claims.len(), pads = contacts.len(), "Assigned regions to pads");
    PadAssignment { claims, unclaimed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::sizing::region::{RegionOrigin, ShapeClass};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::from_corners(Point::new(x0, y0), Point::new(x1, y1))
    }

    fn pool(shapes: Vec<Polygon>) -> RegionPool {
        let mut pool = RegionPool::new();
        for s in shapes {
            pool.push(s, RegionOrigin::NativeRectangle, ShapeClass::Rectangle);
        }
        pool
    }

    #[test]
    fn rotated_pad_outline() {
        let pad = ContactItem::smd(Point::new(0.0, 0.0), 2.0, 1.0).with_orientation(90.0);
        let outline = pad_outline(&pad);
        let xs: Vec<f64> = outline.vertices().iter().map(|p| p.x).collect();
        let max_x = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!((max_x - 0.5).abs() < 1e-12);
    }

    #[test]
    fn exact_tracings_are_claimed() {
        let pads = [
            ContactItem::smd(Point::new(-1.0, 0.0), 1.0, 1.0),
            ContactItem::smd(Point::new(1.0, 0.0), 1.0, 1.0),
        ];
        let regions = pool(vec![
            rect(0.5, -0.5, 1.5, 0.5),
            rect(-1.5, -0.5, -0.5, 0.5),
            rect(-3.0, -2.0, 3.0, 2.0),
        ]);
        let result = assign_pads(&regions, &pads);
        assert_eq!(result.claims.len(), 2);
        assert_eq!(result.claims[0].pad, 1);
        assert_eq!(result.claims[1].pad, 0);
        assert!(result.unclaimed.is_empty());
    }

    #[test]
    fn duplicate_tracings_claim_each_pad_once() {
        let pads = [ContactItem::smd(Point::new(0.0, 0.0), 1.0, 1.0)];
        let regions = pool(vec![rect(-0.5, -0.5, 0.5, 0.5), rect(-0.5, -0.5, 0.5, 0.5)]);
        let result = assign_pads(&regions, &pads);
        assert_eq!(result.claims.len(), 1);
        let ids: Vec<RegionId> = regions.iter().map(|r| r.id()).collect();
        assert!(result.is_claimed(ids[0]));
        assert!(!result.is_claimed(ids[1]));
    }

    #[test]
    fn small_marker_inside_large_pad_is_claimed() {
        // region fully inside the pad and covering 30 % of it
        let pads = [ContactItem::smd(Point::new(0.0, 0.0), 2.0, 1.0)];
        let regions = pool(vec![rect(-0.3, -0.5, 0.3, 0.5)]);
        assert_eq!(assign_pads(&regions, &pads).claims.len(), 1);
    }

    #[test]
    fn body_outline_is_not_claimed() {
        let pads = [ContactItem::smd(Point::new(0.0, 0.0), 1.0, 1.0)];
        let regions = pool(vec![rect(-3.0, -3.0, 3.0, 3.0)]);
        let result = assign_pads(&regions, &pads);
        assert!(result.claims.is_empty());
        assert_eq!(result.unclaimed, vec![0]);
    }
}
