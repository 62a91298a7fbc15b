//! Reassembles open line work into closed rings.
//!
//! Footprint outlines are often drawn as loose segments and arcs, sometimes
//! with duplicated edges or inconsistent winding. The merger chains pieces at
//! shared endpoints until no further progress is possible, running a single
//! sanitation pass when it first stalls.

use std::collections::{HashMap, HashSet};

use crate::geometry::ops::polyline_difference;
use crate::geometry::{Point, Polygon, Polyline};

use super::classifier::Classification;
use super::region::{RegionOrigin, RegionPool, ShapeClass};
use super::{CLOSURE_TOLERANCE, RECTANGLE_TOLERANCE};

/// Regions after merging, plus the line work that stayed open.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// Native regions followed by merged rings.
    pub regions: RegionPool,
    /// Open line work that could not be closed.
    pub open: Vec<Polyline>,
    /// Whether the sanitation pass ran.
    pub sanitized: bool,
}

/// Runs the merge loop over the classifier's open pool.
#[must_use]
pub fn merge(classification: Classification) -> MergeOutcome {
    let Classification { mut regions, open } = classification;
    let mut pending = open;
    let mut sanitized = false;

    loop {
        let (open, closed) = close_chains(line_merge(pending));
        for (shape, class) in closed {
            regions.push(shape, RegionOrigin::MergedRing, class);
        }

        if open.len() < 2 {
            return MergeOutcome {
                regions,
                open,
                sanitized,
            };
        }

        let mut dissolved = dissolve(&open);
        if dissolved.len() < open.len() {
            pending = dissolved;
            continue;
        }

        if sanitized {
            tracing::debug!(remaining = open.len(), "Merge stalled after sanitation");
            return MergeOutcome {
                regions,
                open,
                sanitized,
            };
        }

        tracing::debug!(pieces = dissolved.len(), "Merge stalled, sanitising line work");
        sanitize(&mut dissolved);
        sanitized = true;
        pending = dissolved;
    }
}

/// Joins polylines at endpoints shared by exactly two pieces, reversing
/// pieces where needed. Closed loops come out with equal first and last
/// vertices.
#[must_use]
pub fn line_merge(lines: Vec<Polyline>) -> Vec<Polyline> {
    let lines: Vec<Polyline> = lines.into_iter().filter(|l| l.len() >= 2).collect();

    let mut nodes: HashMap<(u64, u64), Vec<usize>> = HashMap::new();
    for (i, line) in lines.iter().enumerate() {
        for end in [line.start(), line.end()].into_iter().flatten() {
            nodes.entry(end.key()).or_default().push(i);
        }
    }

    // The other unused piece meeting `at`, if the node has degree two.
    let partner = |at: Point, used: &[bool]| -> Option<usize> {
        let incident = nodes.get(&at.key())?;
        if incident.len() != 2 {
            return None;
        }
        let mut free = incident.iter().copied().filter(|&j| !used[j]);
        let first = free.next()?;
        free.next().is_none().then_some(first)
    };

    let mut used = vec![false; lines.len()];
    let mut merged = Vec::new();

    for i in 0..lines.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let mut chain: Vec<Point> = lines[i].points().to_vec();

        while let Some(j) = chain.last().and_then(|&end| partner(end, &used)) {
            used[j] = true;
            let next = oriented_from(&lines[j], chain[chain.len() - 1]);
            chain.extend_from_slice(&next[1..]);
        }

        while let Some(j) = chain.first().and_then(|&start| partner(start, &used)) {
            used[j] = true;
            let mut prev = oriented_from(&lines[j], chain[0]);
            prev.reverse();
            prev.pop();
            prev.extend_from_slice(&chain);
            chain = prev;
        }

        merged.push(Polyline::new(chain));
    }
    merged
}

/// Vertices of `line` ordered so that they start at `from`.
fn oriented_from(line: &Polyline, from: Point) -> Vec<Point> {
    if line.start().map(Point::key) == Some(from.key()) {
        line.points().to_vec()
    } else {
        line.reversed().into_points()
    }
}

/// Splits merged chains into those that stay open and closed shapes.
///
/// Near-rectangular chains count as closed even when the closing edge is
/// missing; other chains must close within [`CLOSURE_TOLERANCE`].
fn close_chains(chains: Vec<Polyline>) -> (Vec<Polyline>, Vec<(Polygon, ShapeClass)>) {
    let mut open = Vec::new();
    let mut closed = Vec::new();

    for chain in chains {
        if chain.len() < 3 {
            open.push(chain);
            continue;
        }

        let ring_length = chain.ring_length();
        let is_closed =
            ring_length > 0.0 && (chain.length() - ring_length).abs() / ring_length < CLOSURE_TOLERANCE;

        let poly = chain.to_polygon();
        if poly.area() == 0.0 {
            open.push(chain);
        } else if poly.is_rectangular(RECTANGLE_TOLERANCE) {
            closed.push((poly, ShapeClass::Rectangle));
        } else if is_closed {
            closed.push((poly, ShapeClass::Polygon));
        } else {
            open.push(chain);
        }
    }
    (open, closed)
}

/// Explodes line work into segments, drops zero-length and duplicate
/// segments, and re-merges what is left.
fn dissolve(lines: &[Polyline]) -> Vec<Polyline> {
    let mut seen: HashSet<((u64, u64), (u64, u64))> = HashSet::new();
    let mut segments = Vec::new();
    for line in lines {
        for (a, b) in line.segments() {
            let (ka, kb) = (a.key(), b.key());
            if ka == kb {
                continue;
            }
            let key = if ka <= kb { (ka, kb) } else { (kb, ka) };
            if seen.insert(key) {
                segments.push(Polyline::segment(a, b));
            }
        }
    }
    line_merge(segments)
}

/// One-time clean-up of stalled line work.
///
/// First removes edges traced more than once (longest chains win), then
/// reverses chains that meet another chain head-to-head or tail-to-tail.
pub fn sanitize(lines: &mut Vec<Polyline>) {
    lines.sort_by(|a, b| b.length().total_cmp(&a.length()));

    let mut slots: Vec<Vec<Polyline>> = lines.drain(..).map(|l| vec![l]).collect();
    for i in 0..slots.len() {
        let (visited, rest) = slots.split_at_mut(i + 1);
        let cutters = &visited[i];
        for slot in rest.iter_mut() {
            let remainder: Vec<Polyline> = slot
                .iter()
                .flat_map(|piece| {
                    cutters.iter().fold(vec![piece.clone()], |parts, cutter| {
                        parts
                            .iter()
                            .flat_map(|part| polyline_difference(part, cutter))
                            .collect()
                    })
                })
                .collect();
            if !remainder.is_empty() && remainder != *slot {
                *slot = remainder;
            }
        }
    }
    *lines = slots.into_iter().flatten().collect();

    let mut visited = vec![false; lines.len()];
    for i in 0..lines.len() {
        visited[i] = true;
        let (Some(start), Some(end)) = (lines[i].start(), lines[i].end()) else {
            continue;
        };
        for j in 0..lines.len() {
            if visited[j] {
                continue;
            }
            let same_end = lines[j].end().map(Point::key) == Some(end.key());
            let same_start = lines[j].start().map(Point::key) == Some(start.key());
            if same_end || same_start {
                lines[j] = lines[j].reversed();
                visited[j] = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn seg(a: (f64, f64), b: (f64, f64)) -> Polyline {
        Polyline::segment(p(a.0, a.1), p(b.0, b.1))
    }

    fn merge_lines(open: Vec<Polyline>) -> MergeOutcome {
        merge(Classification {
            regions: RegionPool::new(),
            open,
        })
    }

    #[test]
    fn line_merge_joins_reversed_pieces() {
        let merged = line_merge(vec![
            seg((0.0, 0.0), (1.0, 0.0)),
            seg((2.0, 0.0), (1.0, 0.0)),
            seg((2.0, 0.0), (2.0, 1.0)),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].len(), 4);
        assert!((merged[0].length() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn line_merge_stops_at_junctions() {
        // three pieces meeting at the origin stay separate
        let merged = line_merge(vec![
            seg((0.0, 0.0), (1.0, 0.0)),
            seg((0.0, 0.0), (0.0, 1.0)),
            seg((0.0, 0.0), (-1.0, 0.0)),
        ]);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn four_segments_close_into_rectangle() {
        let out = merge_lines(vec![
            seg((0.0, 0.0), (4.0, 0.0)),
            seg((4.0, 4.0), (0.0, 4.0)),
            seg((4.0, 0.0), (4.0, 4.0)),
            seg((0.0, 4.0), (0.0, 0.0)),
        ]);
        assert!(out.open.is_empty());
        assert_eq!(out.regions.len(), 1);
        let region = out.regions.iter().next().unwrap();
        assert_eq!(region.origin(), RegionOrigin::MergedRing);
        assert_eq!(region.class(), ShapeClass::Rectangle);
        assert!((region.shape().area() - 16.0).abs() < 1e-12);
    }

    #[test]
    fn lazy_rectangle_without_closing_edge_is_closed() {
        let out = merge_lines(vec![
            seg((0.0, 0.0), (4.0, 0.0)),
            seg((4.0, 0.0), (4.0, 2.0)),
            seg((4.0, 2.0), (0.0, 2.0)),
        ]);
        assert_eq!(out.regions.len(), 1);
        assert!(out.open.is_empty());
    }

    #[test]
    fn closed_triangle_is_polygon() {
        let out = merge_lines(vec![
            seg((0.0, 0.0), (4.0, 0.0)),
            seg((4.0, 0.0), (2.0, 3.0)),
            seg((2.0, 3.0), (0.0, 0.0)),
        ]);
        assert_eq!(out.regions.iter().next().unwrap().class(), ShapeClass::Polygon);
    }

    #[test]
    fn open_arc_stays_open() {
        let out = merge_lines(vec![
            seg((0.0, 0.0), (4.0, 0.0)),
            seg((4.0, 0.0), (5.0, 3.0)),
            seg((10.0, 10.0), (11.0, 10.0)),
        ]);
        assert!(out.regions.is_empty());
        assert_eq!(out.open.len(), 2);
    }

    #[test]
    fn duplicated_edge_is_dissolved() {
        // the bottom edge is traced twice, so the corner nodes have degree 3
        let out = merge_lines(vec![
            seg((0.0, 0.0), (4.0, 0.0)),
            seg((4.0, 0.0), (0.0, 0.0)),
            seg((4.0, 0.0), (4.0, 2.0)),
            seg((4.0, 2.0), (0.0, 2.0)),
            seg((0.0, 2.0), (0.0, 0.0)),
        ]);
        assert_eq!(out.regions.len(), 1);
        // the retraced bottom edge collapses to a single leftover piece
        assert_eq!(out.open.len(), 1);
        assert!(!out.sanitized);
    }

    #[test]
    fn overlapping_trace_is_sanitised() {
        // a long edge partially retraced by a shorter, offset piece
        let out = merge_lines(vec![
            seg((0.0, 0.0), (4.0, 0.0)),
            seg((1.0, 0.0), (3.0, 0.0)),
            seg((10.0, 0.0), (10.0, 1.0)),
        ]);
        assert!(out.sanitized);
        assert!(out.regions.is_empty());
    }

    #[test]
    fn sanitize_removes_covered_part() {
        let mut lines = vec![
            seg((1.0, 0.0), (5.0, 0.0)),
            Polyline::new(vec![p(0.0, 0.0), p(0.0, 3.0), p(3.0, 3.0), p(3.0, 0.0), p(0.0, 0.0)]),
        ];
        sanitize(&mut lines);
        // the rectangle is longest; the segment loses its covered stretch [1, 3]
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].points(), &[p(3.0, 0.0), p(5.0, 0.0)]);
    }

    #[test]
    fn sanitize_reorients_tail_to_tail() {
        let mut lines = vec![seg((0.0, 0.0), (2.0, 0.0)), seg((3.0, 1.0), (2.0, 0.0))];
        sanitize(&mut lines);
        assert_eq!(lines[1].start(), Some(p(2.0, 0.0)));
    }
}
