//! Predicates and set operations between shapes.
//!
//! All predicates treat touching as intersecting.

use super::{Point, Polygon, Polyline};

/// Tolerance for collinearity when subtracting overlapping line work.
const COLLINEAR_EPS: f64 = 1e-9;

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - a)
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Returns `true` if closed segments `ab` and `cd` share at least one point.
#[must_use]
pub fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);

    if ((o1 > 0.0 && o2 < 0.0) || (o1 < 0.0 && o2 > 0.0))
        && ((o3 > 0.0 && o4 < 0.0) || (o3 < 0.0 && o4 > 0.0))
    {
        return true;
    }

    (o1 == 0.0 && on_segment(a, b, c))
        || (o2 == 0.0 && on_segment(a, b, d))
        || (o3 == 0.0 && on_segment(c, d, a))
        || (o4 == 0.0 && on_segment(c, d, b))
}

/// Point-in-polygon by ray casting; points on the boundary count as inside.
#[must_use]
pub fn contains_point(polygon: &Polygon, p: Point) -> bool {
    let mut inside = false;
    for (a, b) in polygon.edges() {
        if orientation(a, b, p) == 0.0 && on_segment(a, b, p) {
            return true;
        }
        if (a.y > p.y) != (b.y > p.y) {
            let x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Returns `true` if two filled polygons share at least one point.
#[must_use]
pub fn polygons_intersect(a: &Polygon, b: &Polygon) -> bool {
    if a.vertices().is_empty() || b.vertices().is_empty() {
        return false;
    }
    for (p, q) in a.edges() {
        for (r, s) in b.edges() {
            if segments_intersect(p, q, r, s) {
                return true;
            }
        }
    }
    contains_point(b, a.vertices()[0]) || contains_point(a, b.vertices()[0])
}

/// Returns `true` if a polyline touches or enters a filled polygon.
#[must_use]
pub fn polyline_intersects_polygon(line: &Polyline, polygon: &Polygon) -> bool {
    let Some(first) = line.start() else {
        return false;
    };
    if polygon.vertices().is_empty() {
        return false;
    }
    if contains_point(polygon, first) {
        return true;
    }
    line.segments()
        .any(|(p, q)| polygon.edges().any(|(r, s)| segments_intersect(p, q, r, s)))
}

/// Area of the intersection of `subject` with a convex `clip` polygon
/// (Sutherland–Hodgman). The subject may be concave.
#[must_use]
pub fn convex_intersection_area(subject: &Polygon, clip: &Polygon) -> f64 {
    let clip_vertices: Vec<Point> = if clip.signed_area() < 0.0 {
        clip.vertices().iter().rev().copied().collect()
    } else {
        clip.vertices().to_vec()
    };
    if clip_vertices.len() < 3 {
        return 0.0;
    }

    let mut output: Vec<Point> = subject.vertices().to_vec();
    let n = clip_vertices.len();
    for i in 0..n {
        if output.is_empty() {
            break;
        }
        let (ca, cb) = (clip_vertices[i], clip_vertices[(i + 1) % n]);
        let inside = |p: Point| orientation(ca, cb, p) >= 0.0;
        let input = std::mem::take(&mut output);
        let m = input.len();
        for j in 0..m {
            let current = input[j];
            let previous = input[(j + m - 1) % m];
            match (inside(previous), inside(current)) {
                (true, true) => output.push(current),
                (true, false) => output.push(line_crossing(previous, current, ca, cb)),
                (false, true) => {
                    output.push(line_crossing(previous, current, ca, cb));
                    output.push(current);
                }
                (false, false) => {}
            }
        }
    }

    Polygon::new(output).area()
}

/// Intersection of segment `pq` with the infinite line through `ab`.
fn line_crossing(p: Point, q: Point, a: Point, b: Point) -> Point {
    let d = q - p;
    let e = b - a;
    let denom = d.cross(e);
    if denom == 0.0 {
        return q;
    }
    let t = (a - p).cross(e) / denom;
    p + d * t
}

/// Portions of `target` not covered by `cutter`.
///
/// Only collinear overlap removes line work; crossings leave the target
/// intact. Consecutive surviving pieces are re-joined.
#[must_use]
pub fn polyline_difference(target: &Polyline, cutter: &Polyline) -> Vec<Polyline> {
    let mut pieces: Vec<Polyline> = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for (a, b) in target.segments() {
        let dir = b - a;
        let len2 = dir.dot(dir);
        if len2 == 0.0 {
            continue;
        }

        let mut covered: Vec<(f64, f64)> = cutter
            .segments()
            .filter_map(|(c, d)| collinear_overlap(a, dir, len2, c, d))
            .collect();
        covered.sort_by(|x, y| x.0.total_cmp(&y.0));

        let mut kept: Vec<(f64, f64)> = Vec::new();
        let mut cursor = 0.0_f64;
        for (lo, hi) in covered {
            if lo > cursor {
                kept.push((cursor, lo));
            }
            cursor = cursor.max(hi);
        }
        if cursor < 1.0 {
            kept.push((cursor, 1.0));
        }

        for (lo, hi) in kept {
            let start = if lo == 0.0 { a } else { a + dir * lo };
            let end = if hi == 1.0 { b } else { a + dir * hi };
            if current.last().map(|p| p.key()) == Some(start.key()) {
                current.push(end);
            } else {
                if current.len() >= 2 {
                    pieces.push(Polyline::new(std::mem::take(&mut current)));
                }
                current = vec![start, end];
            }
        }
    }
    if current.len() >= 2 {
        pieces.push(Polyline::new(current));
    }
    pieces
}

/// Parameter interval along `a + t·dir` covered by segment `cd`, if `cd` is
/// collinear with it and overlaps with positive length.
fn collinear_overlap(a: Point, dir: Point, len2: f64, c: Point, d: Point) -> Option<(f64, f64)> {
    let scale = len2.sqrt();
    if (dir.cross(c - a) / scale).abs() > COLLINEAR_EPS || (dir.cross(d - a) / scale).abs() > COLLINEAR_EPS {
        return None;
    }
    let tc = (c - a).dot(dir) / len2;
    let td = (d - a).dot(dir) / len2;
    let lo = tc.min(td).max(0.0);
    let hi = tc.max(td).min(1.0);
    (hi > lo).then_some((lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Polygon {
        Polygon::from_corners(Point::new(x0, y0), Point::new(x0 + size, y0 + size))
    }

    #[test]
    fn touching_segments_intersect() {
        assert!(segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ));
        assert!(!segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
        ));
    }

    #[test]
    fn nested_polygons_intersect() {
        assert!(polygons_intersect(&square(0.0, 0.0, 10.0), &square(2.0, 2.0, 1.0)));
        assert!(polygons_intersect(&square(2.0, 2.0, 1.0), &square(0.0, 0.0, 10.0)));
        assert!(!polygons_intersect(&square(0.0, 0.0, 1.0), &square(5.0, 5.0, 1.0)));
    }

    #[test]
    fn clip_area_of_overlapping_squares() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(1.0, 1.0, 2.0);
        assert!((convex_intersection_area(&a, &b) - 1.0).abs() < 1e-12);
        assert!(convex_intersection_area(&a, &square(5.0, 5.0, 1.0)).abs() < 1e-12);
    }

    #[test]
    fn clip_concave_subject() {
        // L-shape of area 3 clipped by the unit square at its corner
        let l = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 2.0),
            Point::new(0.0, 2.0),
        ]);
        assert!((convex_intersection_area(&l, &square(0.0, 0.0, 2.0)) - 3.0).abs() < 1e-12);
        assert!((convex_intersection_area(&l, &square(1.0, 1.0, 1.0))).abs() < 1e-12);
    }

    #[test]
    fn difference_removes_shared_edge() {
        let target = Polyline::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 1.0),
        ]);
        let cutter = Polyline::segment(Point::new(1.0, 0.0), Point::new(2.0, 0.0));
        let pieces = polyline_difference(&target, &cutter);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].points(), &[Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        assert_eq!(
            pieces[1].points(),
            &[Point::new(2.0, 0.0), Point::new(4.0, 0.0), Point::new(4.0, 1.0)]
        );
    }

    #[test]
    fn difference_of_duplicate_is_empty() {
        let line = Polyline::segment(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        assert!(polyline_difference(&line, &line.reversed()).is_empty());
    }

    #[test]
    fn polyline_inside_polygon_intersects() {
        let line = Polyline::segment(Point::new(1.0, 1.0), Point::new(2.0, 2.0));
        assert!(polyline_intersects_polygon(&line, &square(0.0, 0.0, 5.0)));
        assert!(!polyline_intersects_polygon(&line, &square(10.0, 10.0, 1.0)));
    }
}
