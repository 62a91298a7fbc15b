//! Convex hulls and minimum-area oriented bounding rectangles.

use super::Point;

/// A rectangle at arbitrary rotation, given by its four corners in order.
///
/// Degenerate rectangles (zero width, or a single point) are allowed; they
/// arise when the enclosed geometry is collinear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedRect {
    corners: [Point; 4],
}

impl OrientedRect {
    /// The corners, each adjacent to the next.
    #[must_use]
    pub const fn corners(&self) -> [Point; 4] {
        self.corners
    }

    /// Lengths of two adjacent edges.
    #[must_use]
    pub fn edge_lengths(&self) -> (f64, f64) {
        let [a, b, c, _] = self.corners;
        (a.distance(b), b.distance(c))
    }

    /// Enclosed area.
    #[must_use]
    pub fn area(&self) -> f64 {
        let (a, b) = self.edge_lengths();
        a * b
    }
}

/// Convex hull by Andrew's monotone chain, counter-clockwise, collinear
/// points removed.
///
/// Returns one point for coincident input and two for collinear input.
#[must_use]
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts: Vec<Point> = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup_by_key(|p| p.key());

    if pts.len() < 3 {
        return pts;
    }

    let turn = |o: Point, a: Point, b: Point| (a - o).cross(b - o);

    let mut lower: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && turn(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && turn(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Minimum-area rectangle enclosing `points`, by rotating calipers over the
/// convex hull edges.
///
/// Returns `None` for empty input. The first hull edge achieving the
/// minimum wins, which keeps the result deterministic.
#[must_use]
pub fn minimum_area_rectangle(points: &[Point]) -> Option<OrientedRect> {
    let hull = convex_hull(points);
    match hull.len() {
        0 => None,
        1 => Some(OrientedRect {
            corners: [hull[0]; 4],
        }),
        2 => Some(OrientedRect {
            corners: [hull[0], hull[1], hull[1], hull[0]],
        }),
        n => {
            let mut best: Option<(f64, OrientedRect)> = None;
            for i in 0..n {
                let edge = hull[(i + 1) % n] - hull[i];
                let len = edge.length();
                if len == 0.0 {
                    continue;
                }
                let u = edge * (1.0 / len);
                let v = Point::new(-u.y, u.x);

                let (mut min_u, mut max_u) = (f64::INFINITY, f64::NEG_INFINITY);
                let (mut min_v, mut max_v) = (f64::INFINITY, f64::NEG_INFINITY);
                for &p in &hull {
                    let d = p - hull[i];
                    let pu = d.dot(u);
                    let pv = d.dot(v);
                    min_u = min_u.min(pu);
                    max_u = max_u.max(pu);
                    min_v = min_v.min(pv);
                    max_v = max_v.max(pv);
                }

                let area = (max_u - min_u) * (max_v - min_v);
                if best.as_ref().map_or(true, |(a, _)| area < *a) {
                    let at = |su: f64, sv: f64| hull[i] + u * su + v * sv;
                    let rect = OrientedRect {
                        corners: [
                            at(min_u, min_v),
                            at(max_u, min_v),
                            at(max_u, max_v),
                            at(min_u, max_v),
                        ],
                    };
                    best = Some((area, rect));
                }
            }
            best.map(|(_, rect)| rect)
        }
    }
}
