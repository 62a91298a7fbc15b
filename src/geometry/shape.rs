//! Polylines and simple polygons.

use super::hull::{minimum_area_rectangle, OrientedRect};
use super::Point;

/// Number of vertices used to approximate a circle.
pub const CIRCLE_SEGMENTS: usize = 64;

/// An open chain of connected line segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    /// Creates a polyline from its vertices.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Creates a single-segment polyline.
    #[must_use]
    pub fn segment(start: Point, end: Point) -> Self {
        Self::new(vec![start, end])
    }

    /// The vertices, in drawing order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Consumes the polyline, returning its vertices.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the polyline has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First vertex.
    #[must_use]
    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    /// Last vertex.
    #[must_use]
    pub fn end(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Iterates over the segments as `(start, end)` pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Total length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }

    /// Length the chain would have if its ends were joined.
    #[must_use]
    pub fn ring_length(&self) -> f64 {
        match (self.start(), self.end()) {
            (Some(s), Some(e)) => self.length() + e.distance(s),
            _ => 0.0,
        }
    }

    /// The same chain with its vertex order reversed.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.points.iter().rev().copied().collect())
    }

    /// Interprets the chain as a polygon outline (implicitly closed).
    #[must_use]
    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(self.points.clone())
    }
}

/// A simple polygon, stored without a repeated closing vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Creates a polygon, dropping a trailing vertex equal to the first.
    #[must_use]
    pub fn new(mut vertices: Vec<Point>) -> Self {
        if vertices.len() > 1 && vertices.first().map(|p| p.key()) == vertices.last().map(|p| p.key())
        {
            vertices.pop();
        }
        Self { vertices }
    }

    /// Axis-aligned rectangle spanned by two opposite corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
        let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
        Self::new(vec![
            Point::new(max_x, min_y),
            Point::new(max_x, max_y),
            Point::new(min_x, max_y),
            Point::new(min_x, min_y),
        ])
    }

    /// Rectangle of `width` × `height` centred at `center`, rotated by `degrees`.
    #[must_use]
    pub fn rotated_rectangle(center: Point, width: f64, height: f64, degrees: f64) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        let corners = [
            Point::new(center.x + hw, center.y - hh),
            Point::new(center.x + hw, center.y + hh),
            Point::new(center.x - hw, center.y + hh),
            Point::new(center.x - hw, center.y - hh),
        ];
        Self::new(
            corners
                .iter()
                .map(|c| c.rotate_about(center, degrees))
                .collect(),
        )
    }

    /// Regular polygon approximating a circle.
    #[must_use]
    pub fn circle(center: Point, radius: f64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let step = std::f64::consts::TAU / CIRCLE_SEGMENTS as f64;
        Self::new(
            (0..CIRCLE_SEGMENTS)
                .map(|i| {
                    #[allow(clippy::cast_precision_loss)]
                    let theta = step * i as f64;
                    Point::new(
                        radius.mul_add(theta.cos(), center.x),
                        radius.mul_add(theta.sin(), center.y),
                    )
                })
                .collect(),
        )
    }

    /// The vertices.
    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Iterates over the edges, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Signed shoelace area; positive for counter-clockwise winding.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        if self.vertices.len() < 3 {
            return 0.0;
        }
        self.edges().map(|(a, b)| a.cross(b)).sum::<f64>() * 0.5
    }

    /// Enclosed area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area centroid, falling back to the vertex mean for degenerate shapes.
    #[must_use]
    pub fn centroid(&self) -> Point {
        let area = self.signed_area();
        if area == 0.0 {
            if self.vertices.is_empty() {
                return Point::default();
            }
            #[allow(clippy::cast_precision_loss)]
            let n = self.vertices.len() as f64;
            let sum = self
                .vertices
                .iter()
                .fold(Point::default(), |acc, &p| acc + p);
            return sum * (1.0 / n);
        }
        let (cx, cy) = self.edges().fold((0.0, 0.0), |(cx, cy), (a, b)| {
            let f = a.cross(b);
            (cx + (a.x + b.x) * f, cy + (a.y + b.y) * f)
        });
        Point::new(cx / (6.0 * area), cy / (6.0 * area))
    }

    /// The closed boundary as a polyline (first vertex repeated at the end).
    #[must_use]
    pub fn boundary(&self) -> Polyline {
        let mut points = self.vertices.clone();
        if let Some(&first) = self.vertices.first() {
            points.push(first);
        }
        Polyline::new(points)
    }

    /// Minimum-area oriented rectangle enclosing this polygon.
    #[must_use]
    pub fn minimum_rectangle(&self) -> Option<OrientedRect> {
        minimum_area_rectangle(&self.vertices)
    }

    /// Relative difference between this polygon's area and that of its
    /// minimum enclosing rectangle. `None` for zero-area polygons.
    #[must_use]
    pub fn rectangle_deviation(&self) -> Option<f64> {
        let area = self.area();
        if area == 0.0 {
            return None;
        }
        let rect = self.minimum_rectangle()?;
        Some((area - rect.area()).abs() / area)
    }

    /// Returns `true` if the polygon covers its minimum rectangle within `tolerance`.
    #[must_use]
    pub fn is_rectangular(&self, tolerance: f64) -> bool {
        self.rectangle_deviation().is_some_and(|d| d < tolerance)
    }
}
