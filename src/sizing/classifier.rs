//! Splits raw drawing primitives into closed regions and open line work.

use crate::error::SizingError;
use crate::footprint::DrawingPrimitive;
use crate::geometry::{Point, Polygon, Polyline};

use super::region::{RegionOrigin, RegionPool, ShapeClass};
use super::RECTANGLE_TOLERANCE;

/// Maximum arc sweep, in degrees, covered by one discretisation step.
pub const ARC_STEP_DEGREES: f64 = 5.0;

/// Minimum number of segments an arc is split into.
pub const ARC_MIN_SEGMENTS: usize = 2;

/// Largest accepted arc sweep, in degrees, either direction.
pub const MAX_ARC_SWEEP_DEGREES: f64 = 360.0;

/// Closed regions and open polylines found in a footprint's drawings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    /// Closed regions, in drawing order.
    pub regions: RegionPool,
    /// Open polylines, exact duplicates removed.
    pub open: Vec<Polyline>,
}

/// Classifies every drawing primitive as closed or open.
///
/// # Errors
///
/// Returns [`SizingError::NonFiniteDrawing`] if a primitive carries NaN or
/// infinite values, and [`SizingError::ArcSweepOutOfRange`] for an arc
/// sweeping more than a full turn.
pub fn classify(drawings: &[DrawingPrimitive]) -> Result<Classification, SizingError> {
    let mut out = Classification::default();

    for (index, drawing) in drawings.iter().enumerate() {
        if !drawing.is_finite() {
            return Err(SizingError::NonFiniteDrawing {
                kind: drawing.kind_name(),
                index,
            });
        }

        match drawing {
            DrawingPrimitive::Segment { start, end } => {
                out.open.push(Polyline::segment(*start, *end));
            }
            DrawingPrimitive::Arc { sweep_angle, .. }
                if sweep_angle.abs() > MAX_ARC_SWEEP_DEGREES =>
            {
                return Err(SizingError::ArcSweepOutOfRange {
                    index,
                    sweep: *sweep_angle,
                });
            }
            DrawingPrimitive::Arc {
                start,
                end,
                sweep_angle,
            } => match discretize_arc(*start, *end, *sweep_angle) {
                Some(points) => out.open.push(Polyline::new(points)),
                None => tracing::warn!(index, "Dropping arc with coincident endpoints"),
            },
            DrawingPrimitive::Circle { center, radius } => {
                if *radius > 0.0 {
                    out.regions.push(
                        Polygon::circle(*center, *radius),
                        RegionOrigin::NativeCircle,
                        ShapeClass::Circle,
                    );
                } else {
                    tracing::debug!(index, radius, "Dropping circle without radius");
                }
            }
            DrawingPrimitive::Rectangle { corner_a, corner_b } => {
                let rect = Polygon::from_corners(*corner_a, *corner_b);
                if rect.area() > 0.0 {
                    out.regions
                        .push(rect, RegionOrigin::NativeRectangle, ShapeClass::Rectangle);
                } else {
                    out.open.push(Polyline::segment(*corner_a, *corner_b));
                }
            }
            DrawingPrimitive::Polygon { points } => {
                let poly = Polygon::new(points.clone());
                if poly.area() == 0.0 {
                    if points.len() >= 2 {
                        out.open.push(poly.boundary());
                    }
                } else if poly.is_rectangular(RECTANGLE_TOLERANCE) {
                    out.regions
                        .push(poly, RegionOrigin::NativePolygon, ShapeClass::Rectangle);
                } else {
                    out.regions
                        .push(poly, RegionOrigin::NativePolygon, ShapeClass::Polygon);
                }
            }
        }
    }

    let mut unique: Vec<Polyline> = Vec::with_capacity(out.open.len());
    for line in out.open {
        if !unique.contains(&line) {
            unique.push(line);
        }
    }
    out.open = unique;

    tracing::debug!(
        closed = out.regions.len(),
        open = out.open.len(),
        "Classified drawing primitives"
    );
    Ok(out)
}

/// Discretises an arc into a polyline.
///
/// Produces `max(floor(|sweep| / 5°), 2) + 1` points whose first and last
/// entries are exactly `start` and `end`. A zero sweep yields the straight
/// chord. Returns `None` when the endpoints coincide, since the centre is
/// then undefined, or when the sweep exceeds [`MAX_ARC_SWEEP_DEGREES`].
#[must_use]
pub fn discretize_arc(start: Point, end: Point, sweep_degrees: f64) -> Option<Vec<Point>> {
    let chord = start.distance(end);
    if chord == 0.0 || sweep_degrees.abs() > MAX_ARC_SWEEP_DEGREES {
        return None;
    }
    if sweep_degrees == 0.0 {
        return Some(vec![start, end]);
    }

    let sweep = sweep_degrees.to_radians();
    let mid = (start + end) * 0.5;
    let d = end - start;
    let offset = chord / (2.0 * (sweep / 2.0).tan());
    let center = Point::new(mid.x - offset * (d.y / chord), mid.y + offset * (d.x / chord));

    let radius = center.distance(start);
    let end_angle = (end.y - center.y).atan2(end.x - center.x);
    let start_angle = end_angle - sweep;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = ((sweep_degrees.abs() / ARC_STEP_DEGREES) as usize).max(ARC_MIN_SEGMENTS);

    let mut points: Vec<Point> = (0..=steps)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let theta = start_angle + sweep * (i as f64 / steps as f64);
            Point::new(
                radius.mul_add(theta.cos(), center.x),
                radius.mul_add(theta.sin(), center.y),
            )
        })
        .collect();
    points[0] = start;
    points[steps] = end;
    Some(points)
}
