//! End-to-end tests for geometric body sizing.
//!
//! These tests build footprints the way board exports draw them (loose
//! segments, native rectangles, arcs, pad tracings) and check the size the
//! full pipeline derives.

use footprint_package_sizer::footprint::{ContactItem, DrawingPrimitive, Footprint};
use footprint_package_sizer::error::SizingError;
use footprint_package_sizer::geometry::Point;
use footprint_package_sizer::sizing::{estimate_footprint_size, BoundarySource};

const TOLERANCE: f64 = 1e-6;

/// Helper to compare floats with tolerance.
fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE
}

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Adds the outline of a closed polygon as individual segments.
fn add_outline(fp: &mut Footprint, corners: &[Point]) {
    for (i, &a) in corners.iter().enumerate() {
        let b = corners[(i + 1) % corners.len()];
        fp.add_drawing(DrawingPrimitive::segment(a, b));
    }
}

fn rotated_corners(w: f64, h: f64, degrees: f64) -> Vec<Point> {
    let origin = p(0.0, 0.0);
    [p(-w / 2.0, -h / 2.0), p(w / 2.0, -h / 2.0), p(w / 2.0, h / 2.0), p(-w / 2.0, h / 2.0)]
        .into_iter()
        .map(|c| c.rotate_about(origin, degrees))
        .collect()
}

// =============================================================================
// Basic Shapes
// =============================================================================

#[test]
fn square_from_four_segments() {
    let mut fp = Footprint::new("SQUARE");
    add_outline(&mut fp, &[p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0)]);
    fp.add_contact(ContactItem::smd(p(1.0, 1.0), 0.5, 0.5));

    let estimate = estimate_footprint_size(&fp).expect("sizing failed");
    assert!(approx_eq(estimate.size.length, 2.0));
    assert!(approx_eq(estimate.size.width, 2.0));
    assert_eq!(estimate.source, BoundarySource::LargestRegion);
    assert_eq!(estimate.open_pieces, 0);
}

#[test]
fn bare_square_outline_sizes_to_its_edge() {
    let edge = 2.5;
    let mut fp = Footprint::new("SQUARE");
    add_outline(&mut fp, &[p(0.0, 0.0), p(edge, 0.0), p(edge, edge), p(0.0, edge)]);
    assert!(fp.contacts.is_empty());

    let estimate = estimate_footprint_size(&fp).expect("sizing failed");
    assert_eq!(estimate.body_regions, 1);
    assert!(approx_eq(estimate.size.length, edge));
    assert!(approx_eq(estimate.size.width, edge));
}

#[test]
fn rotated_body_is_measured_along_its_axes() {
    let mut fp = Footprint::new("ROTATED");
    fp.add_drawing(DrawingPrimitive::polygon(rotated_corners(4.0, 2.0, 30.0)));

    let estimate = estimate_footprint_size(&fp).expect("sizing failed");
    assert!(approx_eq(estimate.size.length, 4.0));
    assert!(approx_eq(estimate.size.width, 2.0));
}

#[test]
fn obround_from_segments_and_arcs() {
    let mut fp = Footprint::new("OBROUND");
    fp.add_drawing(DrawingPrimitive::segment(p(0.0, 0.0), p(4.0, 0.0)));
    fp.add_drawing(DrawingPrimitive::arc(p(4.0, 0.0), p(4.0, 2.0), 180.0));
    fp.add_drawing(DrawingPrimitive::segment(p(4.0, 2.0), p(0.0, 2.0)));
    fp.add_drawing(DrawingPrimitive::arc(p(0.0, 2.0), p(0.0, 0.0), 180.0));

    let estimate = estimate_footprint_size(&fp).expect("sizing failed");
    assert_eq!(estimate.body_regions, 1);
    assert!(approx_eq(estimate.size.length, 6.0));
    assert!(approx_eq(estimate.size.width, 2.0));
}

#[test]
fn empty_footprint_has_zero_size() {
    let estimate = estimate_footprint_size(&Footprint::new("EMPTY")).expect("sizing failed");
    assert!(estimate.size.is_zero());
    assert_eq!(estimate.source, BoundarySource::Overall);
}

#[test]
fn non_finite_drawing_is_an_error() {
    let mut fp = Footprint::new("BROKEN");
    fp.add_drawing(DrawingPrimitive::segment(p(0.0, 0.0), p(f64::NAN, 1.0)));
    assert!(estimate_footprint_size(&fp).is_err());
}

#[test]
fn runaway_arc_sweep_is_an_error() {
    let mut fp = Footprint::new("CORRUPT");
    add_outline(&mut fp, &[p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0)]);
    fp.add_drawing(DrawingPrimitive::arc(p(0.0, 0.0), p(1.0, 0.0), 1e12));
    assert_eq!(
        estimate_footprint_size(&fp),
        Err(SizingError::ArcSweepOutOfRange {
            index: 4,
            sweep: 1e12
        })
    );
}

// =============================================================================
// Pad Tracings And Mounting Holes
// =============================================================================

#[test]
fn pad_tracings_are_removed() {
    let mut fp = Footprint::new("TRACED");
    fp.add_drawing(DrawingPrimitive::rectangle(p(0.0, 0.0), p(4.0, 2.0)));
    fp.add_drawing(DrawingPrimitive::rectangle(p(-1.5, 0.5), p(-0.5, 1.5)));
    fp.add_drawing(DrawingPrimitive::rectangle(p(4.5, 0.5), p(5.5, 1.5)));
    fp.add_contact(ContactItem::smd(p(-1.0, 1.0), 1.0, 1.0));
    fp.add_contact(ContactItem::smd(p(5.0, 1.0), 1.0, 1.0));

    let estimate = estimate_footprint_size(&fp).expect("sizing failed");
    assert_eq!(estimate.assignment.claims.len(), 2);
    assert!(estimate.assignment.unclaimed.is_empty());
    assert_eq!(estimate.removed_regions.len(), 2);
    assert!(approx_eq(estimate.size.length, 4.0));
    assert!(approx_eq(estimate.size.width, 2.0));
}

#[test]
fn pad_assignment_is_injective() {
    let mut fp = Footprint::new("DOUBLE_TRACE");
    fp.add_drawing(DrawingPrimitive::rectangle(p(-0.5, -0.5), p(0.5, 0.5)));
    fp.add_drawing(DrawingPrimitive::rectangle(p(-0.5, -0.5), p(0.5, 0.5)));
    fp.add_drawing(DrawingPrimitive::rectangle(p(-0.55, -0.5), p(0.5, 0.55)));
    fp.add_contact(ContactItem::smd(p(0.0, 0.0), 1.0, 1.0));
    fp.add_contact(ContactItem::smd(p(3.0, 0.0), 1.0, 1.0));

    let estimate = estimate_footprint_size(&fp).expect("sizing failed");
    let claims = &estimate.assignment.claims;
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].pad, 0);
    assert_eq!(estimate.assignment.unclaimed, vec![1]);
}

#[test]
fn rotated_pad_is_traced() {
    let mut fp = Footprint::new("ROTATED_PAD");
    fp.add_drawing(DrawingPrimitive::rectangle(p(-3.0, -3.0), p(3.0, 3.0)));
    fp.add_drawing(DrawingPrimitive::polygon(rotated_corners(2.0, 1.0, 90.0)));
    fp.add_contact(ContactItem::smd(p(0.0, 0.0), 2.0, 1.0).with_orientation(90.0));

    let estimate = estimate_footprint_size(&fp).expect("sizing failed");
    assert_eq!(estimate.assignment.claims.len(), 1);
    assert!(approx_eq(estimate.size.length, 6.0));
}

#[test]
fn isolated_mounting_hole_is_ignored() {
    let mut fp = Footprint::new("WITH_HOLE");
    fp.add_drawing(DrawingPrimitive::rectangle(p(0.0, 0.0), p(4.0, 2.0)));
    fp.add_drawing(DrawingPrimitive::circle(p(10.0, 1.0), 0.5));

    let estimate = estimate_footprint_size(&fp).expect("sizing failed");
    assert_eq!(estimate.removed_regions.len(), 1);
    assert!(approx_eq(estimate.size.length, 4.0));
    assert!(approx_eq(estimate.size.width, 2.0));
}

// =============================================================================
// Boundary Selection
// =============================================================================

fn body_with_lid(body_height: f64) -> Footprint {
    let mut fp = Footprint::new("LID");
    fp.add_drawing(DrawingPrimitive::rectangle(p(0.0, 0.0), p(10.0, body_height)));
    fp.add_drawing(DrawingPrimitive::segment(p(0.0, 10.0), p(10.0, 10.0)));
    fp
}

#[test]
fn dominant_region_defines_boundary() {
    let estimate = estimate_footprint_size(&body_with_lid(8.5)).expect("sizing failed");
    assert_eq!(estimate.source, BoundarySource::LargestRegion);
    assert!(approx_eq(estimate.size.length, 10.0));
    assert!(approx_eq(estimate.size.width, 8.5));
}

#[test]
fn small_region_falls_back_to_overall_envelope() {
    let estimate = estimate_footprint_size(&body_with_lid(7.5)).expect("sizing failed");
    assert_eq!(estimate.source, BoundarySource::Overall);
    assert!(approx_eq(estimate.size.length, 10.0));
    assert!(approx_eq(estimate.size.width, 10.0));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn length_is_never_shorter_than_width() {
    for (w, h) in [(1.0, 3.0), (3.0, 1.0), (2.5, 2.5), (0.4, 7.0)] {
        for degrees in [0.0, 15.0, 45.0, 90.0, 137.0] {
            let mut fp = Footprint::new("PROP");
            add_outline(&mut fp, &rotated_corners(w, h, degrees));
            let estimate = estimate_footprint_size(&fp).expect("sizing failed");
            assert!(estimate.size.length >= estimate.size.width);
            assert!((estimate.size.length - f64::max(w, h)).abs() < 1e-6);
        }
    }
}

#[test]
fn sizing_is_deterministic() {
    let mut fp = Footprint::new("MIXED");
    add_outline(&mut fp, &[p(0.0, 0.0), p(3.0, 0.0), p(3.0, 1.5), p(0.0, 1.5)]);
    fp.add_drawing(DrawingPrimitive::arc(p(1.0, 1.5), p(2.0, 1.5), 180.0));
    fp.add_drawing(DrawingPrimitive::circle(p(0.3, 0.3), 0.1));
    fp.add_drawing(DrawingPrimitive::rectangle(p(-0.6, 0.5), p(-0.2, 1.0)));
    fp.add_contact(ContactItem::smd(p(-0.4, 0.75), 0.4, 0.5));

    let first = estimate_footprint_size(&fp).expect("sizing failed");
    for _ in 0..5 {
        assert_eq!(estimate_footprint_size(&fp).expect("sizing failed"), first);
    }
}
