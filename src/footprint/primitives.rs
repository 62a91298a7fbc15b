//! Drawing primitives and contacts that make up a footprint.
//!
//! These types mirror the normalised board-data model produced upstream.
//! Coordinates are millimetres in footprint-local space.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// A raw 2D drawing primitive from a footprint's silkscreen, assembly or
/// courtyard layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawingPrimitive {
    /// Straight line segment.
    Segment {
        /// Start point.
        start: Point,
        /// End point.
        end: Point,
    },

    /// Circular arc from `start` to `end`.
    Arc {
        /// Start point.
        start: Point,
        /// End point.
        end: Point,
        /// Sweep angle in degrees; positive runs counter-clockwise.
        #[serde(alias = "angle")]
        sweep_angle: f64,
    },

    /// Full circle.
    Circle {
        /// Centre point.
        center: Point,
        /// Radius in mm.
        radius: f64,
    },

    /// Axis-aligned rectangle given by two opposite corners.
    Rectangle {
        /// First corner.
        #[serde(alias = "start")]
        corner_a: Point,
        /// Opposite corner.
        #[serde(alias = "end")]
        corner_b: Point,
    },

    /// Closed polygon literal.
    Polygon {
        /// Vertices in drawing order.
        points: Vec<Point>,
    },
}

impl DrawingPrimitive {
    /// Creates a line segment.
    #[must_use]
    pub const fn segment(start: Point, end: Point) -> Self {
        Self::Segment { start, end }
    }

    /// Creates an arc.
    #[must_use]
    pub const fn arc(start: Point, end: Point, sweep_angle: f64) -> Self {
        Self::Arc {
            start,
            end,
            sweep_angle,
        }
    }

    /// Creates a circle.
    #[must_use]
    pub const fn circle(center: Point, radius: f64) -> Self {
        Self::Circle { center, radius }
    }

    /// Creates a rectangle from two opposite corners.
    #[must_use]
    pub const fn rectangle(corner_a: Point, corner_b: Point) -> Self {
        Self::Rectangle { corner_a, corner_b }
    }

    /// Creates a polygon literal.
    #[must_use]
    pub const fn polygon(points: Vec<Point>) -> Self {
        Self::Polygon { points }
    }

    /// Returns `true` if every coordinate and scalar is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Segment { start, end } => start.is_finite() && end.is_finite(),
            Self::Arc {
                start,
                end,
                sweep_angle,
            } => start.is_finite() && end.is_finite() && sweep_angle.is_finite(),
            Self::Circle { center, radius } => center.is_finite() && radius.is_finite(),
            Self::Rectangle { corner_a, corner_b } => corner_a.is_finite() && corner_b.is_finite(),
            Self::Polygon { points } => points.iter().all(|p| p.is_finite()),
        }
    }

    /// Short name of the primitive kind, for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Segment { .. } => "segment",
            Self::Arc { .. } => "arc",
            Self::Circle { .. } => "circle",
            Self::Rectangle { .. } => "rectangle",
            Self::Polygon { .. } => "polygon",
        }
    }
}

/// Electrical/mechanical kind of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContactKind {
    /// Surface-mount pad.
    #[default]
    #[serde(rename = "SMD")]
    Smd,
    /// Plated through-hole.
    #[serde(rename = "PTH")]
    Pth,
    /// Non-plated through-hole.
    #[serde(rename = "NPTH")]
    Npth,
}

/// Pad dimensions before rotation.
///
/// Serialised as a two-element `[width, height]` array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct ContactSize {
    /// Extent along the pad's local X axis (mm).
    pub width: f64,
    /// Extent along the pad's local Y axis (mm).
    pub height: f64,
}

impl From<[f64; 2]> for ContactSize {
    fn from([width, height]: [f64; 2]) -> Self {
        Self { width, height }
    }
}

impl From<ContactSize> for [f64; 2] {
    fn from(s: ContactSize) -> Self {
        [s.width, s.height]
    }
}

/// A pad (solderable contact) of a footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactItem {
    /// Contact kind.
    #[serde(rename = "type", default)]
    pub kind: ContactKind,

    /// Centre of the pad.
    pub center: Point,

    /// Unrotated pad size.
    pub size: ContactSize,

    /// Rotation about the centre, in degrees counter-clockwise.
    #[serde(default)]
    pub orientation: f64,

    /// Solder mask clearance in mm. `None` when the mask is disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solder_mask_clearance: Option<f64>,
}

impl ContactItem {
    /// Creates an SMD pad.
    #[must_use]
    pub const fn smd(center: Point, width: f64, height: f64) -> Self {
        Self {
            kind: ContactKind::Smd,
            center,
            size: ContactSize { width, height },
            orientation: 0.0,
            solder_mask_clearance: None,
        }
    }

    /// Creates a plated through-hole pad.
    #[must_use]
    pub const fn through_hole(center: Point, width: f64, height: f64) -> Self {
        Self {
            kind: ContactKind::Pth,
            center,
            size: ContactSize { width, height },
            orientation: 0.0,
            solder_mask_clearance: None,
        }
    }

    /// Returns the pad rotated by `degrees`.
    #[must_use]
    pub const fn with_orientation(mut self, degrees: f64) -> Self {
        self.orientation = degrees;
        self
    }

    /// Returns `true` if every coordinate and scalar is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.center.is_finite()
            && self.size.width.is_finite()
            && self.size.height.is_finite()
            && self.orientation.is_finite()
    }
}
