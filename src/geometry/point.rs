//! 2D points in footprint-local millimetre space.

use std::ops::{Add, Mul, Sub};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A 2D point (or vector) in millimetres.
///
/// Serialised as a two-element `[x, y]` array, matching the normalised
/// board-data documents this crate consumes. Vector arithmetic goes through
/// [`DVec2`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    /// X coordinate (mm).
    pub x: f64,
    /// Y coordinate (mm).
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This point as a `glam` vector.
    #[must_use]
    pub const fn as_dvec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.as_dvec2().distance(other.as_dvec2())
    }

    /// Length of this point interpreted as a vector.
    #[must_use]
    pub fn length(self) -> f64 {
        self.as_dvec2().length()
    }

    /// Dot product.
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.as_dvec2().dot(other.as_dvec2())
    }

    /// Z component of the 3D cross product.
    #[must_use]
    pub fn cross(self, other: Self) -> f64 {
        self.as_dvec2().perp_dot(other.as_dvec2())
    }

    /// Rotates this point counter-clockwise about `pivot` by `degrees`.
    #[must_use]
    pub fn rotate_about(self, pivot: Self, degrees: f64) -> Self {
        let turned = DVec2::from_angle(degrees.to_radians()).rotate((self - pivot).as_dvec2());
        pivot + Self::from(turned)
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Exact hashable key for endpoint matching.
    ///
    /// `-0.0` and `0.0` map to the same key.
    #[must_use]
    pub fn key(self) -> (u64, u64) {
        let norm = |v: f64| if v == 0.0 { 0.0_f64 } else { v };
        (norm(self.x).to_bits(), norm(self.y).to_bits())
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        p.as_dvec2()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        (self.as_dvec2() + rhs.as_dvec2()).into()
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        (self.as_dvec2() - rhs.as_dvec2()).into()
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        (self.as_dvec2() * rhs).into()
    }
}
