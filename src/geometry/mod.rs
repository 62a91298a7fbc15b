//! Planar geometry used by the sizing pipeline.
//!
//! Everything here is deterministic: no randomised algorithms, and ties are
//! always broken by input order.
//!
//! - [`Point`] — coordinates in millimetres
//! - [`Polyline`] / [`Polygon`] — open line work and closed outlines
//! - [`hull`] — convex hulls and minimum-area oriented rectangles
//! - [`ops`] — intersection predicates, convex clipping, line difference

pub mod hull;
pub mod ops;
mod point;
mod shape;

pub use hull::{convex_hull, minimum_area_rectangle, OrientedRect};
pub use point::Point;
pub use shape::{Polygon, Polyline, CIRCLE_SEGMENTS};
