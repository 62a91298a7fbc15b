//! Closed regions and the ordered pool they live in.

use std::collections::BTreeSet;

use crate::geometry::Polygon;

/// Stable handle of a region within one sizing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(usize);

impl RegionId {
    /// Position at which the region was added to its pool.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Where a closed region came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionOrigin {
    /// A rectangle primitive.
    NativeRectangle,
    /// A circle primitive.
    NativeCircle,
    /// A polygon literal.
    NativePolygon,
    /// A ring assembled from open line work.
    MergedRing,
}

/// Geometric class of a closed region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeClass {
    /// Rectangle, possibly rotated.
    Rectangle,
    /// Circle.
    Circle,
    /// Any other simple polygon.
    Polygon,
}

/// A shape bounded by a simple closed curve.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedRegion {
    id: RegionId,
    shape: Polygon,
    origin: RegionOrigin,
    class: ShapeClass,
}

impl ClosedRegion {
    /// Handle of this region.
    #[must_use]
    pub const fn id(&self) -> RegionId {
        self.id
    }

    /// Outline.
    #[must_use]
    pub const fn shape(&self) -> &Polygon {
        &self.shape
    }

    /// Origin tag.
    #[must_use]
    pub const fn origin(&self) -> RegionOrigin {
        self.origin
    }

    /// Shape class.
    #[must_use]
    pub const fn class(&self) -> ShapeClass {
        self.class
    }

    /// Returns `true` for circles.
    #[must_use]
    pub fn is_circle(&self) -> bool {
        self.class == ShapeClass::Circle
    }
}

/// Insertion-ordered collection of closed regions with stable handles.
///
/// Removing regions never changes the handles of the ones that remain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionPool {
    regions: Vec<ClosedRegion>,
    next_id: usize,
}

impl RegionPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a region and returns its handle.
    pub fn push(&mut self, shape: Polygon, origin: RegionOrigin, class: ShapeClass) -> RegionId {
        let id = RegionId(self.next_id);
        self.next_id += 1;
        self.regions.push(ClosedRegion {
            id,
            shape,
            origin,
            class,
        });
        id
    }

    /// Regions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ClosedRegion> {
        self.regions.iter()
    }

    /// Looks up a region by handle.
    #[must_use]
    pub fn get(&self, id: RegionId) -> Option<&ClosedRegion> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns `true` if the pool holds no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Returns a copy of this pool without the given regions.
    #[must_use]
    pub fn without(&self, removed: &BTreeSet<RegionId>) -> Self {
        Self {
            regions: self
                .regions
                .iter()
                .filter(|r| !removed.contains(&r.id))
                .cloned()
                .collect(),
            next_id: self.next_id,
        }
    }

    /// The region with the largest area; the earliest wins ties.
    #[must_use]
    pub fn largest(&self) -> Option<&ClosedRegion> {
        self.regions.iter().fold(None, |best: Option<&ClosedRegion>, r| match best {
            Some(b) if b.shape.area() >= r.shape.area() => Some(b),
            _ => Some(r),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn square(size: f64) -> Polygon {
        Polygon::from_corners(Point::new(0.0, 0.0), Point::new(size, size))
    }

    #[test]
    fn handles_survive_removal() {
        let mut pool = RegionPool::new();
        let a = pool.push(square(1.0), RegionOrigin::NativeRectangle, ShapeClass::Rectangle);
        let b = pool.push(square(2.0), RegionOrigin::MergedRing, ShapeClass::Rectangle);
        let c = pool.push(square(3.0), RegionOrigin::NativeCircle, ShapeClass::Circle);

        let trimmed = pool.without(&BTreeSet::from([b]));
        assert_eq!(trimmed.len(), 2);
        assert!(trimmed.get(a).is_some());
        assert!(trimmed.get(b).is_none());
        assert_eq!(trimmed.get(c).map(ClosedRegion::origin), Some(RegionOrigin::NativeCircle));
    }

    #[test]
    fn largest_prefers_first_on_tie() {
        let mut pool = RegionPool::new();
        let a = pool.push(square(2.0), RegionOrigin::NativeRectangle, ShapeClass::Rectangle);
        pool.push(square(2.0), RegionOrigin::NativePolygon, ShapeClass::Rectangle);
        pool.push(square(1.0), RegionOrigin::NativePolygon, ShapeClass::Rectangle);
        assert_eq!(pool.largest().map(ClosedRegion::id), Some(a));
    }
}
