use crate::math::{Point, Real};

/// Operations the hierarchy needs from the bounds it stores.
///
/// All tests are closed: volumes touching by their boundary intersect, and a volume contains
/// itself.
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "f32")] {
/// use dbvh3d::bounding_volume::{Aabb, BoundingVolume};
///
/// let a = Aabb::from_bounds([0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
/// let b = Aabb::from_bounds([1.0, 2.0, 0.0, 1.0, 0.0, 1.0]);
/// let union = a.merged(&b);
///
/// assert!(a.intersects(&b));
/// assert!(union.contains(&a) && union.contains(&b));
/// assert!(!a.contains(&union));
/// # }
/// ```
pub trait BoundingVolume {
    /// A point inside of this bounding volume, ideally its center.
    fn center(&self) -> Point<Real>;

    /// Do these two bounding volumes share at least one point?
    fn intersects(&self, other: &Self) -> bool;

    /// Is `other` completely inside of `self`?
    fn contains(&self, other: &Self) -> bool;

    /// Enlarges `self` in-place so that it also bounds `other`.
    fn merge(&mut self, other: &Self);

    /// The smallest bounding volume of this kind bounding both `self` and `other`.
    fn merged(&self, other: &Self) -> Self;
}
