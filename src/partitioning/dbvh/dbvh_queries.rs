use super::Dbvh;
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real, Vector};
use alloc::vec::Vec;

impl<T: Clone, P> Dbvh<T, P> {
    /// The items whose cached bounds contain `point`.
    ///
    /// Results are in depth-first order, left before right.
    pub fn contains_point(&self, point: &Point<Real>) -> Vec<T> {
        self.contains_point_with_tolerance(point, &Vector::zeros())
    }

    /// The items whose cached bounds, enlarged by `epsilon` along each axis, contain `point`.
    pub fn contains_point_with_tolerance(
        &self,
        point: &Point<Real>,
        epsilon: &Vector<Real>,
    ) -> Vec<T> {
        self.leaves(|node| node.aabb.loosened_by(epsilon).contains_local_point(point))
            .filter_map(|leaf| self.item(leaf).cloned())
            .collect()
    }

    /// The items whose cached bounds intersect `aabb`.
    ///
    /// Touching boxes are considered intersecting. Results are in depth-first order, left
    /// before right.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Vec<T> {
        self.intersect_aabb_with_tolerance(aabb, &Vector::zeros())
    }

    /// The items whose cached bounds, enlarged by `epsilon` along each axis, intersect `aabb`.
    pub fn intersect_aabb_with_tolerance(&self, aabb: &Aabb, epsilon: &Vector<Real>) -> Vec<T> {
        self.leaves(|node| node.aabb.loosened_by(epsilon).intersects(aabb))
            .filter_map(|leaf| self.item(leaf).cloned())
            .collect()
    }
}
