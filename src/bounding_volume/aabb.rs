//! Axis Aligned Bounding Box.

use crate::bounding_volume::BoundingVolume;
use crate::math::{Point, Real, Vector, DIM, TWO_DIM};
use num::Bounded;

/// The number of scalars of the flat bounds layout `[xmin, xmax, ymin, ymax, zmin, zmax]`.
pub const BOUNDS_LEN: usize = TWO_DIM;

/// An Axis-Aligned Bounding Box (AABB).
///
/// An AABB is defined by its minimum and maximum corners. Its edges are always parallel to the
/// coordinate axes, which makes it very cheap to merge and to test against points and other boxes.
///
/// # Structure
///
/// - **mins**: The point with the smallest coordinates on each axis.
/// - **maxs**: The point with the largest coordinates on each axis.
/// - **Invariant**: `mins.x ≤ maxs.x`, `mins.y ≤ maxs.y` and `mins.z ≤ maxs.z` for any valid box.
///   See [`Aabb::is_valid`].
///
/// Boxes are closed: points lying exactly on a face are contained, and boxes touching by a face
/// intersect.
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "f32")] {
/// use dbvh3d::bounding_volume::Aabb;
/// use dbvh3d::math::Point;
///
/// let aabb = Aabb::new(Point::new(-0.5, -0.5, -0.5), Point::new(0.5, 0.5, 0.5));
///
/// assert!(aabb.contains_local_point(&Point::origin()));
/// assert_eq!(aabb.center(), Point::origin());
/// assert_eq!(aabb.extents().x, 1.0);
/// # }
/// ```
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Aabb {
    /// The point with minimum coordinates.
    pub mins: Point<Real>,
    /// The point with maximum coordinates.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// Creates a new AABB from its minimum and maximum corners.
    ///
    /// Each component of `mins` should be ≤ the corresponding component of `maxs`. This is not
    /// checked here, see [`Aabb::is_valid`].
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with inverted bounds.
    ///
    /// The resulting AABB has `mins` set to maximum values and `maxs` set to
    /// minimum values. It is the identity of [`BoundingVolume::merged`]: merging it with any
    /// box `b` gives back `b`. This is the "empty" bounds value.
    ///
    /// # Example
    ///
    /// ```rust
    /// # #[cfg(feature = "f32")] {
    /// use dbvh3d::bounding_volume::{Aabb, BoundingVolume};
    /// use dbvh3d::math::Point;
    ///
    /// let aabb = Aabb::new(Point::new(1.0, 2.0, 3.0), Point::new(4.0, 5.0, 6.0));
    /// assert!(!Aabb::new_invalid().is_valid());
    /// assert_eq!(Aabb::new_invalid().merged(&aabb), aabb);
    /// # }
    /// ```
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::max_value()).into(),
            Vector::repeat(-Real::max_value()).into(),
        )
    }

    /// Creates a new AABB from its center and half-extents.
    #[inline]
    pub fn from_half_extents(center: Point<Real>, half_extents: Vector<Real>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Creates a new AABB that tightly encloses a set of points.
    ///
    /// Returns [`Aabb::new_invalid`] if the iterator is empty.
    pub fn from_points<I>(pts: I) -> Self
    where
        I: IntoIterator<Item = Point<Real>>,
    {
        let mut result = Self::new_invalid();
        for pt in pts {
            result.take_point(pt);
        }
        result
    }

    /// Creates an AABB from the flat layout `[xmin, xmax, ymin, ymax, zmin, zmax]`.
    ///
    /// # Example
    ///
    /// ```rust
    /// # #[cfg(feature = "f32")] {
    /// use dbvh3d::bounding_volume::Aabb;
    /// use dbvh3d::math::Point;
    ///
    /// let aabb = Aabb::from_bounds([0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    /// assert_eq!(aabb.mins, Point::new(0.0, 2.0, 4.0));
    /// assert_eq!(aabb.maxs, Point::new(1.0, 3.0, 5.0));
    /// assert_eq!(aabb.to_bounds(), [0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    /// # }
    /// ```
    #[inline]
    pub fn from_bounds(bounds: [Real; BOUNDS_LEN]) -> Self {
        Self::new(
            Point::new(bounds[0], bounds[2], bounds[4]),
            Point::new(bounds[1], bounds[3], bounds[5]),
        )
    }

    /// The flat layout `[xmin, xmax, ymin, ymax, zmin, zmax]` of this AABB.
    #[inline]
    pub fn to_bounds(&self) -> [Real; BOUNDS_LEN] {
        [
            self.mins.x,
            self.maxs.x,
            self.mins.y,
            self.maxs.y,
            self.mins.z,
            self.maxs.z,
        ]
    }

    /// Is this a valid, non-empty box?
    ///
    /// A box is valid if all its coordinates are finite and `mins ≤ maxs` on every axis.
    /// Degenerate boxes (zero extent on some axes) are valid. [`Aabb::new_invalid`] is not.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.mins.coords.iter().chain(self.maxs.coords.iter()).all(|x| x.is_finite())
            && na::partial_le(&self.mins, &self.maxs)
    }

    /// Returns the center point of this AABB.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// Returns the half-extents of this AABB.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        let half: Real = na::convert::<f64, Real>(0.5);
        (self.maxs - self.mins) * half
    }

    /// The extents of this `Aabb`.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// Returns the volume of this AABB.
    #[inline]
    pub fn volume(&self) -> Real {
        let extents = self.extents();
        extents.x * extents.y * extents.z
    }

    /// The sum of the areas of three distinct faces of this `Aabb`.
    ///
    /// This is half the total area of the box boundary. The factor two doesn't matter when
    /// comparing costs, so this is the value used by the surface area heuristic.
    ///
    /// # Example
    ///
    /// ```rust
    /// # #[cfg(feature = "f32")] {
    /// use dbvh3d::bounding_volume::Aabb;
    ///
    /// let aabb = Aabb::from_bounds([0.0, 1.0, 0.0, 2.0, 0.0, 3.0]);
    /// assert_eq!(aabb.surface_area(), 1.0 * 2.0 + 2.0 * 3.0 + 3.0 * 1.0);
    /// # }
    /// ```
    #[inline]
    pub fn surface_area(&self) -> Real {
        let extents = self.extents();
        extents.x * (extents.y + extents.z) + extents.y * extents.z
    }

    /// The index of the axis along which this `Aabb` is the widest.
    ///
    /// Ties are resolved in favor of X, then Y, then Z.
    #[inline]
    pub fn largest_axis(&self) -> usize {
        let extents = self.extents();
        if extents.x >= extents.y && extents.x >= extents.z {
            0
        } else if extents.y >= extents.z {
            1
        } else {
            2
        }
    }

    /// Enlarges this `Aabb` so it also contains the point `pt`.
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// Returns this `Aabb` enlarged by `margin[i]` on both sides of the `i`-th axis.
    ///
    /// The margin can differ from one axis to another. Negative margins shrink the box.
    #[inline]
    #[must_use]
    pub fn loosened_by(&self, margin: &Vector<Real>) -> Self {
        Aabb {
            mins: self.mins - *margin,
            maxs: self.maxs + *margin,
        }
    }

    /// Does this AABB contains a point expressed in the same coordinate frame as `self`?
    #[inline]
    pub fn contains_local_point(&self, point: &Point<Real>) -> bool {
        for i in 0..DIM {
            if point[i] < self.mins[i] || point[i] > self.maxs[i] {
                return false;
            }
        }

        true
    }
}

impl BoundingVolume for Aabb {
    #[inline]
    fn center(&self) -> Point<Real> {
        self.center()
    }

    #[inline]
    fn intersects(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.maxs) && na::partial_ge(&self.maxs, &other.mins)
    }

    #[inline]
    fn contains(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.mins) && na::partial_ge(&self.maxs, &other.maxs)
    }

    #[inline]
    fn merge(&mut self, other: &Aabb) {
        self.mins = self.mins.inf(&other.mins);
        self.maxs = self.maxs.sup(&other.maxs);
    }

    #[inline]
    fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.inf(&other.mins),
            maxs: self.maxs.sup(&other.maxs),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Aabb;
    use crate::bounding_volume::BoundingVolume;
    use crate::math::{Point, Real, Vector};

    #[test]
    fn touching_boxes_intersect() {
        let a = Aabb::from_bounds([0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        let b = Aabb::from_bounds([1.0, 2.0, 0.0, 1.0, 0.0, 1.0]);
        let c = Aabb::from_bounds([1.5, 2.0, 0.0, 1.0, 0.0, 1.0]);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(a.contains_local_point(&Point::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn invalid_aabb_is_merge_identity() {
        let a = Aabb::from_bounds([0.0, 1.0, -2.0, 1.0, 3.0, 4.0]);
        assert_eq!(Aabb::new_invalid().merged(&a), a);
        assert_eq!(a.merged(&Aabb::new_invalid()), a);
        assert!(!Aabb::new_invalid().is_valid());
        assert!(a.is_valid());
    }

    #[test]
    fn validity_rejects_inverted_and_nan() {
        assert!(!Aabb::from_bounds([1.0, 0.0, 0.0, 1.0, 0.0, 1.0]).is_valid());
        assert!(!Aabb::from_bounds([0.0, 1.0, 0.0, Real::NAN, 0.0, 1.0]).is_valid());
        // Flat boxes are fine.
        assert!(Aabb::from_bounds([0.0, 0.0, 0.0, 1.0, 0.0, 1.0]).is_valid());
    }

    #[test]
    fn largest_axis_tie_break() {
        assert_eq!(Aabb::from_bounds([0.0, 1.0, 0.0, 1.0, 0.0, 1.0]).largest_axis(), 0);
        assert_eq!(Aabb::from_bounds([0.0, 1.0, 0.0, 2.0, 0.0, 2.0]).largest_axis(), 1);
        assert_eq!(Aabb::from_bounds([0.0, 1.0, 0.0, 1.0, 0.0, 2.0]).largest_axis(), 2);
    }

    #[test]
    fn merge_and_containment() {
        let mut a = Aabb::from_bounds([0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        let b = Aabb::from_bounds([2.0, 3.0, -1.0, 0.5, 0.0, 1.0]);
        let merged = a.merged(&b);
        a.merge(&b);

        assert_eq!(a, merged);
        assert_eq!(merged.to_bounds(), [0.0, 3.0, -1.0, 1.0, 0.0, 1.0]);
        assert!(merged.contains(&b));
        assert!(!b.contains(&merged));
        assert_eq!(merged.surface_area(), 3.0 * 2.0 + 2.0 * 1.0 + 1.0 * 3.0);
        assert_eq!(
            Aabb::from_points([Point::new(3.0, 1.0, 0.0), Point::new(0.0, -1.0, 1.0)]),
            merged
        );
    }

    #[test]
    fn loosened_by_vector() {
        let a = Aabb::from_bounds([0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        let b = a.loosened_by(&Vector::new(1.0, 0.0, 0.5));
        assert_eq!(b.to_bounds(), [-1.0, 2.0, 0.0, 1.0, -0.5, 1.5]);
    }
}
