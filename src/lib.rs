/*!
dbvh3d
========

**dbvh3d** is a dynamic bounding volume hierarchy over 3-dimensional
axis-aligned boxes, written with the rust programming language.

The index keeps one leaf per item, supports incremental insertion, removal
and refitting of moving items, and improves its own shape over time through
local tree rotations.

```
# #[cfg(feature = "f32")] {
use dbvh3d::bounding_volume::Aabb;
use dbvh3d::math::Point;
use dbvh3d::partitioning::Dbvh;

let boxes = [
    Aabb::new(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 1.0)),
    Aabb::new(Point::new(5.0, 5.0, 5.0), Point::new(6.0, 6.0, 6.0)),
];
let mut dbvh = Dbvh::with_provider(move |id: &usize| boxes[*id]);
dbvh.insert_all([0usize, 1]).unwrap();

assert_eq!(dbvh.contains_point(&Point::new(0.5, 0.5, 0.5)), vec![0]);
# }
```
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![deny(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.
#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unused_qualifications)]

#[cfg(all(feature = "f32", feature = "f64"))]
core::compile_error!("The `f32` and `f64` features are mutually exclusive.");

extern crate alloc;

#[macro_use]
extern crate approx;
extern crate num_traits as num;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod partitioning;
pub mod utils;

mod real {
    /// The scalar type used throughout this crate.
    #[cfg(feature = "f64")]
    pub use f64 as Real;

    /// The scalar type used throughout this crate.
    #[cfg(feature = "f32")]
    pub use f32 as Real;
}

/// Compilation flags dependent aliases for mathematical types.
pub mod math {
    pub use super::real::*;
    pub use na::{Point3, Vector3};

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The dimension of the space multiplied by two.
    ///
    /// This is the number of scalars of a bounds array `[xmin, xmax, ymin, ymax, zmin, zmax]`.
    pub const TWO_DIM: usize = DIM * 2;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;
}
