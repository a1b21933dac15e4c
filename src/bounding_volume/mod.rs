//! Bounding volumes.

#[doc(inline)]
pub use crate::bounding_volume::aabb::{Aabb, BOUNDS_LEN};
#[doc(inline)]
pub use crate::bounding_volume::bounding_volume::BoundingVolume;

#[doc(hidden)]
pub mod bounding_volume;

#[doc(hidden)]
pub mod aabb;
