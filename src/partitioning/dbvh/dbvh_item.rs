use crate::bounding_volume::Aabb;
use alloc::rc::Rc;
use alloc::sync::Arc;

/// Something that reads the current bounds of the items stored in a [`Dbvh`](super::Dbvh).
///
/// The tree caches these bounds in its leaves. They are re-read only on insertion and on
/// explicit refits.
pub trait BoundsProvider<T> {
    /// The current bounds of `item`.
    fn bounds(&self, item: &T) -> Aabb;
}

impl<T, F: Fn(&T) -> Aabb> BoundsProvider<T> for F {
    #[inline]
    fn bounds(&self, item: &T) -> Aabb {
        self(item)
    }
}

/// An item that knows its own axis-aligned bounds.
pub trait HasAabb {
    /// The current bounds of this item.
    fn aabb(&self) -> Aabb;
}

impl<T: HasAabb + ?Sized> HasAabb for &T {
    #[inline]
    fn aabb(&self) -> Aabb {
        (**self).aabb()
    }
}

impl<T: HasAabb + ?Sized> HasAabb for Rc<T> {
    #[inline]
    fn aabb(&self) -> Aabb {
        (**self).aabb()
    }
}

impl<T: HasAabb + ?Sized> HasAabb for Arc<T> {
    #[inline]
    fn aabb(&self) -> Aabb {
        (**self).aabb()
    }
}

impl HasAabb for Aabb {
    #[inline]
    fn aabb(&self) -> Aabb {
        *self
    }
}

/// The bounds provider asking each item for its own bounds through [`HasAabb`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemAabb;

impl<T: HasAabb> BoundsProvider<T> for ItemAabb {
    #[inline]
    fn bounds(&self, item: &T) -> Aabb {
        item.aabb()
    }
}
