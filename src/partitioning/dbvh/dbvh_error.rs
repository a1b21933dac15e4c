use crate::bounding_volume::Aabb;

/// Errors returned by the fallible mutations of a [`Dbvh`](super::Dbvh).
///
/// Whenever one of these is returned, the tree is left unchanged.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq)]
pub enum DbvhError {
    /// The item is already stored in the tree, or appears twice in the same batch.
    #[error("the item is already present in the tree")]
    DuplicateItem,
    /// The item isn’t stored in the tree.
    #[error("the item is not present in the tree")]
    UnknownItem,
    /// The bounds of the item are inverted, empty, or contain non-finite values.
    #[error("the item bounds are invalid: {0:?}")]
    InvalidBounds(Aabb),
}
