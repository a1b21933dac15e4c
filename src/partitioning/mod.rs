//! Spatial partitioning tools.

pub use self::dbvh::{
    BoundsProvider, Dbvh, DbvhConfig, DbvhError, DbvhNode, DbvhNodeIndex, DbvhNodeKind, HasAabb,
    ItemAabb, Leaves, TraversalAction,
};

mod dbvh;
