pub use dbvh_config::DbvhConfig;
pub use dbvh_error::DbvhError;
pub use dbvh_item::{BoundsProvider, HasAabb, ItemAabb};
pub use dbvh_traverse::{Leaves, TraversalAction};
pub use dbvh_tree::{Dbvh, DbvhNode, DbvhNodeIndex, DbvhNodeKind};

mod dbvh_build;
mod dbvh_config;
mod dbvh_debug;
mod dbvh_error;
mod dbvh_insert;
mod dbvh_item;
mod dbvh_optimize;
mod dbvh_queries;
mod dbvh_refit;
mod dbvh_remove;
mod dbvh_traverse;
mod dbvh_tree;
mod dbvh_validation;
