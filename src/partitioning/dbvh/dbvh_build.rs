use super::{BoundsProvider, Dbvh, DbvhConfig, DbvhError, DbvhNode, DbvhNodeIndex};
use crate::bounding_volume::{Aabb, BoundingVolume};
use alloc::vec::Vec;
use core::hash::Hash;
use ordered_float::OrderedFloat;

impl<T: Clone + Eq + Hash, P: BoundsProvider<T>> Dbvh<T, P> {
    /// Builds a tree containing all the given items at once.
    ///
    /// This is faster than inserting them one by one, and results in a better tree. Fails with
    /// [`DbvhError::DuplicateItem`] if an item is repeated, and with
    /// [`DbvhError::InvalidBounds`] if an item has invalid bounds.
    pub fn from_items(provider: P, items: impl IntoIterator<Item = T>) -> Result<Self, DbvhError> {
        Self::from_items_with_config(provider, DbvhConfig::default(), items)
    }

    /// Builds a tree containing all the given items at once, with custom tuning parameters.
    ///
    /// See [`Dbvh::from_items`].
    pub fn from_items_with_config(
        provider: P,
        config: DbvhConfig,
        items: impl IntoIterator<Item = T>,
    ) -> Result<Self, DbvhError> {
        let mut result = Self::with_config(provider, config);
        let mut leaves = result.checked_leaves(items)?;
        result.build_from_leaves(&mut leaves);
        Ok(result)
    }
}

impl<T: Clone + Eq + Hash, P> Dbvh<T, P> {
    /// Fully rebuilds this tree from its current leaves.
    ///
    /// The leaves keep their cached bounds (the provider isn’t queried), but all the internal
    /// nodes are discarded and rebuilt top-down by recursive median splits along the axis of
    /// largest extent. This is useful after many insertions and removals left the tree
    /// unbalanced.
    pub fn rebuild(&mut self) {
        if self.is_empty() {
            return;
        }

        let order: Vec<_> = self.leaves(|_| true).collect();
        let mut nodes = core::mem::take(&mut self.nodes);
        let mut leaves: Vec<_> = order
            .into_iter()
            .filter_map(|id| {
                let node = nodes.try_remove(id.0)?;
                let item = node.item()?.clone();
                Some((item, node.aabb))
            })
            .collect();

        // Reuse the storage.
        nodes.clear();
        self.nodes = nodes;
        self.build_from_leaves(&mut leaves);

        log::debug!(
            "rebuilt a dbvh with {} leaves, depth: {}",
            self.len(),
            self.subtree_depth()
        );
    }

    fn build_from_leaves(&mut self, leaves: &mut [(T, Aabb)]) {
        self.nodes.clear();
        self.leaf_node_indices.clear();
        self.root = None;

        if leaves.is_empty() {
            return;
        }

        self.nodes.reserve(leaves.len() * 2 - 1);
        self.leaf_node_indices.reserve(leaves.len());
        self.root = Some(self.build_range(leaves, 0));
    }

    /// Builds the subtree containing `leaves`, with its root at depth `depth`.
    ///
    /// The parent of the returned node is left to `None`.
    fn build_range(&mut self, leaves: &mut [(T, Aabb)], depth: u32) -> DbvhNodeIndex {
        if let [(item, aabb)] = &*leaves {
            let leaf = self.alloc(DbvhNode::leaf(item.clone(), *aabb, None, depth));
            let _ = self.leaf_node_indices.insert(item.clone(), leaf);
            return leaf;
        }

        let range_aabb = leaves
            .iter()
            .fold(Aabb::new_invalid(), |acc, (_, aabb)| acc.merged(aabb));
        let axis = range_aabb.largest_axis();

        // The sort is stable so that leaves with the same coordinate keep their relative order.
        leaves.sort_by_key(|(_, aabb)| OrderedFloat(aabb.mins[axis]));

        let mid = leaves.len() / 2;
        let (left_leaves, right_leaves) = leaves.split_at_mut(mid);
        let left = self.build_range(left_leaves, depth + 1);
        let right = self.build_range(right_leaves, depth + 1);

        let leaf_count = self.nodes[left.0].leaf_count + self.nodes[right.0].leaf_count;
        let id = self.alloc(DbvhNode::internal(
            left, right, range_aabb, leaf_count, None, depth,
        ));
        self.nodes[left.0].parent = Some(id);
        self.nodes[right.0].parent = Some(id);
        id
    }
}
