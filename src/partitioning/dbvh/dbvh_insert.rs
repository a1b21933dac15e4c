use super::{BoundsProvider, Dbvh, DbvhError, DbvhNode, DbvhNodeIndex, DbvhNodeKind};
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::DEFAULT_EPSILON;
use crate::utils::hashset::HashSet;
use alloc::vec::Vec;
use core::hash::Hash;

impl<T: Clone + Eq + Hash, P: BoundsProvider<T>> Dbvh<T, P> {
    /// Inserts a new item into this tree.
    ///
    /// The item’s bounds are read from the provider and cached into its new leaf. The leaf is
    /// placed next to the existing leaf reached by descending, at each internal node, into the
    /// child that would grow the least (in terms of surface area) by absorbing the new bounds.
    ///
    /// Fails with [`DbvhError::DuplicateItem`] if the item is already stored, and with
    /// [`DbvhError::InvalidBounds`] if its bounds are invalid. The tree is left unchanged in
    /// both cases.
    pub fn insert(&mut self, item: T) -> Result<(), DbvhError> {
        if self.leaf_node_indices.contains_key(&item) {
            log::debug!("rejected the insertion of an item already present in the tree");
            return Err(DbvhError::DuplicateItem);
        }

        let aabb = self.checked_bounds(&item)?;
        self.insert_unchecked(item, aabb);
        Ok(())
    }

    /// Inserts every item from `items`, one after the other.
    ///
    /// The whole batch is validated before anything is inserted: if any item is already stored
    /// (or appears twice in the batch), or has invalid bounds, an error is returned and the tree
    /// is left unchanged. Returns the number of inserted items.
    pub fn insert_all(&mut self, items: impl IntoIterator<Item = T>) -> Result<usize, DbvhError> {
        let leaves = self.checked_leaves(items)?;
        let count = leaves.len();

        for (item, aabb) in leaves {
            self.insert_unchecked(item, aabb);
        }

        Ok(count)
    }

    /// Reads and validates the bounds of `item`.
    pub(super) fn checked_bounds(&self, item: &T) -> Result<Aabb, DbvhError> {
        let aabb = self.provider.bounds(item);

        if aabb.is_valid() {
            Ok(aabb)
        } else {
            log::debug!("rejected invalid item bounds: {:?}", aabb);
            Err(DbvhError::InvalidBounds(aabb))
        }
    }

    /// Pairs each item with its bounds, checking none of them is stored already or repeated.
    pub(super) fn checked_leaves(
        &self,
        items: impl IntoIterator<Item = T>,
    ) -> Result<Vec<(T, Aabb)>, DbvhError> {
        let leaves = items
            .into_iter()
            .map(|item| {
                let aabb = self.checked_bounds(&item)?;
                Ok((item, aabb))
            })
            .collect::<Result<Vec<_>, DbvhError>>()?;

        {
            let mut seen = HashSet::default();
            for (item, _) in &leaves {
                if self.leaf_node_indices.contains_key(item) || !seen.insert(item) {
                    log::debug!("rejected a batch containing an item already present in the tree");
                    return Err(DbvhError::DuplicateItem);
                }
            }
        }

        Ok(leaves)
    }

    pub(super) fn insert_unchecked(&mut self, item: T, aabb: Aabb) {
        let Some(root) = self.root else {
            let leaf = self.alloc(DbvhNode::leaf(item.clone(), aabb, None, 0));
            let _ = self.leaf_node_indices.insert(item, leaf);
            self.root = Some(leaf);
            return;
        };

        // Find the leaf the new item will be paired with.
        let mut curr = root;
        while let Some((left, right)) = self.children_of(curr) {
            curr = self.choose_insertion_child(left, right, &aabb);
        }

        let sibling = curr;
        let sibling_node = &self.nodes[sibling.0];
        let parent = sibling_node.parent;
        let depth = sibling_node.depth;
        let sibling_aabb = sibling_node.aabb;
        let merged = sibling_aabb.merged(&aabb);

        // The new internal node takes the place of the sibling. Its children are sorted along
        // the largest axis of their union.
        let internal = self.alloc(DbvhNode::internal(
            sibling, sibling, merged, 2, parent, depth,
        ));
        let leaf = self.alloc(DbvhNode::leaf(item.clone(), aabb, Some(internal), depth + 1));
        let _ = self.leaf_node_indices.insert(item, leaf);

        let axis = merged.largest_axis();
        let (left, right) = if aabb.mins[axis] < sibling_aabb.mins[axis] {
            (leaf, sibling)
        } else {
            (sibling, leaf)
        };
        self.nodes[internal.0].kind = DbvhNodeKind::Internal { left, right };

        let sibling_node = &mut self.nodes[sibling.0];
        sibling_node.parent = Some(internal);
        sibling_node.depth = depth + 1;
        self.replace_child(parent, sibling, internal);

        if let Some(parent) = parent {
            self.refit_ancestors(parent);
        }
    }

    /// Picks the child of an internal node to descend into while inserting `aabb`.
    fn choose_insertion_child(
        &self,
        left: DbvhNodeIndex,
        right: DbvhNodeIndex,
        aabb: &Aabb,
    ) -> DbvhNodeIndex {
        let left_node = &self.nodes[left.0];
        let right_node = &self.nodes[right.0];
        let left_area = left_node.aabb.merged(aabb).surface_area();
        let right_area = right_node.aabb.merged(aabb).surface_area();

        if relative_eq!(
            left_area,
            right_area,
            epsilon = DEFAULT_EPSILON,
            max_relative = self.config.area_tie_epsilon
        ) {
            if right_node.leaf_count < left_node.leaf_count {
                right
            } else {
                left
            }
        } else if right_area < left_area {
            right
        } else {
            left
        }
    }
}
