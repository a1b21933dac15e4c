use super::{BoundsProvider, Dbvh, DbvhError, DbvhNodeIndex};
use alloc::vec::Vec;
use core::hash::Hash;

impl<T, P> Dbvh<T, P> {
    /// Recomputes the bounds and leaf counts of `id` and its ancestors.
    ///
    /// The propagation stops at the first node left unchanged.
    pub(super) fn refit_ancestors(&mut self, id: DbvhNodeIndex) {
        let mut curr = Some(id);

        while let Some(id) = curr {
            if !self.recompute_internal(id) {
                break;
            }
            curr = self.nodes[id.0].parent;
        }
    }

    /// Recomputes every internal node from its children, leaves first.
    fn refit_internal_nodes(&mut self) {
        for id in self.post_order() {
            let _ = self.recompute_internal(id);
        }
    }
}

impl<T: Eq + Hash, P: BoundsProvider<T>> Dbvh<T, P> {
    /// Reads the current bounds of `item` from the provider and updates the tree accordingly.
    ///
    /// This must be called whenever a stored item moves or changes size; queries only see the
    /// bounds cached at the last insertion or refit. This runs in `O(depth)`.
    ///
    /// Fails with [`DbvhError::UnknownItem`] if the item isn’t stored, and with
    /// [`DbvhError::InvalidBounds`] if its new bounds are invalid. The tree is left unchanged in
    /// both cases.
    pub fn refit_item(&mut self, item: &T) -> Result<(), DbvhError> {
        let Some(leaf) = self.leaf_node_indices.get(item).copied() else {
            return Err(DbvhError::UnknownItem);
        };

        let aabb = self.provider.bounds(item);
        if !aabb.is_valid() {
            log::debug!("rejected invalid refit bounds: {:?}", aabb);
            return Err(DbvhError::InvalidBounds(aabb));
        }

        let node = &mut self.nodes[leaf.0];
        if node.aabb == aabb {
            return Ok(());
        }
        node.aabb = aabb;
        let parent = node.parent;

        if let Some(parent) = parent {
            self.refit_ancestors(parent);
        }

        Ok(())
    }

    /// Refits several items at once.
    ///
    /// Every item is checked before any modification: if one of them is unknown or has invalid
    /// bounds, the error is returned and the tree is left unchanged.
    pub fn refit_items<'a>(
        &mut self,
        items: impl IntoIterator<Item = &'a T>,
    ) -> Result<(), DbvhError>
    where
        T: 'a,
    {
        let updates = items
            .into_iter()
            .map(|item| {
                let leaf = self
                    .leaf_node_indices
                    .get(item)
                    .copied()
                    .ok_or(DbvhError::UnknownItem)?;
                let aabb = self.provider.bounds(item);

                if aabb.is_valid() {
                    Ok((leaf, aabb))
                } else {
                    log::debug!("rejected invalid refit bounds: {:?}", aabb);
                    Err(DbvhError::InvalidBounds(aabb))
                }
            })
            .collect::<Result<Vec<_>, DbvhError>>()?;

        for (leaf, aabb) in updates {
            let node = &mut self.nodes[leaf.0];
            if node.aabb != aabb {
                node.aabb = aabb;
                let parent = node.parent;

                if let Some(parent) = parent {
                    self.refit_ancestors(parent);
                }
            }
        }

        Ok(())
    }

    /// Re-reads the bounds of every item, then recomputes all the internal nodes in `O(n)`.
    ///
    /// Fails with [`DbvhError::InvalidBounds`], leaving the tree unchanged, if any item now has
    /// invalid bounds.
    pub fn refit_all(&mut self) -> Result<(), DbvhError> {
        let updates = self
            .leaf_node_indices
            .iter()
            .map(|(item, leaf)| {
                let aabb = self.provider.bounds(item);

                if aabb.is_valid() {
                    Ok((*leaf, aabb))
                } else {
                    log::debug!("rejected invalid refit bounds: {:?}", aabb);
                    Err(DbvhError::InvalidBounds(aabb))
                }
            })
            .collect::<Result<Vec<_>, DbvhError>>()?;

        for (leaf, aabb) in updates {
            self.nodes[leaf.0].aabb = aabb;
        }

        self.refit_internal_nodes();
        Ok(())
    }
}
