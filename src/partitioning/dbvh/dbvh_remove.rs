use super::{Dbvh, DbvhNodeKind};
use core::hash::Hash;

impl<T: Eq + Hash, P> Dbvh<T, P> {
    /// Removes `item` from this tree.
    ///
    /// The leaf’s sibling takes the place of their common parent. Returns `false`, leaving the
    /// tree unchanged, if the item isn’t stored in this tree.
    pub fn remove(&mut self, item: &T) -> bool {
        let Some(leaf) = self.leaf_node_indices.remove(item) else {
            return false;
        };

        let leaf_node = self.nodes.remove(leaf.0);

        let Some(parent) = leaf_node.parent else {
            // The leaf was the root.
            self.root = None;
            return true;
        };

        let parent_node = self.nodes.remove(parent.0);
        let sibling = match parent_node.kind {
            DbvhNodeKind::Internal { left, right } => {
                if left == leaf {
                    right
                } else {
                    left
                }
            }
            DbvhNodeKind::Leaf { .. } => unreachable!("the parent of a leaf must be internal"),
        };

        let grandparent = parent_node.parent;
        self.replace_child(grandparent, parent, sibling);
        self.nodes[sibling.0].parent = grandparent;
        self.set_subtree_depth(sibling, parent_node.depth);

        if let Some(grandparent) = grandparent {
            self.refit_ancestors(grandparent);
        }

        true
    }

    /// Removes every item of `items` from this tree, ignoring the ones that aren’t stored.
    ///
    /// Returns the number of items actually removed.
    pub fn remove_all<'a>(&mut self, items: impl IntoIterator<Item = &'a T>) -> usize
    where
        T: 'a,
    {
        items.into_iter().filter(|item| self.remove(item)).count()
    }
}
