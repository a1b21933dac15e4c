use super::{BoundsProvider, Dbvh, DbvhNodeIndex, DbvhNodeKind};
use crate::bounding_volume::BoundingVolume;
use crate::utils::hashset::HashSet;
use core::fmt::Debug;
use core::hash::Hash;

impl<T: Eq + Hash + Debug, P> Dbvh<T, P> {
    /// Counts the number of leaves that can be reached from the node `id`.
    ///
    /// This is mostly a utility for debugging.
    pub fn reachable_leaf_count(&self, id: DbvhNodeIndex) -> u32 {
        match self.nodes[id.0].kind {
            DbvhNodeKind::Leaf { .. } => 1,
            DbvhNodeKind::Internal { left, right } => {
                self.reachable_leaf_count(left) + self.reachable_leaf_count(right)
            }
        }
    }

    /// Panics if the tree isn’t well-formed.
    ///
    /// The tree is well-formed if it is topologically correct (every child points back to its
    /// parent, no node is reachable twice, every stored node is reachable), if the cached depths
    /// and leaf counts are exact, if every internal node bounds are exactly the union of its
    /// children bounds, and if the item lookup table points to the right leaves.
    pub fn assert_well_formed(&self) {
        let Some(root) = self.root else {
            assert!(self.nodes.is_empty(), "Empty tree with allocated nodes.");
            assert!(self.leaf_node_indices.is_empty());
            return;
        };

        let root_node = &self.nodes[root.0];
        assert_eq!(root_node.parent, None, "The root must not have a parent.");
        assert_eq!(root_node.depth, 0);

        let mut loop_detection = HashSet::default();
        let leaf_count = self.assert_well_formed_recurse(root, &mut loop_detection);

        assert_eq!(
            loop_detection.len(),
            self.nodes.len(),
            "Some nodes aren’t reachable from the root."
        );
        assert_eq!(leaf_count as usize, self.leaf_node_indices.len());
        assert_eq!(self.len(), self.leaf_node_indices.len());
    }

    fn assert_well_formed_recurse(
        &self,
        id: DbvhNodeIndex,
        loop_detection: &mut HashSet<DbvhNodeIndex>,
    ) -> u32 {
        if !loop_detection.insert(id) {
            panic!("Detected loop. Node {:?} visited twice.", id);
        }

        let node = &self.nodes[id.0];

        match &node.kind {
            DbvhNodeKind::Leaf { item } => {
                assert_eq!(node.leaf_count, 1);
                assert_eq!(
                    self.leaf_node_indices.get(item),
                    Some(&id),
                    "Leaf of {:?} not registered.",
                    item
                );
                1
            }
            DbvhNodeKind::Internal { left, right } => {
                let (left, right) = (*left, *right);
                assert_ne!(left, right);

                for child in [left, right] {
                    let child_node = &self.nodes[child.0];
                    assert_eq!(child_node.parent, Some(id));
                    assert_eq!(child_node.depth, node.depth + 1);
                }

                let calculated_leaf_count = self.assert_well_formed_recurse(left, loop_detection)
                    + self.assert_well_formed_recurse(right, loop_detection);
                let left_node = &self.nodes[left.0];
                let right_node = &self.nodes[right.0];

                assert_eq!(node.leaf_count, left_node.leaf_count + right_node.leaf_count);
                assert_eq!(node.leaf_count, calculated_leaf_count);
                assert_eq!(node.aabb, left_node.aabb.merged(&right_node.aabb));
                calculated_leaf_count
            }
        }
    }
}

impl<T: Eq + Hash + Debug, P: BoundsProvider<T>> Dbvh<T, P> {
    /// Panics if the bounds cached by any leaf differ from its item bounds given by the provider.
    ///
    /// This only holds as long as every moved item was refit.
    pub fn assert_leaves_match_provider(&self) {
        for (item, leaf) in self.leaf_node_indices.iter() {
            assert_eq!(
                self.nodes[leaf.0].aabb,
                self.provider.bounds(item),
                "Outdated bounds for {:?}.",
                item
            );
        }
    }
}
