use super::{Dbvh, DbvhNode, DbvhNodeIndex};
use alloc::vec::Vec;
use smallvec::SmallVec;

const TRAVERSAL_STACK_SIZE: usize = 32;

/// Iterator over the leaves of a [`Dbvh`], in depth-first order, left before right.
///
/// Created by [`Dbvh::leaves`].
pub struct Leaves<'a, T, Check: Fn(&DbvhNode<T>) -> bool> {
    nodes: &'a slab::Slab<DbvhNode<T>>,
    next: Option<DbvhNodeIndex>,
    stack: SmallVec<[DbvhNodeIndex; TRAVERSAL_STACK_SIZE]>,
    check: Check,
}

impl<'a, T, Check: Fn(&DbvhNode<T>) -> bool> Leaves<'a, T, Check> {
    fn new<P>(tree: &'a Dbvh<T, P>, check: Check) -> Self {
        let next = tree.root.filter(|root| check(&tree.nodes[root.0]));

        Leaves {
            nodes: &tree.nodes,
            next,
            stack: SmallVec::default(),
            check,
        }
    }
}

impl<T, Check: Fn(&DbvhNode<T>) -> bool> Iterator for Leaves<'_, T, Check> {
    type Item = DbvhNodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.next.is_none() {
                self.next = self.stack.pop();
            }

            let id = self.next.take()?;
            let node = &self.nodes[id.0];

            let Some((left, right)) = node.children() else {
                return Some(id);
            };

            if (self.check)(&self.nodes[left.0]) {
                self.next = Some(left);
            }

            if (self.check)(&self.nodes[right.0]) {
                if self.next.is_none() {
                    self.next = Some(right);
                } else {
                    self.stack.push(right);
                }
            }
        }
    }
}

/// Controls the execution flow of [`Dbvh::traverse`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraversalAction {
    /// The traversal will continue on the children of the tested node.
    Continue,
    /// The traversal will skip all descendants of the tested node.
    Prune,
    /// The traversal will exit immediately.
    EarlyExit,
}

impl<T, P> Dbvh<T, P> {
    /// Iterates through the leaves, in depth-first order.
    ///
    /// The `check_node` closure is called on every traversed node. If it returns `false` then the
    /// node and all its descendants won’t be iterated on. This is useful for pruning whole
    /// sub-trees based on a geometric predicate on the node’s AABB.
    ///
    /// Leaves are yielded as node indices, see [`Dbvh::item`] to get their item.
    pub fn leaves<F: Fn(&DbvhNode<T>) -> bool>(&self, check_node: F) -> Leaves<'_, T, F> {
        Leaves::new(self, check_node)
    }

    /// Traverses the tree in depth-first order, left before right.
    ///
    /// The closure is called on every visited node (internal and leaf) and decides whether the
    /// traversal continues into that node’s children, skips them, or stops altogether.
    pub fn traverse(
        &self,
        mut check_node: impl FnMut(DbvhNodeIndex, &DbvhNode<T>) -> TraversalAction,
    ) {
        let mut stack: SmallVec<[DbvhNodeIndex; TRAVERSAL_STACK_SIZE]> = SmallVec::new();
        stack.extend(self.root);

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];

            match check_node(id, node) {
                TraversalAction::Continue => {
                    if let Some((left, right)) = node.children() {
                        stack.push(right);
                        stack.push(left);
                    }
                }
                TraversalAction::Prune => {}
                TraversalAction::EarlyExit => return,
            }
        }
    }

    /// The internal nodes of this tree, every node appearing after both its children.
    pub(super) fn post_order(&self) -> Vec<DbvhNodeIndex> {
        let mut result = Vec::with_capacity(self.nodes.len() / 2);
        let mut stack: SmallVec<[(DbvhNodeIndex, bool); TRAVERSAL_STACK_SIZE]> = SmallVec::new();
        stack.extend(self.root.map(|root| (root, false)));

        while let Some((id, children_done)) = stack.pop() {
            let Some((left, right)) = self.children_of(id) else {
                continue;
            };

            if children_done {
                result.push(id);
            } else {
                stack.push((id, true));
                stack.push((right, false));
                stack.push((left, false));
            }
        }

        result
    }
}
