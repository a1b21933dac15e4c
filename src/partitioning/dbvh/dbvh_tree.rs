use super::{DbvhConfig, ItemAabb};
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::Real;
use crate::utils::hashmap::HashMap;
use core::fmt;
use core::hash::Hash;
use slab::Slab;
use smallvec::SmallVec;

/// An index identifying a single node of a [`Dbvh`].
///
/// Node indices are only stable until the next structural change of the tree (insertion,
/// removal, rotation or rebuild). Items are the stable handles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DbvhNodeIndex(pub(super) usize);

impl DbvhNodeIndex {
    /// The raw slot of this node in the tree storage.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// The payload of a [`DbvhNode`]: either a single item, or exactly two children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DbvhNodeKind<T> {
    /// A leaf holding one item.
    Leaf {
        /// The item stored by this leaf.
        item: T,
    },
    /// An internal node. Both children are always present.
    Internal {
        /// The left child.
        left: DbvhNodeIndex,
        /// The right child.
        right: DbvhNodeIndex,
    },
}

/// The node (internal or leaf) of a [`Dbvh`].
#[derive(Clone, Debug)]
pub struct DbvhNode<T> {
    /// Cached bounds. For a leaf, the item bounds at the time of its last insertion or refit.
    /// For an internal node, the union of its children bounds.
    pub(super) aabb: Aabb,
    /// `None` only for the root.
    pub(super) parent: Option<DbvhNodeIndex>,
    /// Distance from the root (the root has depth 0).
    pub(super) depth: u32,
    /// Number of leaves in the subtree rooted at this node (1 for a leaf).
    pub(super) leaf_count: u32,
    pub(super) kind: DbvhNodeKind<T>,
}

impl<T> DbvhNode<T> {
    #[inline]
    pub(super) fn leaf(item: T, aabb: Aabb, parent: Option<DbvhNodeIndex>, depth: u32) -> Self {
        Self {
            aabb,
            parent,
            depth,
            leaf_count: 1,
            kind: DbvhNodeKind::Leaf { item },
        }
    }

    #[inline]
    pub(super) fn internal(
        left: DbvhNodeIndex,
        right: DbvhNodeIndex,
        aabb: Aabb,
        leaf_count: u32,
        parent: Option<DbvhNodeIndex>,
        depth: u32,
    ) -> Self {
        Self {
            aabb,
            parent,
            depth,
            leaf_count,
            kind: DbvhNodeKind::Internal { left, right },
        }
    }

    /// This node’s AABB.
    #[inline]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// The parent of this node, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<DbvhNodeIndex> {
        self.parent
    }

    /// The distance between this node and the root.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// The number of leaves of the subtree rooted at this node.
    #[inline]
    pub fn leaf_count(&self) -> u32 {
        self.leaf_count
    }

    /// The payload of this node.
    #[inline]
    pub fn kind(&self) -> &DbvhNodeKind<T> {
        &self.kind
    }

    /// Is this node a leaf?
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, DbvhNodeKind::Leaf { .. })
    }

    /// Is this node the root of its tree?
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// If this node is a leaf, the item it holds.
    #[inline]
    pub fn item(&self) -> Option<&T> {
        match &self.kind {
            DbvhNodeKind::Leaf { item } => Some(item),
            DbvhNodeKind::Internal { .. } => None,
        }
    }

    /// If this node is internal, its `(left, right)` children.
    #[inline]
    pub fn children(&self) -> Option<(DbvhNodeIndex, DbvhNodeIndex)> {
        match self.kind {
            DbvhNodeKind::Internal { left, right } => Some((left, right)),
            DbvhNodeKind::Leaf { .. } => None,
        }
    }
}

/// A dynamic Bounding Volume Hierarchy over items with 3D axis-aligned bounds.
///
/// Each item is stored in exactly one leaf together with a cached copy of its bounds. Internal
/// nodes have exactly two children and cache the union of their bounds, their depth, and the
/// number of leaves below them. Nodes live in an arena and refer to their parent by index, so
/// bounds can be propagated upward in `O(depth)`.
///
/// Item bounds are read through the [`BoundsProvider`](super::BoundsProvider) given at
/// construction. They are read on insertion and on explicit refits only: when an item moves,
/// call [`Dbvh::refit_item`] (or [`Dbvh::refit_all`]) before querying. Call [`Dbvh::optimize`]
/// periodically (e.g. once per frame) to keep the tree tight, or [`Dbvh::rebuild`] after large
/// changes.
///
/// The index is single-threaded: every mutation takes `&mut self`. Wrap it into a lock to share
/// it between threads.
#[derive(Clone)]
pub struct Dbvh<T, P = ItemAabb> {
    pub(super) nodes: Slab<DbvhNode<T>>,
    pub(super) root: Option<DbvhNodeIndex>,
    // Lets us find the leaf of an item without searching the tree.
    pub(super) leaf_node_indices: HashMap<T, DbvhNodeIndex>,
    pub(super) provider: P,
    pub(super) config: DbvhConfig,
}

impl<T: fmt::Debug, P> fmt::Debug for Dbvh<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dbvh")
            .field("nodes", &self.nodes)
            .field("root", &self.root)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T, P: Default> Default for Dbvh<T, P> {
    fn default() -> Self {
        Self::with_config(P::default(), DbvhConfig::default())
    }
}

impl<T> Dbvh<T, ItemAabb> {
    /// An empty tree over items implementing [`HasAabb`](super::HasAabb).
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T, P> Dbvh<T, P> {
    /// An empty tree reading item bounds from `provider`.
    pub fn with_provider(provider: P) -> Self {
        Self::with_config(provider, DbvhConfig::default())
    }

    /// An empty tree reading item bounds from `provider`, with custom tuning parameters.
    pub fn with_config(provider: P, config: DbvhConfig) -> Self {
        Self {
            nodes: Slab::new(),
            root: None,
            leaf_node_indices: HashMap::default(),
            provider,
            config,
        }
    }

    /// The tuning parameters of this tree.
    pub fn config(&self) -> &DbvhConfig {
        &self.config
    }

    /// Replaces the tuning parameters of this tree.
    ///
    /// This doesn’t modify the tree until the next insertion or optimization.
    pub fn set_config(&mut self, config: DbvhConfig) {
        self.config = config;
    }

    /// The bounds provider of this tree.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Does this tree not contain any leaf?
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The number of items (leaves) of this tree.
    pub fn len(&self) -> usize {
        self.root
            .map(|root| self.nodes[root.0].leaf_count as usize)
            .unwrap_or(0)
    }

    /// The index of the root node, `None` if the tree is empty.
    pub fn root(&self) -> Option<DbvhNodeIndex> {
        self.root
    }

    /// Reference to the node with the given index.
    pub fn node(&self, id: DbvhNodeIndex) -> Option<&DbvhNode<T>> {
        self.nodes.get(id.0)
    }

    /// The item stored at the leaf `id`, if `id` is a leaf of this tree.
    pub fn item(&self, id: DbvhNodeIndex) -> Option<&T> {
        self.nodes.get(id.0)?.item()
    }

    /// The AABB bounding everything contained by this tree.
    ///
    /// Returns [`Aabb::new_invalid`] if the tree is empty.
    pub fn aabb(&self) -> Aabb {
        self.root
            .map(|root| self.nodes[root.0].aabb)
            .unwrap_or_else(Aabb::new_invalid)
    }

    /// The number of nodes on the longest root-to-leaf path (0 for an empty tree).
    pub fn subtree_depth(&self) -> u32 {
        self.nodes
            .iter()
            .map(|(_, node)| node.depth + 1)
            .max()
            .unwrap_or(0)
    }

    /// Sum of the surface areas of every internal node.
    ///
    /// This is the global quality metric the rotations of [`Dbvh::optimize`] decrease: the
    /// smaller, the cheaper queries are expected to be.
    pub fn surface_area_cost(&self) -> Real {
        self.nodes
            .iter()
            .filter(|(_, node)| !node.is_leaf())
            .map(|(_, node)| node.aabb.surface_area())
            .sum()
    }

    /// Removes every item from this tree.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.leaf_node_indices.clear();
        self.root = None;
    }

    /// An approximation of the memory dynamically-allocated by this struct.
    pub fn heap_memory_size(&self) -> usize {
        self.nodes.capacity() * size_of::<DbvhNode<T>>()
            + self.leaf_node_indices.capacity() * size_of::<(T, DbvhNodeIndex)>()
    }

    #[inline]
    pub(super) fn alloc(&mut self, node: DbvhNode<T>) -> DbvhNodeIndex {
        DbvhNodeIndex(self.nodes.insert(node))
    }

    #[inline]
    pub(super) fn children_of(&self, id: DbvhNodeIndex) -> Option<(DbvhNodeIndex, DbvhNodeIndex)> {
        self.nodes[id.0].children()
    }

    /// Makes `new` take the place of `old` as a child of `parent`, or as the root if `parent`
    /// is `None`.
    ///
    /// The parent pointer of `new` isn’t modified.
    pub(super) fn replace_child(
        &mut self,
        parent: Option<DbvhNodeIndex>,
        old: DbvhNodeIndex,
        new: DbvhNodeIndex,
    ) {
        match parent {
            None => self.root = Some(new),
            Some(parent) => {
                if let DbvhNodeKind::Internal { left, right } = &mut self.nodes[parent.0].kind {
                    if *left == old {
                        *left = new;
                    } else {
                        debug_assert_eq!(*right, old);
                        *right = new;
                    }
                }
            }
        }
    }

    /// Sets the depth of `id` to `depth`, and the depth of all its descendants accordingly.
    pub(super) fn set_subtree_depth(&mut self, id: DbvhNodeIndex, depth: u32) {
        if self.nodes[id.0].depth == depth {
            return;
        }

        let mut stack: SmallVec<[(DbvhNodeIndex, u32); 32]> = SmallVec::new();
        stack.push((id, depth));

        while let Some((curr, depth)) = stack.pop() {
            let node = &mut self.nodes[curr.0];
            node.depth = depth;

            if let Some((left, right)) = node.children() {
                stack.push((right, depth + 1));
                stack.push((left, depth + 1));
            }
        }
    }

    /// Recomputes the bounds and leaf count of the internal node `id` from its children.
    ///
    /// Returns `true` if anything changed. Leaves are left untouched.
    pub(super) fn recompute_internal(&mut self, id: DbvhNodeIndex) -> bool {
        let Some((left, right)) = self.children_of(id) else {
            return false;
        };

        let left = &self.nodes[left.0];
        let right = &self.nodes[right.0];
        let aabb = left.aabb.merged(&right.aabb);
        let leaf_count = left.leaf_count + right.leaf_count;

        let node = &mut self.nodes[id.0];
        let changed = node.aabb != aabb || node.leaf_count != leaf_count;
        node.aabb = aabb;
        node.leaf_count = leaf_count;
        changed
    }
}

impl<T: Eq + Hash, P> Dbvh<T, P> {
    /// Is `item` stored in this tree?
    pub fn contains_item(&self, item: &T) -> bool {
        self.leaf_node_indices.contains_key(item)
    }

    /// The index of the leaf holding `item`.
    pub fn leaf_of(&self, item: &T) -> Option<DbvhNodeIndex> {
        self.leaf_node_indices.get(item).copied()
    }

    /// Iterates through every item of this tree, in no particular order.
    pub fn items(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        self.leaf_node_indices.keys()
    }

    /// The bounds cached for `item` at its last insertion or refit.
    pub fn leaf_aabb(&self, item: &T) -> Option<Aabb> {
        let leaf = self.leaf_node_indices.get(item)?;
        Some(self.nodes[leaf.0].aabb)
    }
}
