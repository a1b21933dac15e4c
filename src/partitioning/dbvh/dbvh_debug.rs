use super::{Dbvh, DbvhNode, TraversalAction};
use alloc::string::String;
use core::fmt::{self, Write};

impl<T, P> Dbvh<T, P> {
    /// Writes a human-readable description of this tree, one line per node.
    ///
    /// Nodes are written in depth-first order, left before right, each line being indented by
    /// the node depth:
    ///
    /// ```text
    /// Node: R depth 0 size 2 bounds [0, 6, 0, 6, 0, 6]
    ///  Node: L depth 1 size 1 bounds [0, 1, 0, 1, 0, 1]
    ///  Node: L depth 1 size 1 bounds [5, 6, 5, 6, 5, 6]
    /// ```
    ///
    /// `R` marks the root and `L` marks leaves. Bounds are given as
    /// `[xmin, xmax, ymin, ymax, zmin, zmax]`. This is meant for debugging only, the format may
    /// change.
    pub fn write_debug(&self, out: &mut impl Write) -> fmt::Result {
        let mut result = Ok(());

        self.traverse(|_, node| {
            result = write_node(&mut *out, node).and_then(|()| out.write_char('\n'));

            if result.is_ok() {
                TraversalAction::Continue
            } else {
                TraversalAction::EarlyExit
            }
        });

        result
    }

    /// The output of [`Dbvh::write_debug`] as a string.
    pub fn debug_string(&self) -> String {
        let mut result = String::new();
        // Writing into a `String` can’t fail.
        let _ = self.write_debug(&mut result);
        result
    }

    /// Sends the output of [`Dbvh::write_debug`] to the `log` facade, one record per node.
    pub fn log_tree(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }

        self.traverse(|_, node| {
            let mut line = String::new();
            let _ = write_node(&mut line, node);
            log::debug!("{}", line);
            TraversalAction::Continue
        });
    }
}

fn write_node<T>(out: &mut impl Write, node: &DbvhNode<T>) -> fmt::Result {
    for _ in 0..node.depth {
        out.write_char(' ')?;
    }

    let root = if node.is_root() { "R" } else { "" };
    let leaf = if node.is_leaf() { "L" } else { "" };
    let [xmin, xmax, ymin, ymax, zmin, zmax] = node.aabb.to_bounds();

    write!(
        out,
        "Node: {}{} depth {} size {} bounds [{}, {}, {}, {}, {}, {}]",
        root, leaf, node.depth, node.leaf_count, xmin, xmax, ymin, ymax, zmin, zmax
    )
}
