use super::{Dbvh, DbvhNodeIndex};
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::Real;

/// A local restructuring of the two levels below an internal node.
///
/// `L`/`R` are the left/right children of the node, `LL`/`LR`/`RL`/`RR` its grandchildren.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Rotation {
    LWithRl,
    LWithRr,
    RWithLl,
    RWithLr,
    LlWithRr,
    LlWithRl,
}

impl Rotation {
    /// All the rotations, in the order they are evaluated. On equal costs, the first one wins.
    const ALL: [Rotation; 6] = [
        Rotation::LWithRl,
        Rotation::LWithRr,
        Rotation::RWithLl,
        Rotation::RWithLr,
        Rotation::LlWithRr,
        Rotation::LlWithRl,
    ];
}

/// The two levels below an internal node.
struct Neighborhood {
    l: DbvhNodeIndex,
    r: DbvhNodeIndex,
    ll_lr: Option<(DbvhNodeIndex, DbvhNodeIndex)>,
    rl_rr: Option<(DbvhNodeIndex, DbvhNodeIndex)>,
}

impl<T, P> Dbvh<T, P> {
    /// Improves the tree quality through local tree rotations.
    ///
    /// Each internal node is checked, bottom-up, for one of six rotations exchanging one of its
    /// children or grandchildren with another grandchild. The rotation minimizing the local cost
    /// `SA(node) + SA(left) + SA(right)` (where `SA` is the surface area) is applied if:
    /// - it improves on the current local cost by a relative amount of at least
    ///   [`DbvhConfig::min_rotation_gain`] and [`DbvhConfig::rotation_tolerance`].
    /// - the surface areas of the internal nodes it rebuilds decrease by a relative amount of at
    ///   least [`DbvhConfig::rotation_tolerance`].
    ///
    /// The second condition makes every rotation strictly decrease
    /// [`Dbvh::surface_area_cost`], so the tree never degrades. Full bottom-up passes are
    /// repeated until one of them doesn’t rotate anything, or until
    /// [`DbvhConfig::max_optimize_passes`] passes were performed. In the former case, which is
    /// the common one, calling this again without modifying the tree performs no rotation.
    ///
    /// Items and their cached bounds are left untouched. Returns the number of rotations
    /// performed.
    ///
    /// [`DbvhConfig::min_rotation_gain`]: super::DbvhConfig::min_rotation_gain
    /// [`DbvhConfig::rotation_tolerance`]: super::DbvhConfig::rotation_tolerance
    /// [`DbvhConfig::max_optimize_passes`]: super::DbvhConfig::max_optimize_passes
    pub fn optimize(&mut self) -> usize {
        let mut num_rotations = 0;

        for pass in 0..self.config.max_optimize_passes {
            let pass_rotations = self.optimize_pass();
            num_rotations += pass_rotations;

            if pass_rotations == 0 {
                log::trace!(
                    "dbvh optimization converged after {} passes and {} rotations",
                    pass + 1,
                    num_rotations
                );
                return num_rotations;
            }
        }

        log::debug!(
            "dbvh optimization stopped after {} passes and {} rotations without converging",
            self.config.max_optimize_passes,
            num_rotations
        );
        num_rotations
    }

    /// Visits every internal node once, children before parents.
    fn optimize_pass(&mut self) -> usize {
        let mut num_rotations = 0;

        // Rotations relink existing nodes without turning leaves into internal nodes (or the
        // opposite), so the list stays valid for the whole pass.
        for id in self.post_order() {
            let Some(neighborhood) = self.neighborhood(id) else {
                continue;
            };

            if let Some(rotation) = self.best_rotation(id, &neighborhood) {
                self.rotate(rotation, &neighborhood);
                num_rotations += 1;
            }
        }

        num_rotations
    }

    fn neighborhood(&self, id: DbvhNodeIndex) -> Option<Neighborhood> {
        let (l, r) = self.children_of(id)?;
        let ll_lr = self.children_of(l);
        let rl_rr = self.children_of(r);

        if ll_lr.is_none() && rl_rr.is_none() {
            // Nothing to rotate if both children are leaves.
            return None;
        }

        Some(Neighborhood { l, r, ll_lr, rl_rr })
    }

    /// The surface areas of the `(left, right)` children the node would have after `rotation`,
    /// or `None` if that rotation isn’t possible.
    fn rotated_children_areas(
        &self,
        rotation: Rotation,
        n: &Neighborhood,
    ) -> Option<(Real, Real)> {
        let aabb = |id: DbvhNodeIndex| -> Aabb { self.nodes[id.0].aabb };
        let merged_area =
            |a: DbvhNodeIndex, b: DbvhNodeIndex| aabb(a).merged(&aabb(b)).surface_area();
        let area = |id: DbvhNodeIndex| aabb(id).surface_area();

        match rotation {
            Rotation::LWithRl => {
                let (rl, rr) = n.rl_rr?;
                Some((area(rl), merged_area(n.l, rr)))
            }
            Rotation::LWithRr => {
                let (rl, rr) = n.rl_rr?;
                Some((area(rr), merged_area(rl, n.l)))
            }
            Rotation::RWithLl => {
                let (ll, lr) = n.ll_lr?;
                Some((merged_area(n.r, lr), area(ll)))
            }
            Rotation::RWithLr => {
                let (ll, lr) = n.ll_lr?;
                Some((merged_area(ll, n.r), area(lr)))
            }
            Rotation::LlWithRr => {
                let (ll, lr) = n.ll_lr?;
                let (rl, rr) = n.rl_rr?;
                Some((merged_area(rr, lr), merged_area(rl, ll)))
            }
            Rotation::LlWithRl => {
                let (ll, lr) = n.ll_lr?;
                let (rl, rr) = n.rl_rr?;
                Some((merged_area(rl, lr), merged_area(ll, rr)))
            }
        }
    }

    /// The rotation worth applying at the node `id`, if any.
    fn best_rotation(&self, id: DbvhNodeIndex, n: &Neighborhood) -> Option<Rotation> {
        let tolerance = self.config.rotation_tolerance;
        let min_gain = self.config.min_rotation_gain.max(tolerance);
        let node_area = self.nodes[id.0].aabb.surface_area();
        let l_area = self.nodes[n.l.0].aabb.surface_area();
        let r_area = self.nodes[n.r.0].aabb.surface_area();
        let current_cost = node_area + l_area + r_area;

        let mut best = None;
        let mut best_cost = current_cost;

        for rotation in Rotation::ALL {
            let Some((left_area, right_area)) = self.rotated_children_areas(rotation, n) else {
                continue;
            };
            let cost = node_area + left_area + right_area;

            if cost >= best_cost || current_cost - cost < min_gain * current_cost {
                continue;
            }

            // Only the children receiving a new subtree change content. The node itself and the
            // moved subtrees keep theirs, so this is the change of the whole tree cost.
            let (area_before, area_after) = match rotation {
                Rotation::LWithRl | Rotation::LWithRr => (r_area, right_area),
                Rotation::RWithLl | Rotation::RWithLr => (l_area, left_area),
                Rotation::LlWithRr | Rotation::LlWithRl => {
                    (l_area + r_area, left_area + right_area)
                }
            };

            if area_before - area_after > tolerance * area_before {
                best = Some(rotation);
                best_cost = cost;
            }
        }

        best
    }

    fn rotate(&mut self, rotation: Rotation, n: &Neighborhood) {
        match (rotation, n.ll_lr, n.rl_rr) {
            (Rotation::LWithRl, _, Some((rl, _))) => {
                self.swap_subtrees(n.l, rl);
                let _ = self.recompute_internal(n.r);
            }
            (Rotation::LWithRr, _, Some((_, rr))) => {
                self.swap_subtrees(n.l, rr);
                let _ = self.recompute_internal(n.r);
            }
            (Rotation::RWithLl, Some((ll, _)), _) => {
                self.swap_subtrees(n.r, ll);
                let _ = self.recompute_internal(n.l);
            }
            (Rotation::RWithLr, Some((_, lr)), _) => {
                self.swap_subtrees(n.r, lr);
                let _ = self.recompute_internal(n.l);
            }
            (Rotation::LlWithRr, Some((ll, _)), Some((_, rr))) => {
                self.swap_subtrees(ll, rr);
                let _ = self.recompute_internal(n.l);
                let _ = self.recompute_internal(n.r);
            }
            (Rotation::LlWithRl, Some((ll, _)), Some((rl, _))) => {
                self.swap_subtrees(ll, rl);
                let _ = self.recompute_internal(n.l);
                let _ = self.recompute_internal(n.r);
            }
            _ => {}
        }
    }

    /// Exchanges the positions of the subtrees rooted at `a` and `b`.
    ///
    /// Neither subtree may contain the other, and they may not share the same parent.
    /// Bounds of the ancestors aren’t updated.
    fn swap_subtrees(&mut self, a: DbvhNodeIndex, b: DbvhNodeIndex) {
        let (parent_a, depth_a) = (self.nodes[a.0].parent, self.nodes[a.0].depth);
        let (parent_b, depth_b) = (self.nodes[b.0].parent, self.nodes[b.0].depth);
        debug_assert_ne!(parent_a, parent_b);

        self.replace_child(parent_a, a, b);
        self.replace_child(parent_b, b, a);
        self.nodes[a.0].parent = parent_b;
        self.nodes[b.0].parent = parent_a;
        self.set_subtree_depth(a, depth_b);
        self.set_subtree_depth(b, depth_a);
    }
}
