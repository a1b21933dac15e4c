use crate::math::Real;

/// Tuning parameters of a [`Dbvh`](super::Dbvh).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DbvhConfig {
    /// Minimum relative cost decrease a rotation must achieve to be applied by
    /// [`Dbvh::optimize`](super::Dbvh::optimize).
    ///
    /// A rotation bringing the local cost from `c` to `c'` is applied only if `c' < c` and
    /// `(c - c') / c >= min_rotation_gain`. With the default value of `0.0`, any improvement
    /// larger than [`DbvhConfig::rotation_tolerance`] is applied. Set it to e.g. `0.3` to only
    /// perform rotations that are worth it.
    pub min_rotation_gain: Real,
    /// Relative tolerance under which a cost decrease is treated as floating-point noise by
    /// [`Dbvh::optimize`](super::Dbvh::optimize).
    ///
    /// A rotation must decrease both its local cost and the surface areas of the nodes it
    /// rebuilds by more than this fraction of their current value.
    pub rotation_tolerance: Real,
    /// Maximum number of full bottom-up passes performed by a single call to
    /// [`Dbvh::optimize`](super::Dbvh::optimize).
    ///
    /// Passes stop as soon as one of them performs no rotation. A call that reaches this limit
    /// may leave rotations for the next call to perform.
    pub max_optimize_passes: usize,
    /// Relative tolerance under which two candidate surface areas are considered equal while
    /// choosing the insertion path. Equal candidates are decided by subtree size.
    pub area_tie_epsilon: Real,
}

impl Default for DbvhConfig {
    fn default() -> Self {
        Self {
            min_rotation_gain: 0.0,
            rotation_tolerance: 1.0e-3,
            max_optimize_passes: 32,
            area_tie_epsilon: 1.0e-5,
        }
    }
}

impl DbvhConfig {
    /// Sets [`DbvhConfig::min_rotation_gain`].
    #[must_use]
    pub fn with_min_rotation_gain(mut self, gain: Real) -> Self {
        self.min_rotation_gain = gain;
        self
    }

    /// Sets [`DbvhConfig::rotation_tolerance`].
    #[must_use]
    pub fn with_rotation_tolerance(mut self, tolerance: Real) -> Self {
        self.rotation_tolerance = tolerance;
        self
    }

    /// Sets [`DbvhConfig::max_optimize_passes`].
    #[must_use]
    pub fn with_max_optimize_passes(mut self, passes: usize) -> Self {
        self.max_optimize_passes = passes;
        self
    }

    /// Sets [`DbvhConfig::area_tie_epsilon`].
    #[must_use]
    pub fn with_area_tie_epsilon(mut self, epsilon: Real) -> Self {
        self.area_tie_epsilon = epsilon;
        self
    }
}
