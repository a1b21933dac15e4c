//! The hash-set used for duplicate detection and validation.

/// Hashset using [`hashbrown::HashSet`] with its default hasher.
pub type HashSet<K> = hashbrown::hash_set::HashSet<K, hashbrown::DefaultHashBuilder>;
