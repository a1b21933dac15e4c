//! The hash-map used for item lookups.
//!
//! Iteration order of these maps never leaks into query results: queries always walk the tree.

/// Hashmap using [`hashbrown::HashMap`] with its default hasher.
pub type HashMap<K, V> = hashbrown::hash_map::HashMap<K, V, hashbrown::DefaultHashBuilder>;
