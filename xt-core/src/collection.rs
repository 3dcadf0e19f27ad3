//! Small collection type aliases shared by downstream crates (order book depth maps, venue ->
//! instrument registries) where iteration order and `fnv`'s speed on small integer/string keys
//! both matter more than `HashMap`'s DoS resistance.

/// An [`indexmap::IndexMap`] keyed with the non-cryptographic [`fnv`] hasher.
pub type FnvIndexMap<K, V> = indexmap::IndexMap<K, V, fnv::FnvBuildHasher>;

/// An [`indexmap::IndexSet`] keyed with the non-cryptographic [`fnv`] hasher.
pub type FnvIndexSet<T> = indexmap::IndexSet<T, fnv::FnvBuildHasher>;
