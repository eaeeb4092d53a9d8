//! Constructors for the crate's standard collection types.

use rustc_hash::FxHashMap;
use serde_json::Value;

/// New, empty attribute map with the crate's standard hasher.
#[must_use]
pub fn new_attr_map() -> FxHashMap<String, Value> {
    FxHashMap::default()
}

/// Attribute map pre-sized for `capacity` entries.
#[must_use]
pub fn attr_map_with_capacity(capacity: usize) -> FxHashMap<String, Value> {
    FxHashMap::with_capacity_and_hasher(capacity, Default::default())
}
