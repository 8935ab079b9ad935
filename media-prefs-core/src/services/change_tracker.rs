//! Change hash cache
//!
//! Remembers a hash of the last value written per key so that repeated writes of
//! the same value never reach the backend. Two different values with the same hash
//! are treated as equal and the second write is skipped.

use std::collections::HashMap;

/// Hash recorded for an absent value.
const UNSET_HASH: i32 = -1;

/// 31-polynomial hash over UTF-16 code units with wrapping 32-bit arithmetic.
///
/// Matches the hash the stored data was historically tracked with.
pub(crate) fn content_hash(value: &str) -> i32 {
    value.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

fn value_hash(value: Option<&str>) -> i32 {
    value.map_or(UNSET_HASH, content_hash)
}

#[derive(Debug, Default)]
pub(crate) struct ChangeTracker {
    hashes: HashMap<String, i32>,
}

impl ChangeTracker {
    /// Hash of `value` if it differs from the last one recorded for `key`, `None` if unchanged.
    pub(crate) fn changed_hash(&self, key: &str, value: Option<&str>) -> Option<i32> {
        let hash = value_hash(value);
        match self.hashes.get(key) {
            Some(&previous) if previous == hash => None,
            _ => Some(hash),
        }
    }

    pub(crate) fn record(&mut self, key: &str, hash: i32) {
        self.hashes.insert(key.to_string(), hash);
    }
}
