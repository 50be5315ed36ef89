//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random test data
//! that maintains required invariants.

use crate::fixtures::Frame;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use snapset_core::generate_version;

/// Milliseconds from the epoch to 2100-01-01.
const MAX_MILLIS: i64 = 4_102_444_800_000;

/// Strategy for generating well-formed version strings.
pub fn version_strategy() -> impl Strategy<Value = String> {
    (0..MAX_MILLIS).prop_filter_map("timestamp out of range", |ms| {
        Utc.timestamp_millis_opt(ms).single().map(generate_version)
    })
}

/// Strategy for generating distinct, sorted version strings.
pub fn version_set_strategy(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(version_strategy(), 1..=max.max(1))
        .prop_map(|set| set.into_iter().collect())
}

/// Strategy for generating logical dataset paths like `data/01_raw/cars.csv`.
pub fn logical_path_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec("[a-z0-9_]{1,8}", 0..3),
        "[a-z][a-z0-9_]{0,11}",
        prop::sample::select(vec!["csv", "json", "txt", "cbor"]),
    )
        .prop_map(|(dirs, stem, ext)| {
            let mut path = dirs.join("/");
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(&stem);
            path.push('.');
            path.push_str(ext);
            path
        })
}

/// Strategy for generating small frames.
pub fn frame_strategy() -> impl Strategy<Value = Frame> {
    (1usize..4).prop_flat_map(|width| {
        (
            prop::collection::vec("[a-z]{1,6}", width),
            prop::collection::vec(prop::collection::vec(any::<i64>(), width), 0..8),
        )
            .prop_map(|(columns, rows)| Frame { columns, rows })
    })
}
