//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the index bookkeeping and the cache read/write contract.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::{ExpiryIndex, TtlCache};

// == Strategies ==
/// Small key space so sequences revisit the same keys often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,2}".prop_map(|s| s)
}

/// Generates cache values
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,32}".prop_map(|s| s)
}

/// Deadline offsets in milliseconds, narrow enough to produce ties
fn offset_strategy() -> impl Strategy<Value = u64> {
    0u64..50
}

#[derive(Debug, Clone)]
enum IndexOp {
    Upsert { key: String, value: u32, offset: u64 },
    PopMin,
    Remove { key: String },
    Sweep { offset: u64 },
}

fn index_op_strategy() -> impl Strategy<Value = IndexOp> {
    prop_oneof![
        4 => (key_strategy(), any::<u32>(), offset_strategy())
            .prop_map(|(key, value, offset)| IndexOp::Upsert { key, value, offset }),
        1 => Just(IndexOp::PopMin),
        1 => key_strategy().prop_map(|key| IndexOp::Remove { key }),
        1 => offset_strategy().prop_map(|offset| IndexOp::Sweep { offset }),
    ]
}

fn ms(base: Instant, offset: u64) -> Instant {
    base + Duration::from_millis(offset)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Heap order, key uniqueness and slot bookkeeping survive any sequence of
    // operations, and the index agrees with a plain map model.
    #[test]
    fn prop_index_matches_model(ops in prop::collection::vec(index_op_strategy(), 1..100)) {
        let base = Instant::now();
        let mut index = ExpiryIndex::new();
        let mut model: HashMap<String, (u32, Instant)> = HashMap::new();

        for op in ops {
            match op {
                IndexOp::Upsert { key, value, offset } => {
                    let previous = index.upsert(key.clone(), value, ms(base, offset));
                    let expected = model.insert(key, (value, ms(base, offset))).map(|(v, _)| v);
                    prop_assert_eq!(previous, expected);
                }
                IndexOp::PopMin => {
                    let earliest = model.values().map(|&(_, at)| at).min();
                    let popped = index.pop_min();
                    prop_assert_eq!(popped.as_ref().map(|e| e.expires_at), earliest);
                    if let Some(entry) = popped {
                        prop_assert!(model.remove(&entry.key).is_some());
                    }
                }
                IndexOp::Remove { key } => {
                    let removed = index.remove(&key).map(|e| e.value);
                    prop_assert_eq!(removed, model.remove(&key).map(|(v, _)| v));
                }
                IndexOp::Sweep { offset } => {
                    let now = ms(base, offset);
                    let before = model.len();
                    model.retain(|_, &mut (_, at)| at > now);
                    prop_assert_eq!(index.sweep_expired(now), before - model.len());
                }
            }

            prop_assert!(index.validate().is_ok(), "{:?}", index.validate());
            prop_assert_eq!(index.len(), model.len());
            for (key, (value, at)) in &model {
                let entry = index.lookup(key);
                prop_assert!(entry.is_some(), "key '{}' missing from index", key);
                let entry = entry.unwrap();
                prop_assert_eq!(entry.value, *value);
                prop_assert_eq!(entry.expires_at, *at);
            }
        }
    }

    // Draining the index yields deadlines in non-decreasing order.
    #[test]
    fn prop_pop_order_non_decreasing(
        entries in prop::collection::vec((key_strategy(), offset_strategy()), 1..60)
    ) {
        let base = Instant::now();
        let mut index = ExpiryIndex::new();
        for (key, offset) in entries {
            index.upsert(key, (), ms(base, offset));
        }

        let mut last = None;
        while let Some(entry) = index.pop_min() {
            if let Some(previous) = last {
                prop_assert!(previous <= entry.expires_at);
            }
            last = Some(entry.expires_at);
        }
        prop_assert!(index.is_empty());
    }

    // A sweep leaves only entries whose deadline is still ahead.
    #[test]
    fn prop_sweep_leaves_only_live_entries(
        entries in prop::collection::vec((key_strategy(), offset_strategy()), 1..60),
        now_offset in offset_strategy()
    ) {
        let base = Instant::now();
        let mut index = ExpiryIndex::new();
        for (key, offset) in entries {
            index.upsert(key, (), ms(base, offset));
        }

        let now = ms(base, now_offset);
        index.sweep_expired(now);

        prop_assert!(index.validate().is_ok());
        if let Some(min) = index.peek_min() {
            prop_assert!(min.expires_at > now);
        }
    }
}

// Cache-level properties drive the async API on a throwaway runtime
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Storing a value and reading it back before the deadline returns it.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let retrieved = tokio_test::block_on(async {
            let cache = TtlCache::new().unwrap();
            cache.set(key.clone(), value.clone(), Duration::from_secs(300)).await;
            let retrieved = cache.get(&key).await;
            cache.shutdown().await.unwrap();
            retrieved
        });

        prop_assert_eq!(retrieved, Some(value));
    }

    // The last of several sets to one key wins, and only one entry remains.
    #[test]
    fn prop_rearm_supersedes(
        key in key_strategy(),
        values in prop::collection::vec(value_strategy(), 1..10)
    ) {
        let (retrieved, len) = tokio_test::block_on(async {
            let cache = TtlCache::new().unwrap();
            for value in &values {
                cache.set(key.clone(), value.clone(), Duration::from_secs(300)).await;
            }
            let result = (cache.get(&key).await, cache.len().await);
            cache.shutdown().await.unwrap();
            result
        });

        prop_assert_eq!(retrieved, values.last().cloned());
        prop_assert_eq!(len, 1);
    }
}
