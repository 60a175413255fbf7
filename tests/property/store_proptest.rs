//! Property-based tests for the collection store
//!
//! Uses proptest to generate random operation sequences and verify that ids
//! stay unique and revisions never repeat.

use std::collections::HashSet;

use apm_console::console::collection::CollectionStore;
use chrono::{Duration, Utc};
use proptest::prelude::*;

use crate::common::{fields, software};

#[derive(Debug, Clone)]
enum Op {
    Load(Vec<u8>),
    Insert(u8),
    Update(u8),
    Remove(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec(0u8..8, 0..10).prop_map(Op::Load),
        (0u8..8).prop_map(Op::Insert),
        (0u8..8).prop_map(Op::Update),
        (0u8..8).prop_map(Op::Remove),
    ]
}

fn ids(store: &CollectionStore) -> Vec<String> {
    store.iter().map(|s| s.id.clone()).collect()
}

proptest! {
    #[test]
    fn test_ids_stay_unique(ops in prop::collection::vec(op(), 1..40)) {
        let mut store = CollectionStore::new();
        let mut seen_revisions = HashSet::new();

        for op in ops {
            match op {
                Op::Load(raw) => {
                    let records = raw.iter().map(|n| software(&n.to_string(), "App")).collect();
                    store.load_succeeded(records);
                    let expected: HashSet<String> = raw.iter().map(|n| n.to_string()).collect();
                    let held: HashSet<String> = ids(&store).into_iter().collect();
                    prop_assert_eq!(held, expected);
                }
                Op::Insert(n) => {
                    let id = n.to_string();
                    let present = store.contains(&id);
                    let result = store.insert(software(&id, "New"));
                    prop_assert_eq!(result.is_err(), present);
                }
                Op::Update(n) => {
                    let id = n.to_string();
                    let present = store.contains(&id);
                    let before = store.get(&id).map(|s| s.updated_at);
                    let long_ago = Utc::now() - Duration::days(365 * 10);
                    let result = store.apply_update(&id, &fields("Renamed"), long_ago);
                    prop_assert_eq!(result.is_some(), present);
                    if let (Some(revision), Some(before)) = (result, before) {
                        prop_assert!(seen_revisions.insert(revision));
                        prop_assert!(store.get(&id).unwrap().updated_at >= before);
                    }
                }
                Op::Remove(n) => {
                    let id = n.to_string();
                    let len = store.len();
                    let present = store.contains(&id);
                    let removed = store.remove(&id);
                    prop_assert_eq!(removed.is_some(), present);
                    prop_assert_eq!(store.len(), if present { len - 1 } else { len });
                    prop_assert!(!store.contains(&id));
                }
            }

            let held = ids(&store);
            let unique: HashSet<&String> = held.iter().collect();
            prop_assert_eq!(unique.len(), held.len());

            let revisions: HashSet<u64> = held.iter().filter_map(|id| store.revision(id)).collect();
            prop_assert_eq!(revisions.len(), held.len());
        }
    }

    #[test]
    fn test_failed_load_keeps_rows(
        raw in prop::collection::vec(0u8..8, 0..10),
        message in "[a-z ]{1,20}",
    ) {
        let mut store = CollectionStore::new();
        store.load_succeeded(raw.iter().map(|n| software(&n.to_string(), "App")).collect());
        let before = ids(&store);

        store.begin_load();
        store.load_failed(message.clone());

        prop_assert_eq!(ids(&store), before);
        prop_assert_eq!(store.last_error(), Some(message.as_str()));
    }
}
