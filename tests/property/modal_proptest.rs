//! Property-based tests for the modal controller
//!
//! Whatever sequence of intents arrives, the modal is in exactly one state,
//! a draft exists only while editing, and an open edit is never replaced.

use apm_console::console::collection::{CollectionStore, ModalController, ModalKind};
use proptest::prelude::*;

use crate::common::software;

#[derive(Debug, Clone)]
enum Intent {
    View(u8),
    Edit(u8),
    Close,
    Cancel,
}

fn intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        (0u8..5).prop_map(Intent::View),
        (0u8..5).prop_map(Intent::Edit),
        Just(Intent::Close),
        Just(Intent::Cancel),
    ]
}

fn store() -> CollectionStore {
    let mut store = CollectionStore::new();
    // Ids 0..3 exist, 3 and 4 do not
    store.load_succeeded((0..3).map(|n| software(&n.to_string(), "App")).collect());
    store
}

proptest! {
    #[test]
    fn test_modal_state_is_consistent(intents in prop::collection::vec(intent(), 1..50)) {
        let store = store();
        let mut modal = ModalController::new();

        for intent in intents {
            let editing_before = modal.draft().map(|_| modal.selected_id().map(str::to_string));

            let result = match &intent {
                Intent::View(n) => modal.open_view(&n.to_string(), &store),
                Intent::Edit(n) => modal.open_edit(&n.to_string(), &store).map(|_| ()),
                Intent::Close => modal.close(),
                Intent::Cancel => modal.cancel_edit(),
            };

            match modal.kind() {
                ModalKind::Closed => {
                    prop_assert!(modal.selected_id().is_none());
                    prop_assert!(modal.draft().is_none());
                }
                ModalKind::Viewing => {
                    prop_assert!(modal.draft().is_none());
                    prop_assert!(store.contains(modal.selected_id().unwrap()));
                }
                ModalKind::Editing => {
                    prop_assert!(modal.draft().is_some());
                    prop_assert!(store.contains(modal.selected_id().unwrap()));
                }
            }

            // Only cancel leaves an open edit
            if let Some(selected) = editing_before {
                if !matches!(intent, Intent::Cancel) {
                    prop_assert!(result.is_err());
                    prop_assert_eq!(modal.selected_id().map(str::to_string), selected);
                }
            }
        }
    }

    #[test]
    fn test_sessions_never_repeat(count in 1usize..20) {
        let store = store();
        let mut modal = ModalController::new();
        let mut sessions = Vec::new();

        for _ in 0..count {
            sessions.push(modal.open_edit("0", &store).unwrap());
            modal.cancel_edit().unwrap();
        }

        let mut deduped = sessions.clone();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), sessions.len());
        prop_assert!(sessions.windows(2).all(|w| w[0] < w[1]));
    }
}
