use std::sync::Arc;

use affinity_core::config::RetentionConfig;
use affinity_core::models::{Message, UserAccount};
use affinity_core::traits::{IMessageStorage, IUserStorage};
use affinity_retention::RetentionManager;
use affinity_storage::StorageEngine;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn stored_count_never_exceeds_capacity(appends in 1usize..130) {
        let store = Arc::new(StorageEngine::open_in_memory().unwrap());
        store.upsert_user(&UserAccount::new("u1")).unwrap();
        let manager = RetentionManager::new(store.clone(), RetentionConfig::default());

        let mut requests = 0;
        for i in 0..appends {
            let outcome = manager.append_message("u1", Message::user(format!("m{i}"))).unwrap();
            prop_assert!(outcome.retained_count <= 60);
            prop_assert!(store.count_messages("u1").unwrap() <= 60);
            if outcome.request.is_some() {
                requests += 1;
            }
        }
        prop_assert_eq!(requests, appends / 6);
    }
}
