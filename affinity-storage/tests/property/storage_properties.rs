use affinity_core::models::{Message, UserAccount};
use affinity_core::traits::{IMessageStorage, IUserStorage};
use affinity_storage::StorageEngine;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn deleting_a_prefix_leaves_the_suffix_in_order(total in 1usize..40, cut in 0usize..40) {
        let cut = cut.min(total);
        let engine = StorageEngine::open_in_memory().unwrap();
        engine.upsert_user(&UserAccount::new("u1")).unwrap();
        let ids: Vec<i64> = (0..total)
            .map(|i| engine.append_message("u1", &Message::user(format!("m{i}"))).unwrap().id)
            .collect();

        engine.delete_messages("u1", &ids[..cut]).unwrap();

        let remaining: Vec<i64> = engine.list_messages("u1").unwrap().into_iter().map(|m| m.id).collect();
        prop_assert_eq!(remaining, ids[cut..].to_vec());
        prop_assert_eq!(engine.count_messages("u1").unwrap(), total - cut);
    }
}
