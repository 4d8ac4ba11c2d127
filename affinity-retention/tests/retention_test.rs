use std::sync::Arc;

use affinity_core::config::RetentionConfig;
use affinity_core::models::{Message, UserAccount};
use affinity_core::traits::{IMessageStorage, IUserStorage};
use affinity_retention::RetentionManager;
use affinity_storage::StorageEngine;
use chrono::{Duration, TimeZone, Utc};

fn setup() -> (Arc<StorageEngine>, RetentionManager<StorageEngine>) {
    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    store.upsert_user(&UserAccount::new("u1")).unwrap();
    let manager = RetentionManager::new(store.clone(), RetentionConfig::default());
    (store, manager)
}

fn message(i: usize) -> Message {
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
    let role_text = format!("message {i}");
    let m = if i % 2 == 0 {
        Message::user(role_text)
    } else {
        Message::assistant(role_text)
    };
    m.at(base + Duration::seconds(i as i64))
}

#[test]
fn first_five_appends_emit_nothing_sixth_emits_request() {
    let (_, manager) = setup();
    for i in 1..=5 {
        let outcome = manager.append_message("u1", message(i)).unwrap();
        assert_eq!(outcome.retained_count, i);
        assert!(outcome.request.is_none(), "count {i} must not trigger");
    }
    let outcome = manager.append_message("u1", message(6)).unwrap();
    let request = outcome.request.expect("sixth message closes the cycle");
    assert_eq!(request.user_id, "u1");
    let contents: Vec<_> = request.messages.iter().map(|m| m.content.clone()).collect();
    assert_eq!(
        contents,
        (1..=6).map(|i| format!("message {i}")).collect::<Vec<_>>()
    );
}

#[test]
fn seven_through_eleven_emit_nothing() {
    let (_, manager) = setup();
    for i in 1..=6 {
        manager.append_message("u1", message(i)).unwrap();
    }
    for i in 7..=11 {
        assert!(manager.append_message("u1", message(i)).unwrap().request.is_none());
    }
    let request = manager.append_message("u1", message(12)).unwrap().request.unwrap();
    assert_eq!(request.messages.first().unwrap().content, "message 7");
    assert_eq!(request.messages.last().unwrap().content, "message 12");
}

#[test]
fn history_is_capped_at_sixty() {
    let (store, manager) = setup();
    let mut last = None;
    for i in 1..=61 {
        last = Some(manager.append_message("u1", message(i)).unwrap());
    }
    let last = last.unwrap();
    assert_eq!(last.retained_count, 60);
    assert_eq!(last.trimmed, 1);
    assert_eq!(store.count_messages("u1").unwrap(), 60);

    let history = manager.load_history("u1").unwrap();
    assert_eq!(history.first().unwrap().content, "message 2");
    assert_eq!(history.last().unwrap().content, "message 61");
}

#[test]
fn cycles_keep_firing_once_per_six_after_the_cap() {
    let (_, manager) = setup();
    let mut fired = Vec::new();
    for i in 1..=78 {
        if let Some(request) = manager.append_message("u1", message(i)).unwrap().request {
            assert_eq!(request.messages.len(), 6);
            assert_eq!(request.messages.last().unwrap().content, format!("message {i}"));
            fired.push(i);
        }
    }
    assert_eq!(fired, (1..=13).map(|k| k * 6).collect::<Vec<_>>());
}

#[test]
fn oversized_backlog_is_trimmed_in_one_batch() {
    let (store, manager) = setup();
    // Simulate a log that grew past the cap outside the manager.
    for i in 1..=70 {
        store.append_message("u1", &message(i)).unwrap();
    }
    let outcome = manager.append_message("u1", message(71)).unwrap();
    assert_eq!(outcome.trimmed, 11);
    assert_eq!(outcome.retained_count, 60);
    assert_eq!(store.count_messages("u1").unwrap(), 60);
}

#[test]
fn custom_capacity_and_cycle() {
    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    store.upsert_user(&UserAccount::new("u1")).unwrap();
    let manager = RetentionManager::new(
        store.clone(),
        RetentionConfig {
            capacity: 4,
            cycle_length: 2,
        },
    );
    let fired: Vec<usize> = (1..=6)
        .filter(|i| manager.append_message("u1", message(*i)).unwrap().request.is_some())
        .collect();
    assert_eq!(fired, vec![2, 4, 6]);
    assert_eq!(store.count_messages("u1").unwrap(), 4);
}

#[test]
fn unknown_user_propagates_storage_error() {
    let (_, manager) = setup();
    assert!(manager.append_message("ghost", message(1)).is_err());
}

#[test]
fn clear_history_empties_the_log_and_restarts_the_cycle() {
    let (store, manager) = setup();
    for i in 1..=9 {
        manager.append_message("u1", message(i)).unwrap();
    }

    assert_eq!(manager.clear_history("u1").unwrap(), 9);
    assert!(manager.load_history("u1").unwrap().is_empty());
    assert_eq!(store.count_messages("u1").unwrap(), 0);

    // The three messages after the last boundary do not carry over.
    for i in 10..=14 {
        let outcome = manager.append_message("u1", message(i)).unwrap();
        assert!(outcome.request.is_none(), "message {i} must not trigger");
    }
    let outcome = manager.append_message("u1", message(15)).unwrap();
    assert_eq!(outcome.retained_count, 6);
    let request = outcome.request.expect("sixth message after a clear closes a cycle");
    assert_eq!(request.messages[0].content, "message 10");
}

#[test]
fn clearing_an_empty_history_is_a_no_op() {
    let (_, manager) = setup();
    assert_eq!(manager.clear_history("u1").unwrap(), 0);
}
