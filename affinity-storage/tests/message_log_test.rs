use affinity_core::models::{Message, UserAccount};
use affinity_core::traits::{IMessageStorage, IUserStorage};
use affinity_storage::StorageEngine;
use chrono::{Duration, TimeZone, Utc};

fn engine_with_user(id: &str) -> StorageEngine {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine.upsert_user(&UserAccount::new(id)).unwrap();
    engine
}

#[test]
fn messages_list_oldest_first() {
    let engine = engine_with_user("u1");
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    // Inserted out of order on purpose.
    engine
        .append_message("u1", &Message::user("second").at(base + Duration::seconds(1)))
        .unwrap();
    engine
        .append_message("u1", &Message::assistant("first").at(base))
        .unwrap();

    let messages = engine.list_messages("u1").unwrap();
    let contents: Vec<_> = messages.iter().map(|m| m.message.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second"]);
}

#[test]
fn equal_timestamps_keep_insertion_order() {
    let engine = engine_with_user("u1");
    let t = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    for text in ["a", "b", "c"] {
        engine.append_message("u1", &Message::user(text).at(t)).unwrap();
    }
    let contents: Vec<_> = engine
        .list_messages("u1")
        .unwrap()
        .into_iter()
        .map(|m| m.message.content)
        .collect();
    assert_eq!(contents, vec!["a", "b", "c"]);
}

#[test]
fn logs_are_isolated_per_user() {
    let engine = engine_with_user("u1");
    engine.upsert_user(&UserAccount::new("u2")).unwrap();
    engine.append_message("u1", &Message::user("hello")).unwrap();
    assert_eq!(engine.count_messages("u1").unwrap(), 1);
    assert_eq!(engine.count_messages("u2").unwrap(), 0);
}

#[test]
fn batch_delete_removes_only_listed_ids() {
    let engine = engine_with_user("u1");
    let ids: Vec<i64> = (0..5)
        .map(|i| engine.append_message("u1", &Message::user(format!("m{i}"))).unwrap().id)
        .collect();
    let deleted = engine.delete_messages("u1", &ids[..2]).unwrap();
    assert_eq!(deleted, 2);
    let remaining: Vec<i64> = engine
        .list_messages("u1")
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(remaining, ids[2..].to_vec());
}

#[test]
fn batch_delete_ignores_other_users_messages() {
    let engine = engine_with_user("u1");
    engine.upsert_user(&UserAccount::new("u2")).unwrap();
    let foreign = engine.append_message("u2", &Message::user("mine")).unwrap().id;
    assert_eq!(engine.delete_messages("u1", &[foreign]).unwrap(), 0);
    assert_eq!(engine.count_messages("u2").unwrap(), 1);
}

#[test]
fn append_for_unknown_user_fails() {
    let engine = StorageEngine::open_in_memory().unwrap();
    assert!(engine.append_message("ghost", &Message::user("boo")).is_err());
}

#[test]
fn sequence_numbers_survive_trimming() {
    let engine = engine_with_user("u1");
    let first = engine.append_message("u1", &Message::user("one")).unwrap();
    let second = engine.append_message("u1", &Message::user("two")).unwrap();
    assert_eq!((first.sequence, second.sequence), (1, 2));

    engine.delete_messages("u1", &[first.id]).unwrap();
    let third = engine.append_message("u1", &Message::user("three")).unwrap();
    assert_eq!(third.sequence, 3);
}

#[test]
fn sequences_are_per_user() {
    let engine = engine_with_user("u1");
    engine.upsert_user(&UserAccount::new("u2")).unwrap();
    engine.append_message("u1", &Message::user("a")).unwrap();
    engine.append_message("u1", &Message::user("b")).unwrap();
    let other = engine.append_message("u2", &Message::user("c")).unwrap();
    assert_eq!(other.sequence, 1);
}
