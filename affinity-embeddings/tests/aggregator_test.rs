use std::sync::Arc;

use affinity_core::config::DecayConfig;
use affinity_core::models::{EmbeddingRecord, PlatformStats, UserAccount, UserProfile};
use affinity_core::traits::{
    IEmbeddingStorage, IProfileChangeFeed, IProfileStorage, IStatsStorage, IUserStorage,
};
use affinity_core::vector::l2_norm;
use affinity_embeddings::EmbeddingAggregator;
use affinity_storage::StorageEngine;
use chrono::{DateTime, Duration, TimeZone, Utc};

fn engine_with_user(id: &str) -> Arc<StorageEngine> {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine.upsert_user(&UserAccount::new(id)).unwrap();
    Arc::new(engine)
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
}

fn push(engine: &StorageEngine, user: &str, vector: Vec<f32>, at: DateTime<Utc>) {
    engine
        .append_embedding(
            user,
            &EmbeddingRecord {
                vector,
                timestamp: at,
                analysis_ref: format!("users/{user}/analysis/{}", at.timestamp()),
            },
        )
        .unwrap();
}

fn set_coefficient(engine: &StorageEngine, total_users: u64, coefficient: f64) {
    let stats = PlatformStats {
        total_users,
        decay_coefficient: coefficient,
        last_updated: Some(Utc::now()),
    };
    assert!(engine.compare_and_swap_stats(None, &stats).unwrap());
}

#[test]
fn no_records_leaves_profile_untouched() {
    let engine = engine_with_user("u1");
    let mut existing = UserProfile::empty("u1");
    existing.raw_average = Some(vec![0.5, 0.5]);
    existing.normalized_average = Some(vec![0.70710677, 0.70710677]);
    engine.save_profile(&existing).unwrap();

    let aggregator = EmbeddingAggregator::new(engine.clone(), DecayConfig::default());
    assert!(aggregator.recompute_profile("u1").unwrap().is_none());

    let stored = engine.get_profile("u1").unwrap().unwrap();
    assert_eq!(stored.raw_average, existing.raw_average);
}

#[test]
fn single_record_is_its_own_average() {
    let engine = engine_with_user("u1");
    let v = vec![0.123_456_79, -2.5, 1e-7, 42.0];
    push(&engine, "u1", v.clone(), base_time());

    let aggregator = EmbeddingAggregator::new(engine.clone(), DecayConfig::default());
    let profile = aggregator.recompute_profile("u1").unwrap().unwrap();
    assert_eq!(profile.raw_average, Some(v));
    assert!((l2_norm(profile.normalized_average.as_ref().unwrap()) - 1.0).abs() < 1e-6);
    assert!(profile.last_update.is_some());
}

#[test]
fn newer_record_dominates_with_full_recency_bias() {
    let engine = engine_with_user("u1");
    push(&engine, "u1", vec![1.0, 0.0], base_time());
    push(&engine, "u1", vec![0.0, 1.0], base_time() + Duration::hours(1));

    let aggregator = EmbeddingAggregator::new(engine.clone(), DecayConfig::default());
    assert_eq!(aggregator.decay_coefficient(), 1.0);
    let profile = aggregator.recompute_profile("u1").unwrap().unwrap();

    let raw = profile.raw_average.unwrap();
    assert!((raw[0] - 0.450_166).abs() < 1e-5, "{raw:?}");
    assert!((raw[1] - 0.549_834).abs() < 1e-5, "{raw:?}");
    let normalized = profile.normalized_average.unwrap();
    assert!((l2_norm(&normalized) - 1.0).abs() < 1e-6);
}

#[test]
fn insertion_order_does_not_matter() {
    let engine = engine_with_user("u1");
    push(&engine, "u1", vec![0.0, 1.0], base_time() + Duration::hours(1));
    push(&engine, "u1", vec![1.0, 0.0], base_time());

    let aggregator = EmbeddingAggregator::new(engine.clone(), DecayConfig::default());
    let raw = aggregator
        .recompute_profile("u1")
        .unwrap()
        .unwrap()
        .raw_average
        .unwrap();
    assert!(raw[1] > raw[0]);
}

#[test]
fn larger_platform_flattens_weights() {
    let engine = engine_with_user("u1");
    push(&engine, "u1", vec![1.0, 0.0], base_time());
    push(&engine, "u1", vec![0.0, 1.0], base_time() + Duration::hours(1));
    set_coefficient(&engine, 1_000_000, 1e-8);

    let aggregator = EmbeddingAggregator::new(engine.clone(), DecayConfig::default());
    let raw = aggregator
        .recompute_profile("u1")
        .unwrap()
        .unwrap()
        .raw_average
        .unwrap();
    assert!((raw[0] - 0.5).abs() < 1e-6);
    assert!((raw[1] - 0.5).abs() < 1e-6);
}

#[test]
fn zero_average_has_no_normalized_form() {
    let engine = engine_with_user("u1");
    push(&engine, "u1", vec![0.0, 0.0], base_time());

    let aggregator = EmbeddingAggregator::new(engine.clone(), DecayConfig::default());
    let profile = aggregator.recompute_profile("u1").unwrap().unwrap();
    assert_eq!(profile.raw_average, Some(vec![0.0, 0.0]));
    assert!(profile.normalized_average.is_none());
}

#[test]
fn mismatched_dimensions_are_skipped() {
    let engine = engine_with_user("u1");
    push(&engine, "u1", vec![9.0, 9.0, 9.0], base_time());
    push(&engine, "u1", vec![0.0, 1.0], base_time() + Duration::hours(1));

    let aggregator = EmbeddingAggregator::new(engine.clone(), DecayConfig::default());
    let profile = aggregator.recompute_profile("u1").unwrap().unwrap();
    assert_eq!(profile.raw_average, Some(vec![0.0, 1.0]));
}

#[test]
fn recomputation_notifies_subscribers() {
    let engine = engine_with_user("u1");
    let rx = engine.subscribe();
    push(&engine, "u1", vec![1.0, 1.0], base_time());

    let aggregator = EmbeddingAggregator::new(engine.clone(), DecayConfig::default());
    aggregator.recompute_profile("u1").unwrap();

    let change = rx.try_recv().unwrap();
    assert_eq!(change.user_id, "u1");
}

#[test]
fn deterministic_for_fixed_coefficient() {
    let engine = engine_with_user("u1");
    for i in 0..8 {
        push(
            &engine,
            "u1",
            vec![i as f32, (8 - i) as f32, 1.0],
            base_time() + Duration::minutes(i),
        );
    }
    set_coefficient(&engine, 500, 0.3);

    let aggregator = EmbeddingAggregator::new(engine.clone(), DecayConfig::default());
    let a = aggregator.recompute_profile("u1").unwrap().unwrap();
    let b = aggregator.recompute_profile("u1").unwrap().unwrap();
    assert_eq!(a.raw_average, b.raw_average);
    assert_eq!(a.normalized_average, b.normalized_average);
}
