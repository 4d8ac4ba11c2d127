use std::sync::Arc;

use affinity_core::config::DecayConfig;
use affinity_core::models::{EmbeddingRecord, UserAccount};
use affinity_core::traits::{IEmbeddingStorage, IUserStorage};
use affinity_embeddings::EmbeddingAggregator;
use affinity_storage::StorageEngine;
use chrono::{Duration, Utc};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_recompute(c: &mut Criterion) {
    let engine = Arc::new(StorageEngine::open_in_memory().unwrap());
    engine.upsert_user(&UserAccount::new("bench")).unwrap();
    let start = Utc::now();
    for i in 0..100 {
        let vector: Vec<f32> = (0..1536).map(|d| ((i * 31 + d) % 97) as f32 / 97.0).collect();
        engine
            .append_embedding(
                "bench",
                &EmbeddingRecord {
                    vector,
                    timestamp: start + Duration::seconds(i as i64),
                    analysis_ref: format!("users/bench/analysis/{i}"),
                },
            )
            .unwrap();
    }
    let aggregator = EmbeddingAggregator::new(engine, DecayConfig::default());

    c.bench_function("recompute_profile_100x1536", |b| {
        b.iter(|| aggregator.recompute_profile("bench").unwrap())
    });
}

criterion_group!(benches, bench_recompute);
criterion_main!(benches);
