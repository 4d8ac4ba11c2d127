use affinity_core::config::RankingConfig;
use affinity_core::models::UserProfile;
use affinity_core::vector::normalize;
use affinity_ranking::{amplify, scale, SimilarityRanker};
use proptest::prelude::*;

fn profile(id: String, raw: Vec<f32>) -> UserProfile {
    UserProfile {
        id,
        normalized_average: normalize(&raw),
        raw_average: Some(raw),
        last_update: None,
    }
}

fn vector(dims: usize) -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-10.0f32..10.0, dims)
}

proptest! {
    #[test]
    fn scaled_and_amplified_stay_in_unit_interval(s in -1.0f64..=1.0) {
        let scaled = scale(s, 0.5);
        let amplified = amplify(scaled, 10.0);
        prop_assert!((0.0..=1.0).contains(&scaled));
        prop_assert!(amplified > 0.0 && amplified < 1.0);
    }

    #[test]
    fn amplification_is_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        if a < b {
            prop_assert!(amplify(a, 10.0) <= amplify(b, 10.0));
        }
    }

    #[test]
    fn ranking_is_bounded_sorted_and_excludes_requester(
        me in vector(4),
        others in prop::collection::vec(vector(4), 0..20),
    ) {
        let mut profiles = vec![profile("me".into(), me)];
        profiles.extend(others.into_iter().enumerate().map(|(i, v)| profile(format!("u{i}"), v)));

        let ranked = SimilarityRanker::new(RankingConfig::default()).rank_candidates("me", &profiles);
        prop_assert!(ranked.len() <= 5);
        prop_assert!(ranked.iter().all(|c| c.user_id != "me"));

        for pair in ranked.windows(2) {
            match (pair[0].amplified_similarity, pair[1].amplified_similarity) {
                (Some(x), Some(y)) => prop_assert!(x >= y),
                (None, Some(_)) => prop_assert!(false, "null before number"),
                _ => {}
            }
        }
    }
}
