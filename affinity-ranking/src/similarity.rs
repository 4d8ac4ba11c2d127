use affinity_core::config::RankingConfig;
use affinity_core::models::{RankedCandidate, UserProfile};
use affinity_core::vector::cosine;

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Map `[midpoint, 1]` linearly onto `[0, 1]`; anything below the midpoint is 0.
///
/// With the default midpoint of 0.5 this is `max(0, (s - 0.5) * 2)`.
pub fn scale(normalized_similarity: f64, midpoint: f64) -> f64 {
    ((normalized_similarity - midpoint) / (1.0 - midpoint)).max(0.0)
}

/// Logistic sharpening centered on 0.5: `sigmoid((scaled - 0.5) * steepness)`.
pub fn amplify(scaled_similarity: f64, steepness: f64) -> f64 {
    sigmoid((scaled_similarity - 0.5) * steepness)
}

/// Score one candidate against the requester.
///
/// Each score is `None` when its inputs are missing, zero, or of unequal
/// length; derived scores follow the normalized one.
pub fn score_candidate(
    user: &UserProfile,
    candidate: &UserProfile,
    config: &RankingConfig,
) -> RankedCandidate {
    let raw_similarity = match (&user.raw_average, &candidate.raw_average) {
        (Some(a), Some(b)) => cosine(a, b),
        _ => None,
    };
    let normalized_similarity = match (&user.normalized_average, &candidate.normalized_average) {
        (Some(a), Some(b)) => cosine(a, b),
        _ => None,
    };
    let scaled_similarity = normalized_similarity.map(|s| scale(s, config.midpoint));
    let amplified_similarity =
        scaled_similarity.map(|s| amplify(s, config.amplification_steepness));

    RankedCandidate {
        user_id: candidate.id.clone(),
        raw_similarity,
        normalized_similarity,
        scaled_similarity,
        amplified_similarity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_examples() {
        assert!((scale(0.7, 0.5) - 0.4).abs() < 1e-12);
        assert_eq!(scale(0.3, 0.5), 0.0);
        assert_eq!(scale(1.0, 0.5), 1.0);
        assert_eq!(scale(-1.0, 0.5), 0.0);
    }

    #[test]
    fn amplify_examples() {
        assert!((amplify(0.4, 10.0) - 0.268_941_421_369_995_1).abs() < 1e-12);
        assert!((amplify(0.0, 10.0) - 0.006_692_850_924_284_855).abs() < 1e-12);
        assert_eq!(amplify(0.5, 10.0), 0.5);
    }

    #[test]
    fn missing_raw_keeps_normalized_scores() {
        let user = UserProfile {
            id: "u".into(),
            raw_average: Some(vec![1.0, 0.0]),
            normalized_average: Some(vec![1.0, 0.0]),
            last_update: None,
        };
        let candidate = UserProfile {
            id: "c".into(),
            raw_average: None,
            normalized_average: Some(vec![1.0, 0.0]),
            last_update: None,
        };
        let scored = score_candidate(&user, &candidate, &RankingConfig::default());
        assert_eq!(scored.raw_similarity, None);
        assert_eq!(scored.normalized_similarity, Some(1.0));
        assert_eq!(scored.scaled_similarity, Some(1.0));
    }

    #[test]
    fn length_mismatch_scores_null() {
        let user = UserProfile {
            id: "u".into(),
            raw_average: Some(vec![1.0, 0.0, 0.0]),
            normalized_average: Some(vec![1.0, 0.0, 0.0]),
            last_update: None,
        };
        let candidate = UserProfile {
            id: "c".into(),
            raw_average: Some(vec![1.0, 0.0]),
            normalized_average: Some(vec![1.0, 0.0]),
            last_update: None,
        };
        let scored = score_candidate(&user, &candidate, &RankingConfig::default());
        assert_eq!(scored.normalized_similarity, None);
        assert_eq!(scored.amplified_similarity, None);
    }
}
