use affinity_core::config::DecayConfig;

/// Decay coefficient for a platform with `total_users` registered users.
///
/// `exp(-scale_factor * log10(total_users)^scale_exponent)`, always in (0, 1].
/// Zero or one user gives 1.
pub fn decay_coefficient(total_users: u64, config: &DecayConfig) -> f64 {
    if total_users <= 1 {
        return 1.0;
    }
    let scale = (total_users as f64).log10().powf(config.scale_exponent);
    (-config.scale_factor * scale)
        .exp()
        .clamp(f64::MIN_POSITIVE, 1.0)
}

/// Weight of the record at 0-based recency `rank` (0 = newest).
pub fn recency_weight(coefficient: f64, rank: usize, recency_rate: f64) -> f64 {
    (-coefficient * rank as f64 * recency_rate).exp()
}

/// Weights for ranks `0..count`.
pub fn recency_weights(coefficient: f64, count: usize, recency_rate: f64) -> Vec<f64> {
    (0..count)
        .map(|rank| recency_weight(coefficient, rank, recency_rate))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_platforms_keep_full_recency_bias() {
        let config = DecayConfig::default();
        assert_eq!(decay_coefficient(0, &config), 1.0);
        assert_eq!(decay_coefficient(1, &config), 1.0);
    }

    #[test]
    fn coefficient_matches_reference_values() {
        let config = DecayConfig::default();
        assert!((decay_coefficient(5, &config) - 0.984_782_003_167_290_4).abs() < 1e-12);
        assert!((decay_coefficient(10, &config) - 0.951_229_424_500_714).abs() < 1e-12);
        assert!((decay_coefficient(1000, &config) - 0.153_044_679_104_806_2).abs() < 1e-12);
    }

    #[test]
    fn newest_record_always_has_weight_one() {
        for coefficient in [0.0, 0.3, 1.0] {
            assert_eq!(recency_weight(coefficient, 0, 0.2), 1.0);
        }
    }

    #[test]
    fn weights_match_reference_sequence() {
        let expected = [
            1.0,
            0.820_259_459_877_697_9,
            0.672_825_581_518_852_6,
            0.551_891_548_088_552,
            0.452_694_263_146_182_16,
        ];
        let weights = recency_weights(0.990_672_871_436_734_7, 5, 0.2);
        for (w, e) in weights.iter().zip(expected) {
            assert!((w - e).abs() < 1e-12, "{w} != {e}");
        }
    }
}
