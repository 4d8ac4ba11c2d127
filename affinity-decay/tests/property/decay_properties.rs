use affinity_core::config::DecayConfig;
use affinity_decay::{decay_coefficient, recency_weights};
use proptest::prelude::*;

proptest! {
    #[test]
    fn coefficient_stays_in_unit_interval(users in 0u64..10_000_000_000) {
        let c = decay_coefficient(users, &DecayConfig::default());
        prop_assert!(c > 0.0 && c <= 1.0);
    }

    #[test]
    fn coefficient_never_grows_with_users(a in 1u64..1_000_000, delta in 0u64..1_000_000) {
        let config = DecayConfig::default();
        prop_assert!(decay_coefficient(a + delta, &config) <= decay_coefficient(a, &config));
    }

    #[test]
    fn weights_start_at_one_and_decrease(coefficient in 0.001f64..=1.0, n in 1usize..64) {
        let w = recency_weights(coefficient, n, 0.2);
        prop_assert_eq!(w[0], 1.0);
        for pair in w.windows(2) {
            prop_assert!(pair[1] < pair[0]);
        }
    }

    #[test]
    fn vanishing_coefficient_flattens_weights(n in 1usize..64) {
        for w in recency_weights(1e-12, n, 0.2) {
            prop_assert!((w - 1.0).abs() < 1e-9);
        }
    }
}
