use affinity_core::vector::{cosine, l2_norm, normalize};
use proptest::prelude::*;

fn arb_vector() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-100.0f32..100.0, 1..64)
}

proptest! {
    #[test]
    fn normalized_vector_has_unit_norm(v in arb_vector()) {
        prop_assume!(l2_norm(&v) > 1e-3);
        let n = normalize(&v).unwrap();
        prop_assert!((l2_norm(&n) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn cosine_with_self_is_one(v in arb_vector()) {
        prop_assume!(l2_norm(&v) > 1e-3);
        let c = cosine(&v, &v).unwrap();
        prop_assert!((c - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_is_symmetric(pair in (1usize..32).prop_flat_map(|n| (
        prop::collection::vec(-10.0f32..10.0, n),
        prop::collection::vec(-10.0f32..10.0, n),
    ))) {
        let (a, b) = pair;
        prop_assert_eq!(cosine(&a, &b), cosine(&b, &a));
    }

    #[test]
    fn cosine_is_bounded(pair in (1usize..32).prop_flat_map(|n| (
        prop::collection::vec(-10.0f32..10.0, n),
        prop::collection::vec(-10.0f32..10.0, n),
    ))) {
        let (a, b) = pair;
        if let Some(c) = cosine(&a, &b) {
            prop_assert!((-1.0..=1.0).contains(&c));
        }
    }
}
