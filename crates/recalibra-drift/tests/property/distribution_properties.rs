use proptest::prelude::*;
use recalibra_drift::{ks_two_sample, population_stability_index};

fn sample() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1e4f64..1e4, 0..80)
}

proptest! {
    #[test]
    fn psi_is_non_negative_and_finite(a in sample(), b in sample(), bins in 2usize..20) {
        let psi = population_stability_index(&a, &b, bins);
        prop_assert!(psi >= 0.0);
        prop_assert!(psi.is_finite());
    }

    #[test]
    fn psi_of_sample_with_itself_is_zero(a in sample(), bins in 2usize..20) {
        prop_assert!(population_stability_index(&a, &a, bins) < 1e-9);
    }

    #[test]
    fn ks_outputs_are_probabilities(a in sample(), b in sample()) {
        let r = ks_two_sample(&a, &b);
        prop_assert!((0.0..=1.0).contains(&r.statistic));
        prop_assert!((0.0..=1.0).contains(&r.p_value));
    }

    #[test]
    fn ks_is_symmetric(a in sample(), b in sample()) {
        let ab = ks_two_sample(&a, &b);
        let ba = ks_two_sample(&b, &a);
        prop_assert!((ab.statistic - ba.statistic).abs() < 1e-12);
        prop_assert!((ab.p_value - ba.p_value).abs() < 1e-12);
    }

    #[test]
    fn ks_of_sample_with_itself_is_zero(a in prop::collection::vec(-1e4f64..1e4, 1..80)) {
        let r = ks_two_sample(&a, &a);
        prop_assert_eq!(r.statistic, 0.0);
        prop_assert_eq!(r.p_value, 1.0);
    }
}
