use proptest::prelude::*;
use recalibra_metrics::compute_metrics;

fn paired(max_len: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1..max_len).prop_flat_map(|n| {
        (
            prop::collection::vec(-1e3f64..1e3, n),
            prop::collection::vec(-1e3f64..1e3, n),
        )
    })
}

proptest! {
    #[test]
    fn errors_are_non_negative_and_r2_bounded((p, m) in paired(64)) {
        let s = compute_metrics(&p, &m).unwrap();
        prop_assert!(s.rmse >= 0.0);
        prop_assert!(s.mae >= 0.0);
        prop_assert!(s.r_squared <= 1.0);
        prop_assert!(s.r_squared >= 0.0);
        prop_assert_eq!(s.n_samples, p.len());
    }

    #[test]
    fn rmse_never_below_mae((p, m) in paired(64)) {
        let s = compute_metrics(&p, &m).unwrap();
        prop_assert!(s.rmse + 1e-9 >= s.mae, "rmse {} < mae {}", s.rmse, s.mae);
    }

    #[test]
    fn perfect_predictions_score_perfectly(v in prop::collection::vec(-1e3f64..1e3, 1..64)) {
        let s = compute_metrics(&v, &v).unwrap();
        prop_assert_eq!(s.rmse, 0.0);
        prop_assert_eq!(s.mae, 0.0);
        prop_assert!((s.r_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn constant_offset_keeps_r2_at_one(
        v in prop::collection::vec(-100f64..100.0, 2..64),
        c in prop_oneof![-50f64..-0.5, 0.5f64..50.0],
    ) {
        let spread = v.iter().cloned().fold(f64::MIN, f64::max) - v.iter().cloned().fold(f64::MAX, f64::min);
        prop_assume!(spread > 1e-3);
        let measured: Vec<f64> = v.iter().map(|x| x + c).collect();
        let s = compute_metrics(&v, &measured).unwrap();
        prop_assert!((s.rmse - c.abs()).abs() < 1e-6);
        prop_assert!((s.mae - c.abs()).abs() < 1e-6);
        prop_assert!((s.r_squared - 1.0).abs() < 1e-6);
    }

    #[test]
    fn mismatched_lengths_always_rejected(
        p in prop::collection::vec(-1e3f64..1e3, 0..16),
        extra in 1usize..4,
    ) {
        let m = vec![0.0; p.len() + extra];
        prop_assert!(compute_metrics(&p, &m).is_err());
    }
}
