use chrono::{Duration, TimeZone, Utc};
use recalibra_metrics::{frame_metrics, metrics_by_bucket, TimeBucket};
use test_fixtures::{frame_from_pairs, FrameBuilder};

#[test]
fn daily_buckets_are_chronological_and_skip_untimed_rows() {
    let d0 = Utc.with_ymd_and_hms(2026, 5, 10, 8, 0, 0).unwrap();
    let frame = FrameBuilder::new("m")
        .row(1.0, 2.0)
        .at(d0 + Duration::days(2))
        .row(1.0, 1.0)
        .at(d0)
        .row(3.0, 3.0)
        .at(d0 + Duration::hours(6))
        .row(9.0, 0.0)
        .build();

    let buckets = metrics_by_bucket(&frame, TimeBucket::Day).unwrap();
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].bucket_start, Utc.with_ymd_and_hms(2026, 5, 10, 0, 0, 0).unwrap());
    assert_eq!(buckets[0].metrics.n_samples, 2);
    assert_eq!(buckets[0].metrics.rmse, 0.0);
    assert_eq!(buckets[1].bucket_start, Utc.with_ymd_and_hms(2026, 5, 12, 0, 0, 0).unwrap());
    assert_eq!(buckets[1].metrics.mae, 1.0);
}

#[test]
fn monthly_buckets_group_whole_months() {
    let start = Utc.with_ymd_and_hms(2026, 1, 20, 0, 0, 0).unwrap();
    let mut builder = FrameBuilder::new("m");
    for i in 0..30 {
        builder = builder.row(0.0, 1.0).at(start + Duration::days(i));
    }
    let buckets = metrics_by_bucket(&builder.build(), TimeBucket::Month).unwrap();
    let counts: Vec<usize> = buckets.iter().map(|b| b.metrics.n_samples).collect();
    // Jan 20..=31 then Feb 1..=18.
    assert_eq!(counts, vec![12, 18]);
}

#[test]
fn frame_without_timestamps_has_no_buckets() {
    let frame = frame_from_pairs("m", &[1.0, 2.0], &[1.0, 2.0]);
    assert!(metrics_by_bucket(&frame, TimeBucket::Week).unwrap().is_empty());
    assert_eq!(frame_metrics(&frame).unwrap().n_samples, 2);
}

#[test]
fn empty_frame_metrics_is_invalid_input() {
    let frame = frame_from_pairs("m", &[], &[]);
    assert!(frame_metrics(&frame).is_err());
}
