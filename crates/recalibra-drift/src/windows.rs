//! Baseline/recent window split.

use chrono::Duration;
use recalibra_core::models::{SplitStrategy, TrainingFrame, TrainingRow};

/// Measured values of the two windows, oldest rows first in each.
#[derive(Debug, Clone, PartialEq)]
pub struct Windows {
    pub baseline: Vec<f64>,
    pub recent: Vec<f64>,
    pub strategy: SplitStrategy,
}

/// Split a frame into baseline and recent windows.
///
/// Timestamped rows are sorted by time. Rows at or after
/// `latest - cutoff_days` are recent, the rest baseline. When that leaves a
/// window empty, or the cutoff falls outside the representable date range,
/// the sorted rows are halved by count instead, the extra row
/// of an odd count going to recent. Untimed rows are dropped unless no row
/// has a timestamp, in which case the whole frame is halved in its given
/// order.
pub fn split_windows(frame: &TrainingFrame, cutoff_days: u32) -> Windows {
    let mut timed: Vec<&TrainingRow> = frame
        .rows()
        .iter()
        .filter(|r| r.observed_at.is_some())
        .collect();

    if timed.is_empty() {
        let all: Vec<&TrainingRow> = frame.rows().iter().collect();
        return halves(&all);
    }

    timed.sort_by_key(|r| r.observed_at);
    let Some(latest) = timed.last().and_then(|r| r.observed_at) else {
        return halves(&timed);
    };
    let Some(cutoff) = latest.checked_sub_signed(Duration::days(i64::from(cutoff_days))) else {
        return halves(&timed);
    };

    let (recent, baseline): (Vec<&TrainingRow>, Vec<&TrainingRow>) = timed
        .iter()
        .copied()
        .partition(|r| r.observed_at.is_some_and(|t| t >= cutoff));

    if baseline.is_empty() || recent.is_empty() {
        return halves(&timed);
    }

    Windows {
        baseline: measured(&baseline),
        recent: measured(&recent),
        strategy: SplitStrategy::TimeCutoff,
    }
}

fn halves(rows: &[&TrainingRow]) -> Windows {
    let mid = rows.len() / 2;
    Windows {
        baseline: measured(&rows[..mid]),
        recent: measured(&rows[mid..]),
        strategy: SplitStrategy::IndexHalves,
    }
}

fn measured(rows: &[&TrainingRow]) -> Vec<f64> {
    rows.iter().map(|r| r.measured_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use test_fixtures::{frame_from_pairs, timed_frame, FrameBuilder};

    #[test]
    fn cutoff_split_uses_days_before_latest() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let values: Vec<f64> = (0..60i32).map(f64::from).collect();
        let frame = timed_frame("m", start, Duration::days(1), &values);
        let w = split_windows(&frame, 30);
        assert_eq!(w.strategy, SplitStrategy::TimeCutoff);
        // Latest is day 59, cutoff day 29 is recent.
        assert_eq!(w.baseline.len(), 29);
        assert_eq!(w.recent.len(), 31);
        assert_eq!(w.recent[0], 29.0);
    }

    #[test]
    fn narrow_span_falls_back_to_halves() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let values: Vec<f64> = (0..21i32).map(f64::from).collect();
        let frame = timed_frame("m", start, Duration::hours(1), &values);
        let w = split_windows(&frame, 30);
        assert_eq!(w.strategy, SplitStrategy::IndexHalves);
        assert_eq!(w.baseline.len(), 10);
        assert_eq!(w.recent.len(), 11);
    }

    #[test]
    fn rows_are_sorted_before_splitting() {
        let d = |day: u32| Utc.with_ymd_and_hms(2026, 1, day, 0, 0, 0).unwrap();
        let frame = FrameBuilder::new("m")
            .row(0.0, 4.0)
            .at(d(4))
            .row(0.0, 1.0)
            .at(d(1))
            .row(0.0, 3.0)
            .at(d(3))
            .row(0.0, 2.0)
            .at(d(2))
            .build();
        let w = split_windows(&frame, 30);
        assert_eq!(w.baseline, vec![1.0, 2.0]);
        assert_eq!(w.recent, vec![3.0, 4.0]);
    }

    #[test]
    fn untimed_frame_is_halved_in_order() {
        let frame = frame_from_pairs("m", &[0.0; 5], &[5.0, 4.0, 3.0, 2.0, 1.0]);
        let w = split_windows(&frame, 30);
        assert_eq!(w.strategy, SplitStrategy::IndexHalves);
        assert_eq!(w.baseline, vec![5.0, 4.0]);
        assert_eq!(w.recent, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn untimed_rows_dropped_when_some_are_timed() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let frame = FrameBuilder::new("m")
            .row(0.0, 1.0)
            .at(start)
            .row(0.0, 99.0)
            .row(0.0, 2.0)
            .at(start + Duration::days(40))
            .build();
        let w = split_windows(&frame, 30);
        assert_eq!(w.strategy, SplitStrategy::TimeCutoff);
        assert_eq!(w.baseline, vec![1.0]);
        assert_eq!(w.recent, vec![2.0]);
    }

    #[test]
    fn unrepresentable_cutoff_falls_back_to_halves() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let values: Vec<f64> = (0..60i32).map(f64::from).collect();
        let frame = timed_frame("m", start, Duration::days(1), &values);
        for cutoff_days in [200_000_000, u32::MAX] {
            let w = split_windows(&frame, cutoff_days);
            assert_eq!(w.strategy, SplitStrategy::IndexHalves);
            assert_eq!(w.baseline.len(), 30);
            assert_eq!(w.recent.len(), 30);
        }
    }

    #[test]
    fn empty_frame_gives_empty_windows() {
        let w = split_windows(&frame_from_pairs("m", &[], &[]), 30);
        assert!(w.baseline.is_empty());
        assert!(w.recent.is_empty());
    }
}
