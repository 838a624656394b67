use chrono::NaiveDate;
use kawase_core::{DailyRate, RatePair, RateSeries, merge, merge_forced};
use proptest::prelude::*;

fn day(offset: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 10, 1).unwrap() + chrono::Days::new(u64::from(offset.unsigned_abs()))
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i32..3_000).prop_map(day)
}

fn arb_rate() -> impl Strategy<Value = DailyRate> {
    (arb_date(), 1u32..100_000, 1u32..10_000_000).prop_map(|(date, usdt_c, jpy_c)| DailyRate {
        date,
        xrp_usdt: f64::from(usdt_c) / 10_000.0,
        xrp_jpy: f64::from(jpy_c) / 10_000.0,
    })
}

fn arb_series() -> impl Strategy<Value = RateSeries> {
    proptest::collection::vec(arb_rate(), 0..100)
        .prop_map(|rates| rates.into_iter().map(|r| (r.date, r.pair())).collect())
}

proptest! {
    #[test]
    fn merge_is_idempotent_over_contained_batches(s in arb_series()) {
        let contained: Vec<DailyRate> = s
            .iter()
            .map(|(date, pair)| DailyRate { date, xrp_usdt: pair.usdt(), xrp_jpy: pair.jpy() })
            .collect();
        let report = merge(&s, &contained);
        prop_assert_eq!(&report.series, &s);
        prop_assert!(report.inserted.is_empty());
        prop_assert!(report.conflicts.is_empty());
        prop_assert!(!report.is_changed());
    }

    #[test]
    fn merge_never_loses_existing_entries(s in arb_series(), incoming in proptest::collection::vec(arb_rate(), 0..100)) {
        let report = merge(&s, &incoming);
        for (date, pair) in s.iter() {
            let merged = report.series.get(date);
            prop_assert_eq!(merged, Some(pair));
        }
    }

    #[test]
    fn merge_result_is_key_union(s in arb_series(), incoming in proptest::collection::vec(arb_rate(), 0..100)) {
        let report = merge(&s, &incoming);
        for (date, _) in s.iter() {
            prop_assert!(report.series.contains(date));
        }
        for r in &incoming {
            prop_assert!(report.series.contains(r.date));
        }
        // No keys out of thin air either.
        for (date, _) in report.series.iter() {
            prop_assert!(s.contains(date) || incoming.iter().any(|r| r.date == date));
        }
    }

    #[test]
    fn merge_output_is_sorted_and_unique(s in arb_series(), incoming in proptest::collection::vec(arb_rate(), 0..100)) {
        let report = merge(&s, &incoming);
        let dates: Vec<NaiveDate> = report.series.iter().map(|(d, _)| d).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(dates, sorted);
    }

    #[test]
    fn merge_is_deterministic(s in arb_series(), incoming in proptest::collection::vec(arb_rate(), 0..100)) {
        let a = merge(&s, &incoming);
        let b = merge(&s, &incoming);
        prop_assert_eq!(a, b);
        let bytes_a = serde_json::to_vec(&merge(&s, &incoming).series).unwrap();
        let bytes_b = serde_json::to_vec(&merge(&s, &incoming).series).unwrap();
        prop_assert_eq!(bytes_a, bytes_b);
    }

    #[test]
    fn forced_merge_only_rewrites_conflicting_dates(s in arb_series(), incoming in proptest::collection::vec(arb_rate(), 0..100)) {
        let report = merge_forced(&s, &incoming);
        for (date, pair) in s.iter() {
            if report.overwritten.contains(&date) {
                continue;
            }
            prop_assert_eq!(report.series.get(date), Some(pair));
        }
        prop_assert_eq!(
            report.overwritten.len(),
            report.conflicts.len()
        );
    }
}

fn rate(date: &str, usdt: f64, jpy: f64) -> DailyRate {
    DailyRate {
        date: date.parse().unwrap(),
        xrp_usdt: usdt,
        xrp_jpy: jpy,
    }
}

#[test]
fn fresh_bootstrap_inserts_into_empty_series() {
    let report = merge(&RateSeries::new(), &[rate("2022-10-01", 0.4754, 68.77)]);
    assert_eq!(report.series.len(), 1);
    assert_eq!(
        report.series.get("2022-10-01".parse().unwrap()),
        Some(RatePair(0.4754, 68.77))
    );
    assert!(report.is_changed());
    assert_eq!(
        serde_json::to_string(&report.series).unwrap(),
        r#"{"2022-10-01":[0.4754,68.77]}"#
    );
}

#[test]
fn trailing_extension_keeps_prior_days_untouched() {
    let existing: RateSeries = [
        ("2022-10-01".parse().unwrap(), RatePair(0.4754, 68.77)),
        ("2022-10-02".parse().unwrap(), RatePair(0.4485, 64.88)),
    ]
    .into_iter()
    .collect();

    let report = merge(&existing, &[rate("2022-10-03", 0.4621, 66.96)]);

    assert_eq!(report.series.len(), 3);
    let dates: Vec<NaiveDate> = report.series.iter().map(|(d, _)| d).collect();
    assert_eq!(
        dates,
        vec![
            "2022-10-01".parse().unwrap(),
            "2022-10-02".parse().unwrap(),
            "2022-10-03".parse().unwrap()
        ]
    );
    assert_eq!(
        report.series.get("2022-10-01".parse().unwrap()),
        Some(RatePair(0.4754, 68.77))
    );
    assert_eq!(
        report.series.get("2022-10-02".parse().unwrap()),
        Some(RatePair(0.4485, 64.88))
    );
    assert_eq!(report.inserted, vec!["2022-10-03".parse::<NaiveDate>().unwrap()]);
}

#[test]
fn conflicting_refetch_preserves_stored_value_and_reports() {
    let existing: RateSeries = [("2022-10-01".parse().unwrap(), RatePair(0.4754, 68.77))]
        .into_iter()
        .collect();

    let report = merge(&existing, &[rate("2022-10-01", 0.48, 69.5)]);

    assert_eq!(
        report.series.get("2022-10-01".parse().unwrap()),
        Some(RatePair(0.4754, 68.77))
    );
    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.conflicts[0].incoming, RatePair(0.48, 69.5));
    assert!(!report.is_changed());
}

#[test]
fn forced_merge_overwrites_and_reports() {
    let existing: RateSeries = [("2022-10-01".parse().unwrap(), RatePair(0.4754, 68.77))]
        .into_iter()
        .collect();

    let report = merge_forced(&existing, &[rate("2022-10-01", 0.48, 69.5)]);

    assert_eq!(
        report.series.get("2022-10-01".parse().unwrap()),
        Some(RatePair(0.48, 69.5))
    );
    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.overwritten, vec!["2022-10-01".parse::<NaiveDate>().unwrap()]);
    assert!(report.is_changed());
}

#[test]
fn value_equal_refetch_within_tolerance_is_not_a_conflict() {
    let existing: RateSeries = [("2022-10-01".parse().unwrap(), RatePair(0.4754, 68.77))]
        .into_iter()
        .collect();

    let noisy = rate("2022-10-01", 0.4754, 68.77 * (1.0 + 1e-13));
    let report = merge(&existing, &[noisy]);

    assert!(report.conflicts.is_empty());
    assert!(!report.is_changed());
}
