use chrono::NaiveDate;

use crate::{DailyRate, RatePair, RateSeries};

/// An incoming record that disagrees with the value already stored for the
/// same date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateConflict {
    /// The contested date.
    pub date: NaiveDate,
    /// What the series already holds.
    pub existing: RatePair,
    /// What the re-fetch derived.
    pub incoming: RatePair,
}

/// Outcome of a merge: the new series plus what happened to get there.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeReport {
    /// The merged series, date-unique and ascending.
    pub series: RateSeries,
    /// Dates that were genuinely new, ascending.
    pub inserted: Vec<NaiveDate>,
    /// Conflicting dates. Under the default policy the existing value was
    /// kept for each of these; under the forced variant it was replaced.
    pub conflicts: Vec<RateConflict>,
    /// Dates whose stored value was replaced. Empty except under
    /// [`merge_forced`].
    pub overwritten: Vec<NaiveDate>,
}

impl MergeReport {
    /// Whether the merged series differs from the existing one, i.e. whether
    /// persisting it is warranted.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        !self.inserted.is_empty() || !self.overwritten.is_empty()
    }
}

/// Reconcile freshly derived days against the stored series.
///
/// For each incoming record, in ascending date order:
/// - a date not yet in the series is inserted;
/// - a date whose stored pair is value-equal (within tolerance) is a no-op,
///   which is what makes scheduled reruns idempotent;
/// - a date whose stored pair differs keeps the stored value and the
///   discrepancy is reported as a [`RateConflict`]. History is immutable by
///   default; overwriting requires the explicit [`merge_forced`] entrypoint.
///
/// The result is a pure function of its two inputs: every existing entry
/// survives unchanged, keys stay unique, and iteration stays ascending.
#[must_use]
pub fn merge(existing: &RateSeries, incoming: &[DailyRate]) -> MergeReport {
    merge_with(existing, incoming, false)
}

/// Merge with explicit recompute: conflicting dates are overwritten with the
/// incoming value (and still reported, so callers can log what changed).
/// Never the default path; callers opt in per run.
#[must_use]
pub fn merge_forced(existing: &RateSeries, incoming: &[DailyRate]) -> MergeReport {
    merge_with(existing, incoming, true)
}

fn merge_with(existing: &RateSeries, incoming: &[DailyRate], overwrite: bool) -> MergeReport {
    let mut series = existing.clone();
    let mut inserted = Vec::new();
    let mut conflicts = Vec::new();
    let mut overwritten = Vec::new();

    let mut batch: Vec<&DailyRate> = incoming.iter().collect();
    batch.sort_by_key(|r| r.date);

    for rate in batch {
        let pair = rate.pair();
        match series.get(rate.date) {
            None => {
                series.insert(rate.date, pair);
                inserted.push(rate.date);
            }
            Some(stored) if stored.approx_eq(&pair) => {}
            Some(stored) => {
                conflicts.push(RateConflict {
                    date: rate.date,
                    existing: stored,
                    incoming: pair,
                });
                if overwrite {
                    series.insert(rate.date, pair);
                    overwritten.push(rate.date);
                }
            }
        }
    }

    MergeReport {
        series,
        inserted,
        conflicts,
        overwritten,
    }
}
