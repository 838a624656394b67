use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::{DailyClose, DailyRate, DateSpan, EurCross, KawaseError};

/// Derive one day's record from its raw inputs.
///
/// `USD/JPY = EUR/JPY ÷ EUR/USD`, then `XRP/JPY = XRP/USDT × USD/JPY`.
/// Full double precision, no rounding before storage.
///
/// # Errors
/// Returns `KawaseError::Derivation` when any input is non-finite or
/// non-positive. Invalid days must be dropped by the caller, never coerced
/// to zero and written into the cache.
pub fn derive(
    date: NaiveDate,
    xrp_usdt: f64,
    eur_jpy: f64,
    eur_usd: f64,
) -> Result<DailyRate, KawaseError> {
    check_input(date, "xrp_usdt", xrp_usdt)?;
    check_input(date, "eur_jpy", eur_jpy)?;
    check_input(date, "eur_usd", eur_usd)?;

    let usd_jpy = eur_jpy / eur_usd;
    Ok(DailyRate {
        date,
        xrp_usdt,
        xrp_jpy: xrp_usdt * usd_jpy,
    })
}

fn check_input(date: NaiveDate, field: &str, value: f64) -> Result<(), KawaseError> {
    if !value.is_finite() {
        return Err(KawaseError::derivation(
            date,
            format!("{field} is not finite ({value})"),
        ));
    }
    if value <= 0.0 {
        return Err(KawaseError::derivation(
            date,
            format!("{field} must be positive, got {value}"),
        ));
    }
    Ok(())
}

/// Why a day was left out of a derived batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The exchange published no daily candle for the day.
    MissingClose,
    /// No FX reference rate for the day and none seen earlier in the span to
    /// carry forward (leading weekend/holiday days of a fresh range).
    MissingFx,
    /// The inputs were present but numerically invalid.
    Derivation(String),
}

/// A day excluded from a derived batch, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDay {
    /// The day that was skipped.
    pub date: NaiveDate,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Result of deriving a whole span: the usable records plus every day that
/// had to be left out.
#[derive(Debug, Clone, PartialEq)]
pub struct DeriveOutcome {
    /// Derived records, ascending by date.
    pub rates: Vec<DailyRate>,
    /// Days excluded from the batch, ascending by date.
    pub skipped: Vec<SkippedDay>,
}

impl DeriveOutcome {
    /// The skipped dates, ascending.
    #[must_use]
    pub fn missing_dates(&self) -> Vec<NaiveDate> {
        self.skipped.iter().map(|s| s.date).collect()
    }

    /// A `PartialCoverage` error when any day was skipped, for callers that
    /// treat incomplete coverage as fatal. The default drivers log and
    /// proceed with the available subset instead.
    #[must_use]
    pub fn coverage_error(&self) -> Option<KawaseError> {
        if self.skipped.is_empty() {
            None
        } else {
            Some(KawaseError::PartialCoverage {
                missing: self.missing_dates(),
            })
        }
    }
}

/// Derive every day of `span` from raw exchange closes and EUR cross rates.
///
/// Walks the calendar in ascending order. The FX reference publishes business
/// days only, so weekends and holidays inherit the most recent cross rate
/// seen earlier in the span (forward-fill). Days with no exchange candle, no
/// usable FX rate yet, or invalid inputs are reported in
/// [`DeriveOutcome::skipped`] and excluded; one bad day never poisons the
/// rest of the batch.
#[must_use]
pub fn derive_span(span: DateSpan, closes: &[DailyClose], crosses: &[EurCross]) -> DeriveOutcome {
    let close_by_date: BTreeMap<NaiveDate, f64> =
        closes.iter().map(|c| (c.date, c.close)).collect();
    let cross_by_date: BTreeMap<NaiveDate, EurCross> =
        crosses.iter().map(|c| (c.date, *c)).collect();

    let mut rates = Vec::new();
    let mut skipped = Vec::new();
    let mut last_cross: Option<EurCross> = None;

    for date in span.days() {
        if let Some(cross) = cross_by_date.get(&date) {
            last_cross = Some(*cross);
        }

        let Some(close) = close_by_date.get(&date).copied() else {
            warn!(%date, "no daily close for day, skipping");
            skipped.push(SkippedDay {
                date,
                reason: SkipReason::MissingClose,
            });
            continue;
        };

        let Some(cross) = last_cross else {
            warn!(%date, "no FX rate for day and none to carry forward, skipping");
            skipped.push(SkippedDay {
                date,
                reason: SkipReason::MissingFx,
            });
            continue;
        };

        match derive(date, close, cross.eur_jpy, cross.eur_usd) {
            Ok(rate) => rates.push(rate),
            Err(err) => {
                warn!(%date, %err, "derivation failed, skipping day");
                skipped.push(SkippedDay {
                    date,
                    reason: SkipReason::Derivation(err.to_string()),
                });
            }
        }
    }

    DeriveOutcome { rates, skipped }
}
