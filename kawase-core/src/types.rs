//! Date-keyed data model for the daily rate cache.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::KawaseError;

/// Relative tolerance used when deciding whether two stored values are "the
/// same observation". Values are stored at full double precision; the
/// tolerance only absorbs float noise from re-deriving the same inputs.
pub const VALUE_TOLERANCE: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= VALUE_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// One day's cached pair, serialized as a fixed-order two-element JSON array:
/// index 0 is XRP/USDT, index 1 is XRP/JPY. The order is part of the wire
/// format and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePair(pub f64, pub f64);

impl RatePair {
    /// XRP price in USDT.
    #[must_use]
    pub const fn usdt(&self) -> f64 {
        self.0
    }

    /// XRP price in JPY (always derived, never fetched directly).
    #[must_use]
    pub const fn jpy(&self) -> f64 {
        self.1
    }

    /// Tolerance-aware equality; see [`VALUE_TOLERANCE`].
    #[must_use]
    pub fn approx_eq(&self, other: &Self) -> bool {
        approx(self.0, other.0) && approx(self.1, other.1)
    }
}

/// One calendar day's derived observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRate {
    /// The observation date (UTC calendar day), the unique key.
    pub date: NaiveDate,
    /// XRP/USDT daily close.
    pub xrp_usdt: f64,
    /// Derived XRP/JPY value for the same day.
    pub xrp_jpy: f64,
}

impl DailyRate {
    /// The stored representation of this observation.
    #[must_use]
    pub const fn pair(&self) -> RatePair {
        RatePair(self.xrp_usdt, self.xrp_jpy)
    }
}

/// A raw `(date, close)` observation from a spot exchange.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyClose {
    /// The UTC calendar day the candle opened on.
    pub date: NaiveDate,
    /// Daily close price.
    pub close: f64,
}

/// A raw EUR-based cross-rate observation from the currency reference API.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EurCross {
    /// The business day the rates were published for.
    pub date: NaiveDate,
    /// EUR/JPY reference rate.
    pub eur_jpy: f64,
    /// EUR/USD reference rate.
    pub eur_usd: f64,
}

/// A closed calendar-day interval; both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateSpan {
    /// Build a span from inclusive bounds.
    ///
    /// # Errors
    /// Returns `KawaseError::InvalidArg` when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, KawaseError> {
        if start > end {
            return Err(KawaseError::InvalidArg(format!(
                "span start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// A one-day span.
    #[must_use]
    pub const fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// First day of the span.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the span.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, at least 1.
    #[must_use]
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Iterate every calendar day in the span, ascending.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        std::iter::successors(Some(self.start), move |d| {
            d.succ_opt().filter(|next| *next <= self.end)
        })
    }

    /// Whether `date` falls inside the span.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The persisted cache: a mapping from date to [`RatePair`], serialized as a
/// flat JSON object with ISO date keys, ascending:
///
/// ```json
/// {"2022-10-01":[0.4754,68.77],"2022-10-02":[0.4485,64.88]}
/// ```
///
/// Key uniqueness and ascending iteration order are structural properties of
/// the underlying `BTreeMap`, not conventions callers must uphold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateSeries(BTreeMap<NaiveDate, RatePair>);

impl RateSeries {
    /// An empty series (what a fresh bootstrap starts from).
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Number of cached days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no day is cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up the stored pair for a date.
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<RatePair> {
        self.0.get(&date).copied()
    }

    /// Whether a date is already cached.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains_key(&date)
    }

    /// The most recent cached date, if any. This is the resume point for the
    /// diff-fill driver; there is no separate metadata field to drift out of
    /// sync with the map.
    #[must_use]
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.0.keys().next_back().copied()
    }

    /// The earliest cached date, if any.
    #[must_use]
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.0.keys().next().copied()
    }

    /// Insert or replace a day's pair.
    pub fn insert(&mut self, date: NaiveDate, pair: RatePair) {
        self.0.insert(date, pair);
    }

    /// Iterate `(date, pair)` ascending by date.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, RatePair)> + '_ {
        self.0.iter().map(|(d, p)| (*d, *p))
    }
}

impl FromIterator<(NaiveDate, RatePair)> for RateSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, RatePair)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
