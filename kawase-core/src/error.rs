//! Unified error taxonomy for the kawase workspace.

use chrono::NaiveDate;
use thiserror::Error;

/// Unified error type for the kawase workspace.
///
/// This wraps upstream fetch failures, coverage gaps, derivation failures,
/// escalated merge conflicts, and storage failures.
#[derive(Debug, Error)]
pub enum KawaseError {
    /// An upstream market-data source is unreachable or returned a payload
    /// that could not be decoded. Recoverable by rerunning later.
    #[error("{source_name} unavailable: {msg}")]
    SourceUnavailable {
        /// Name of the failing source (e.g. "binance").
        source_name: String,
        /// Human-readable failure description.
        msg: String,
    },

    /// Some requested days had no usable observation. Not fatal by default;
    /// strict callers may abort on it.
    #[error("partial coverage: {} day(s) without observations", missing.len())]
    PartialCoverage {
        /// The days that could not be filled, ascending.
        missing: Vec<NaiveDate>,
    },

    /// The cross-rate formula received invalid numeric inputs for a day.
    /// The day must be dropped from the batch, never written as zero.
    #[error("derivation failed for {date}: {msg}")]
    Derivation {
        /// The observation date that failed.
        date: NaiveDate,
        /// What was wrong with the inputs.
        msg: String,
    },

    /// An incoming record disagrees with an already-stored value and the
    /// caller asked for conflicts to abort the run. The default merge policy
    /// records conflicts in the [`MergeReport`](crate::MergeReport) instead.
    #[error("merge conflict on {date}: stored value differs from re-fetched value")]
    Conflict {
        /// The contested date.
        date: NaiveDate,
    },

    /// Loading or saving the cache blob failed. Always fatal: proceeding
    /// would risk publishing over (or assuming) a cache that was never read
    /// or written.
    #[error("store unavailable: {msg}")]
    StoreUnavailable {
        /// Human-readable failure description.
        msg: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Issues with returned or expected data (missing fields, bad shapes).
    #[error("data issue: {0}")]
    Data(String),
}

impl KawaseError {
    /// Helper: build a `SourceUnavailable` error for a named source.
    pub fn source(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            source_name: source_name.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Derivation` error for a date.
    pub fn derivation(date: NaiveDate, msg: impl Into<String>) -> Self {
        Self::Derivation {
            date,
            msg: msg.into(),
        }
    }

    /// Helper: build a `StoreUnavailable` error.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable { msg: msg.into() }
    }

    /// True when a rerun at a later time could plausibly succeed without
    /// operator intervention (transient upstream or storage failures).
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable { .. } | Self::StoreUnavailable { .. }
        )
    }
}
