//! The load → fetch → derive → merge → save drivers.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use kawase_core::{
    DateSpan, FxSource, KawaseError, MergeReport, RateSeries, SeriesStore, SpotSource,
    derive_span, merge, merge_forced,
};

/// What to do when a re-fetched day disagrees with the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Keep the stored value and report the conflict (history is immutable).
    #[default]
    Preserve,
    /// Explicit recompute: replace the stored value. Opt-in per run.
    Overwrite,
}

/// What one run did, for logging and exit decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// The fetched span, or `None` when the cache was already up to date.
    pub span: Option<DateSpan>,
    /// Days newly added to the series.
    pub inserted: usize,
    /// Days that could not be derived and were left out.
    pub skipped: usize,
    /// Days where the re-fetch disagreed with the stored value.
    pub conflicts: usize,
    /// Conflicting days replaced (only under [`MergePolicy::Overwrite`]).
    pub overwritten: usize,
    /// Whether a new blob was persisted.
    pub saved: bool,
}

impl RunSummary {
    const fn up_to_date() -> Self {
        Self {
            span: None,
            inserted: 0,
            skipped: 0,
            conflicts: 0,
            overwritten: 0,
            saved: false,
        }
    }
}

/// Sequencer over the three collaborators. Single-writer, run-to-completion:
/// either the full merged series is saved or nothing is.
pub struct Pipeline {
    spot: Arc<dyn SpotSource>,
    fx: Arc<dyn FxSource>,
    store: Arc<dyn SeriesStore>,
    strict: bool,
}

impl Pipeline {
    /// Compose a pipeline from its collaborators.
    #[must_use]
    pub fn new(
        spot: Arc<dyn SpotSource>,
        fx: Arc<dyn FxSource>,
        store: Arc<dyn SeriesStore>,
    ) -> Self {
        Self {
            spot,
            fx,
            store,
            strict: false,
        }
    }

    /// In strict mode, partial coverage fails the run instead of being
    /// logged and tolerated, as do merge conflicts under
    /// [`MergePolicy::Preserve`]. Conflicts resolved by an explicit
    /// overwrite are not failures.
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Build history for an explicit range, merging into whatever the store
    /// already holds.
    ///
    /// # Errors
    /// Fails on fetch or store failures; in strict mode also on partial
    /// coverage, and on conflicts when the policy preserves them.
    pub async fn bootstrap(
        &self,
        span: DateSpan,
        policy: MergePolicy,
    ) -> Result<RunSummary, KawaseError> {
        let existing = self.store.load().await?;
        info!(start = %span.start(), end = %span.end(), "bootstrapping range");
        self.run_span(&existing, span, policy).await
    }

    /// Extend the cache from the day after its last entry through yesterday
    /// (UTC). Today's candle is still open, so it is never fetched. An
    /// already-current cache is a successful no-op that writes nothing.
    ///
    /// # Errors
    /// Fails on fetch or store failures; in strict mode also on partial
    /// coverage, and on conflicts when the policy preserves them.
    pub async fn fill(
        &self,
        initial_start: NaiveDate,
        today: NaiveDate,
        policy: MergePolicy,
    ) -> Result<RunSummary, KawaseError> {
        let existing = self.store.load().await?;

        let yesterday = today
            .pred_opt()
            .ok_or_else(|| KawaseError::InvalidArg(format!("no day precedes {today}")))?;
        let start = match existing.last_date() {
            Some(last) => last
                .succ_opt()
                .ok_or_else(|| KawaseError::InvalidArg(format!("no day follows {last}")))?,
            None => initial_start,
        };

        if start > yesterday {
            info!(last = ?existing.last_date(), "cache is up to date, nothing to fill");
            return Ok(RunSummary::up_to_date());
        }

        let span = DateSpan::new(start, yesterday)?;
        info!(start = %span.start(), end = %span.end(), "filling missing days");
        self.run_span(&existing, span, policy).await
    }

    async fn run_span(
        &self,
        existing: &RateSeries,
        span: DateSpan,
        policy: MergePolicy,
    ) -> Result<RunSummary, KawaseError> {
        let closes = self.spot.daily_closes(span).await?;
        let crosses = self.fx.eur_cross_rates(span).await?;

        let outcome = derive_span(span, &closes, &crosses);
        if self.strict
            && let Some(err) = outcome.coverage_error()
        {
            return Err(err);
        }

        let report: MergeReport = match policy {
            MergePolicy::Preserve => merge(existing, &outcome.rates),
            MergePolicy::Overwrite => merge_forced(existing, &outcome.rates),
        };
        for conflict in &report.conflicts {
            warn!(
                date = %conflict.date,
                existing = ?conflict.existing,
                incoming = ?conflict.incoming,
                "re-fetched value disagrees with stored history"
            );
        }
        if self.strict
            && policy == MergePolicy::Preserve
            && let Some(first) = report.conflicts.first()
        {
            return Err(KawaseError::Conflict { date: first.date });
        }

        let saved = if report.is_changed() {
            self.store.save(&report.series).await?;
            true
        } else {
            info!("merge produced no changes, skipping save");
            false
        };

        let summary = RunSummary {
            span: Some(span),
            inserted: report.inserted.len(),
            skipped: outcome.skipped.len(),
            conflicts: report.conflicts.len(),
            overwritten: report.overwritten.len(),
            saved,
        };
        info!(
            inserted = summary.inserted,
            skipped = summary.skipped,
            conflicts = summary.conflicts,
            saved = summary.saved,
            "run complete"
        );
        Ok(summary)
    }
}

/// Push the series held by `from` to `to` unmodified. Returns the number of
/// days published.
///
/// # Errors
/// Fails with `StoreUnavailable` when either side fails; a failed save
/// leaves the remote blob untouched.
pub async fn sync(from: &dyn SeriesStore, to: &dyn SeriesStore) -> Result<usize, KawaseError> {
    let series = from.load().await?;
    if series.is_empty() {
        warn!("local cache is empty, publishing an empty series");
    }
    to.save(&series).await?;
    info!(days = series.len(), "synced cache");
    Ok(series.len())
}
