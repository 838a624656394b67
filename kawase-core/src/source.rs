use async_trait::async_trait;

use crate::{DailyClose, DateSpan, EurCross, KawaseError, RateSeries};

/// Focused role trait for sources of daily spot closes (XRP/USDT).
#[async_trait]
pub trait SpotSource: Send + Sync {
    /// Stable source name used in logs and error attribution.
    fn name(&self) -> &'static str;

    /// Fetch daily closes for every day of `span` the source has data for,
    /// ascending, at most one entry per calendar day. Days the exchange has
    /// no candle for are absent rather than zero-filled; coverage is judged
    /// by the caller.
    ///
    /// # Errors
    /// Returns `KawaseError::SourceUnavailable` when the upstream API is
    /// unreachable or returns a payload that cannot be decoded.
    async fn daily_closes(&self, span: DateSpan) -> Result<Vec<DailyClose>, KawaseError>;
}

/// Focused role trait for sources of EUR-based reference cross rates.
#[async_trait]
pub trait FxSource: Send + Sync {
    /// Stable source name used in logs and error attribution.
    fn name(&self) -> &'static str;

    /// Fetch `(date, EUR/JPY, EUR/USD)` for every business day of `span` the
    /// reference publishes, ascending. Weekends and holidays are absent; the
    /// derivation stage forward-fills them.
    ///
    /// # Errors
    /// Returns `KawaseError::SourceUnavailable` when the upstream API is
    /// unreachable or returns a payload that cannot be decoded.
    async fn eur_cross_rates(&self, span: DateSpan) -> Result<Vec<EurCross>, KawaseError>;
}

/// Durable storage for the serialized series. Full-replace semantics: `save`
/// overwrites the whole blob; atomicity of the replace is the backend's job.
#[async_trait]
pub trait SeriesStore: Send + Sync {
    /// Load the existing series, or an empty one when no cache exists yet.
    ///
    /// # Errors
    /// Returns `KawaseError::StoreUnavailable` on any failure other than the
    /// cache not existing yet. A run must fail loudly rather than mistake an
    /// unreachable store for an empty cache.
    async fn load(&self) -> Result<RateSeries, KawaseError>;

    /// Persist the whole series, replacing the previous blob.
    ///
    /// # Errors
    /// Returns `KawaseError::StoreUnavailable` on network/auth/IO failures.
    /// On failure the previously stored blob must remain intact.
    async fn save(&self, series: &RateSeries) -> Result<(), KawaseError>;
}
