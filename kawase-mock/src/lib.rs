//! kawase-mock
//!
//! Deterministic, network-free implementations of the kawase source and
//! store traits, for tests and examples. Fixture data covers the cache's
//! genesis week (early October 2022) so scenario tests can assert exact
//! values.

use std::sync::Mutex;

use async_trait::async_trait;

use kawase_core::{
    DailyClose, DateSpan, EurCross, FxSource, KawaseError, RateSeries, SeriesStore, SpotSource,
};

pub mod fixtures;

/// Mock market data source implementing both [`SpotSource`] and
/// [`FxSource`]. Serves the requested slice of its fixture data, or a forced
/// failure when built with [`MockMarket::failing`].
pub struct MockMarket {
    closes: Vec<DailyClose>,
    crosses: Vec<EurCross>,
    fail: bool,
}

impl Default for MockMarket {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarket {
    /// A source serving the genesis-week fixtures.
    #[must_use]
    pub fn new() -> Self {
        Self {
            closes: fixtures::closes(),
            crosses: fixtures::crosses(),
            fail: false,
        }
    }

    /// A source serving exactly the given observations.
    #[must_use]
    pub fn with_data(closes: Vec<DailyClose>, crosses: Vec<EurCross>) -> Self {
        Self {
            closes,
            crosses,
            fail: false,
        }
    }

    /// A source whose every fetch fails with `SourceUnavailable`.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            closes: Vec::new(),
            crosses: Vec::new(),
            fail: true,
        }
    }

    fn check(&self) -> Result<(), KawaseError> {
        if self.fail {
            Err(KawaseError::source("mock", "forced failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SpotSource for MockMarket {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn daily_closes(&self, span: DateSpan) -> Result<Vec<DailyClose>, KawaseError> {
        self.check()?;
        Ok(self
            .closes
            .iter()
            .filter(|c| span.contains(c.date))
            .copied()
            .collect())
    }
}

#[async_trait]
impl FxSource for MockMarket {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn eur_cross_rates(&self, span: DateSpan) -> Result<Vec<EurCross>, KawaseError> {
        self.check()?;
        Ok(self
            .crosses
            .iter()
            .filter(|c| span.contains(c.date))
            .copied()
            .collect())
    }
}

/// In-memory [`SeriesStore`] that records every save.
pub struct MemoryStore {
    inner: Mutex<RateSeries>,
    saves: Mutex<u32>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(RateSeries::new())
    }
}

impl MemoryStore {
    /// A store pre-seeded with `initial`.
    #[must_use]
    pub fn new(initial: RateSeries) -> Self {
        Self {
            inner: Mutex::new(initial),
            saves: Mutex::new(0),
        }
    }

    /// The currently stored series.
    ///
    /// # Panics
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn stored(&self) -> RateSeries {
        self.inner.lock().expect("store lock poisoned").clone()
    }

    /// How many times `save` has been called.
    ///
    /// # Panics
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn save_count(&self) -> u32 {
        *self.saves.lock().expect("store lock poisoned")
    }
}

#[async_trait]
impl SeriesStore for MemoryStore {
    async fn load(&self) -> Result<RateSeries, KawaseError> {
        Ok(self.stored())
    }

    async fn save(&self, series: &RateSeries) -> Result<(), KawaseError> {
        *self.inner.lock().expect("store lock poisoned") = series.clone();
        *self.saves.lock().expect("store lock poisoned") += 1;
        Ok(())
    }
}

/// A store whose every call fails with `StoreUnavailable`, for error-path
/// tests.
pub struct FailingStore;

#[async_trait]
impl SeriesStore for FailingStore {
    async fn load(&self) -> Result<RateSeries, KawaseError> {
        Err(KawaseError::store("forced failure"))
    }

    async fn save(&self, _series: &RateSeries) -> Result<(), KawaseError> {
        Err(KawaseError::store("forced failure"))
    }
}
