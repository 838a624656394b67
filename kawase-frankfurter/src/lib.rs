//! kawase-frankfurter
//!
//! [`FxSource`] connector for the Frankfurter currency reference API. One
//! timeseries request covers the whole span:
//! `GET /{start}..{end}?from=EUR&to=JPY,USD`. The reference publishes
//! business days only; absent days are handled downstream by forward-fill.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use kawase_core::{DateSpan, EurCross, FxSource, KawaseError};

const SOURCE_NAME: &str = "frankfurter";
const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    rates: BTreeMap<NaiveDate, DayRates>,
}

#[derive(Debug, Deserialize)]
struct DayRates {
    #[serde(rename = "JPY")]
    jpy: Option<f64>,
    #[serde(rename = "USD")]
    usd: Option<f64>,
}

/// Builder for [`FrankfurterSource`].
#[derive(Debug, Clone)]
pub struct FrankfurterSourceBuilder {
    base_url: String,
    timeout: Duration,
}

impl Default for FrankfurterSourceBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl FrankfurterSourceBuilder {
    /// Override the API base URL (tests point this at a mock server).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout (default 15s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the connector.
    ///
    /// # Errors
    /// Returns `KawaseError::SourceUnavailable` when the HTTP client cannot
    /// be constructed.
    pub fn build(self) -> Result<FrankfurterSource, KawaseError> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| KawaseError::source(SOURCE_NAME, e.to_string()))?;
        Ok(FrankfurterSource {
            http,
            base_url: self.base_url,
        })
    }
}

/// Frankfurter timeseries connector.
pub struct FrankfurterSource {
    http: reqwest::Client,
    base_url: String,
}

impl FrankfurterSource {
    /// Start building a connector with production defaults.
    #[must_use]
    pub fn builder() -> FrankfurterSourceBuilder {
        FrankfurterSourceBuilder::default()
    }
}

#[async_trait]
impl FxSource for FrankfurterSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn eur_cross_rates(&self, span: DateSpan) -> Result<Vec<EurCross>, KawaseError> {
        let url = format!("{}/{}..{}", self.base_url, span.start(), span.end());
        debug!(%url, "requesting EUR cross-rate timeseries");

        let response = self
            .http
            .get(&url)
            .query(&[("from", "EUR"), ("to", "JPY,USD")])
            .send()
            .await
            .map_err(|e| KawaseError::source(SOURCE_NAME, e.to_string()))?
            .error_for_status()
            .map_err(|e| KawaseError::source(SOURCE_NAME, e.to_string()))?;

        let body: TimeseriesResponse = response.json().await.map_err(|e| {
            KawaseError::source(SOURCE_NAME, format!("malformed timeseries payload: {e}"))
        })?;

        let mut crosses = Vec::with_capacity(body.rates.len());
        for (date, day) in body.rates {
            if !span.contains(date) {
                continue;
            }
            match (day.jpy, day.usd) {
                (Some(eur_jpy), Some(eur_usd)) => crosses.push(EurCross {
                    date,
                    eur_jpy,
                    eur_usd,
                }),
                _ => warn!(%date, "reference day is missing JPY or USD rate, dropping"),
            }
        }

        debug!(days = crosses.len(), "fetched EUR cross rates");
        Ok(crosses)
    }
}
