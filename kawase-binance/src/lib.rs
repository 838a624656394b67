//! kawase-binance
//!
//! [`SpotSource`] connector for the Binance spot REST API. Fetches daily
//! XRP/USDT klines from `/api/v3/klines`, following the endpoint's
//! pagination protocol (advance `startTime` past the last returned open
//! time until the span is covered or a short page arrives).

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;
use tracing::debug;

use kawase_core::{DailyClose, DateSpan, KawaseError, SpotSource};

const SOURCE_NAME: &str = "binance";
const DEFAULT_BASE_URL: &str = "https://api.binance.com";
const DEFAULT_SYMBOL: &str = "XRPUSDT";
const DEFAULT_PAGE_LIMIT: u32 = 1000;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const INTERVAL: &str = "1d";

/// One kline row as Binance returns it: a 12-element array of mixed numbers
/// and decimal strings. Only open time (index 0) and close (index 4) feed
/// the cache; the rest is carried so decoding stays strict.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct KlineRow(
    i64,    // open time (ms)
    String, // open
    String, // high
    String, // low
    String, // close
    String, // volume
    i64,    // close time (ms)
    String, // quote asset volume
    i64,    // number of trades
    String, // taker buy base volume
    String, // taker buy quote volume
    String, // unused
);

/// Builder for [`BinanceSource`].
#[derive(Debug, Clone)]
pub struct BinanceSourceBuilder {
    base_url: String,
    symbol: String,
    page_limit: u32,
    timeout: Duration,
}

impl Default for BinanceSourceBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            symbol: DEFAULT_SYMBOL.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl BinanceSourceBuilder {
    /// Override the API base URL (tests point this at a mock server).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the spot symbol (default `XRPUSDT`).
    #[must_use]
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Override the per-request kline limit (default 1000, the API maximum).
    #[must_use]
    pub const fn page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit;
        self
    }

    /// Override the per-request timeout (default 10s).
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
    pub fn build(self) -> Result<BinanceSource, KawaseError> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| KawaseError::source(SOURCE_NAME, e.to_string()))?;
        Ok(BinanceSource {
            http,
            base_url: self.base_url,
            symbol: self.symbol,
            page_limit: self.page_limit,
        })
    }
}

/// Binance spot kline connector.
pub struct BinanceSource {
    http: reqwest::Client,
    base_url: String,
    symbol: String,
    page_limit: u32,
}

impl BinanceSource {
    /// Start building a connector with production defaults.
    #[must_use]
    pub fn builder() -> BinanceSourceBuilder {
        BinanceSourceBuilder::default()
    }

    async fn fetch_page(&self, start_ms: i64, end_ms: i64) -> Result<Vec<KlineRow>, KawaseError> {
        let url = format!("{}/api/v3/klines", self.base_url);
        debug!(symbol = %self.symbol, start_ms, end_ms, "requesting klines page");
        let response = self
            .http
            .get(&url)
            .query(&[
                ("symbol", self.symbol.clone()),
                ("interval", INTERVAL.to_string()),
                ("startTime", start_ms.to_string()),
                ("endTime", end_ms.to_string()),
                ("limit", self.page_limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| KawaseError::source(SOURCE_NAME, e.to_string()))?
            .error_for_status()
            .map_err(|e| KawaseError::source(SOURCE_NAME, e.to_string()))?;

        response
            .json::<Vec<KlineRow>>()
            .await
            .map_err(|e| KawaseError::source(SOURCE_NAME, format!("malformed kline payload: {e}")))
    }
}

fn midnight_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

const MILLIS_PER_DAY: i64 = 86_400_000;

#[async_trait]
impl SpotSource for BinanceSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn daily_closes(&self, span: DateSpan) -> Result<Vec<DailyClose>, KawaseError> {
        let mut start_ms = midnight_millis(span.start());
        // Inclusive of the candle that opens at the last day's midnight.
        let end_ms = midnight_millis(span.end()) + MILLIS_PER_DAY - 1;

        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();

        loop {
            let rows = self.fetch_page(start_ms, end_ms).await?;
            if rows.is_empty() {
                break;
            }

            let page_len = rows.len();
            let last_open = rows[page_len - 1].0;

            for row in rows {
                let Some(open) = DateTime::from_timestamp_millis(row.0) else {
                    return Err(KawaseError::source(
                        SOURCE_NAME,
                        format!("kline open time out of range: {}", row.0),
                    ));
                };
                let date = open.date_naive();
                if !span.contains(date) {
                    continue;
                }
                let close: f64 = row.4.parse().map_err(|_| {
                    KawaseError::source(
                        SOURCE_NAME,
                        format!("kline close is not a number: {:?}", row.4),
                    )
                })?;
                by_date.insert(date, close);
            }

            if page_len < self.page_limit as usize || last_open >= end_ms {
                break;
            }
            start_ms = last_open + 1;
        }

        debug!(days = by_date.len(), "fetched daily closes");
        Ok(by_date
            .into_iter()
            .map(|(date, close)| DailyClose { date, close })
            .collect())
    }
}
