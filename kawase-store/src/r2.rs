//! S3-compatible object storage backend (Cloudflare R2 in production).

use std::env;

use async_trait::async_trait;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::{ObjectStore, RetryConfig, path::Path as ObjectPath};
use tracing::{debug, info};

use kawase_core::{KawaseError, RateSeries, SeriesStore};

/// Default object key, matching what the published oracle serves.
pub const DEFAULT_OBJECT_KEY: &str = "xrp_oracle_daily.json";

/// Connection settings for an S3-compatible bucket. Built once per run and
/// passed in explicitly; nothing here is read lazily at call time.
#[derive(Debug, Clone)]
pub struct R2Config {
    /// Endpoint URL, e.g. `https://<account>.r2.cloudflarestorage.com`.
    pub endpoint: String,
    /// Bucket name.
    pub bucket: String,
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Object key of the cache blob.
    pub object_key: String,
}

impl R2Config {
    /// Read the connection settings from the conventional environment
    /// variables: `R2_ENDPOINT`, `R2_BUCKET`, `R2_ACCESS_KEY_ID`,
    /// `R2_SECRET_ACCESS_KEY`, and optional `R2_OBJECT_KEY`.
    ///
    /// # Errors
    /// Returns `KawaseError::InvalidArg` naming the first missing variable.
    pub fn from_env() -> Result<Self, KawaseError> {
        let require = |name: &str| {
            env::var(name).map_err(|_| KawaseError::InvalidArg(format!("{name} is not set")))
        };
        Ok(Self {
            endpoint: require("R2_ENDPOINT")?,
            bucket: require("R2_BUCKET")?,
            access_key_id: require("R2_ACCESS_KEY_ID")?,
            secret_access_key: require("R2_SECRET_ACCESS_KEY")?,
            object_key: env::var("R2_OBJECT_KEY").unwrap_or_else(|_| DEFAULT_OBJECT_KEY.into()),
        })
    }
}

/// Cache blob in an S3-compatible bucket.
pub struct R2Store {
    store: AmazonS3,
    key: ObjectPath,
}

impl R2Store {
    /// Build a store from explicit connection settings.
    ///
    /// # Errors
    /// Returns `KawaseError::StoreUnavailable` when the client cannot be
    /// constructed from the given settings.
    pub fn new(config: &R2Config) -> Result<Self, KawaseError> {
        // Plain-http endpoints (local S3 stand-ins) need the opt-in; real
        // R2 endpoints are always https and unaffected.
        let allow_http = config.endpoint.starts_with("http://");
        let store = AmazonS3Builder::new()
            .with_endpoint(&config.endpoint)
            .with_bucket_name(&config.bucket)
            .with_access_key_id(&config.access_key_id)
            .with_secret_access_key(&config.secret_access_key)
            .with_region("auto")
            .with_allow_http(allow_http)
            // The default retry policy backs off for minutes on 5xx.
            .with_retry(RetryConfig {
                max_retries: 2,
                ..RetryConfig::default()
            })
            .build()
            .map_err(|e| KawaseError::store(e.to_string()))?;
        Ok(Self {
            store,
            key: ObjectPath::from(config.object_key.as_str()),
        })
    }
}

#[async_trait]
impl SeriesStore for R2Store {
    async fn load(&self) -> Result<RateSeries, KawaseError> {
        let result = match self.store.get(&self.key).await {
            Ok(r) => r,
            Err(object_store::Error::NotFound { .. }) => {
                info!(key = %self.key, "no cache object yet, starting empty");
                return Ok(RateSeries::new());
            }
            Err(e) => return Err(KawaseError::store(e.to_string())),
        };
        let bytes = result
            .bytes()
            .await
            .map_err(|e| KawaseError::store(e.to_string()))?;
        let series: RateSeries =
            serde_json::from_slice(&bytes).map_err(|e| KawaseError::store(e.to_string()))?;
        debug!(key = %self.key, days = series.len(), "loaded cache object");
        Ok(series)
    }

    async fn save(&self, series: &RateSeries) -> Result<(), KawaseError> {
        let body = serde_json::to_vec(series).map_err(|e| KawaseError::store(e.to_string()))?;
        self.store
            .put(&self.key, body.into())
            .await
            .map_err(|e| KawaseError::store(e.to_string()))?;
        info!(key = %self.key, days = series.len(), "saved cache object");
        Ok(())
    }
}
