//! Command-line surface.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Default local cache path, matching the published object key.
pub const DEFAULT_CACHE_PATH: &str = "cache/xrp_oracle_daily.json";

/// Daily XRP rate oracle cache.
///
/// Fetches XRP/USDT daily closes from Binance and EUR cross rates from
/// Frankfurter, derives XRP/JPY, merges into the date-keyed cache, and
/// publishes it to S3-compatible object storage.
#[derive(Debug, Parser)]
#[command(name = "kawase", version, about)]
pub struct Cli {
    /// What to run.
    #[command(subcommand)]
    pub command: Command,
}

/// The three drivers.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a cache for a full historical date range into a local file.
    Bootstrap {
        /// First day of the range (inclusive), `YYYY-MM-DD`.
        #[arg(long)]
        start: NaiveDate,
        /// Last day of the range (inclusive), `YYYY-MM-DD`.
        #[arg(long)]
        end: NaiveDate,
        /// Local cache file to build.
        #[arg(long, default_value = DEFAULT_CACHE_PATH)]
        cache: PathBuf,
    },
    /// Extend the cache with the days elapsed since its last entry, up to
    /// yesterday (UTC).
    Fill {
        /// Local cache file to extend. Mutually exclusive with `--remote`.
        #[arg(long, default_value = DEFAULT_CACHE_PATH, conflicts_with = "remote")]
        cache: PathBuf,
        /// Operate directly on the remote object instead of a local file
        /// (reads R2_* environment variables).
        #[arg(long)]
        remote: bool,
        /// Where history starts when the cache is still empty.
        #[arg(long, default_value = "2022-10-01")]
        initial_start: NaiveDate,
        /// Explicit recompute: overwrite stored values on conflict instead
        /// of preserving them. Never the default.
        #[arg(long)]
        overwrite: bool,
        /// Fail the run on partial coverage, or on conflicts that would be
        /// preserved, instead of proceeding with the available subset.
        #[arg(long)]
        strict: bool,
    },
    /// Push the local cache file to the object store as-is.
    Sync {
        /// Local cache file to publish.
        #[arg(long, default_value = DEFAULT_CACHE_PATH)]
        cache: PathBuf,
    },
}
