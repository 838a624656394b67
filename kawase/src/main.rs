use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kawase::cli::{Cli, Command};
use kawase::pipeline::{self, MergePolicy, Pipeline};
use kawase_binance::BinanceSource;
use kawase_core::{DateSpan, SeriesStore};
use kawase_frankfurter::FrankfurterSource;
use kawase_store::{FsStore, R2Config, R2Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Bootstrap { start, end, cache } => {
            let span = DateSpan::new(start, end)?;
            let pipeline = live_pipeline(Arc::new(FsStore::new(cache)))?;
            pipeline
                .bootstrap(span, MergePolicy::Preserve)
                .await
                .context("bootstrap failed")?;
        }
        Command::Fill {
            cache,
            remote,
            initial_start,
            overwrite,
            strict,
        } => {
            let store: Arc<dyn SeriesStore> = if remote {
                let config = R2Config::from_env().context("remote fill needs R2 settings")?;
                Arc::new(R2Store::new(&config)?)
            } else {
                Arc::new(FsStore::new(cache))
            };
            let policy = if overwrite {
                MergePolicy::Overwrite
            } else {
                MergePolicy::Preserve
            };
            let pipeline = live_pipeline(store)?.strict(strict);
            pipeline
                .fill(initial_start, Utc::now().date_naive(), policy)
                .await
                .context("fill failed")?;
        }
        Command::Sync { cache } => {
            let config = R2Config::from_env().context("sync needs R2 settings")?;
            let remote = R2Store::new(&config)?;
            let local = FsStore::new(cache);
            let days = pipeline::sync(&local, &remote)
                .await
                .context("sync failed")?;
            info!(days, "published cache");
        }
    }
    Ok(())
}

fn live_pipeline(store: Arc<dyn SeriesStore>) -> anyhow::Result<Pipeline> {
    let spot = BinanceSource::builder().build()?;
    let fx = FrankfurterSource::builder().build()?;
    Ok(Pipeline::new(Arc::new(spot), Arc::new(fx), store))
}
