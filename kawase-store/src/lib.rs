//! kawase-store
//!
//! [`SeriesStore`](kawase_core::SeriesStore) backends.
//!
//! - [`FsStore`]: a local JSON cache file, saved with temp-file + rename so a
//!   failed write never truncates the previous cache.
//! - [`R2Store`]: an S3-compatible object (Cloudflare R2 in production),
//!   full-blob get/put; replace atomicity is the backend's.
//!
//! Both treat "no cache yet" as an empty series and every other failure as
//! `StoreUnavailable`, so an unreachable store is never mistaken for a fresh
//! one.

pub mod fs;
pub mod r2;

pub use fs::FsStore;
pub use r2::{R2Config, R2Store};
