//! kawase-core
//!
//! Core types, traits, and the pure rate engine shared across the kawase
//! workspace.
//!
//! - `types`: the date-keyed data model (`RateSeries`, `RatePair`, spans).
//! - `error`: the `KawaseError` taxonomy.
//! - `source`: the `SpotSource`, `FxSource`, and `SeriesStore` traits that
//!   connector and storage crates implement.
//! - `series`: the derivation and merge engine. Both are pure functions of
//!   their inputs; running them twice with the same inputs yields identical
//!   output, which is what makes scheduled reruns of the whole pipeline safe.
//!
//! This crate performs no I/O. Fetching and persistence live behind the
//! traits in [`source`] so tests can inject deterministic fakes.
#![warn(missing_docs)]

pub mod error;
/// Time-series derivation and merge engine.
pub mod series;
/// Source and store traits implemented by connector crates.
pub mod source;
pub mod types;

pub use error::KawaseError;
pub use series::derive::{DeriveOutcome, SkipReason, SkippedDay, derive, derive_span};
pub use series::merge::{MergeReport, RateConflict, merge, merge_forced};
pub use source::{FxSource, SeriesStore, SpotSource};
pub use types::{DailyClose, DailyRate, DateSpan, EurCross, RatePair, RateSeries};
