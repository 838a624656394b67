//! The pure rate engine.
//!
//! - `derive`: cross-rate derivation and calendar-span fill with FX
//!   forward-fill.
//! - `merge`: reconciliation of freshly derived days against the stored
//!   series.
//!
//! Everything here is a pure function of its inputs; no I/O, no clock.

/// Cross-rate derivation and span fill.
pub mod derive;
/// Merge of incoming days into an existing series.
pub mod merge;
