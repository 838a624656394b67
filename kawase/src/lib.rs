//! kawase
//!
//! The oracle's entrypoints: three thin drivers (`bootstrap`, `fill`,
//! `sync`) that sequence load → fetch → derive → merge → save over the
//! trait seams from `kawase-core`. All real logic lives in the core engine;
//! this crate only composes it with live connectors and stores.

pub mod cli;
pub mod pipeline;
