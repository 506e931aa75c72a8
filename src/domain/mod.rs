//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw parsed CSV rows (`RawRow`)
//! - cleaned rows with gap-free counters (`CleanRow`)
//! - enriched observations with derived metrics (`Observation`)
//! - run configuration (`RunConfig`) and dataset stats

pub mod types;

pub use types::*;
