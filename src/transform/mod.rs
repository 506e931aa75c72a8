//! Sequential table transformations.
//!
//! Each pass takes the previous stage's rows and produces a new table:
//!
//! - `filter`: drop aggregate pseudo-locations, split world/focus views
//! - `clean`: per-location forward-fill, then zero-fill
//! - `metrics`: derived columns (rates + smoothed daily series)
//! - `latest`: latest-snapshot aggregation per location
//!
//! All passes assume rows sorted by (location, date ascending), which the
//! ingest step establishes and every pass preserves.

pub mod clean;
pub mod filter;
pub mod latest;
pub mod metrics;

pub use clean::*;
pub use filter::*;
pub use latest::*;
pub use metrics::*;
