//! Input/output helpers.
//!
//! - CSV ingest + schema validation (`ingest`)
//! - processed/latest table exports (`export`)
//! - snapshot JSON write (`snapshot`)

pub mod export;
pub mod ingest;
pub mod snapshot;

pub use export::*;
pub use ingest::*;
pub use snapshot::*;
