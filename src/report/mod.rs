//! Reporting utilities: country ordering and formatted terminal output.

pub mod format;

pub use format::*;
