//! External data acquisition.

pub mod fetch;

pub use fetch::*;
