//! Analysis modules.
//!
//! Statistics over the issues HAROS reported.

pub mod aggregator;

pub use aggregator::*;
