//! Analyzer report handling: xUnit parsing, console output, summary
//! history and report publishing.

pub mod generator;
pub mod publish;
pub mod summary;
pub mod xunit;

pub use generator::{print_issues, render_dry_run};
pub use publish::{copy_xunit_file, publish_report};
pub use xunit::parse_xunit_file;
