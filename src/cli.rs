//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::ManifestPolicy;
use clap::Parser;
use std::path::PathBuf;

/// ament-haros - Static code analysis of ROS packages using HAROS
///
/// Searches the given paths for ROS packages, runs HAROS over them and
/// fails when HAROS reports any issue.
///
/// Examples:
///   ament-haros src/my_package
///   ament-haros --xunit-file build/haros.xunit.xml
///   ament-haros --report-dir public/haros src/
///   ament-haros --dry-run ~/ros2_ws
///   ament-haros --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Files and/or directories to be checked
    ///
    /// Directories are searched recursively for ROS/ROS2 package(s).
    #[arg(value_name = "PATH", default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// The location HAROS will place its cache in
    ///
    /// Defaults to the system temp folder.
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Generate a xunit compliant XML file
    #[arg(long, value_name = "FILE")]
    pub xunit_file: Option<PathBuf>,

    /// The location to export the HAROS html report to
    ///
    /// History from a report already at this location is preserved.
    #[arg(long, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,

    /// Path to the haros executable
    ///
    /// Overrides `analyzer.command` from the configuration file.
    #[arg(long, value_name = "PATH", env = "AMENT_HAROS_BIN")]
    pub haros: Option<PathBuf>,

    /// Kill HAROS after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// How to treat package.xml files that cannot be parsed
    #[arg(long, value_name = "POLICY")]
    pub invalid_manifest: Option<ManifestPolicy>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .ament_haros.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Discover packages and show the HAROS project without running HAROS
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .ament_haros.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        for path in &self.paths {
            if !path.exists() {
                return Err(format!("Path does not exist: {}", path.display()));
            }
        }

        if let Some(ref cache_dir) = self.cache_dir {
            if cache_dir.exists() && !cache_dir.is_dir() {
                return Err(format!(
                    "Cache path is not a directory: {}",
                    cache_dir.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Cache directory, falling back to the system temp folder.
    pub fn effective_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
