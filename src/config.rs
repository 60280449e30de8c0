//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.ament_haros.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".ament_haros.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Package discovery settings.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// HAROS invocation settings.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Console report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// What to do with a `package.xml` that cannot be parsed or has no name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ManifestPolicy {
    /// Abort discovery with an error.
    #[default]
    Fail,
    /// Log a warning and treat the directory as an unregistered leaf.
    Skip,
}

/// Marker files that steer package discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Files that exclude a directory and everything below it.
    #[serde(default = "default_ignore_markers")]
    pub ignore_markers: Vec<String>,

    /// Package manifest file name.
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Legacy rosbuild manifest; stops descent without registering.
    #[serde(default = "default_legacy_manifest")]
    pub legacy_manifest: String,

    /// Marker that stops descent without registering.
    #[serde(default = "default_nosubdirs_marker")]
    pub nosubdirs_marker: String,

    /// Handling of unparseable manifests.
    #[serde(default)]
    pub invalid_manifest: ManifestPolicy,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            ignore_markers: default_ignore_markers(),
            manifest: default_manifest(),
            legacy_manifest: default_legacy_manifest(),
            nosubdirs_marker: default_nosubdirs_marker(),
            invalid_manifest: ManifestPolicy::default(),
        }
    }
}

fn default_ignore_markers() -> Vec<String> {
    vec!["CATKIN_IGNORE", "COLCON_IGNORE", "AMENT_IGNORE"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_manifest() -> String {
    "package.xml".to_string()
}

fn default_legacy_manifest() -> String {
    "manifest.xml".to_string()
}

fn default_nosubdirs_marker() -> String {
    "rospack_nosubdirs".to_string()
}

/// HAROS invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Program followed by leading arguments, e.g. `["python3", "-m", "haros"]`.
    #[serde(default = "default_command")]
    pub command: Vec<String>,

    /// Kill the analyzer after this many seconds. No limit when unset.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// HAROS rules excluded from the analysis.
    #[serde(default = "default_ignored_rules")]
    pub ignored_rules: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            timeout_seconds: None,
            ignored_rules: default_ignored_rules(),
        }
    }
}

fn default_command() -> Vec<String> {
    vec!["haros".to_string()]
}

fn default_ignored_rules() -> Vec<String> {
    // cpplint's brace placement rules contradict each other
    vec![
        "haros_plugin_cpplint:opening_curly_brace",
        "haros_plugin_cpplint:opening_brace_line",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Console report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Log per-severity and per-category counts after the issue list.
    #[serde(default = "default_true")]
    pub show_breakdown: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            show_breakdown: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref haros) = args.haros {
            self.analyzer.command = vec![haros.to_string_lossy().to_string()];
        }

        if let Some(timeout) = args.timeout {
            self.analyzer.timeout_seconds = Some(timeout);
        }

        if let Some(policy) = args.invalid_manifest {
            self.discovery.invalid_manifest = policy;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
