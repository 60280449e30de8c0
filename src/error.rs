//! Error taxonomy for discovery, analysis and report handling.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarosError {
    #[error("Failed to find any ROS packages to analyze in {}", display_paths(.paths))]
    NoPackagesFound { paths: Vec<PathBuf> },

    #[error("Failed to detect ROS workspace root folder for {0}")]
    WorkspaceRootNotFound(PathBuf),

    #[error("The invocation of '{program}' failed: {reason}")]
    AnalyzerInvocation { program: String, reason: String },

    #[error("HAROS failed to write xUnit (XML) output file: {0}")]
    ReportMissing(PathBuf),

    #[error("Malformed report {path}: {reason}")]
    ReportParse { path: PathBuf, reason: String },

    #[error("Invalid package manifest {path}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    #[error("Failed to serialize {path}: {reason}")]
    Serialize { path: PathBuf, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HarosError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HarosError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn report_parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        HarosError::ReportParse {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
