//! Copying analyzer output to user-chosen destinations.

use super::summary::reconcile;
use crate::error::HarosError;
use crate::models::SummaryReport;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Location of a project's `summary.json` below a report directory.
pub fn summary_path(report_dir: &Path, project: &str) -> PathBuf {
    report_dir.join("data").join(project).join("summary.json")
}

/// Copy the xUnit report to `destination`, creating parent directories.
pub fn copy_xunit_file(report: &Path, destination: &Path) -> Result<(), HarosError> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| HarosError::io(parent, e))?;
    }
    fs::copy(report, destination).map_err(|e| HarosError::io(destination, e))?;
    info!("xUnit report written to {}", destination.display());
    Ok(())
}

/// Replace `report_dir` with the analyzer's data directory, keeping history.
///
/// The previous `summary.json` is staged at `staging` before the old report
/// is removed, then merged into the freshly copied one.
pub fn publish_report(
    data_dir: &Path,
    report_dir: &Path,
    project: &str,
    staging: &Path,
) -> Result<(), HarosError> {
    let summary_file = summary_path(report_dir, project);

    let staged = if summary_file.is_file() {
        // Refuse to replace a report whose history cannot be carried over
        SummaryReport::load(&summary_file)?;
        fs::copy(&summary_file, staging).map_err(|e| HarosError::io(staging, e))?;
        debug!("Staged previous summary at {}", staging.display());
        Some(staging)
    } else {
        None
    };

    if report_dir.exists() {
        fs::remove_dir_all(report_dir).map_err(|e| HarosError::io(report_dir, e))?;
    }
    if let Some(parent) = report_dir.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| HarosError::io(parent, e))?;
    }

    copy_tree(data_dir, report_dir)?;
    info!("HAROS report exported to {}", report_dir.display());

    if !summary_file.is_file() {
        let Some(staged) = staged else {
            warn!("No summary.json at {}", summary_file.display());
            return Ok(());
        };
        warn!(
            "HAROS wrote no summary.json, keeping the previous one at {}",
            summary_file.display()
        );
        if let Some(parent) = summary_file.parent() {
            fs::create_dir_all(parent).map_err(|e| HarosError::io(parent, e))?;
        }
        fs::copy(staged, &summary_file).map_err(|e| HarosError::io(&summary_file, e))?;
        return Ok(());
    }

    let fresh = SummaryReport::load(&summary_file)?;
    let merged = reconcile(staged, fresh)?;
    merged.save(&summary_file)
}

/// Recursively copy `from` into a new directory `to`.
fn copy_tree(from: &Path, to: &Path) -> Result<(), HarosError> {
    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(from).to_path_buf();
            HarosError::io(path, e.into())
        })?;

        let relative = entry
            .path()
            .strip_prefix(from)
            .unwrap_or_else(|_| entry.path());
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| HarosError::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| HarosError::io(&target, e))?;
        }
    }
    Ok(())
}
