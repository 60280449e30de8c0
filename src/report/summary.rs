//! `summary.json` loading, saving and history reconciliation.
//!
//! HAROS regenerates its report directory from scratch on every run, which
//! would drop the trend data kept in `history`. Reconciliation prepends the
//! previous run's series so the history keeps growing.

use crate::error::HarosError;
use crate::models::SummaryReport;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

impl SummaryReport {
    /// Load a summary, failing on unreadable or malformed content.
    pub fn load(path: &Path) -> Result<Self, HarosError> {
        let content = fs::read_to_string(path).map_err(|e| HarosError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| HarosError::report_parse(path, e.to_string()))
    }

    /// Load a summary if the file exists.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, HarosError> {
        if path.exists() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Write the summary as pretty JSON, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), HarosError> {
        let content = serde_json::to_string_pretty(self).map_err(|e| HarosError::Serialize {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        fs::write(path, content).map_err(|e| HarosError::io(path, e))
    }
}

/// Prepend `previous`'s history to `fresh`'s, key by key.
///
/// Series only the previous summary knows about are carried over unchanged.
/// Everything outside `history` comes from `fresh`.
pub fn merge_history(previous: &SummaryReport, mut fresh: SummaryReport) -> SummaryReport {
    for (key, old_points) in &previous.history {
        let new_points = fresh.history.remove(key).unwrap_or_default();
        let mut merged = Vec::with_capacity(old_points.len() + new_points.len());
        merged.extend(old_points.iter().cloned());
        merged.extend(new_points);
        fresh.history.insert(key.clone(), merged);
    }
    fresh
}

/// Merge the summary stored at `previous` (if any) into `fresh`.
///
/// A missing previous file means there is nothing to merge. A previous file
/// that exists but cannot be parsed is an error.
pub fn reconcile(
    previous: Option<&Path>,
    fresh: SummaryReport,
) -> Result<SummaryReport, HarosError> {
    let Some(path) = previous else {
        return Ok(fresh);
    };

    match SummaryReport::load_optional(path)? {
        Some(old) => {
            info!(
                "Restoring {} history series from {}",
                old.history.len(),
                path.display()
            );
            Ok(merge_history(&old, fresh))
        }
        None => {
            debug!("No previous summary at {}", path.display());
            Ok(fresh)
        }
    }
}
