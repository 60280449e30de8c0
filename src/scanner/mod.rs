//! Package discovery.
//!
//! Walks directory trees top-down and registers every directory that holds
//! a ROS package manifest. Each directory is classified from its immediate
//! file names alone; a directory that is ignored, holds a manifest or carries
//! a stop marker is never descended into.

pub mod manifest;

use crate::config::{DiscoveryConfig, ManifestPolicy};
use crate::error::HarosError;
use crate::fs::FileSystem;
use crate::models::Packages;
use manifest::parse_manifest;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What to do with a directory, decided from its immediate files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// An ignore marker is present; the subtree is skipped entirely.
    Ignored,
    /// A package manifest is present; register it and stop.
    Manifest,
    /// A legacy rosbuild manifest is present; stop without registering.
    LegacyManifest,
    /// A no-subdirectories marker is present; stop without registering.
    NoSubdirs,
    /// Nothing of interest; continue into subdirectories.
    Descend,
}

/// Classify a directory by the names of the files it directly contains.
pub fn classify<'a, I>(file_names: I, markers: &DiscoveryConfig) -> Visit
where
    I: IntoIterator<Item = &'a str>,
{
    let names: HashSet<&str> = file_names.into_iter().collect();

    if markers
        .ignore_markers
        .iter()
        .any(|m| names.contains(m.as_str()))
    {
        Visit::Ignored
    } else if names.contains(markers.manifest.as_str()) {
        Visit::Manifest
    } else if names.contains(markers.legacy_manifest.as_str()) {
        Visit::LegacyManifest
    } else if names.contains(markers.nosubdirs_marker.as_str()) {
        Visit::NoSubdirs
    } else {
        Visit::Descend
    }
}

/// Finds ROS packages below one or more roots.
pub struct PackageLocator<F: FileSystem> {
    fs: F,
    config: DiscoveryConfig,
}

impl<F: FileSystem> PackageLocator<F> {
    pub fn new(fs: F, config: DiscoveryConfig) -> Self {
        Self { fs, config }
    }

    /// Discover the packages below `root`.
    ///
    /// Subdirectories are visited in sorted name order, so when two
    /// manifests declare the same name the one earlier in that order wins.
    pub fn discover(&self, root: &Path) -> Result<Packages, HarosError> {
        let mut packages = Packages::new();
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut stack = vec![root.to_path_buf()];

        while let Some(dir) = stack.pop() {
            // Symlinks are followed, so guard against reaching a directory twice
            let canonical = self.fs.canonicalize(&dir).unwrap_or_else(|_| dir.clone());
            if !visited.insert(canonical) {
                debug!("Already visited {}, skipping", dir.display());
                continue;
            }

            let entries = match self.fs.read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if dir == root => return Err(HarosError::io(&dir, e)),
                Err(e) => {
                    warn!("Cannot read directory {}: {}", dir.display(), e);
                    continue;
                }
            };

            let visit = classify(
                entries.iter().filter(|e| e.is_file()).map(|e| e.name.as_str()),
                &self.config,
            );
            debug!("{} -> {:?}", dir.display(), visit);

            match visit {
                Visit::Manifest => self.register(&dir, &mut packages)?,
                Visit::Ignored | Visit::LegacyManifest | Visit::NoSubdirs => {}
                Visit::Descend => {
                    let mut subdirs: Vec<_> = entries
                        .into_iter()
                        .filter(|e| e.is_dir() && !e.name.starts_with('.'))
                        .collect();
                    subdirs.sort_by(|a, b| a.name.cmp(&b.name));
                    // Reversed so the stack pops them in sorted order
                    stack.extend(subdirs.into_iter().rev().map(|e| e.path));
                }
            }
        }

        Ok(packages)
    }

    /// Discover packages below every root, in order; earlier roots win name clashes.
    pub fn discover_all(&self, roots: &[PathBuf]) -> Result<Packages, HarosError> {
        let mut packages = Packages::new();
        for root in roots {
            packages.absorb(self.discover(root)?);
        }
        Ok(packages)
    }

    fn register(&self, dir: &Path, packages: &mut Packages) -> Result<(), HarosError> {
        let path = dir.join(&self.config.manifest);

        let parsed = self
            .fs
            .read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| parse_manifest(&content));

        let manifest = match parsed {
            Ok(manifest) => manifest,
            Err(reason) => match self.config.invalid_manifest {
                ManifestPolicy::Fail => {
                    return Err(HarosError::InvalidManifest { path, reason });
                }
                ManifestPolicy::Skip => {
                    warn!("Skipping {}: {}", path.display(), reason);
                    return Ok(());
                }
            },
        };

        if manifest.is_metapackage {
            debug!("{} is a metapackage, not analyzed", manifest.name);
        } else if packages.insert_first(manifest.name.clone(), dir.to_path_buf()) {
            debug!("Found package {} at {}", manifest.name, dir.display());
        } else {
            warn!(
                "Duplicate package name {} at {}, keeping {}",
                manifest.name,
                dir.display(),
                packages
                    .get(&manifest.name)
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            );
        }

        Ok(())
    }
}
