//! Workspace resolution and HAROS input files.
//!
//! Everything a run needs to know about where things live is gathered in a
//! [`RunContext`] up front, so no later step looks at globals or the
//! environment.

use crate::error::HarosError;
use crate::models::Packages;
use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Directory name of our private area inside the cache directory.
const CACHE_SUBDIR: &str = "ament_haros";

/// Header HAROS expects on its YAML inputs.
const YAML_HEADER: &str = "%YAML 1.1\n";

/// Make `path` absolute without touching the filesystem.
///
/// `.` and `..` are folded lexically and symlinks are left alone.
pub fn absolutize(path: &Path) -> Result<PathBuf, HarosError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|e| HarosError::io(".", e))?;
        cwd.join(path)
    };

    let mut result = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            other => result.push(other),
        }
    }
    Ok(result)
}

/// Find the colcon/catkin workspace containing `package_dir`.
///
/// A path below `<ws>/src/...` resolves to `<ws>` (the last inner `src`
/// wins), `<ws>/src` itself resolves to `<ws>`, and a directory that has a
/// `src` child is taken to be the workspace.
pub fn find_workspace_root(package_dir: &Path) -> Result<PathBuf, HarosError> {
    let components: Vec<Component> = package_dir.components().collect();
    let is_src = |c: &Component| c.as_os_str() == "src";

    let inner = components.len().saturating_sub(1);
    if let Some(idx) = components[..inner].iter().rposition(is_src) {
        return Ok(components[..idx].iter().collect());
    }

    if components.last().map_or(false, is_src) {
        return Ok(components[..inner].iter().collect());
    }

    if package_dir.join("src").is_dir() {
        return Ok(package_dir.to_path_buf());
    }

    Err(HarosError::WorkspaceRootNotFound(package_dir.to_path_buf()))
}

/// Name of the HAROS project.
///
/// A single package lends its name; otherwise the input directory's name is
/// used.
pub fn project_name(packages: &Packages, package_dir: &Path) -> String {
    if let Some(name) = packages.single_name() {
        return name.to_string();
    }

    package_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "workspace".to_string())
}

/// Scratch directories HAROS runs in, below `<cache>/ament_haros`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    pub root: PathBuf,
    pub home_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl CacheLayout {
    pub fn new(cache_dir: &Path) -> Self {
        let root = cache_dir.join(CACHE_SUBDIR);
        Self {
            home_dir: root.join("haros_home"),
            data_dir: root.join("haros_data"),
            root,
        }
    }

    /// Wipe any previous run and create fresh directories.
    pub fn prepare(&self) -> Result<(), HarosError> {
        if self.root.exists() {
            debug!("Removing stale cache {}", self.root.display());
            fs::remove_dir_all(&self.root).map_err(|e| HarosError::io(&self.root, e))?;
        }
        for dir in [&self.root, &self.home_dir, &self.data_dir] {
            fs::create_dir_all(dir).map_err(|e| HarosError::io(dir, e))?;
        }
        Ok(())
    }

    pub fn project_file(&self, project: &str) -> PathBuf {
        self.root.join(format!("{}.yaml", project))
    }

    pub fn config_file(&self) -> PathBuf {
        self.home_dir.join("configs.yaml")
    }

    /// Where HAROS writes its xUnit report for `project`.
    pub fn xunit_report(&self, project: &str) -> PathBuf {
        self.data_dir
            .join("data")
            .join(project)
            .join("compliance")
            .join(format!("{}.xml", project))
    }

    /// Holding spot for the previous `summary.json` while a report is replaced.
    pub fn staged_summary(&self) -> PathBuf {
        self.root.join("previous_summary.json")
    }
}

/// Explicit paths and names for one run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub workspace_dir: PathBuf,
    pub project: String,
    pub cache: CacheLayout,
    pub xunit_file: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
}

#[derive(Serialize)]
struct ProjectFile<'a> {
    project: &'a str,
    packages: Vec<&'a str>,
}

#[derive(Serialize)]
struct AnalyzerConfigFile<'a> {
    workspace: String,
    analysis: AnalysisSection<'a>,
}

#[derive(Serialize)]
struct AnalysisSection<'a> {
    ignore: IgnoreSection<'a>,
}

#[derive(Serialize)]
struct IgnoreSection<'a> {
    rules: &'a [String],
}

/// Serialize `value` as a single YAML 1.1 document.
fn yaml_document<T: Serialize>(value: &T, path: &Path) -> Result<String, HarosError> {
    let body = serde_yaml::to_string(value).map_err(|e| HarosError::Serialize {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(format!("{}---\n{}", YAML_HEADER, body))
}

/// Render the HAROS project file listing every package.
pub fn render_project_file(project: &str, packages: &Packages) -> Result<String, HarosError> {
    yaml_document(
        &ProjectFile {
            project,
            packages: packages.names().collect(),
        },
        Path::new(&format!("{}.yaml", project)),
    )
}

/// Write `<cache>/ament_haros/<project>.yaml`.
pub fn write_project_file(ctx: &RunContext, packages: &Packages) -> Result<PathBuf, HarosError> {
    let path = ctx.cache.project_file(&ctx.project);
    let content = render_project_file(&ctx.project, packages)?;
    fs::write(&path, content).map_err(|e| HarosError::io(&path, e))?;
    debug!("Wrote project file {}", path.display());
    Ok(path)
}

/// Write the HAROS `configs.yaml` pointing at the workspace.
pub fn write_analyzer_config(
    ctx: &RunContext,
    ignored_rules: &[String],
) -> Result<PathBuf, HarosError> {
    let path = ctx.cache.config_file();
    let content = yaml_document(
        &AnalyzerConfigFile {
            workspace: ctx.workspace_dir.to_string_lossy().to_string(),
            analysis: AnalysisSection {
                ignore: IgnoreSection {
                    rules: ignored_rules,
                },
            },
        },
        &path,
    )?;
    fs::write(&path, content).map_err(|e| HarosError::io(&path, e))?;
    debug!("Wrote analyzer config {}", path.display());
    Ok(path)
}
