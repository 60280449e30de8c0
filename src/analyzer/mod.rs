//! HAROS subprocess invocation.
//!
//! HAROS is treated as an opaque tool: we hand it a project file and a data
//! directory, wait for it to finish, and then look for the report it is
//! supposed to leave behind. Its exit status is informational only.

use crate::error::HarosError;
use crate::workspace::RunContext;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Lines of analyzer stderr kept for diagnostics on a non-zero exit.
const STDERR_TAIL_LINES: usize = 20;

/// A fully resolved analyzer command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Build the `haros analyse` command for a prepared run.
    ///
    /// `command` is the configured program followed by any leading arguments.
    pub fn analyse(
        command: &[String],
        ctx: &RunContext,
        project_file: &Path,
    ) -> Result<Self, HarosError> {
        let (program, leading) = command.split_first().ok_or_else(|| {
            HarosError::AnalyzerInvocation {
                program: String::new(),
                reason: "analyzer command is empty".to_string(),
            }
        })?;

        let path = |p: &Path| p.to_string_lossy().to_string();
        let mut args: Vec<String> = leading.to_vec();
        args.extend([
            "--cwd".to_string(),
            path(&ctx.workspace_dir),
            "--home".to_string(),
            path(&ctx.cache.home_dir),
            "--config".to_string(),
            path(&ctx.cache.config_file()),
            "analyse".to_string(),
            "--project-file".to_string(),
            path(project_file),
            "--data-dir".to_string(),
            path(&ctx.cache.data_dir),
            "--junit-xml-output".to_string(),
        ]);

        Ok(Self {
            program: program.clone(),
            args,
        })
    }

    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How the analyzer process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub exit_code: i32,
    pub stderr_tail: String,
}

impl Outcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs the analyzer as a child process.
#[derive(Debug, Clone)]
pub struct HarosRunner {
    timeout: Option<Duration>,
    show_progress: bool,
}

impl HarosRunner {
    pub fn new(timeout_seconds: Option<u64>, show_progress: bool) -> Self {
        Self {
            timeout: timeout_seconds.map(Duration::from_secs),
            show_progress,
        }
    }

    /// Run to completion.
    ///
    /// Fails when the process cannot be started, is killed by a signal, or
    /// exceeds the timeout. A non-zero exit code is returned, not raised.
    pub async fn run(&self, invocation: &Invocation) -> Result<Outcome, HarosError> {
        info!("Running {}", invocation.display());

        let failure = |reason: String| HarosError::AnalyzerInvocation {
            program: invocation.program.clone(),
            reason,
        };

        let child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| failure(format!("could not be started: {}", e)))?;

        let spinner = self.spinner();
        let waited = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| failure(format!("timed out after {}s", limit.as_secs()))),
            None => Ok(child.wait_with_output().await),
        };
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let output = waited?.map_err(|e| failure(e.to_string()))?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!("haros: {}", line);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr_tail = tail(&stderr, STDERR_TAIL_LINES);

        let exit_code = output
            .status
            .code()
            .ok_or_else(|| failure("terminated by a signal".to_string()))?;

        if exit_code != 0 {
            warn!("{} exited with code {}", invocation.program, exit_code);
            for line in stderr_tail.lines() {
                warn!("haros: {}", line);
            }
        }

        Ok(Outcome {
            exit_code,
            stderr_tail,
        })
    }

    fn spinner(&self) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("HAROS is analysing...");
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    }
}

/// Check that the analyzer left its xUnit report where expected.
pub fn expect_report(path: PathBuf) -> Result<PathBuf, HarosError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(HarosError::ReportMissing(path))
    }
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}
