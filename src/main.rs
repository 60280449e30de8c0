//! ament-haros - Static code analysis of ROS packages using HAROS
//!
//! Discovers the ROS packages below the given paths, runs HAROS over them
//! and turns its xUnit report into a pass/fail result.
//!
//! Exit codes:
//!   0 - HAROS reported no issues (or --dry-run / --init-config)
//!   1 - Issues were reported, or any step of the run failed

mod analysis;
mod analyzer;
mod cli;
mod config;
mod error;
mod fs;
mod models;
mod report;
mod scanner;
mod workspace;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use error::HarosError;
use fs::RealFileSystem;
use scanner::PackageLocator;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use workspace::{CacheLayout, RunContext};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // No logging needed to write a config file
    if args.init_config {
        return handle_init_config();
    }

    let config = match load_config(&args) {
        Ok(mut config) => {
            config.merge_with_args(&args);
            config
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    info!("ament-haros v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args, config).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: write a default configuration file.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

fn init_logging(args: &Args, config: &Config) {
    let level = if !args.quiet && config.general.verbose {
        Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run discovery, HAROS and report handling. Returns the exit code.
async fn run(args: Args, config: Config) -> Result<i32> {
    let paths = args
        .paths
        .iter()
        .map(|p| workspace::absolutize(p))
        .collect::<Result<Vec<PathBuf>, HarosError>>()?;

    let locator = PackageLocator::new(RealFileSystem, config.discovery.clone());
    let packages = locator.discover_all(&paths)?;
    if packages.is_empty() {
        return Err(HarosError::NoPackagesFound { paths }.into());
    }
    info!("Found {} package(s)", packages.len());

    // The first path decides the workspace and the project name
    let package_dir = paths[0].clone();
    let workspace_dir = workspace::find_workspace_root(&package_dir)?;
    let project = workspace::project_name(&packages, &package_dir);
    debug!("Workspace root: {}", workspace_dir.display());

    let ctx = RunContext {
        workspace_dir,
        project,
        cache: CacheLayout::new(&workspace::absolutize(&args.effective_cache_dir())?),
        xunit_file: args
            .xunit_file
            .as_deref()
            .map(workspace::absolutize)
            .transpose()?,
        report_dir: args
            .report_dir
            .as_deref()
            .map(workspace::absolutize)
            .transpose()?,
    };

    if args.dry_run {
        let project_file = workspace::render_project_file(&ctx.project, &packages)?;
        println!("{}", report::render_dry_run(&ctx, &packages, &project_file));
        return Ok(0);
    }

    ctx.cache.prepare()?;
    let project_file = workspace::write_project_file(&ctx, &packages)?;
    workspace::write_analyzer_config(&ctx, &config.analyzer.ignored_rules)?;

    let invocation = analyzer::Invocation::analyse(&config.analyzer.command, &ctx, &project_file)?;
    let runner = analyzer::HarosRunner::new(config.analyzer.timeout_seconds, !args.quiet);
    let outcome = runner.run(&invocation).await?;
    if !outcome.success() {
        warn!("Continuing with whatever report HAROS produced");
    }

    let xunit_report = analyzer::expect_report(ctx.cache.xunit_report(&ctx.project))?;
    let issues = report::parse_xunit_file(&xunit_report)?;
    let summary = report::print_issues(&issues, config.report.show_breakdown);

    if let Some(ref destination) = ctx.xunit_file {
        report::copy_xunit_file(&xunit_report, destination)?;
    }

    if let Some(ref report_dir) = ctx.report_dir {
        report::publish_report(
            &ctx.cache.data_dir,
            report_dir,
            &ctx.project,
            &ctx.cache.staged_summary(),
        )?;
    }

    Ok(if summary.is_clean() { 0 } else { 1 })
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    Ok(Config::load_default()?.unwrap_or_default())
}
