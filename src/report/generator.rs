//! Console output for analysis results.

use crate::analysis::{identify_patterns, most_problematic_files};
use crate::models::{Issue, IssueSummary, Packages};
use crate::workspace::RunContext;
use tracing::info;

/// Files listed in the breakdown.
const TOP_FILES: usize = 5;

/// Final status line: `No problems found` or `<n> errors`.
pub fn summary_line(summary: &IssueSummary) -> String {
    if summary.is_clean() {
        "No problems found".to_string()
    } else {
        format!("{} errors", summary.total)
    }
}

/// Severity, category, file and rule statistics as text.
pub fn breakdown(summary: &IssueSummary, issues: &[Issue]) -> String {
    let mut section = String::new();

    section.push_str("By severity:\n");
    for (severity, count) in &summary.by_severity {
        section.push_str(&format!("  {}: {}\n", severity, count));
    }

    section.push_str("By category:\n");
    let mut categories: Vec<_> = summary.by_category.iter().collect();
    categories.sort_by_key(|(_, count)| std::cmp::Reverse(**count));
    for (category, count) in categories {
        section.push_str(&format!("  {}: {}\n", category, count));
    }

    section.push_str("Most affected files:\n");
    for (file, count) in most_problematic_files(issues, TOP_FILES) {
        section.push_str(&format!("  {}: {}\n", file, count));
    }

    let patterns = identify_patterns(issues);
    if !patterns.is_empty() {
        section.push_str("Repeated rules:\n");
        for (rule, count) in patterns {
            section.push_str(&format!("  {}: {}\n", rule, count));
        }
    }

    section
}

/// Print every issue to stderr and the outcome line, returning the summary.
pub fn print_issues(issues: &[Issue], show_breakdown: bool) -> IssueSummary {
    for issue in issues {
        eprintln!("{}", issue);
    }

    let summary = IssueSummary::from_issues(issues);

    if summary.is_clean() {
        println!("{}", summary_line(&summary));
    } else {
        if show_breakdown {
            for line in breakdown(&summary, issues).lines() {
                info!("{}", line);
            }
        }
        eprintln!("{}", summary_line(&summary));
    }

    summary
}

/// Text shown by `--dry-run`.
pub fn render_dry_run(ctx: &RunContext, packages: &Packages, project_file: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Workspace: {}\n", ctx.workspace_dir.display()));
    output.push_str(&format!("Project: {}\n", ctx.project));
    output.push_str(&format!("Packages ({}):\n", packages.len()));
    for package in packages.iter() {
        output.push_str(&format!("  {} -> {}\n", package.name, package.path.display()));
    }
    output.push_str(&format!(
        "\nProject file {}:\n",
        ctx.cache.project_file(&ctx.project).display()
    ));
    output.push_str(project_file);

    output
}
