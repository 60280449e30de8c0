//! Issue aggregation and statistics.
//!
//! Ranks the files and rules the issues HAROS reported concentrate in.

use crate::models::Issue;
use std::collections::HashMap;

/// Files with the most issues, highest first, at most `n` of them.
pub fn most_problematic_files(issues: &[Issue], n: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for issue in issues {
        *counts.entry(issue.file.as_str()).or_default() += 1;
    }

    let mut files: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(file, count)| (file.to_string(), count))
        .collect();
    // Ties broken by path so output is stable
    files.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    files.truncate(n);

    files
}

/// Rules that fired more than once, most frequent first.
pub fn identify_patterns(issues: &[Issue]) -> Vec<(String, usize)> {
    let mut rule_counts: HashMap<&str, usize> = HashMap::new();

    for issue in issues {
        *rule_counts.entry(issue.id.as_str()).or_default() += 1;
    }

    let mut patterns: Vec<(String, usize)> = rule_counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(rule, count)| (rule.to_string(), count))
        .collect();

    patterns.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    patterns
}
