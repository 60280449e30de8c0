//! xUnit report parsing.
//!
//! HAROS writes one `<testcase>` per rule violation. The interesting data is
//! packed into the failure text as four lines:
//!
//! ```text
//! <message>
//! Category: <category>
//! File: <file>
//! Line: <line>
//! ```
//!
//! The text starts with a single newline and the message may be empty. The
//! labelled lines must follow the message in that order, possibly with other
//! lines in between.

use crate::error::HarosError;
use crate::models::Issue;
use roxmltree::{Document, Node};
use std::path::Path;

const DEFAULT_ID: &str = "UNKNOWN ISSUE";
const DEFAULT_SEVERITY: &str = "FAILURE";

/// Fields carried in a failure's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureText {
    pub message: String,
    pub category: String,
    pub file: String,
    pub line: String,
}

/// Split failure text into its message and labelled fields.
pub fn parse_failure_text(text: &str) -> Result<FailureText, String> {
    // HAROS opens the text with a newline; the line after it is the message
    let body = text
        .strip_prefix("\r\n")
        .or_else(|| text.strip_prefix('\n'))
        .unwrap_or(text);
    let mut lines = body.lines();

    let message = lines.next().unwrap_or("").trim().to_string();

    let mut take = |label: &str| -> Result<String, String> {
        lines
            .by_ref()
            .find_map(|l| l.trim_start().strip_prefix(label).map(|v| v.trim().to_string()))
            .ok_or_else(|| format!("missing '{}' line", label.trim_end()))
    };

    let category = take("Category: ")?;
    let file = take("File: ")?;
    let line = take("Line: ")?;

    Ok(FailureText {
        message,
        category,
        file,
        line,
    })
}

/// Extract every failing test case from an xUnit document.
///
/// `source` is only used to label errors.
pub fn parse_xunit(content: &str, source: &Path) -> Result<Vec<Issue>, HarosError> {
    let doc = Document::parse(content)
        .map_err(|e| HarosError::report_parse(source, format!("not well-formed XML: {}", e)))?;

    let mut issues = Vec::new();
    for testcase in doc
        .root_element()
        .descendants()
        .filter(|n| n.has_tag_name("testcase"))
    {
        if let Some(issue) = parse_testcase(testcase, source)? {
            issues.push(issue);
        }
    }

    Ok(issues)
}

/// Read and parse the analyzer's xUnit file.
pub fn parse_xunit_file(path: &Path) -> Result<Vec<Issue>, HarosError> {
    let content = std::fs::read_to_string(path).map_err(|e| HarosError::io(path, e))?;
    parse_xunit(&content, path)
}

fn parse_testcase(testcase: Node, source: &Path) -> Result<Option<Issue>, HarosError> {
    let Some(failure) = testcase
        .children()
        .find(|n| n.has_tag_name("failure") || n.has_tag_name("error"))
    else {
        return Ok(None);
    };

    let id = testcase.attribute("id").unwrap_or(DEFAULT_ID).to_string();
    let severity = failure
        .attribute("type")
        .unwrap_or(DEFAULT_SEVERITY)
        .to_string();

    let text: String = failure
        .children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();

    let fields = parse_failure_text(&text)
        .map_err(|reason| HarosError::report_parse(source, format!("test case {}: {}", id, reason)))?;

    Ok(Some(Issue {
        id,
        severity,
        message: fields.message,
        category: fields.category,
        file: fields.file,
        line: fields.line,
    }))
}
