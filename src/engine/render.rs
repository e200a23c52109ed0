use serde::Serialize;

use crate::domain::report::{DiffEntry, DiffReport, LeafDiff, LeafKind};
use crate::util::sort::sort_value_keys;

/// Serializes the report as one line of JSON with every object key sorted,
/// including keys inside observed values.
pub fn render_json(report: &DiffReport) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(report)?;
    serde_json::to_string(&sort_value_keys(&value))
}

/// Renders the report as diff-style lines, sorted by field name.
///
/// Each leaf yields `- path: <actual>` when a value was observed and
/// `+ path: <expected>` when a type or shape was declared. Unexpected fields
/// always get a `-` line, even when their value is `null`.
pub fn render_diff_lines(report: &DiffReport) -> Vec<String> {
    let mut lines = Vec::new();
    push_report_lines(report, "", &mut lines);
    lines
}

fn push_report_lines(report: &DiffReport, prefix: &str, lines: &mut Vec<String>) {
    for (field, entry) in report {
        let path = format!("{prefix}{field}");
        match entry {
            DiffEntry::Nested(nested) => push_report_lines(nested, &format!("{path}."), lines),
            DiffEntry::Leaf(leaf) => push_leaf_lines(leaf, &path, lines),
        }
    }
}

fn push_leaf_lines(leaf: &LeafDiff, path: &str, lines: &mut Vec<String>) {
    if !leaf.actual.is_null() || leaf.kind() == LeafKind::Unexpected {
        lines.push(format!("- {path}: {}", encode(&leaf.actual)));
    }
    if let Some(expected) = &leaf.expected {
        lines.push(format!("+ {path}: {}", encode(expected)));
    }
}

fn encode<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<serialization-error>".to_string())
}
