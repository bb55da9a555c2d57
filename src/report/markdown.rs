// src/report/markdown.rs
// =============================================================================
// Markdown report, grouped by source file.
//
// The generation time is passed in rather than read from the clock here, so
// the output is reproducible in tests.
// =============================================================================

use super::{broken_external, broken_local, error_text, format_duration, relative_path, with_status};
use crate::checker::{CheckSummary, LinkCheckResult, LinkStatus};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::path::Path;

pub fn render_markdown(
    results: &[LinkCheckResult],
    summary: &CheckSummary,
    base_dir: &Path,
    generated_at: DateTime<Utc>,
) -> String {
    let mut lines = vec![
        "# Link Check Report".to_string(),
        String::new(),
        format!("Generated: {}", generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        String::new(),
        "## Summary".to_string(),
        String::new(),
        "| Metric | Count |".to_string(),
        "|--------|-------|".to_string(),
    ];

    for (metric, count) in [
        ("Files scanned", summary.files_scanned),
        ("Total links", summary.total_links),
        ("Internal links", summary.internal_links),
        ("External links", summary.external_links),
        ("Broken (internal)", summary.broken_internal),
        ("Broken (external)", summary.broken_external),
        ("Timeouts", summary.timeouts),
        ("Redirected", summary.redirected),
        ("Skipped", summary.skipped),
    ] {
        lines.push(format!("| {metric} | {count} |"));
    }
    lines.push(format!("| Duration | {} |", format_duration(summary.duration)));
    lines.push(String::new());

    let internal: Vec<_> = broken_local(results).collect();
    push_grouped(&mut lines, "Broken Internal Links", &internal, base_dir, |result| {
        let mut entry = vec![
            format!("- **Line {}**: `{}`", result.link.line, result.link.href),
            format!("  - Error: {}", result.error.as_deref().unwrap_or("File not found")),
        ];
        if let Some(suggestions) = &result.suggestions {
            entry.push(format!("  - Suggestions: {}", suggestions.join(", ")));
        }
        entry
    });

    // Timeouts are only possible for external links
    let external: Vec<_> = broken_external(results)
        .chain(with_status(results, LinkStatus::Timeout))
        .collect();
    push_grouped(&mut lines, "Broken External Links", &external, base_dir, |result| {
        vec![
            format!("- **Line {}**: {}", result.link.line, result.link.href),
            format!("  - Error: {}", error_text(result)),
        ]
    });

    let redirected: Vec<_> = with_status(results, LinkStatus::Redirected).collect();
    push_grouped(&mut lines, "Redirected Links", &redirected, base_dir, |result| {
        vec![
            format!("- **Line {}**: `{}`", result.link.line, result.link.href),
            format!(
                "  - Redirects to: `{}`",
                result.redirect_destination.as_deref().unwrap_or_default()
            ),
        ]
    });

    lines.join("\n")
}

// "## Title (n)" followed by one "### file" block per source document
fn push_grouped(
    lines: &mut Vec<String>,
    title: &str,
    results: &[&LinkCheckResult],
    base_dir: &Path,
    render: impl Fn(&LinkCheckResult) -> Vec<String>,
) {
    if results.is_empty() {
        return;
    }

    lines.push(format!("## {title} ({})", results.len()));
    lines.push(String::new());

    let mut by_file: BTreeMap<String, Vec<&LinkCheckResult>> = BTreeMap::new();
    for &result in results {
        by_file
            .entry(relative_path(&result.link.source_file, base_dir))
            .or_default()
            .push(result);
    }

    for (file, file_results) in by_file {
        lines.push(format!("### {file}"));
        lines.push(String::new());
        for result in file_results {
            lines.extend(render(result));
        }
        lines.push(String::new());
    }
}
