// src/report/console.rs
// =============================================================================
// Human-readable report for the terminal.
//
// Layout:
//   ❌ BROKEN INTERNAL LINKS (n)   file:line:col, context, error, suggestions
//   ❌ BROKEN EXTERNAL LINKS (n)   file:line:col, href, error (status)
//   ⏱️  TIMEOUTS (n)
//   🔀 REDIRECTED (n)
//   ⏭️  SKIPPED (n)                 only with --verbose
//   SUMMARY block
//
// Sections with nothing in them are left out.
// =============================================================================

use super::{broken_external, broken_local, error_text, format_duration, relative_path, with_status};
use crate::checker::{CheckSummary, LinkCheckResult, LinkStatus};
use std::path::Path;

const RULE_WIDTH: usize = 50;

pub fn render_console(
    results: &[LinkCheckResult],
    summary: &CheckSummary,
    base_dir: &Path,
    verbose: bool,
) -> String {
    let mut lines = vec![String::new()];
    let location = |r: &LinkCheckResult| {
        format!(
            "  {}:{}:{}",
            relative_path(&r.link.source_file, base_dir),
            r.link.line,
            r.link.column
        )
    };

    let internal: Vec<_> = broken_local(results).collect();
    if !internal.is_empty() {
        lines.push(format!("❌ BROKEN INTERNAL LINKS ({})", internal.len()));
        lines.push(String::new());
        for result in internal {
            lines.push(location(result));
            lines.push(format!("  │ {}", result.link.context));
            lines.push(format!("  └─ {}", result.error.as_deref().unwrap_or("File not found")));
            if let Some(suggestions) = &result.suggestions {
                lines.push(format!("     Suggestions: {}", suggestions.join(", ")));
            }
            lines.push(String::new());
        }
    }

    let external: Vec<_> = broken_external(results).collect();
    if !external.is_empty() {
        lines.push(format!("❌ BROKEN EXTERNAL LINKS ({})", external.len()));
        lines.push(String::new());
        for result in external {
            lines.push(location(result));
            lines.push(format!("  │ {}", result.link.href));
            lines.push(format!("  └─ {}", error_text(result)));
            lines.push(String::new());
        }
    }

    let timeouts: Vec<_> = with_status(results, LinkStatus::Timeout).collect();
    if !timeouts.is_empty() {
        lines.push(format!("⏱️  TIMEOUTS ({})", timeouts.len()));
        lines.push(String::new());
        for result in timeouts {
            lines.push(location(result));
            lines.push(format!("  │ {}", result.link.href));
            lines.push(format!("  └─ {}", result.error.as_deref().unwrap_or("Timeout")));
            lines.push(String::new());
        }
    }

    let redirected: Vec<_> = with_status(results, LinkStatus::Redirected).collect();
    if !redirected.is_empty() {
        lines.push(format!("🔀 REDIRECTED ({})", redirected.len()));
        lines.push(String::new());
        for result in redirected {
            lines.push(location(result));
            lines.push(format!("  │ {}", result.link.href));
            lines.push(format!(
                "  └─ redirects to {}",
                result.redirect_destination.as_deref().unwrap_or("?")
            ));
            lines.push(String::new());
        }
    }

    let skipped: Vec<_> = with_status(results, LinkStatus::Skipped).collect();
    if verbose && !skipped.is_empty() {
        lines.push(format!("⏭️  SKIPPED ({})", skipped.len()));
        lines.push(String::new());
        for result in skipped {
            lines.push(location(result));
            lines.push(format!("  └─ {}", result.link.href));
        }
        lines.push(String::new());
    }

    push_summary(&mut lines, summary);
    lines.join("\n")
}

fn push_summary(lines: &mut Vec<String>, summary: &CheckSummary) {
    let rule = "─".repeat(RULE_WIDTH);

    lines.push(rule.clone());
    lines.push("📊 SUMMARY".to_string());
    lines.push(rule.clone());
    lines.push(format!("  Files scanned     {}", summary.files_scanned));
    lines.push(format!("  Total links       {}", summary.total_links));
    lines.push(format!("  ├─ Internal       {}", summary.internal_links));
    lines.push(format!("  └─ External       {}", summary.external_links));
    lines.push(String::new());

    let broken = summary.broken_internal + summary.broken_external;
    lines.push(format!("  Broken            {broken}"));
    if broken > 0 {
        lines.push(format!("  ├─ Internal       {}", summary.broken_internal));
        lines.push(format!("  └─ External       {}", summary.broken_external));
    }
    if summary.timeouts > 0 {
        lines.push(format!("  Timeouts          {}", summary.timeouts));
    }
    if summary.redirected > 0 {
        lines.push(format!("  Redirected        {}", summary.redirected));
    }
    if summary.skipped > 0 {
        lines.push(format!("  Skipped           {}", summary.skipped));
    }

    lines.push(String::new());
    lines.push(format!("  Duration          {}", format_duration(summary.duration)));
    lines.push(rule);
}
