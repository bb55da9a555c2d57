// src/report/json.rs
// =============================================================================
// Machine-readable report.
//
// Shape:
//   {
//     "summary":    { filesScanned, totalLinks, ... },
//     "broken":     [ every broken or timed-out link ],
//     "redirected": [ links with a known new location ],
//     "skipped":    [ links matched by an ignore rule ]
//   }
//
// Source files are written relative to the scanned directory so the report
// is stable across machines.
// =============================================================================

use super::relative_path;
use crate::checker::{CheckSummary, LinkCheckResult, LinkStatus, LinkType};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    summary: &'a CheckSummary,
    broken: Vec<BrokenLink<'a>>,
    redirected: Vec<RedirectedLink<'a>>,
    skipped: Vec<SkippedLink<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrokenLink<'a> {
    #[serde(rename = "type")]
    link_type: LinkType,
    status: LinkStatus,
    href: &'a str,
    source_file: String,
    line: usize,
    column: usize,
    context: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestions: Option<&'a [String]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RedirectedLink<'a> {
    href: &'a str,
    source_file: String,
    line: usize,
    column: usize,
    destination: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SkippedLink<'a> {
    href: &'a str,
    source_file: String,
    line: usize,
    reason: &'static str,
}

pub fn render_json(
    results: &[LinkCheckResult],
    summary: &CheckSummary,
    base_dir: &Path,
) -> serde_json::Result<String> {
    let source = |r: &LinkCheckResult| relative_path(&r.link.source_file, base_dir);

    let report = JsonReport {
        summary,
        broken: results
            .iter()
            .filter(|r| matches!(r.status, LinkStatus::Broken | LinkStatus::Timeout))
            .map(|r| BrokenLink {
                link_type: r.link.link_type,
                status: r.status,
                href: &r.link.href,
                source_file: source(r),
                line: r.link.line,
                column: r.link.column,
                context: &r.link.context,
                error: r.error.as_deref(),
                status_code: r.status_code,
                suggestions: r.suggestions.as_deref(),
            })
            .collect(),
        redirected: results
            .iter()
            .filter(|r| r.status == LinkStatus::Redirected)
            .map(|r| RedirectedLink {
                href: &r.link.href,
                source_file: source(r),
                line: r.link.line,
                column: r.link.column,
                destination: r.redirect_destination.as_deref().unwrap_or_default(),
            })
            .collect(),
        skipped: results
            .iter()
            .filter(|r| r.status == LinkStatus::Skipped)
            .map(|r| SkippedLink {
                href: &r.link.href,
                source_file: source(r),
                line: r.link.line,
                reason: "Matched ignore pattern",
            })
            .collect(),
    };

    serde_json::to_string_pretty(&report)
}
