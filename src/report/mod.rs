// src/report/mod.rs
// =============================================================================
// Turns check results into something a person (or a CI job) can read.
//
// Formats:
// - console: grouped sections plus a summary block, for terminals
// - json: machine-readable, pretty-printed
// - markdown: a report file for PR comments or artifacts
//
// Every renderer returns a String; the caller decides where it goes.
// =============================================================================

mod console;
mod json;
mod markdown;

pub use console::render_console;
pub use json::render_json;
pub use markdown::render_markdown;

use crate::checker::{LinkCheckResult, LinkStatus};
use std::path::Path;

// 850 -> "850ms", 1234 -> "1.2s"
pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", ms as f64 / 1000.0)
    }
}

// Path of a document relative to the scanned directory, '/'-separated
pub fn relative_path(file: &Path, base_dir: &Path) -> String {
    match file.strip_prefix(base_dir) {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => file.to_string_lossy().into_owned(),
    }
}

// Broken filesystem links (internal, anchor, asset)
fn broken_local(results: &[LinkCheckResult]) -> impl Iterator<Item = &LinkCheckResult> {
    results
        .iter()
        .filter(|r| r.link.link_type.is_local() && r.status == LinkStatus::Broken)
}

fn broken_external(results: &[LinkCheckResult]) -> impl Iterator<Item = &LinkCheckResult> {
    results
        .iter()
        .filter(|r| !r.link.link_type.is_local() && r.status == LinkStatus::Broken)
}

fn with_status(results: &[LinkCheckResult], status: LinkStatus) -> impl Iterator<Item = &LinkCheckResult> {
    results.iter().filter(move |r| r.status == status)
}

// "404 Not Found (404)" style text for a failed external probe
fn error_text(result: &LinkCheckResult) -> String {
    let error = result.error.as_deref().unwrap_or("Unknown error");
    match result.status_code {
        Some(code) => format!("{error} ({code})"),
        None => error.to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0ms");
        assert_eq!(format_duration(850), "850ms");
        assert_eq!(format_duration(1000), "1.0s");
        assert_eq!(format_duration(1234), "1.2s");
        assert_eq!(format_duration(65_000), "65.0s");
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/site/docs/guide/a.mdx"), Path::new("/site/docs")),
            "guide/a.mdx"
        );
        assert_eq!(relative_path(Path::new("/elsewhere/b.md"), Path::new("/site/docs")), "/elsewhere/b.md");
    }
}
