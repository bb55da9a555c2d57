// src/check.rs
// =============================================================================
// Runs a whole check over one directory.
//
// What happens here:
// 1. Find the documents (scanner)
// 2. Extract links from each one; an unreadable file is skipped with a warning
// 3. Apply --internal-only / --external-only
// 4. Validate internal links one by one (they're just filesystem lookups)
// 5. Validate external links concurrently
// 6. Sort results by position and compute the summary
//
// Progress lines go to stderr so stdout stays clean for JSON/Markdown output.
// =============================================================================

use crate::checker::{
    extract_links_from_file, CheckSummary, ExternalValidator, ExtractedLink, InternalValidator,
    LinkCheckResult, LinkType,
};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::redirects::load_redirects;
use crate::scanner::scan_files;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

// Everything a reporter needs
#[derive(Debug)]
pub struct CheckOutcome {
    /// Canonical form of the directory that was checked
    pub base_dir: PathBuf,
    pub files: Vec<PathBuf>,
    /// Sorted by source file, then line, then column
    pub results: Vec<LinkCheckResult>,
    pub summary: CheckSummary,
}

impl CheckOutcome {
    pub fn failure_count(&self, fail_on_redirects: bool) -> usize {
        self.summary.failure_count(fail_on_redirects)
    }
}

pub async fn run_check(base_dir: &Path, config: &Config, show_progress: bool) -> Result<CheckOutcome> {
    let started = Instant::now();
    let progress = |message: String| {
        if show_progress {
            eprintln!("{message}");
        }
    };

    let base_dir = base_dir.canonicalize().map_err(|source| Error::BaseDir {
        path: base_dir.to_path_buf(),
        source,
    })?;

    progress(format!("🔍 Scanning {}", base_dir.display()));
    let files = scan_files(&base_dir, config)?;

    if files.is_empty() {
        progress("📄 No MDX files found".to_string());
        return Ok(CheckOutcome {
            base_dir,
            files,
            results: Vec::new(),
            summary: CheckSummary::from_results(0, &[], &[], started.elapsed()),
        });
    }
    progress(format!("📄 Found {} file(s)", files.len()));

    let mut all_links = Vec::new();
    for file in &files {
        match extract_links_from_file(file, config) {
            Ok(links) => {
                debug!(file = %file.display(), count = links.len(), "extracted links");
                all_links.extend(links);
            }
            Err(e) => warn!("{e}"),
        }
    }
    progress(format!("🔗 Found {} link(s)", all_links.len()));

    let (local, external): (Vec<ExtractedLink>, Vec<ExtractedLink>) = all_links
        .iter()
        .filter(|link| wanted(link.link_type, config))
        .cloned()
        .partition(|link| link.link_type.is_local());

    let mut results = Vec::with_capacity(local.len() + external.len());

    if !local.is_empty() {
        progress(format!("📁 Checking {} internal link(s)...", local.len()));
        let validator = internal_validator(&base_dir, config, &files);
        results.extend(local.iter().map(|link| validator.validate(link)));
    }

    if !external.is_empty() {
        progress(format!("🌐 Checking {} external link(s)...", external.len()));
        let validator = ExternalValidator::new(config)?;
        results.extend(validator.validate_all(&external).await);
    }

    results.sort_by(|a, b| {
        (&a.link.source_file, a.link.line, a.link.column).cmp(&(&b.link.source_file, b.link.line, b.link.column))
    });

    let summary = CheckSummary::from_results(files.len(), &all_links, &results, started.elapsed());

    Ok(CheckOutcome {
        base_dir,
        files,
        results,
        summary,
    })
}

// internalOnly keeps filesystem links, externalOnly keeps URLs
fn wanted(link_type: LinkType, config: &Config) -> bool {
    if config.internal_only {
        link_type.is_local()
    } else if config.external_only {
        link_type == LinkType::External
    } else {
        true
    }
}

// A broken redirects file loses the redirect lookup, not the whole run
fn internal_validator(base_dir: &Path, config: &Config, files: &[PathBuf]) -> InternalValidator {
    let validator = InternalValidator::new(base_dir, config, files);

    let Some(path) = &config.redirects_file else {
        return validator;
    };

    match load_redirects(path) {
        Ok(redirects) => {
            debug!(path = %path.display(), entries = redirects.len(), "loaded redirects");
            validator.with_redirects(redirects)
        }
        Err(e) => {
            warn!("continuing without redirects: {e}");
            validator
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::LinkStatus;
    use std::fs;
    use tempfile::{tempdir, TempDir};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn write(root: &Path, file: &str, content: &str) {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn docs() -> TempDir {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "index.mdx",
            "# Home\n\nSee [intro](./intro) and [gone](./gone.mdx).\n\nAlso [site](https://example.com).\n",
        );
        write(dir.path(), "intro.mdx", "# Intro\n\n[back](/index#top)\n");
        dir
    }

    #[tokio::test]
    async fn test_internal_only_run() {
        let dir = docs();
        let config = Config {
            internal_only: true,
            ..Config::default()
        };

        let outcome = run_check(dir.path(), &config, false).await.unwrap();

        assert_eq!(outcome.files.len(), 2);
        assert_eq!(outcome.summary.total_links, 4);
        assert_eq!(outcome.summary.external_links, 1);
        // The external link was counted but not checked
        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.summary.broken_internal, 1);
        assert_eq!(outcome.failure_count(false), 1);

        let broken: Vec<_> = outcome
            .results
            .iter()
            .filter(|r| r.status == LinkStatus::Broken)
            .collect();
        assert_eq!(broken[0].link.href, "./gone.mdx");
    }

    #[tokio::test]
    async fn test_results_are_sorted_by_position() {
        let dir = docs();
        let config = Config {
            internal_only: true,
            ..Config::default()
        };
        let outcome = run_check(dir.path(), &config, false).await.unwrap();

        let positions: Vec<_> = outcome
            .results
            .iter()
            .map(|r| (r.link.source_file.file_name().unwrap().to_owned(), r.link.line, r.link.column))
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[tokio::test]
    async fn test_external_links_are_checked() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "links.md",
            &format!(
                "[ok]({uri}/ok)\n[missing]({uri}/missing)\n[local](./links.md)\n",
                uri = server.uri()
            ),
        );

        let config = Config {
            external_only: true,
            ignore_patterns: Vec::new(),
            retries: 0,
            ..Config::default()
        };
        let outcome = run_check(dir.path(), &config, false).await.unwrap();

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.summary.broken_external, 1);
        assert_eq!(outcome.results[0].status, LinkStatus::Valid);
        assert_eq!(outcome.results[1].status, LinkStatus::Broken);
    }

    #[tokio::test]
    async fn test_localhost_is_skipped_by_default() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "dev.md",
            "Run it at [local](http://localhost:3000/app).\n\
             The [printer](http://printer.local/status) and [nas](http://nas.local:8080) too.\n\
             Or just [bare](http://media.local).\n",
        );

        let outcome = run_check(dir.path(), &Config::default(), false).await.unwrap();
        assert_eq!(outcome.summary.skipped, 4);
        assert_eq!(outcome.failure_count(true), 0);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_skipped() {
        let dir = docs();
        fs::write(dir.path().join("binary.md"), [0xff, 0xfe, 0x00, 0x9f]).unwrap();

        let config = Config {
            internal_only: true,
            ..Config::default()
        };
        let outcome = run_check(dir.path(), &config, false).await.unwrap();
        assert_eq!(outcome.files.len(), 3);
        assert_eq!(outcome.summary.total_links, 4);
    }

    #[tokio::test]
    async fn test_redirects_file() {
        let dir = docs();
        write(dir.path(), "index.mdx", "[old](/old-intro)\n");
        write(dir.path(), "redirects.json", r#"{"/old-intro": "/intro"}"#);

        let config = Config {
            internal_only: true,
            redirects_file: Some(dir.path().join("redirects.json")),
            ..Config::default()
        };
        let outcome = run_check(dir.path(), &config, false).await.unwrap();
        assert_eq!(outcome.summary.redirected, 1);
        assert_eq!(outcome.failure_count(false), 0);
        assert_eq!(outcome.failure_count(true), 1);
    }

    #[tokio::test]
    async fn test_bad_redirects_file_is_not_fatal() {
        let dir = docs();
        let config = Config {
            internal_only: true,
            redirects_file: Some(dir.path().join("redirects.yaml")),
            ..Config::default()
        };
        assert!(run_check(dir.path(), &config, false).await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let dir = tempdir().unwrap();
        let outcome = run_check(dir.path(), &Config::default(), false).await.unwrap();
        assert!(outcome.files.is_empty());
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.summary.total_links, 0);
        assert_eq!(outcome.failure_count(true), 0);
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let result = run_check(&dir.path().join("missing"), &Config::default(), false).await;
        assert!(matches!(result, Err(Error::BaseDir { .. })));
    }
}
