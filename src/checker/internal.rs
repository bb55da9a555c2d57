// src/checker/internal.rs
// =============================================================================
// This module checks internal links (other documents, anchors, assets)
// against the filesystem.
//
// Resolution order for one href:
// 1. "#section" on its own is always valid (we don't look inside documents)
// 2. "/abs/path" resolves under the base directory, "./rel" next to the
//    source document
// 3. the path itself, then path + each FALLBACK_EXTENSIONS entry
// 4. for absolute hrefs only: the same under each configured route prefix
// 5. the redirects file, if one is configured
//
// A miss after all of that is "broken", with suggestions taken from the
// list of scanned documents.
//
// Everything here is read-only, so validators can be shared freely.
// =============================================================================

use super::suggest::{find_similar_paths, MAX_SUGGESTIONS};
use super::types::{ExtractedLink, LinkCheckResult, LinkStatus};
use crate::config::Config;
use crate::redirects::{lookup_redirect, RedirectMap};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

// Tried in order when the path doesn't exist as written
pub const FALLBACK_EXTENSIONS: &[&str] = &[
    ".mdx",
    ".md",
    "/index.mdx",
    "/index.md",
    ".tsx",
    ".ts",
    ".jsx",
    ".js",
];

pub struct InternalValidator {
    base_dir: PathBuf,
    route_prefixes: Vec<String>,
    redirects: Option<RedirectMap>,
    /// Scanned documents as "/relative/path" strings, for suggestions
    known_paths: Vec<String>,
}

impl InternalValidator {
    // Parameters:
    //   base_dir: absolute root of the documentation
    //   config: only route_prefixes is used here
    //   all_files: every scanned document (absolute paths)
    pub fn new(base_dir: &Path, config: &Config, all_files: &[PathBuf]) -> Self {
        let known_paths = all_files
            .iter()
            .map(|file| root_relative(file, base_dir))
            .collect();

        Self {
            base_dir: base_dir.to_path_buf(),
            route_prefixes: config.route_prefixes.clone(),
            redirects: None,
            known_paths,
        }
    }

    /// Consult a redirect map before declaring a link broken
    pub fn with_redirects(mut self, redirects: RedirectMap) -> Self {
        self.redirects = Some(redirects);
        self
    }

    // Checks one internal, anchor or asset link
    //
    // Returns Valid, Broken, or Redirected (only with a redirect map).
    pub fn validate(&self, link: &ExtractedLink) -> LinkCheckResult {
        let path = link.href.split('#').next().unwrap_or_default();

        // Same-document anchor
        if path.is_empty() {
            return LinkCheckResult::new(link.clone(), LinkStatus::Valid);
        }

        if let Some(found) = self.locate(path, &link.source_file) {
            debug!(href = %link.href, found = %found.display(), "internal link resolved");
            return LinkCheckResult::new(link.clone(), LinkStatus::Valid);
        }

        if let Some(dest) = self.redirects.as_ref().and_then(|r| lookup_redirect(path, r)) {
            debug!(href = %link.href, %dest, "internal link redirected");
            return LinkCheckResult::new(link.clone(), LinkStatus::Redirected).with_redirect(dest);
        }

        let suggestions = find_similar_paths(&link.href, &self.known_paths, MAX_SUGGESTIONS);
        LinkCheckResult::new(link.clone(), LinkStatus::Broken)
            .with_error("File not found")
            .with_suggestions(suggestions)
    }

    // Finds the file a path refers to, trying fallbacks and route prefixes
    fn locate(&self, path: &str, source_file: &Path) -> Option<PathBuf> {
        let resolved = match path.strip_prefix('/') {
            Some(absolute) => normalize(&self.base_dir.join(absolute)),
            None => {
                let source_dir = source_file.parent().unwrap_or(self.base_dir.as_path());
                normalize(&source_dir.join(path))
            }
        };

        if let Some(found) = probe_with_fallbacks(&resolved) {
            return Some(found);
        }

        let absolute = path.strip_prefix('/')?;
        self.route_prefixes.iter().find_map(|prefix| {
            let prefixed = self.base_dir.join(prefix.trim_matches('/')).join(absolute);
            probe_with_fallbacks(&normalize(&prefixed))
        })
    }
}

// The path itself, then each fallback appended to it
fn probe_with_fallbacks(path: &Path) -> Option<PathBuf> {
    if path.exists() {
        return Some(path.to_path_buf());
    }

    FALLBACK_EXTENSIONS.iter().find_map(|ext| {
        let mut candidate = OsString::from(path.as_os_str());
        candidate.push(ext);
        let candidate = PathBuf::from(candidate);
        candidate.exists().then_some(candidate)
    })
}

// Resolves "." and ".." lexically, without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

// "/docs/guide/setup.mdx" under "/docs" becomes "/guide/setup.mdx"
pub fn root_relative(file: &Path, base_dir: &Path) -> String {
    match file.strip_prefix(base_dir) {
        Ok(relative) => {
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            format!("/{}", parts.join("/"))
        }
        Err(_) => file.to_string_lossy().into_owned(),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why normalize paths ourselves?
//    - Path::join doesn't collapse "..", and canonicalize() fails for files
//      that don't exist, which is exactly the case we need to report
//
// 2. What is OsString?
//    - File names aren't guaranteed to be UTF-8, so paths are built from
//      OsString; push() appends raw text like ".mdx" to a file name
//
// 3. What does bool::then_some do?
//    - `cond.then_some(value)` is Some(value) if cond is true, else None
//    - Handy inside find_map
// -----------------------------------------------------------------------------
