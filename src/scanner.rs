// src/scanner.rs
// =============================================================================
// Finds the documents to check under a directory.
//
// A file is kept when its path relative to the directory (with '/'
// separators) matches at least one include glob and no exclude glob.
// A leading "./" on a pattern is dropped, so "./**/*.mdx" and "**/*.mdx"
// mean the same thing.
// =============================================================================

use crate::config::Config;
use crate::error::{Error, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

// Returns absolute, sorted, de-duplicated paths of matching documents
pub fn scan_files(base_dir: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let base_dir = base_dir.canonicalize().map_err(|source| Error::BaseDir {
        path: base_dir.to_path_buf(),
        source,
    })?;

    let include = build_globset(&config.include)?;
    let exclude = build_globset(&config.exclude)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(&base_dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry: {e}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(&base_dir) else {
            continue;
        };
        let relative = slash_path(relative);

        if include.is_match(&relative) && !exclude.is_match(&relative) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    files.dedup();

    debug!(count = files.len(), dir = %base_dir.display(), "discovered documents");
    Ok(files)
}

// `*` stops at '/', `**` crosses directories
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
        builder.add(GlobBuilder::new(pattern).literal_separator(true).build()?);
    }
    Ok(builder.build()?)
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
