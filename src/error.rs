// src/error.rs
// =============================================================================
// Error type for the library half of the crate.
//
// Only process-level problems live here (a file we can't read, a config that
// doesn't parse, an HTTP client that can't be built). A link that turns out
// to be broken is NOT an error: it is data, recorded in a LinkCheckResult.
//
// The binary wraps these with anyhow for context; library callers can match
// on the variants.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A document could not be read; aborts extraction for that file only
    #[error("failed to read {}: {source}", path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An explicitly requested config file does not exist
    #[error("config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// A config file exists but isn't valid JSON for our schema
    #[error("invalid config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The redirects file could not be read or understood
    #[error("invalid redirects file {}: {message}", path.display())]
    Redirects { path: PathBuf, message: String },

    /// An include/exclude glob failed to compile
    #[error("invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),

    /// An ignore pattern failed to compile into a matcher
    #[error("invalid ignore pattern: {0}")]
    IgnorePattern(#[from] regex::Error),

    /// The directory to check doesn't exist or can't be accessed
    #[error("cannot access directory {}: {source}", path.display())]
    BaseDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
