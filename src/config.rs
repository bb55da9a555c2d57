// src/config.rs
// =============================================================================
// Run configuration: defaults, the optional JSON config file and merging.
//
// Layering (lowest to highest priority):
// 1. Config::default()
// 2. a JSON config file (explicit --config, or the first well-known name
//    found in the working directory)
// 3. command-line overrides
//
// Layers 2 and 3 are both PartialConfig values merged with Config::merge.
// The ignore lists are appended, everything else replaces what was there.
//
// Once the run starts the Config is treated as read-only.
// =============================================================================

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

// Config file names looked up in the working directory, in order
pub const CONFIG_FILES: &[&str] = &[
    "mdx-linklist.config.json",
    "linklist.config.json",
    ".mdx-linklistrc.json",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Globs (relative to the scanned directory) of documents to check
    pub include: Vec<String>,
    /// Globs of documents to leave out
    pub exclude: Vec<String>,
    /// Glob-like patterns matched against the whole href
    pub ignore_patterns: Vec<String>,
    /// Hostnames never probed
    pub ignore_domains: Vec<String>,
    /// Milliseconds per network attempt
    pub timeout: u64,
    /// Extra attempts after the first transport failure
    pub retries: u32,
    /// Max simultaneous external probes
    pub concurrency: usize,
    pub internal_only: bool,
    pub external_only: bool,
    /// JSX components whose `href` attribute is a link
    pub custom_components: Vec<String>,
    /// Directories tried for absolute internal links that don't resolve
    pub route_prefixes: Vec<String>,
    pub redirects_file: Option<PathBuf>,
    pub fail_on_redirects: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include: vec!["./**/*.mdx".to_string(), "./**/*.md".to_string()],
            exclude: vec![
                "**/node_modules/**".to_string(),
                "**/dist/**".to_string(),
                "**/.git/**".to_string(),
            ],
            ignore_patterns: vec![
                "*://localhost*".to_string(),
                "*://127.0.0.1*".to_string(),
                // mDNS / LAN hosts, bare or followed by a port or path
                "*.local".to_string(),
                "*.local:*".to_string(),
                "*.local/*".to_string(),
            ],
            ignore_domains: Vec::new(),
            timeout: 10_000,
            retries: 2,
            concurrency: 10,
            internal_only: false,
            external_only: false,
            custom_components: vec!["Link".to_string(), "A".to_string()],
            route_prefixes: Vec::new(),
            redirects_file: None,
            fail_on_redirects: false,
        }
    }
}

// A config layer where every field is optional
//
// Fields left as None keep whatever the lower layer had.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConfig {
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub ignore_patterns: Option<Vec<String>>,
    pub ignore_domains: Option<Vec<String>>,
    pub timeout: Option<u64>,
    pub retries: Option<u32>,
    pub concurrency: Option<usize>,
    pub internal_only: Option<bool>,
    pub external_only: Option<bool>,
    pub custom_components: Option<Vec<String>>,
    pub route_prefixes: Option<Vec<String>>,
    pub redirects_file: Option<PathBuf>,
    pub fail_on_redirects: Option<bool>,
}

impl Config {
    // Loads the config file layer on top of the defaults
    //
    // explicit: path given with --config; it must exist and parse
    // cwd: directory searched for CONFIG_FILES when no explicit path is given
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            let path = cwd.join(path);
            if !path.is_file() {
                return Err(Error::ConfigNotFound(path));
            }
            let partial = read_partial(&path)?;
            debug!(path = %path.display(), "loaded config file");
            return Ok(Config::default().merge(partial));
        }

        for name in CONFIG_FILES {
            let path = cwd.join(name);
            if !path.is_file() {
                continue;
            }
            match read_partial(&path) {
                Ok(partial) => {
                    debug!(path = %path.display(), "loaded config file");
                    return Ok(Config::default().merge(partial));
                }
                Err(e) => warn!("could not parse config file, skipping it: {e}"),
            }
        }

        Ok(Config::default())
    }

    /// Applies a higher-priority layer on top of this one
    pub fn merge(mut self, layer: PartialConfig) -> Self {
        if let Some(include) = layer.include {
            self.include = include;
        }
        if let Some(exclude) = layer.exclude {
            self.exclude = exclude;
        }
        if let Some(patterns) = layer.ignore_patterns {
            self.ignore_patterns.extend(patterns);
        }
        if let Some(domains) = layer.ignore_domains {
            self.ignore_domains.extend(domains);
        }
        if let Some(timeout) = layer.timeout {
            self.timeout = timeout;
        }
        if let Some(retries) = layer.retries {
            self.retries = retries;
        }
        if let Some(concurrency) = layer.concurrency {
            self.concurrency = concurrency;
        }
        if let Some(internal_only) = layer.internal_only {
            self.internal_only = internal_only;
        }
        if let Some(external_only) = layer.external_only {
            self.external_only = external_only;
        }
        if let Some(components) = layer.custom_components {
            self.custom_components = components;
        }
        if let Some(prefixes) = layer.route_prefixes {
            self.route_prefixes = prefixes;
        }
        if layer.redirects_file.is_some() {
            self.redirects_file = layer.redirects_file;
        }
        if let Some(fail) = layer.fail_on_redirects {
            self.fail_on_redirects = fail;
        }
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }
}

fn read_partial(path: &Path) -> Result<PartialConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ReadSource {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timeout, 10_000);
        assert_eq!(config.retries, 2);
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.custom_components, vec!["Link", "A"]);
        assert!(config.route_prefixes.is_empty());
        assert!(config.ignore_patterns.iter().any(|p| p == "*.local"));
        assert!(config.ignore_patterns.iter().any(|p| p == "*.local/*"));
    }

    #[test]
    fn test_merge_appends_ignore_lists() {
        let layer = PartialConfig {
            ignore_patterns: Some(vec!["https://internal.*".to_string()]),
            ignore_domains: Some(vec!["example.org".to_string()]),
            ..Default::default()
        };
        let config = Config::default().merge(layer);
        let defaults = Config::default().ignore_patterns;
        assert_eq!(config.ignore_patterns.len(), defaults.len() + 1);
        assert_eq!(config.ignore_patterns.last().unwrap(), "https://internal.*");
        assert_eq!(config.ignore_domains, vec!["example.org"]);
    }

    #[test]
    fn test_merge_replaces_other_fields() {
        let layer = PartialConfig {
            custom_components: Some(vec!["CustomLink".to_string()]),
            timeout: Some(500),
            route_prefixes: Some(vec!["docs".to_string()]),
            ..Default::default()
        };
        let config = Config::default().merge(layer);
        assert_eq!(config.custom_components, vec!["CustomLink"]);
        assert_eq!(config.timeout, 500);
        assert_eq!(config.route_prefixes, vec!["docs"]);
        // Untouched fields keep their defaults
        assert_eq!(config.retries, 2);
    }

    #[test]
    fn test_load_discovers_config_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("linklist.config.json"),
            r#"{ "concurrency": 3, "ignoreDomains": ["twitter.com"] }"#,
        )
        .unwrap();

        let config = Config::load(None, dir.path()).unwrap();
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.ignore_domains, vec!["twitter.com"]);
    }

    #[test]
    fn test_load_skips_unparsable_discovered_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("mdx-linklist.config.json"), "{ not json").unwrap();
        fs::write(dir.path().join(".mdx-linklistrc.json"), r#"{ "retries": 0 }"#).unwrap();

        let config = Config::load(None, dir.path()).unwrap();
        assert_eq!(config.retries, 0);
    }

    #[test]
    fn test_load_without_files_is_default() {
        let dir = tempdir().unwrap();
        assert_eq!(Config::load(None, dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempdir().unwrap();
        let result = Config::load(Some(Path::new("nope.json")), dir.path());
        assert!(matches!(result, Err(Error::ConfigNotFound(_))));
    }

    #[test]
    fn test_explicit_config_must_parse() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("custom.json"), "[1, 2]").unwrap();
        let result = Config::load(Some(Path::new("custom.json")), dir.path());
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }
}
