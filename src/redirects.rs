// src/redirects.rs
// =============================================================================
// Reads a site's redirect map so moved pages show up as "redirected" instead
// of "broken".
//
// Two formats are understood:
// - JSON: a flat object { "/old/path": "/new/path", ... }
// - .ts / .js: object literals assigned to const/let/var, e.g.
//
//     const RENAMED_PAGES: Record<string, string> = {
//       '/old/path/': '/new/path/',
//     };
//
//   We don't evaluate JavaScript; quoted 'key': 'value' pairs inside such
//   object literals are picked up with a regex.
//
// Keys are stored without a trailing slash so "/a/" and "/a" find each other.
// =============================================================================

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

pub type RedirectMap = HashMap<String, String>;

// `const NAME: Type = { ... }` with at most one level of nested braces
static OBJECT_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:const|let|var)\s+\w+\s*(?::[^=]+)?\s*=\s*\{([^}]+(?:\{[^}]*\}[^}]*)*)\}"#)
        .expect("object literal pattern is valid")
});

// 'source': 'destination' with either quote style
static ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"['"]([^'"]+)['"]\s*:\s*['"]([^'"]+)['"]"#).expect("entry pattern is valid")
});

// Loads a redirects file, picking the parser from the extension
pub fn load_redirects(path: &Path) -> Result<RedirectMap> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ReadSource {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => parse_json_redirects(&content).map_err(|message| Error::Redirects {
            path: path.to_path_buf(),
            message,
        }),
        "ts" | "js" => Ok(parse_script_redirects(&content)),
        other => Err(Error::Redirects {
            path: path.to_path_buf(),
            message: format!("unsupported format '.{other}' (expected .json, .ts or .js)"),
        }),
    }
}

// Parses a JSON object of string -> string
//
// Non-string values are ignored; anything other than an object is an error.
pub fn parse_json_redirects(content: &str) -> std::result::Result<RedirectMap, String> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let object = value
        .as_object()
        .ok_or_else(|| "JSON redirects file must contain an object".to_string())?;

    Ok(object
        .iter()
        .filter_map(|(source, dest)| Some((normalize_key(source), dest.as_str()?.to_string())))
        .collect())
}

// Collects quoted pairs from every object literal in a .ts/.js file
pub fn parse_script_redirects(content: &str) -> RedirectMap {
    let mut redirects = RedirectMap::new();

    for object in OBJECT_LITERAL.captures_iter(content) {
        for entry in ENTRY.captures_iter(&object[1]) {
            redirects.insert(normalize_key(&entry[1]), entry[2].to_string());
        }
    }

    redirects
}

// Finds where an href was moved to, if anywhere
//
// Tries the exact path first, then without and with a trailing slash.
pub fn lookup_redirect<'a>(href: &str, redirects: &'a RedirectMap) -> Option<&'a str> {
    let path = href.split('#').next().unwrap_or(href);

    if let Some(dest) = redirects.get(path) {
        return Some(dest.as_str());
    }

    if path.len() > 1 {
        if let Some(without_slash) = path.strip_suffix('/') {
            if let Some(dest) = redirects.get(without_slash) {
                return Some(dest.as_str());
            }
        }
    }

    if !path.ends_with('/') {
        if let Some(dest) = redirects.get(&format!("{path}/")) {
            return Some(dest.as_str());
        }
    }

    None
}

fn normalize_key(path: &str) -> String {
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed.to_string(),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_json_redirects() {
        let map = parse_json_redirects(r#"{ "/old/": "/new/", "/a": "/b", "/skip": 3 }"#).unwrap();
        assert_eq!(map.get("/old").map(String::as_str), Some("/new/"));
        assert_eq!(map.get("/a").map(String::as_str), Some("/b"));
        assert!(!map.contains_key("/skip"));
    }

    #[test]
    fn test_json_must_be_object() {
        assert!(parse_json_redirects("[1, 2]").is_err());
        assert!(parse_json_redirects("nope").is_err());
    }

    #[test]
    fn test_parse_script_redirects() {
        let script = r#"
import type { Redirects } from './types';

export const RENAMED_PAGES: Record<string, string> = {
  '/getting-started/': '/start/',
  "/api/v1": "/api/v2",
};

const unrelated = 42;
"#;
        let map = parse_script_redirects(script);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("/getting-started").map(String::as_str), Some("/start/"));
        assert_eq!(map.get("/api/v1").map(String::as_str), Some("/api/v2"));
    }

    #[test]
    fn test_lookup_redirect_slash_variants() {
        let map = parse_json_redirects(r#"{ "/docs/old/": "/docs/new" }"#).unwrap();
        assert_eq!(lookup_redirect("/docs/old", &map), Some("/docs/new"));
        assert_eq!(lookup_redirect("/docs/old/", &map), Some("/docs/new"));
        assert_eq!(lookup_redirect("/docs/old#intro", &map), Some("/docs/new"));
        assert_eq!(lookup_redirect("/docs/other", &map), None);
    }

    #[test]
    fn test_lookup_root_key() {
        let map = parse_json_redirects(r#"{ "/": "/home" }"#).unwrap();
        assert_eq!(lookup_redirect("/", &map), Some("/home"));
    }

    #[test]
    fn test_load_redirects_by_extension() {
        let dir = tempdir().unwrap();
        let json = dir.path().join("redirects.json");
        fs::write(&json, r#"{ "/a": "/b" }"#).unwrap();
        assert_eq!(load_redirects(&json).unwrap().len(), 1);

        let yaml = dir.path().join("redirects.yaml");
        fs::write(&yaml, "/a: /b").unwrap();
        assert!(matches!(load_redirects(&yaml), Err(Error::Redirects { .. })));

        assert!(matches!(
            load_redirects(&dir.path().join("missing.json")),
            Err(Error::ReadSource { .. })
        ));
    }
}
