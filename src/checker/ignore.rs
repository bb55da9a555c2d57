// src/checker/ignore.rs
// =============================================================================
// Ignore rules for external links.
//
// - patterns: glob-like, matched against the whole href
//     *  any run of characters (including '/')
//     ?  exactly one character
//   everything else is literal
// - domains: exact hostname match; if the href doesn't parse as a URL we
//   fall back to "href contains the domain"
// =============================================================================

use regex::Regex;
use url::Url;

#[derive(Debug, Clone)]
pub struct IgnoreRules {
    patterns: Vec<Regex>,
    domains: Vec<String>,
}

impl IgnoreRules {
    pub fn new(patterns: &[String], domains: &[String]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(&glob_to_regex(p)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
            domains: domains.to_vec(),
        })
    }

    pub fn matches(&self, href: &str) -> bool {
        if self.patterns.iter().any(|re| re.is_match(href)) {
            return true;
        }

        match Url::parse(href) {
            Ok(url) => url
                .host_str()
                .is_some_and(|host| self.domains.iter().any(|d| d == host)),
            Err(_) => self.domains.iter().any(|d| href.contains(d.as_str())),
        }
    }
}

// "*.example.com/?" becomes "^.*\.example\.com/.$"
fn glob_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push('^');

    let mut literal = String::new();
    for c in pattern.chars() {
        match c {
            '*' | '?' => {
                regex.push_str(&regex::escape(&literal));
                literal.clear();
                regex.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    regex.push_str(&regex::escape(&literal));

    regex.push('$');
    regex
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(patterns: &[&str], domains: &[&str]) -> IgnoreRules {
        let patterns: Vec<String> = patterns.iter().map(|s| s.to_string()).collect();
        let domains: Vec<String> = domains.iter().map(|s| s.to_string()).collect();
        IgnoreRules::new(&patterns, &domains).unwrap()
    }

    #[test]
    fn test_star_and_question_mark() {
        let r = rules(&["https://example.com/*", "http://host?.test"], &[]);
        assert!(r.matches("https://example.com/a/b?c=d"));
        assert!(r.matches("http://host1.test"));
        assert!(!r.matches("http://host12.test"));
        assert!(!r.matches("https://other.com/"));
    }

    #[test]
    fn test_patterns_are_anchored() {
        let r = rules(&["localhost:*"], &[]);
        assert!(r.matches("localhost:3000"));
        assert!(!r.matches("http://localhost:3000"));
    }

    #[test]
    fn test_regex_characters_are_literal() {
        let r = rules(&["*.local"], &[]);
        assert!(r.matches("http://printer.local"));
        assert!(!r.matches("http://printerxlocal"));
    }

    #[test]
    fn test_domain_exact_hostname() {
        let r = rules(&[], &["twitter.com"]);
        assert!(r.matches("https://twitter.com/rustlang"));
        assert!(!r.matches("https://mobile.twitter.com/rustlang"));
    }

    #[test]
    fn test_domain_substring_fallback() {
        let r = rules(&[], &["example.org"]);
        assert!(r.matches("not a url but mentions example.org"));
    }

    #[test]
    fn test_glob_to_regex() {
        assert_eq!(glob_to_regex("a*b?"), "^a.*b.$");
        assert_eq!(glob_to_regex("x.y"), r"^x\.y$");
    }
}
