// src/checker/markdown.rs
// =============================================================================
// This module extracts links from Markdown / MDX text.
//
// MDX mixes Markdown with JSX, so a real Markdown parser would miss links in
// tags like <Link href="...">. Instead we scan line by line with a tiny state
// machine:
//
//   state: in_fence (are we inside a ``` or ~~~ block?)
//
// and run four independent matchers over every line that isn't suppressed:
//
//   1. [text](target)          Markdown links
//   2. ![alt](target)          Markdown images
//   3. <Component href="...">  each configured JSX component
//   4. <a href="...">          plain HTML anchors (case-insensitive)
//
// Image syntax also matches the link matcher, so ![x](y) produces two
// occurrences. Both are kept; for external images the second check is a
// cache hit.
//
// Rust concepts:
// - Byte offsets vs. characters: we search for ASCII delimiters by byte
//   offset (always a valid char boundary) and only count characters when
//   reporting a column
// - Slices: matches borrow from the line, nothing is copied until the end
// =============================================================================

use super::types::{ExtractedLink, LinkType};
use crate::config::Config;
use crate::error::{Error, Result};
use std::borrow::Cow;
use std::path::Path;

// Schemes that can't be checked by this tool
pub const SPECIAL_PROTOCOLS: &[&str] = &["mailto:", "tel:", "javascript:", "data:", "ftp:", "file:"];

// Extensions that make a link an "asset" rather than a document
pub const ASSET_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".ico", ".mp4", ".webm", ".mp3", ".wav",
    ".pdf",
];

// A match before classification
struct RawMatch<'a> {
    href: &'a str,
    /// Byte range of the whole match within the line
    start: usize,
    end: usize,
}

// The only state carried from one line to the next
#[derive(Debug, Default)]
struct ScanState {
    in_fence: bool,
}

// What the state machine decided to do with a line
#[derive(Debug, PartialEq, Eq)]
enum LineAction {
    Scan,
    Skip,
}

impl ScanState {
    fn step(&mut self, line: &str) -> LineAction {
        let trimmed = line.trim();

        // Fence lines toggle the state and are never scanned themselves
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            self.in_fence = !self.in_fence;
            return LineAction::Skip;
        }

        if self.in_fence || trimmed.starts_with("<!--") {
            return LineAction::Skip;
        }

        LineAction::Scan
    }
}

// Reads a document and extracts its links
//
// An unreadable file is an error for this file only; the caller decides
// whether to carry on with the rest.
pub fn extract_links_from_file(path: &Path, config: &Config) -> Result<Vec<ExtractedLink>> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ReadSource {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(extract_links(&content, path, &config.custom_components))
}

// Extracts every checkable link from a document's text
//
// Parameters:
//   content: the full document
//   source_file: recorded on each link (not read)
//   custom_components: JSX tag names whose href attribute is a link
pub fn extract_links(
    content: &str,
    source_file: &Path,
    custom_components: &[String],
) -> Vec<ExtractedLink> {
    let mut state = ScanState::default();
    let mut links = Vec::new();

    for (index, line) in content.split('\n').enumerate() {
        if state.step(line) == LineAction::Skip {
            continue;
        }

        let mut matches = Vec::new();
        scan_bracket_links(line, "[", &mut matches);
        scan_bracket_links(line, "![", &mut matches);
        for component in custom_components {
            scan_tag_links(line, component, false, &mut matches);
        }
        scan_tag_links(line, "a", true, &mut matches);

        for raw in matches {
            let href = raw.href;
            if href.trim().is_empty() || is_special_protocol(href) {
                continue;
            }

            links.push(ExtractedLink {
                link_type: classify_link(href),
                href: href.to_string(),
                source_file: source_file.to_path_buf(),
                line: index + 1,
                column: line[..raw.start].chars().count() + 1,
                context: line[raw.start..raw.end].to_string(),
            });
        }
    }

    links
}

// Decides what kind of link an href is
//
// A pure function of the href: the same string always gets the same type.
pub fn classify_link(href: &str) -> LinkType {
    if is_external_url(href) {
        return LinkType::External;
    }

    if href.starts_with('#') {
        return LinkType::Anchor;
    }

    // Ignore "#frag" and "?query" when looking at the extension
    let path = href.split('#').next().unwrap_or(href);
    let path = path.split('?').next().unwrap_or(path).to_lowercase();
    if ASSET_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return LinkType::Asset;
    }

    LinkType::Internal
}

pub fn is_external_url(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}

pub fn is_special_protocol(href: &str) -> bool {
    SPECIAL_PROTOCOLS.iter().any(|protocol| href.starts_with(protocol))
}

// Finds `needle` in `hay` at or after byte offset `from`
fn find_from(hay: &str, from: usize, needle: &str) -> Option<usize> {
    hay.get(from..)?.find(needle).map(|i| i + from)
}

// Scans for [text](target) (opener "[") or ![alt](target) (opener "![")
//
// text: any run of characters except ']'
// target: a non-empty run of characters except ')'
//
// When an opener doesn't lead to a full match we retry one byte later,
// otherwise we continue after the end of the match.
fn scan_bracket_links<'a>(line: &'a str, opener: &str, out: &mut Vec<RawMatch<'a>>) {
    let mut search = 0;

    while let Some(start) = find_from(line, search, opener) {
        match match_bracket_tail(line, start + opener.len()) {
            Some((target, end)) => {
                out.push(RawMatch {
                    href: target.trim(),
                    start,
                    end,
                });
                search = end;
            }
            // Openers start with an ASCII byte, so start + 1 is a char boundary
            None => search = start + 1,
        }
    }
}

// Matches `text](target)` starting right after the opening bracket
fn match_bracket_tail(line: &str, text_start: usize) -> Option<(&str, usize)> {
    let close = find_from(line, text_start, "]")?;
    if line.as_bytes().get(close + 1) != Some(&b'(') {
        return None;
    }

    let target_start = close + 2;
    let target_end = find_from(line, target_start, ")")?;
    if target_end == target_start {
        return None;
    }

    Some((&line[target_start..target_end], target_end + 1))
}

// Scans for <name ... href="target" ...> tags
//
// The tag name must be followed by at least one whitespace character. The
// href value may be single or double quoted and everything up to the next
// '>' belongs to the tag, so self-closing tags work too.
fn scan_tag_links<'a>(
    line: &'a str,
    name: &str,
    case_insensitive: bool,
    out: &mut Vec<RawMatch<'a>>,
) {
    // ASCII lowercasing keeps byte offsets identical to the original line
    let (hay, opener) = if case_insensitive {
        (
            Cow::Owned(line.to_ascii_lowercase()),
            format!("<{}", name.to_ascii_lowercase()),
        )
    } else {
        (Cow::Borrowed(line), format!("<{name}"))
    };

    let mut search = 0;
    while let Some(start) = find_from(&hay, search, &opener) {
        match match_tag_tail(line, &hay, start + opener.len()) {
            Some((href, end)) => {
                out.push(RawMatch { href, start, end });
                search = end;
            }
            None => search = start + 1,
        }
    }
}

// Matches the rest of a tag once `<name` has been seen
//
// line: original text (values are sliced from here)
// hay: text used for keyword search (lowercased for case-insensitive tags)
fn match_tag_tail<'a>(line: &'a str, hay: &str, after_name: usize) -> Option<(&'a str, usize)> {
    let whitespace: usize = line[after_name..]
        .chars()
        .take_while(|c| c.is_whitespace())
        .map(char::len_utf8)
        .sum();
    if whitespace == 0 {
        return None;
    }

    // `href=` has to start before the first '>' of the tag
    let attrs_start = after_name + whitespace;
    let attrs_end = find_from(line, attrs_start, ">")?;

    // With several href= candidates the last one that forms a complete
    // attribute wins
    let candidates: Vec<usize> = hay[attrs_start..attrs_end]
        .match_indices("href=")
        .map(|(i, _)| attrs_start + i)
        .collect();

    candidates
        .into_iter()
        .rev()
        .find_map(|pos| match_quoted_value(line, pos + "href=".len()))
}

// Matches `"value"` (or 'value') followed by the tag's closing '>'
fn match_quoted_value(line: &str, quote: usize) -> Option<(&str, usize)> {
    if !matches!(line.as_bytes().get(quote), Some(b'"' | b'\'')) {
        return None;
    }

    let value_start = quote + 1;
    let value_end = value_start + line[value_start..].find(&['"', '\''][..])?;
    if value_end == value_start {
        return None;
    }

    let tag_end = find_from(line, value_end + 1, ">")?;
    Some((&line[value_start..value_end], tag_end + 1))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not a regex?
//    - Four small matchers are easy to read and test one by one
//    - The fence/comment rules live in one place (ScanState::step) instead
//      of being scattered between patterns
//
// 2. What is Cow?
//    - "Clone on write": either a borrowed &str or an owned String
//    - For case-sensitive tags we just borrow the line; only the
//      case-insensitive scan pays for a lowercase copy
//
// 3. Why track byte offsets?
//    - str::find returns byte offsets, and slicing needs byte offsets
//    - Columns are for humans, so we convert to a character count at the end
//
// 4. What is find_map?
//    - Like map + find: returns the first Some(...) the closure produces
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn components() -> Vec<String> {
        vec!["Link".to_string(), "A".to_string()]
    }

    fn hrefs(content: &str) -> Vec<String> {
        extract_links(content, Path::new("/docs/index.mdx"), &components())
            .into_iter()
            .map(|l| l.href)
            .collect()
    }

    #[test]
    fn test_extract_simple_link() {
        let links = extract_links(
            "Check out [Rust](https://www.rust-lang.org)!",
            Path::new("/docs/index.mdx"),
            &components(),
        );
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].href, "https://www.rust-lang.org");
        assert_eq!(links[0].link_type, LinkType::External);
        assert_eq!(links[0].line, 1);
        assert_eq!(links[0].column, 11);
        assert_eq!(links[0].context, "[Rust](https://www.rust-lang.org)");
        assert_eq!(links[0].source_file, PathBuf::from("/docs/index.mdx"));
    }

    #[test]
    fn test_extract_multiple_links_on_separate_lines() {
        let markdown = "# Resources\n\n- [Intro](./intro.mdx)\n- [Advanced](./advanced.mdx#configuration)\n- [React](https://react.dev)\n";
        let links = extract_links(markdown, Path::new("/docs/index.mdx"), &components());
        let lines: Vec<usize> = links.iter().map(|l| l.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert_eq!(links[1].href, "./advanced.mdx#configuration");
    }

    #[test]
    fn test_target_is_trimmed() {
        assert_eq!(hrefs("[a]( ./page.mdx )"), vec!["./page.mdx"]);
    }

    #[test]
    fn test_image_is_emitted_twice() {
        let links = extract_links("![logo](./logo.png)", Path::new("/d/x.md"), &[]);
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.href == "./logo.png"));
        assert!(links.iter().all(|l| l.link_type == LinkType::Asset));
        // The plain link match starts one column after the image match
        assert_eq!(links[0].column, 2);
        assert_eq!(links[0].context, "[logo](./logo.png)");
        assert_eq!(links[1].column, 1);
        assert_eq!(links[1].context, "![logo](./logo.png)");
    }

    #[test]
    fn test_bracket_edge_cases() {
        // Empty target never matches
        assert!(hrefs("[a]()").is_empty());
        // Text and target must be adjacent
        assert!(hrefs("[a] (./x)").is_empty());
        // A failed opener doesn't hide a later link
        assert_eq!(hrefs("[broken [ok](./ok)"), vec!["./ok"]);
        // Two links on one line
        assert_eq!(hrefs("[a](./a) and [b](./b)"), vec!["./a", "./b"]);
    }

    #[test]
    fn test_extract_jsx_components() {
        let content = r#"<Link href="./other.mdx">Other</Link>
<A href='https://example.com' target="_blank" />
<CustomLink href="/api/reference">API</CustomLink>"#;
        let found = hrefs(content);
        assert!(found.contains(&"./other.mdx".to_string()));
        assert!(found.contains(&"https://example.com".to_string()));
        assert!(!found.contains(&"/api/reference".to_string()));

        let custom = vec!["CustomLink".to_string()];
        let links = extract_links(content, Path::new("/d/x.mdx"), &custom);
        assert!(links.iter().any(|l| l.href == "/api/reference" && l.line == 3));
    }

    #[test]
    fn test_component_name_needs_whitespace() {
        // <LinkCard> is not <Link>
        assert!(hrefs(r#"<LinkCard href="./card.mdx">"#).is_empty());
    }

    #[test]
    fn test_extract_anchor_tags_case_insensitive() {
        let links = extract_links(
            r#"See <a class="x" HREF="./guide.mdx">guide</a> and <A href="/x">"#,
            Path::new("/d/x.mdx"),
            &[],
        );
        let found: Vec<&str> = links.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(found, vec!["./guide.mdx", "/x"]);
        assert_eq!(links[0].context, r#"<a class="x" HREF="./guide.mdx">"#);
        assert_eq!(links[0].column, 5);
    }

    #[test]
    fn test_last_href_attribute_wins() {
        let found = extract_links(r#"<a data-href="./first" href="./second">"#, Path::new("/d/x"), &[]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].href, "./second");
    }

    #[test]
    fn test_skip_special_protocols() {
        let content = r#"[mail](mailto:test@example.com)
[call](tel:+1234567890)
<a href="javascript:void(0)">x</a>
![inline](data:image/png;base64,AAAA)
[files](ftp://files.example.com) [local](file:///etc/hosts)"#;
        assert!(hrefs(content).is_empty());
    }

    #[test]
    fn test_skip_fenced_code_blocks() {
        let content = "[before](./before)\n```md\n[inside](./inside)\n```\n~~~\n<a href=\"./tilde\">\n~~~\n[after](./after)";
        assert_eq!(hrefs(content), vec!["./before", "./after"]);
    }

    #[test]
    fn test_skip_html_comment_lines() {
        let content = "<!-- [hidden](./hidden) -->\n  <!-- [indented](./x) -->\n[shown](./shown)";
        assert_eq!(hrefs(content), vec!["./shown"]);
    }

    #[test]
    fn test_columns_count_characters() {
        let links = extract_links("héllo [x](./x)", Path::new("/d/x.md"), &[]);
        assert_eq!(links[0].column, 7);
    }

    #[test]
    fn test_context_appears_on_reported_line() {
        let content = "intro\n\n[a](./a) <Link href=\"/b\" />\n```\n[c](./c)\n```\n![d](./d.svg)\n";
        let links = extract_links(content, Path::new("/d/x.mdx"), &components());
        let lines: Vec<&str> = content.split('\n').collect();
        assert!(!links.is_empty());
        for link in &links {
            assert!(link.line >= 1);
            assert!(lines[link.line - 1].contains(&link.context));
        }
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let content = "[a](./a)\n<a href=\"https://x.com\">\n![i](./i.png)";
        let first = extract_links(content, Path::new("/d/x.md"), &components());
        let second = extract_links(content, Path::new("/d/x.md"), &components());
        assert_eq!(first, second);
    }

    #[test]
    fn test_classify_link() {
        assert_eq!(classify_link("https://x.com"), LinkType::External);
        assert_eq!(classify_link("http://x.com/a.png"), LinkType::External);
        assert_eq!(classify_link("#sec"), LinkType::Anchor);
        assert_eq!(classify_link("./img.png"), LinkType::Asset);
        assert_eq!(classify_link("/static/Manual.PDF?v=2#page=3"), LinkType::Asset);
        assert_eq!(classify_link("./page"), LinkType::Internal);
        assert_eq!(classify_link("./page.mdx#png"), LinkType::Internal);
    }

    #[test]
    fn test_extract_links_from_missing_file() {
        let result = extract_links_from_file(Path::new("/definitely/not/here.mdx"), &Config::default());
        assert!(matches!(result, Err(Error::ReadSource { .. })));
    }
}
