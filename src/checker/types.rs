// src/checker/types.rs
// =============================================================================
// The data shapes shared by the extractor, both validators and the reporters.
//
// - ExtractedLink: one link occurrence found in a document
// - LinkCheckResult: the outcome of validating one ExtractedLink
// - CheckSummary: counters derived from a whole run
//
// All of them serialize with camelCase keys so the JSON report matches what
// documentation tooling around MDX usually expects.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// What kind of target a link points at
//
// Assigned once by the classifier at extraction time and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// Another document in the scanned set
    Internal,
    /// An http(s) URL
    External,
    /// A same-document fragment like `#setup`
    Anchor,
    /// An image, video, audio or PDF file
    Asset,
}

impl LinkType {
    /// Internal, anchor and asset links are all resolved on the filesystem
    pub fn is_local(self) -> bool {
        !matches!(self, LinkType::External)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LinkType::Internal => "internal",
            LinkType::External => "external",
            LinkType::Anchor => "anchor",
            LinkType::Asset => "asset",
        }
    }
}

// Represents the status of a link after checking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    /// Target exists / responded successfully
    Valid,
    /// Target missing or the server answered with a failing status
    Broken,
    /// Matched an ignore rule, never checked
    Skipped,
    /// Every attempt ran past the deadline, the last one included
    Timeout,
    /// Target moved according to the redirects file
    Redirected,
}

// One link occurrence in one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedLink {
    #[serde(rename = "type")]
    pub link_type: LinkType,
    /// The target exactly as written
    pub href: String,
    /// Absolute path of the document the link was found in
    pub source_file: PathBuf,
    /// 1-based line
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
    /// The matched text, for diagnostics
    pub context: String,
}

// Represents the result of checking a single link
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCheckResult {
    pub link: ExtractedLink,
    pub status: LinkStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    /// Milliseconds from the first attempt until the answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_destination: Option<String>,
}

impl LinkCheckResult {
    pub fn new(link: ExtractedLink, status: LinkStatus) -> Self {
        Self {
            link,
            status,
            status_code: None,
            error: None,
            suggestions: None,
            response_time: None,
            redirect_destination: None,
        }
    }

    pub fn with_status_code(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        // An empty list is reported as "no suggestions" rather than []
        if !suggestions.is_empty() {
            self.suggestions = Some(suggestions);
        }
        self
    }

    pub fn with_response_time(mut self, elapsed: Duration) -> Self {
        self.response_time = Some(elapsed.as_millis() as u64);
        self
    }

    pub fn with_redirect(mut self, destination: impl Into<String>) -> Self {
        self.redirect_destination = Some(destination.into());
        self
    }

    /// Same outcome, but attached to a different occurrence of the same href
    pub fn reattach(self, link: ExtractedLink) -> Self {
        Self { link, ..self }
    }

    /// Does this result make the run fail?
    pub fn is_failure(&self, fail_on_redirects: bool) -> bool {
        match self.status {
            LinkStatus::Broken | LinkStatus::Timeout => true,
            LinkStatus::Redirected => fail_on_redirects,
            LinkStatus::Valid | LinkStatus::Skipped => false,
        }
    }
}

// Counters for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSummary {
    pub files_scanned: usize,
    pub total_links: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub broken_internal: usize,
    pub broken_external: usize,
    pub redirected: usize,
    pub skipped: usize,
    pub timeouts: usize,
    /// Wall-clock milliseconds
    pub duration: u64,
}

impl CheckSummary {
    // Builds the counters from everything that was extracted and checked
    //
    // Link counts come from `links` (everything found, even if filtered out
    // by --internal-only / --external-only); status counts from `results`.
    pub fn from_results(
        files_scanned: usize,
        links: &[ExtractedLink],
        results: &[LinkCheckResult],
        duration: Duration,
    ) -> Self {
        let internal_links = links.iter().filter(|l| l.link_type.is_local()).count();

        Self {
            files_scanned,
            total_links: links.len(),
            internal_links,
            external_links: links.len() - internal_links,
            broken_internal: count_where(results, |r| {
                r.status == LinkStatus::Broken && r.link.link_type.is_local()
            }),
            broken_external: count_where(results, |r| {
                r.status == LinkStatus::Broken && r.link.link_type == LinkType::External
            }),
            redirected: count_where(results, |r| r.status == LinkStatus::Redirected),
            skipped: count_where(results, |r| r.status == LinkStatus::Skipped),
            timeouts: count_where(results, |r| r.status == LinkStatus::Timeout),
            duration: duration.as_millis() as u64,
        }
    }

    /// Number of results that should make the process exit non-zero
    pub fn failure_count(&self, fail_on_redirects: bool) -> usize {
        let redirected = if fail_on_redirects { self.redirected } else { 0 };
        self.broken_internal + self.broken_external + self.timeouts + redirected
    }
}

fn count_where(results: &[LinkCheckResult], pred: impl Fn(&LinkCheckResult) -> bool) -> usize {
    results.iter().filter(|&r| pred(r)).count()
}

#[cfg(test)]
pub(crate) fn test_link(link_type: LinkType, href: &str) -> ExtractedLink {
    ExtractedLink {
        link_type,
        href: href.to_string(),
        source_file: PathBuf::from("/docs/index.mdx"),
        line: 1,
        column: 1,
        context: format!("[x]({href})"),
    }
}
