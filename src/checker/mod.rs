// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - types: The data that flows through a check (links, results, summary)
// - markdown: Extracts links from MDX/Markdown text
// - internal: Checks relative/absolute links against the filesystem
// - suggest: Finds "did you mean" paths for broken internal links
// - http: Checks external links over the network
// - transport: The HTTP capability the external validator is built on
// - cache: Remembers external results for a few minutes
// - ignore: Patterns and domains that are never probed
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod cache;
mod http;
mod ignore;
mod internal;
mod markdown;
mod suggest;
mod transport;
mod types;

// Re-export public items from submodules
// This lets users write `checker::extract_links()` instead of
// `checker::markdown::extract_links()`
pub use cache::ResultCache;
pub use http::ExternalValidator;
pub use internal::InternalValidator;
pub use markdown::{classify_link, extract_links, extract_links_from_file};
pub use suggest::find_similar_paths;
pub use transport::{ProbeMethod, ProbeResponse, ReqwestTransport, Transport, TransportError};
pub use types::{CheckSummary, ExtractedLink, LinkCheckResult, LinkStatus, LinkType};

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is mod.rs?
//    - When you have a directory as a module (like src/checker/), the
//      mod.rs file inside it is the module root
//
// 2. Why are the submodules private but their items re-exported?
//    - Callers get one flat namespace (`checker::InternalValidator`)
//    - We can move code between files without breaking anyone
// -----------------------------------------------------------------------------
