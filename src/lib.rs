// src/lib.rs
// =============================================================================
// The link checking core, usable without the CLI.
//
// A check runs in four steps:
// 1. scanner: find the documents under a directory
// 2. checker: pull links out of each document and validate them
// 3. check: drive the above and build a summary
// 4. report: turn the results into console text, JSON or Markdown
// =============================================================================

pub mod check;
pub mod checker;
pub mod config;
pub mod error;
pub mod redirects;
pub mod report;
pub mod scanner;

pub use check::{run_check, CheckOutcome};
pub use config::{Config, PartialConfig};
pub use error::{Error, Result};
