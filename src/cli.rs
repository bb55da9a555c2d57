// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Every option that also exists in the config file is an Option here, so
// "not given on the command line" can be told apart from "given", and only
// given values override the config file.
// =============================================================================

use clap::{Args, Parser, Subcommand, ValueEnum};
use mdx_linklist::PartialConfig;
use std::path::PathBuf;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "mdx-linklist",
    version,
    about = "Extract and validate links in MDX and Markdown files",
    long_about = "mdx-linklist scans a documentation directory, checks every internal link against \
                  the filesystem and every external link over HTTP, and reports what is broken. \
                  It's built for CI pipelines: the exit code is 1 when broken links are found."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check links in MDX files
    ///
    /// Example: mdx-linklist check ./docs --format json
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Directory to scan for MDX files
    pub directory: PathBuf,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only check internal links
    #[arg(short, long, conflicts_with = "external_only")]
    pub internal_only: bool,

    /// Only check external links
    #[arg(short, long)]
    pub external_only: bool,

    /// Ignore URL pattern (can be repeated)
    #[arg(long = "ignore", value_name = "PATTERN")]
    pub ignore: Vec<String>,

    /// Ignore domain (can be repeated)
    #[arg(long = "ignore-domain", value_name = "DOMAIN")]
    pub ignore_domain: Vec<String>,

    /// Route prefix for absolute paths (can be repeated)
    #[arg(long = "route-prefix", value_name = "PREFIX")]
    pub route_prefix: Vec<String>,

    /// Custom JSX component with href prop (can be repeated)
    #[arg(long = "component", value_name = "NAME")]
    pub component: Vec<String>,

    /// External request timeout in milliseconds
    #[arg(short, long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Parallel requests
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Retries after a network failure
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Redirect map (.json, .ts or .js) consulted for missing internal links
    #[arg(long, value_name = "FILE")]
    pub redirects: Option<PathBuf>,

    /// Treat redirected links as failures
    #[arg(long)]
    pub fail_on_redirects: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Console)]
    pub format: OutputFormat,

    /// Write report to file (json and markdown formats)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Hide progress messages
    #[arg(long)]
    pub no_progress: bool,

    /// Do not exit with code 1 on broken links
    #[arg(long)]
    pub no_fail: bool,

    /// Show all links, not just broken
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl CheckArgs {
    // The command-line layer of the config
    //
    // Flags only override when set; lists are appended to the config file's
    // ignore lists and replace everything else.
    pub fn overrides(&self) -> PartialConfig {
        fn non_empty(values: &[String]) -> Option<Vec<String>> {
            (!values.is_empty()).then(|| values.to_vec())
        }

        PartialConfig {
            ignore_patterns: non_empty(&self.ignore),
            ignore_domains: non_empty(&self.ignore_domain),
            route_prefixes: non_empty(&self.route_prefix),
            custom_components: non_empty(&self.component),
            timeout: self.timeout,
            concurrency: self.concurrency,
            retries: self.retries,
            internal_only: self.internal_only.then_some(true),
            external_only: self.external_only.then_some(true),
            redirects_file: self.redirects.clone(),
            fail_on_redirects: self.fail_on_redirects.then_some(true),
            ..PartialConfig::default()
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Vec<String> for repeatable options?
//    - clap collects every occurrence: `--ignore a --ignore b` gives
//      vec!["a", "b"]; no occurrences gives an empty Vec
//
// 2. What is ValueEnum?
//    - Lets clap parse `--format json` straight into OutputFormat::Json
//      and list the allowed values in --help
//
// 3. Why does main.rs build a PartialConfig instead of a Config?
//    - The config file, then the command line, are layered on top of the
//      defaults; a layer only changes what it actually mentions
// -----------------------------------------------------------------------------
