// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (RUST_LOG, default "warn", written to stderr)
// 3. Layer the config: defaults, then config file, then command-line flags
// 4. Run the check and render the report
// 5. Exit with proper code (0 = success, 1 = broken links, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{CheckArgs, Cli, Commands, OutputFormat};
use mdx_linklist::{report, run_check, CheckOutcome, Config};
use tracing_subscriber::EnvFilter;

// The #[tokio::main] attribute transforms our async main into a real main function
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// Returns:
//   Ok(0) = no broken links (or --no-fail)
//   Ok(1) = broken links found
//   Err = the check could not run; main turns this into exit code 2
async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Check(args) => handle_check(args).await,
    }
}

async fn handle_check(args: CheckArgs) -> Result<i32> {
    let cwd = std::env::current_dir().context("cannot determine the working directory")?;

    let config = Config::load(args.config.as_deref(), &cwd)
        .context("failed to load configuration")?
        .merge(args.overrides());

    let directory = cwd.join(&args.directory);
    let outcome = run_check(&directory, &config, !args.no_progress)
        .await
        .with_context(|| format!("failed to check {}", directory.display()))?;

    emit_report(&args, &outcome)?;

    let failures = outcome.failure_count(config.fail_on_redirects);
    if failures > 0 && !args.no_fail {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Console output always goes to stdout; JSON and Markdown go to --output
// when given
fn emit_report(args: &CheckArgs, outcome: &CheckOutcome) -> Result<()> {
    let CheckOutcome {
        base_dir,
        results,
        summary,
        ..
    } = outcome;

    let rendered = match args.format {
        OutputFormat::Console => {
            println!("{}", report::render_console(results, summary, base_dir, args.verbose));
            return Ok(());
        }
        OutputFormat::Json => {
            report::render_json(results, summary, base_dir).context("failed to serialize report")?
        }
        OutputFormat::Markdown => report::render_markdown(results, summary, base_dir, chrono::Utc::now()),
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            if !args.no_progress {
                eprintln!("📝 Report written to {}", path.display());
            }
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
