//! CLI entry point for svn-log-stats
//!
//! Reads a `svn log -v`-style stream from stdin and writes one CSV record
//! per revision to stdout. Diagnostics go to stderr; stdout carries nothing
//! but the report.

use std::io;
use std::process;

use anyhow::Context;
use clap::{ArgAction, Parser};

use svn_log_stats::{
    AppConfig, CliArgs, ConfigError, CsvSink, LogStreamParser, PathFilter, SvnDiffProvider,
};

/// Streaming per-revision commit statistics from Subversion log output
#[derive(Parser)]
#[command(name = "svn-log-stats")]
#[command(version, about, long_about = None)]
struct Args {
    /// Repository base URL prepended to the paths found in the log
    #[arg(long, value_name = "URL")]
    svn_url: Option<String>,

    /// Username for repository authentication
    #[arg(long, value_name = "USER")]
    username: Option<String>,

    /// Password for repository authentication
    #[arg(long, value_name = "PASSWORD")]
    password: Option<String>,

    /// Author whose revisions are excluded from the report (repeatable,
    /// replaces the built-in CI-account list)
    #[arg(long = "ignore-author", value_name = "AUTHOR", action = ArgAction::Append)]
    ignore_authors: Vec<String>,

    /// Path substring whose file changes are excluded from analysis
    /// (repeatable, replaces the built-in list)
    #[arg(long = "ignore-path", value_name = "PATTERN", action = ArgAction::Append)]
    ignore_paths: Vec<String>,

    /// Enable verbose (info-level) logging to stderr
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Enable debug-level logging to stderr
    #[arg(long)]
    debug: bool,
}

impl From<Args> for CliArgs {
    fn from(args: Args) -> Self {
        Self {
            svn_url: args.svn_url,
            username: args.username,
            password: args.password,
            ignore_authors: args.ignore_authors,
            ignore_paths: args.ignore_paths,
        }
    }
}

/// Initialize tracing/logging based on CLI flags
fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init();
}

/// Report a configuration error and terminate before any output is produced
fn handle_config_error(error: ConfigError) -> ! {
    eprintln!("{error}");
    process::exit(1);
}

/// Build the processing pipeline from the resolved configuration and run it
/// over stdin
fn run(config: &AppConfig) -> anyhow::Result<()> {
    let provider = SvnDiffProvider::new(config.svn_url());
    let provider = match config.username() {
        Some(username) => provider.with_username(username),
        None => provider,
    };
    let provider = match config.password() {
        Some(password) => provider.with_password(password),
        None => provider,
    };

    let parser = LogStreamParser::new(provider)
        .with_path_filter(PathFilter::new(config.ignored_path_patterns().to_vec()))
        .with_ignored_authors(config.ignored_authors().iter().cloned());

    let stdin = io::stdin().lock();
    let mut sink = CsvSink::new(io::stdout().lock());
    sink.write_header().context("failed to write report header")?;
    parser
        .process_log(stdin, &mut sink)
        .context("failed to process log stream")?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.debug);

    let config =
        AppConfig::from_cli(CliArgs::from(args)).unwrap_or_else(|error| handle_config_error(error));

    run(&config)
}
