//! Test-suite orchestrator CLI.
//!
//! Discovers the catalog under the test root, resolves the requested
//! selection, and runs the resulting plan through the execution engine.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;

use testrun::catalog::Catalog;
use testrun::core::resolve::resolve;
use testrun::engine::{ConsoleEngine, Engine, write_summary};
use testrun::exit_codes;
use testrun::io::builder::build_catalog;
use testrun::io::cleandir::clean_results_dir;
use testrun::io::config::load_config;
use testrun::io::loader::{CommandSettings, TomlSource};
use testrun::logging;
use testrun::render::{assemble_plan, render_catalog};

#[derive(Parser)]
#[command(
    name = "testrun",
    version,
    about = "Discover declared test suites and run a selection of them"
)]
struct Cli {
    /// Load configuration from this file.
    #[arg(short, long, default_value = "./testrun.toml")]
    config: PathBuf,

    /// Root directory of the test declaration tree.
    #[arg(short = 'T', long, default_value = "./testsuite")]
    testpath: PathBuf,

    /// Display the catalog of discovered tests and exit.
    #[arg(short, long)]
    list: bool,

    /// Comma-separated list of test paths to include (repeatable).
    #[arg(short, long)]
    include: Vec<String>,

    /// Comma-separated list of test paths to exclude (repeatable).
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Increase suite output verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory for test results; wiped clean before the run.
    #[arg(short, long, default_value = "./test_results")]
    results: PathBuf,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("{err:#}");
            process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let source = TomlSource::new(CommandSettings::from_config(&config.suite));
    let catalog = build_catalog(&source, &cli.testpath)?;

    if cli.list {
        println!("Found tests:");
        print!("{}", render_catalog(&catalog));
        return Ok(exit_codes::OK);
    }

    let includes = split_directives(&cli.include);
    let excludes = split_directives(&cli.exclude);
    let base = base_selection(&config.main.run_tests, &cli.include, &catalog);

    let run_paths = resolve(&catalog, base, &includes, &excludes);
    if run_paths.is_empty() {
        println!("No tests to run.");
        return Ok(exit_codes::OK);
    }

    println!("Running tests:");
    for path in &run_paths {
        println!("  - {path}");
    }

    clean_results_dir(&cli.results)?;
    let plan = assemble_plan(&catalog, &run_paths)?;
    let summary = ConsoleEngine.run(&plan, cli.verbose)?;
    write_summary(&cli.results.join("summary.json"), &summary)?;

    if summary.all_passed() {
        Ok(exit_codes::OK)
    } else {
        Ok(exit_codes::FAILED)
    }
}

/// Initial working list: the stored run-list when configured, the catalog's
/// default selection when no include directive was given, and nothing
/// otherwise (an include directive starts the selection from empty).
fn base_selection(
    run_tests: &Option<Vec<String>>,
    include_flags: &[String],
    catalog: &Catalog,
) -> Vec<String> {
    match run_tests {
        Some(paths) => paths.clone(),
        None if include_flags.is_empty() => catalog.default_selection(),
        None => Vec::new(),
    }
}

/// Flatten repeatable comma-separated directive flags into one list.
fn split_directives(raw: &[String]) -> Vec<String> {
    raw.iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
        .collect()
}
