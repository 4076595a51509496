//! Engine regression driver
//!
//! Builds the engine, replays `regression_tests.txt` against it and exits
//! non-zero if the build or any test fails.

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use engine_regress::common::config::{Config, Overrides};
use engine_regress::common::logging;
use engine_regress::{testing, Result, RunSummary};

#[derive(Parser)]
#[command(name = "engine-regress", about = "Regression tests for a line-protocol engine")]
#[command(version, long_about = None)]
struct Cli {
    /// Fixture file to replay (default: regression_tests.txt)
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Engine binary to test (default: ./antares-3)
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Config file (default: regress.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the existing engine binary instead of building it
    #[arg(long)]
    no_build: bool,

    /// Seconds to wait for each result line, 0 waits forever
    #[arg(long)]
    timeout: Option<u64>,

    /// Show build output and debug logs
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.verbose);

    match execute(cli).await {
        Ok(summary) => {
            summary.report();
            if !summary.all_passed() {
                std::process::exit(1);
            }
        }
        Err(e) if e.is_build_error() => {
            eprintln!("{}", e.to_string().red());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{} {e}", "Error:".red());
            std::process::exit(1);
        }
    }
}

async fn execute(cli: Cli) -> Result<RunSummary> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply(Overrides {
        fixture: cli.fixture,
        engine: cli.engine,
        no_build: cli.no_build,
        probe_secs: cli.timeout,
    })?;

    testing::run(&config, cli.verbose).await
}
