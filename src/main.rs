use clap::Parser;
use std::env;
use std::process;

use kanban::cli;
use kanban::cli::commands::{Cli, Commands};
use kanban::config::{LOG_ENV, LOG_FORMAT_ENV};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    init_tracing();

    let cli_args = Cli::parse();
    let json_output = cli_args.json;
    let db = cli_args.db;

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(json_output, db),
        Commands::Board => cli::board::run(json_output, db),
        Commands::Task(cmd) => cli::task::run(cmd, json_output, db),
        Commands::Stats => cli::stats::run(json_output, db),
        Commands::Settings(cmd) => cli::settings::run(cmd, json_output, db),
    };

    process::exit(exit_code);
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("kanban=warn"));
    let format = env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}
