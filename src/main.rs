//! Scaffold CLI - Project scaffolding driven by versioned plugins

use std::process::ExitCode;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter
const LOG_ENV: &str = "SCAFFOLD_LOG";

fn main() -> ExitCode {
    init_tracing();

    if let Err(e) = scaffold_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Logs go to stderr, filtered by `SCAFFOLD_LOG` (default `warn`)
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
