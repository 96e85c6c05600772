use std::io::Write;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use tc_cli::commands::{record, status};
use tc_cli::{Cli, Commands, Config};
use tc_store::EventLog;

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and succeed; usage errors exit 1.
            let code = i32::from(err.use_stderr());
            err.print()?;
            std::process::exit(code);
        }
    };

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let log = EventLog::new(&config.log_path, config.format);
    let now = Utc::now();
    let mut stdout = std::io::stdout().lock();

    match command {
        Commands::St { json } => status::run(&mut stdout, &log, now, *json)?,
        other => record::run(&mut stdout, &log, &other.to_command(), now)?,
    }

    stdout.flush()?;
    Ok(())
}
