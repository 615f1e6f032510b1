//! pledgedesk - operator command line for the crowdfunding admin API.
//!
//! Logs in as a staff member, keeps the session between runs and prints
//! projects, users, categories, transactions and stats.

mod commands;

use std::io;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::Command;
use pledgedesk_core::{App, Config};

/// Log file name in the data directory
const LOG_FILE: &str = "pledgedesk.log";

const USAGE: &str = "\
Usage: pledgedesk <command> [args]

Commands:
  login [LOGIN]              Log in (prompts for the password)
  logout                     End the stored session
  whoami                     Show the logged in user
  status                     Show mode, API URL and session state
  projects [key=value ...]   List projects
  users [key=value ...]      List users
  categories [key=value ...] List categories
  transactions [key=value ...]
                             List transactions
  stats                      Show dashboard and funding stats
  get <endpoint> [key=value ...]
                             GET an endpoint and print the JSON response
  help                       Show this message

Environment:
  PLEDGEDESK_API_URL, PLEDGEDESK_HOST, PLEDGEDESK_MODE, PLEDGEDESK_ENV, RUST_LOG";

/// Initialize the tracing subscriber for logging.
///
/// Returns the guard of the file writer, which must live until exit.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let mut file_error = None;
    let (file_layer, guard) = if config.log_to_file {
        match config
            .data_dir()
            .and_then(|dir| std::fs::create_dir_all(&dir).map(|_| dir).map_err(Into::into))
        {
            Ok(dir) => {
                let appender = tracing_appender::rolling::never(dir, LOG_FILE);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer().with_writer(writer).with_ansi(false);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                file_error = Some(e);
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    if let Some(e) = file_error {
        warn!(error = %e, "File logging disabled");
    }
    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(Command::Help) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    let mut config = Config::load().context("Failed to load config")?;
    config.apply_env();

    let _guard = init_tracing(&config);
    info!("pledgedesk starting");

    let mut app = App::start(config)?;
    let result = commands::run(&mut app, command).await;
    app.shutdown();

    result
}
