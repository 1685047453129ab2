//! Agendify console - room booking from the command line

mod commands;
mod config;
mod logging;
mod notify;
mod views;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::{Commands, Reported};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, debug, error};

#[derive(Parser)]
#[command(name = "agendify")]
#[command(about = "Book meeting rooms and manage Agendify accounts")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Directory for the session file and logs
    #[arg(short = 'd', long, global = true, env = "AGENDIFY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short = 'c', long, global = true, env = "AGENDIFY_CONFIG")]
    config: Option<PathBuf>,

    /// Timeout for the whole command in seconds (0 = no timeout)
    #[arg(short = 't', long, global = true, default_value = "60")]
    timeout: u64,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::load(cli.config.as_deref(), cli.data_dir.clone())?;
    let log_file = (!cli.no_file_log).then(|| config.log_file());
    logging::init_logging(cli.log_level.into(), log_file)?;

    debug!(base_url = %config.api.base_url, "starting agendify");

    let outcome = if cli.timeout == 0 {
        cli.command.execute(config).await
    } else {
        let timeout_duration = Duration::from_secs(cli.timeout);
        match tokio::time::timeout(timeout_duration, cli.command.execute(config)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("Command timed out after {} seconds", cli.timeout);
                eprintln!("Command timed out after {} seconds", cli.timeout);
                std::process::exit(1);
            }
        }
    };

    if let Err(e) = outcome {
        // Failures already shown as notices only set the exit code
        if e.downcast_ref::<Reported>().is_none() {
            error!("Command failed: {e:#}");
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
