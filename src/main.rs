//! extbridge - end-to-end browser extension testing
//!
//! Main entry point for the extbridge CLI.

mod cli;
mod cmd_run;
mod cmd_serve;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{error, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use extbridge_config::{Config, ConfigError, ConfigLoader, ConfigValidator};

use crate::cli::{Cli, Commands, RunArgs};

/// Exit code for configuration and setup failures; no test ran.
pub(crate) const EXIT_SETUP_ERROR: i32 = 2;

/// Get the extbridge home directory (~/.extbridge).
fn extbridge_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".extbridge")
}

/// Initialize tracing with console and daily-rotated file output.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = extbridge_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("extbridge")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes the file writer on drop; keep it for the process lifetime.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Load the config file, apply overrides and validate the result.
fn load_config(path: &Path, apply: impl FnOnce(&mut Config)) -> Result<Config, ConfigError> {
    let mut config = ConfigLoader::load_or_default(path)?;
    apply(&mut config);

    for warning in ConfigValidator::validate(&config).into_result()? {
        warn!("{}: {}", warning.path, warning.message);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();
    let config_path = PathBuf::from(ConfigLoader::expand_path(&cli.config));
    let command = cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default()));

    let code = match command {
        Commands::Serve(args) => match load_config(&config_path, |c| args.apply(c)) {
            Ok(config) => {
                cmd_serve::serve(&config).await?;
                0
            }
            Err(e) => {
                error!("Invalid configuration: {}", e);
                EXIT_SETUP_ERROR
            }
        },
        Commands::Run(args) => match load_config(&config_path, |c| args.apply(c)) {
            Ok(config) => cmd_run::run_scenario(&config, &args).await,
            Err(e) => {
                error!("Invalid configuration: {}", e);
                EXIT_SETUP_ERROR
            }
        },
        Commands::Targets { http_endpoint } => {
            let endpoint = match http_endpoint {
                Some(endpoint) => endpoint,
                None => match load_config(&config_path, |_| {}) {
                    Ok(config) => config.cdp.http_endpoint,
                    Err(e) => {
                        error!("Invalid configuration: {}", e);
                        std::process::exit(EXIT_SETUP_ERROR);
                    }
                },
            };
            match cmd_run::list_targets(&endpoint).await {
                Ok(()) => 0,
                Err(e) => {
                    error!("{}", e);
                    EXIT_SETUP_ERROR
                }
            }
        }
    };

    std::process::exit(code);
}
