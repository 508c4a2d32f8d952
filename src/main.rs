//! panplug: inspect and exercise cloud-drive script plugins.
//!
//! Loads configuration, initializes logging, and runs one CLI command.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use panplug_core::config::AppConfig;
use panplug_core::config::logging::LoggingConfig;
use panplug_core::error::AppError;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = cli.execute(config).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Load configuration from the `-c` path, `PANPLUG_CONFIG`, or the default location.
fn load_configuration(explicit: Option<&str>) -> Result<AppConfig, AppError> {
    let config_path = explicit
        .map(str::to_string)
        .or_else(|| std::env::var("PANPLUG_CONFIG").ok())
        .unwrap_or_else(|| "config/panplug.toml".to_string());

    AppConfig::load(&config_path)
}

/// Initialize tracing/logging. Logs go to stderr so command output stays clean.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
