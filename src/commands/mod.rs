//! CLI command definitions and dispatch.

pub mod check;
pub mod config;
pub mod hooks;
pub mod invoke;

use clap::{Parser, Subcommand};

use panplug_core::config::AppConfig;
use panplug_core::{AppError, AppResult};
use panplug_plugin::{ActivePlugin, LoadReport, Plugin, PluginManager};

use crate::output::OutputFormat;

/// panplug: cloud-drive script plugin diagnostics
#[derive(Debug, Parser)]
#[command(name = "panplug", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (falls back to PANPLUG_CONFIG)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Discover scripts and report which ones load
    Check,
    /// List hook points and whether the loaded scripts implement them
    Hooks,
    /// Call one hook with JSON params
    Invoke(invoke::InvokeArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        match &self.command {
            Commands::Check => check::execute(config, self.format).await,
            Commands::Hooks => hooks::execute(config, self.format).await,
            Commands::Invoke(args) => invoke::execute(args, config, self.format).await,
            Commands::Config(args) => config::execute(args, &config, self.format),
        }
    }
}

/// Runs discovery on a blocking thread, hands the plugin to `f`, then stops it.
///
/// The script engine and its blocking HTTP client must not be created or
/// dropped on an async worker thread.
pub(crate) async fn with_discovered<T, F>(config: AppConfig, f: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&ActivePlugin, &LoadReport, &AppConfig) -> AppResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let manager = PluginManager::from_config(&config.plugins, &config.http);
        let (plugin, report) = manager.discover();
        let result = f(&plugin, &report, &config);
        if let Err(e) = plugin.stop() {
            tracing::warn!(error = %e, "Plugin stop failed");
        }
        result
    })
    .await
    .map_err(|e| AppError::internal(format!("Plugin task failed: {e}")))?
}
