//! Configuration inspection CLI commands.

use clap::{Args, Subcommand};

use panplug_core::config::AppConfig;
use panplug_core::result::AppResult;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        ConfigCommand::Show => match format {
            OutputFormat::Json => output::print_json(config),
            OutputFormat::Table => {
                output::print_kv("Plugin directory", &config.plugins.directory);
                output::print_kv("Plugins enabled", &config.plugins.enabled.to_string());
                output::print_kv("KV store", &config.plugins.kv_path().display().to_string());
                output::print_kv("Memory limit (MB)", &config.plugins.memory_limit_mb.to_string());
                output::print_kv("HTTP timeout (s)", &config.http.timeout_seconds.to_string());
                output::print_kv("HTTP user agent", &config.http.user_agent);
                output::print_kv("Log level", &config.logging.level);
                output::print_kv("Log format", &config.logging.format);
                match &config.session {
                    Some(user) => {
                        output::print_kv("Session user", &user.user_id);
                        output::print_kv("File drive", user.file_drive_id());
                        output::print_kv("Album drive", user.album_drive_id());
                    }
                    None => output::print_kv("Session user", "(none)"),
                }
            }
        },
    }
    Ok(())
}
