//! Application configuration schemas.
//!
//! All configuration structs are deserialized from an optional TOML file
//! via the `config` crate, overlaid with `PANPLUG__*` environment
//! variables. Each sub-module represents a logical configuration section.

pub mod http;
pub mod logging;
pub mod plugin;

use std::path::Path;

use serde::{Deserialize, Serialize};

use self::http::HttpConfig;
use self::logging::LoggingConfig;
use self::plugin::PluginConfig;

use crate::error::AppError;
use crate::session::PanUser;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Plugin system settings.
    #[serde(default)]
    pub plugins: PluginConfig,
    /// Outbound HTTP settings used by script host utilities.
    #[serde(default)]
    pub http: HttpConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Session snapshot used to build plugin contexts outside a live host.
    #[serde(default)]
    pub session: Option<PanUser>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// The file is optional: a missing file yields defaults. Environment
    /// variables prefixed with `PANPLUG__` override file values, e.g.
    /// `PANPLUG__PLUGINS__DIRECTORY=/opt/plugin`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let config = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("PANPLUG")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig::load(dir.path().join("absent.toml")).expect("load");
        assert!(config.plugins.enabled);
        assert_eq!(config.plugins.directory, "./plugin");
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.session.is_none());
    }

    #[test]
    fn test_file_values_and_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("panplug.toml");
        std::fs::write(
            &path,
            r#"
[plugins]
directory = "/srv/panplug/plugin"
memory_limit_mb = 64

[http]
timeout_seconds = 5

[session]
user_id = "u-1"
nickname = "tickstep"

[[session.drives]]
drive_id = "1001"
drive_tag = "File"

[[session.drives]]
drive_id = "2002"
drive_tag = "Album"
"#,
        )
        .expect("write");

        let config = AppConfig::load(&path).expect("load");
        assert_eq!(config.plugins.directory, "/srv/panplug/plugin");
        assert_eq!(config.plugins.memory_limit_mb, 64);
        assert!(config.plugins.enabled);
        assert_eq!(config.http.timeout_seconds, 5);

        let user = config.session.expect("session");
        assert_eq!(user.user_id, "u-1");
        assert_eq!(user.file_drive_id(), "1001");
        assert_eq!(user.album_drive_id(), "2002");
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[plugins\ndirectory = ").expect("write");

        let err = AppConfig::load(&path).expect_err("should fail");
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }
}
