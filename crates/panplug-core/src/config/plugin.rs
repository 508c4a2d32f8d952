//! Plugin system configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Plugin system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Plugin root directory. Scripts live in its `js` subdirectory.
    #[serde(default = "default_plugin_directory")]
    pub directory: String,
    /// Whether scripted plugins are loaded at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Key/value store file. Defaults to `kv.db` inside `directory`.
    #[serde(default)]
    pub kv_file: Option<String>,
    /// Script engine memory limit in megabytes (0 = unlimited).
    #[serde(default)]
    pub memory_limit_mb: usize,
}

impl PluginConfig {
    /// Resolved path of the plugin key/value store.
    pub fn kv_path(&self) -> PathBuf {
        match &self.kv_file {
            Some(file) if !file.is_empty() => PathBuf::from(file),
            _ => PathBuf::from(&self.directory).join("kv.db"),
        }
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            directory: default_plugin_directory(),
            enabled: true,
            kv_file: None,
            memory_limit_mb: 0,
        }
    }
}

fn default_plugin_directory() -> String {
    "./plugin".to_string()
}

fn default_true() -> bool {
    true
}
