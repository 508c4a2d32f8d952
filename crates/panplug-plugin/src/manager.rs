//! Plugin manager: discovery, selection, and context building.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use serde::Serialize;
use tracing::{info, warn};

use panplug_core::config::http::HttpConfig;
use panplug_core::config::plugin::PluginConfig;
use panplug_core::session::PanUser;

use crate::active::ActivePlugin;
use crate::api::context::Context;
use crate::error::{PluginError, PluginResult};
use crate::idle::IdlePlugin;
use crate::js::{JsPlugin, JsPluginOptions};
use crate::traits::Plugin;

/// Subdirectory of the plugin root holding JavaScript files.
pub const JS_DIR: &str = "js";
/// Script file extension, matched case-insensitively.
pub const JS_EXTENSION: &str = "js";

/// A script that failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedScript {
    /// File name.
    pub name: String,
    /// Reason reported by the loader.
    pub reason: String,
}

/// Outcome of one discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Script directory that was scanned.
    pub directory: PathBuf,
    /// Files that loaded, in load order.
    pub loaded: Vec<String>,
    /// Files that failed to read or evaluate.
    pub failed: Vec<FailedScript>,
    /// Entries ignored by the scan.
    pub skipped: Vec<String>,
}

/// Selects the active extension for the process.
#[derive(Debug)]
pub struct PluginManager {
    /// Plugin root directory.
    plugin_path: PathBuf,
    /// Whether scripted plugins may be activated.
    enabled: bool,
    /// Options for the script engine.
    js_options: JsPluginOptions,
    /// Selection made by the first `get_plugin` call.
    active: OnceLock<Arc<ActivePlugin>>,
}

impl PluginManager {
    /// Creates a manager for `plugin_path` with default engine options.
    pub fn new(plugin_path: impl Into<PathBuf>) -> Self {
        Self {
            plugin_path: plugin_path.into(),
            enabled: true,
            js_options: JsPluginOptions::default(),
            active: OnceLock::new(),
        }
    }

    /// Creates a manager from application configuration.
    pub fn from_config(plugins: &PluginConfig, http: &HttpConfig) -> Self {
        Self {
            plugin_path: PathBuf::from(&plugins.directory),
            enabled: plugins.enabled,
            js_options: JsPluginOptions::from_config(plugins, http),
            active: OnceLock::new(),
        }
    }

    /// Overrides the engine options.
    pub fn with_js_options(mut self, options: JsPluginOptions) -> Self {
        self.js_options = options;
        self
    }

    /// Plugin root directory.
    pub fn plugin_path(&self) -> &Path {
        &self.plugin_path
    }

    /// Changes the plugin root. The path must be an existing directory.
    ///
    /// Has no effect on a selection already made by [`get_plugin`](Self::get_plugin).
    pub fn set_plugin_path(&mut self, path: impl AsRef<Path>) -> PluginResult<()> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(PluginError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        self.plugin_path = path.to_path_buf();
        Ok(())
    }

    /// Returns the active extension, running discovery on first use.
    pub fn get_plugin(&self) -> Arc<ActivePlugin> {
        self.active
            .get_or_init(|| {
                let (plugin, report) = self.discover();
                info!(
                    plugin = %plugin.name(),
                    directory = %report.directory.display(),
                    loaded = report.loaded.len(),
                    failed = report.failed.len(),
                    "Plugin selected"
                );
                Arc::new(plugin)
            })
            .clone()
    }

    /// Scans the script directory and builds a fresh extension.
    ///
    /// Never fails: every fault results in the idle plugin plus a report entry
    /// or a log line.
    pub fn discover(&self) -> (ActivePlugin, LoadReport) {
        let js_dir = self.plugin_path.join(JS_DIR);
        let mut report = LoadReport {
            directory: js_dir.clone(),
            ..Default::default()
        };

        if !self.enabled {
            info!("Script plugins disabled by configuration");
            return (idle(), report);
        }
        if !js_dir.is_dir() {
            info!(directory = %js_dir.display(), "No script directory, using idle plugin");
            return (idle(), report);
        }

        let entries = match list_scripts(&js_dir, &mut report) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(directory = %js_dir.display(), error = %e, "Cannot read script directory");
                return (idle(), report);
            }
        };
        if entries.is_empty() {
            return (idle(), report);
        }

        let js = JsPlugin::new(self.js_options.clone());
        if let Err(e) = js.start() {
            warn!(error = %e, "Script engine failed to start, using idle plugin");
            return (idle(), report);
        }

        for (name, path) in entries {
            match js.load_script_file(&path) {
                Ok(()) => {
                    info!(script = %name, "Loaded plugin script");
                    report.loaded.push(name);
                }
                Err(e) => {
                    warn!(script = %name, error = %e, "Skipping plugin script");
                    report.failed.push(FailedScript {
                        name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if report.loaded.is_empty() {
            if let Err(e) = js.stop() {
                warn!(error = %e, "Script engine stop failed");
            }
            return (idle(), report);
        }

        info!(
            scripts = report.loaded.len(),
            hooks = js.implemented_hooks().len(),
            "Script plugin active"
        );
        (ActivePlugin::Js(js), report)
    }

    /// Builds a fresh context snapshot for one hook call.
    pub fn get_context(&self, session: Option<&PanUser>) -> Context {
        Context::from_session(session)
    }
}

fn idle() -> ActivePlugin {
    ActivePlugin::Idle(IdlePlugin::new())
}

/// Lists loadable script files sorted by name; everything else goes to `report.skipped`.
fn list_scripts(dir: &Path, report: &mut LoadReport) -> std::io::Result<Vec<(String, PathBuf)>> {
    let entries = std::fs::read_dir(dir)?.map(|entry| {
        entry.map(|e| (e.file_name().to_string_lossy().into_owned(), e.path()))
    });
    Ok(select_scripts(dir, entries, report))
}

/// Filters directory entries down to scripts. Unreadable entries are logged and skipped.
fn select_scripts(
    dir: &Path,
    entries: impl IntoIterator<Item = std::io::Result<(String, PathBuf)>>,
    report: &mut LoadReport,
) -> Vec<(String, PathBuf)> {
    let mut scripts = Vec::new();
    for entry in entries {
        let (name, path) = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(directory = %dir.display(), error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };

        if path.is_dir() || !is_script_name(&name) {
            report.skipped.push(name);
            continue;
        }
        scripts.push((name, path));
    }
    scripts.sort_by(|a, b| a.0.cmp(&b.0));
    report.skipped.sort();
    scripts
}

/// Whether `name` is a loadable script: not hidden, not a backup, `.js` extension.
fn is_script_name(name: &str) -> bool {
    if name.starts_with('.') || name.starts_with('~') {
        return false;
    }
    Path::new(name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case(JS_EXTENSION))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_name_filter() {
        assert!(is_script_name("a.js"));
        assert!(is_script_name("B.JS"));
        assert!(!is_script_name(".hidden.js"));
        assert!(!is_script_name("~backup.js"));
        assert!(!is_script_name("notes.txt"));
        assert!(!is_script_name("js"));
        assert!(!is_script_name("a.json"));
    }

    #[test]
    fn test_unreadable_entry_does_not_abort_scan() {
        let dir = tempfile::tempdir().expect("tempdir");
        let entries = vec![
            Ok(("b.js".to_string(), dir.path().join("b.js"))),
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")),
            Ok(("a.js".to_string(), dir.path().join("a.js"))),
            Ok(("notes.txt".to_string(), dir.path().join("notes.txt"))),
        ];

        let mut report = LoadReport::default();
        let scripts = select_scripts(dir.path(), entries, &mut report);
        let names: Vec<&str> = scripts.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["a.js", "b.js"]);
        assert_eq!(report.skipped, vec!["notes.txt".to_string()]);
    }

    #[test]
    fn test_set_plugin_path_rejects_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, "x").expect("write");

        let mut manager = PluginManager::new(dir.path());
        let err = manager.set_plugin_path(&file).unwrap_err();
        assert!(matches!(err, PluginError::NotADirectory { .. }));
        assert_eq!(manager.plugin_path(), dir.path());

        let missing = dir.path().join("missing");
        assert!(manager.set_plugin_path(&missing).is_err());

        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).expect("mkdir");
        manager.set_plugin_path(&sub).expect("set path");
        assert_eq!(manager.plugin_path(), sub.as_path());
    }

    #[test]
    fn test_disabled_manager_is_idle() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join(JS_DIR)).expect("mkdir");
        std::fs::write(
            dir.path().join(JS_DIR).join("a.js"),
            "function uploadFileFinishCallback(c, p) {}",
        )
        .expect("write");

        let config = PluginConfig {
            directory: dir.path().to_string_lossy().into_owned(),
            enabled: false,
            ..Default::default()
        };
        let manager = PluginManager::from_config(&config, &HttpConfig::default());
        assert!(manager.get_plugin().is_idle());
    }

    #[test]
    fn test_get_context_without_session() {
        let manager = PluginManager::new("./plugin");
        let ctx = manager.get_context(None);
        assert_eq!(ctx, Context::anonymous());
    }
}
