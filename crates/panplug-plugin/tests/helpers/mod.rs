//! Shared fixtures for plugin integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use panplug_core::config::http::HttpConfig;
use panplug_plugin::{JsPluginOptions, PluginManager};
use tempfile::TempDir;

/// Scratch plugin root with a `js` subdirectory.
pub struct TestPluginDir {
    pub root: TempDir,
}

impl TestPluginDir {
    /// Creates an empty plugin root without a `js` directory.
    pub fn empty() -> Self {
        Self {
            root: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Creates a plugin root with an empty `js` directory.
    pub fn new() -> Self {
        let dir = Self::empty();
        std::fs::create_dir_all(dir.js_dir()).expect("Failed to create js dir");
        dir
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn js_dir(&self) -> PathBuf {
        self.root.path().join("js")
    }

    /// Writes a file into the `js` directory.
    pub fn write_script(&self, name: &str, source: &str) -> &Self {
        std::fs::write(self.js_dir().join(name), source).expect("Failed to write script");
        self
    }

    pub fn kv_path(&self) -> PathBuf {
        self.root.path().join("kv.db")
    }

    /// Manager rooted here with a short HTTP timeout and a scratch KV file.
    pub fn manager(&self) -> PluginManager {
        PluginManager::new(self.path()).with_js_options(JsPluginOptions {
            http: HttpConfig {
                timeout_seconds: 2,
                ..Default::default()
            },
            kv_path: Some(self.kv_path()),
            memory_limit_bytes: 0,
        })
    }
}
