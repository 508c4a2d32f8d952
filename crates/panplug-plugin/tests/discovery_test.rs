//! Integration tests for plugin discovery and selection.

mod helpers;

use std::sync::Arc;

use helpers::TestPluginDir;
use panplug_plugin::{HookPoint, Plugin, PluginManager};

const UPLOAD_ONLY: &str = r#"
function uploadFilePrepareCallback(context, params) {
    return { uploadApproved: "yes", driveFilePath: params.driveFilePath };
}
"#;

#[test]
fn test_missing_plugin_root_is_idle() {
    let manager = PluginManager::new("/definitely/not/a/plugin/root");
    let plugin = manager.get_plugin();
    assert!(plugin.is_idle());
    assert_eq!(plugin.name(), "IdlePlugin");
}

#[test]
fn test_root_without_js_dir_is_idle() {
    let dir = TestPluginDir::empty();
    assert!(dir.manager().get_plugin().is_idle());
}

#[test]
fn test_empty_js_dir_is_idle() {
    let dir = TestPluginDir::new();
    let (plugin, report) = dir.manager().discover();
    assert!(plugin.is_idle());
    assert!(report.loaded.is_empty());
    assert!(report.failed.is_empty());
}

#[test]
fn test_hidden_and_backup_files_are_ignored() {
    let dir = TestPluginDir::new();
    dir.write_script(".hidden.js", UPLOAD_ONLY)
        .write_script("~backup.js", UPLOAD_ONLY)
        .write_script("readme.txt", "not a script");

    let (plugin, report) = dir.manager().discover();
    assert!(plugin.is_idle());
    assert_eq!(
        report.skipped,
        vec![
            ".hidden.js".to_string(),
            "readme.txt".to_string(),
            "~backup.js".to_string()
        ]
    );
}

#[test]
fn test_subdirectories_are_skipped() {
    let dir = TestPluginDir::new();
    std::fs::create_dir(dir.js_dir().join("nested.js")).expect("mkdir");

    let (plugin, report) = dir.manager().discover();
    assert!(plugin.is_idle());
    assert_eq!(report.skipped, vec!["nested.js".to_string()]);
}

#[test]
fn test_uppercase_extension_is_loaded() {
    let dir = TestPluginDir::new();
    dir.write_script("UPLOAD.JS", UPLOAD_ONLY);

    let (plugin, report) = dir.manager().discover();
    assert!(!plugin.is_idle());
    assert_eq!(report.loaded, vec!["UPLOAD.JS".to_string()]);
}

#[test]
fn test_broken_script_does_not_block_valid_one() {
    let dir = TestPluginDir::new();
    dir.write_script("a_broken.js", "function uploadFileFinishCallback( {")
        .write_script("b_valid.js", UPLOAD_ONLY);

    let (plugin, report) = dir.manager().discover();
    let js = plugin.as_js().expect("script plugin should be active");

    assert_eq!(report.loaded, vec!["b_valid.js".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, "a_broken.js");
    assert_eq!(js.implemented_hooks(), vec![HookPoint::UploadFilePrepare]);
}

#[test]
fn test_only_broken_scripts_fall_back_to_idle() {
    let dir = TestPluginDir::new();
    dir.write_script("broken.js", "throw new Error('boom');");

    let (plugin, report) = dir.manager().discover();
    assert!(plugin.is_idle());
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].reason.contains("boom"));
}

#[test]
fn test_get_plugin_is_cached() {
    let dir = TestPluginDir::new();
    dir.write_script("upload.js", UPLOAD_ONLY);

    let manager = dir.manager();
    let first = manager.get_plugin();
    let second = manager.get_plugin();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(!first.is_idle());
}
