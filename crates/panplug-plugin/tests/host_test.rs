//! Integration tests for the host utilities available to scripts.

mod helpers;

use helpers::TestPluginDir;
use panplug_plugin::api::params::{DownloadFileFinishParams, UploadFilePrepareParams};
use panplug_plugin::host::KvStore;
use panplug_plugin::{Context, Plugin};

#[test]
fn test_unreachable_http_returns_empty_string() {
    let dir = TestPluginDir::new();
    dir.write_script(
        "http.js",
        r#"
        function uploadFilePrepareCallback(c, p) {
            var got = PluginUtil.Http.get({ "X-Trace": "1" }, "http://127.0.0.1:1/ping");
            var posted = PluginUtil.Http.post({}, "http://127.0.0.1:1/ping", { name: p.localFileName });
            return { uploadApproved: got === "" && posted === "" ? "yes" : "no" };
        }
        "#,
    );
    let (plugin, _) = dir.manager().discover();

    let result = plugin
        .upload_file_prepare_callback(&Context::anonymous(), &UploadFilePrepareParams::default())
        .expect("call")
        .expect("result");
    assert!(result.is_approved());
}

#[test]
fn test_delete_file_from_script() {
    let dir = TestPluginDir::new();
    let target = dir.path().join("downloaded.tmp");
    std::fs::write(&target, "temporary").expect("write");

    dir.write_script(
        "cleanup.js",
        r#"
        var deleted = [];
        function downloadFileFinishCallback(c, p) {
            deleted.push(PluginUtil.LocalFS.deleteFile(p.localFilePath));
            console.log("deleted", p.localFilePath, deleted);
        }
        function uploadFilePrepareCallback(c, p) {
            return { uploadApproved: deleted.join(",") };
        }
        "#,
    );
    let (plugin, _) = dir.manager().discover();
    let ctx = Context::anonymous();
    let params = DownloadFileFinishParams {
        local_file_path: target.to_string_lossy().into_owned(),
        ..Default::default()
    };

    plugin.download_file_finish_callback(&ctx, &params).expect("first");
    plugin.download_file_finish_callback(&ctx, &params).expect("second");
    assert!(!target.exists());

    let result = plugin
        .upload_file_prepare_callback(&ctx, &UploadFilePrepareParams::default())
        .expect("call")
        .expect("result");
    assert_eq!(result.upload_approved, "true,false");
}

#[test]
fn test_kv_store_from_script_persists() {
    let dir = TestPluginDir::new();
    dir.write_script(
        "kv.js",
        r#"
        function uploadFilePrepareCallback(c, p) {
            var previous = PluginUtil.KV.getString("last");
            PluginUtil.KV.putString("last", p.localFileName);
            return { uploadApproved: "yes", driveFilePath: previous };
        }
        "#,
    );

    {
        let (plugin, _) = dir.manager().discover();
        let ctx = Context::anonymous();
        let params = UploadFilePrepareParams {
            local_file_name: "first.txt".to_string(),
            ..Default::default()
        };
        let first = plugin
            .upload_file_prepare_callback(&ctx, &params)
            .expect("call")
            .expect("result");
        assert_eq!(first.rewritten_path(), None);
        plugin.stop().expect("stop");
    }

    let store = KvStore::new(dir.kv_path());
    assert_eq!(
        store.get_string("last").expect("get").as_deref(),
        Some("first.txt")
    );
}

#[test]
fn test_unreachable_mail_server_returns_false() {
    let dir = TestPluginDir::new();
    dir.write_script(
        "mail.js",
        r#"
        function uploadFilePrepareCallback(c, p) {
            var text = PluginUtil.Email.sendTextMail(
                "127.0.0.1:1", "robot@example.com", "secret",
                "owner@example.com", "upload", "uploaded " + p.localFileName);
            var html = PluginUtil.Email.sendHtmlMail(
                "127.0.0.1:1", "robot@example.com", "secret",
                "owner@example.com", "upload", "<b>" + p.localFileName + "</b>");
            return { uploadApproved: String(text) + "," + String(html) };
        }
        "#,
    );
    let (plugin, _) = dir.manager().discover();

    let result = plugin
        .upload_file_prepare_callback(&Context::anonymous(), &UploadFilePrepareParams::default())
        .expect("call")
        .expect("result");
    assert_eq!(result.upload_approved, "false,false");
}
