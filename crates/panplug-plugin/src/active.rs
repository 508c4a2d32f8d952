//! The extension selected at startup.

use crate::api::context::Context;
use crate::api::params::{
    DownloadFileFinishParams, DownloadFilePrepareParams, DownloadFilePrepareResult,
    SyncAllFileFinishParams, SyncFileFinishParams, SyncScanLocalFilePrepareParams,
    SyncScanLocalFilePrepareResult, SyncScanPanFilePrepareParams, SyncScanPanFilePrepareResult,
    UploadFileFinishParams, UploadFilePrepareParams, UploadFilePrepareResult,
    UserTokenRefreshFinishParams,
};
use crate::error::PluginResult;
use crate::idle::IdlePlugin;
use crate::js::JsPlugin;
use crate::traits::Plugin;

/// Either the idle fallback or a scripted extension.
#[derive(Debug)]
pub enum ActivePlugin {
    /// No scripts were loaded.
    Idle(IdlePlugin),
    /// At least one script loaded.
    Js(JsPlugin),
}

impl ActivePlugin {
    /// Whether this is the idle fallback.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle(_))
    }

    /// Script adapter, when active.
    pub fn as_js(&self) -> Option<&JsPlugin> {
        match self {
            Self::Js(js) => Some(js),
            Self::Idle(_) => None,
        }
    }

    fn inner(&self) -> &dyn Plugin {
        match self {
            Self::Idle(idle) => idle,
            Self::Js(js) => js,
        }
    }
}

impl Default for ActivePlugin {
    fn default() -> Self {
        Self::Idle(IdlePlugin::new())
    }
}

impl Plugin for ActivePlugin {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn start(&self) -> PluginResult<()> {
        self.inner().start()
    }

    fn upload_file_prepare_callback(
        &self,
        context: &Context,
        params: &UploadFilePrepareParams,
    ) -> PluginResult<Option<UploadFilePrepareResult>> {
        self.inner().upload_file_prepare_callback(context, params)
    }

    fn upload_file_finish_callback(
        &self,
        context: &Context,
        params: &UploadFileFinishParams,
    ) -> PluginResult<()> {
        self.inner().upload_file_finish_callback(context, params)
    }

    fn download_file_prepare_callback(
        &self,
        context: &Context,
        params: &DownloadFilePrepareParams,
    ) -> PluginResult<Option<DownloadFilePrepareResult>> {
        self.inner().download_file_prepare_callback(context, params)
    }

    fn download_file_finish_callback(
        &self,
        context: &Context,
        params: &DownloadFileFinishParams,
    ) -> PluginResult<()> {
        self.inner().download_file_finish_callback(context, params)
    }

    fn sync_scan_local_file_prepare_callback(
        &self,
        context: &Context,
        params: &SyncScanLocalFilePrepareParams,
    ) -> PluginResult<Option<SyncScanLocalFilePrepareResult>> {
        self.inner().sync_scan_local_file_prepare_callback(context, params)
    }

    fn sync_scan_pan_file_prepare_callback(
        &self,
        context: &Context,
        params: &SyncScanPanFilePrepareParams,
    ) -> PluginResult<Option<SyncScanPanFilePrepareResult>> {
        self.inner().sync_scan_pan_file_prepare_callback(context, params)
    }

    fn sync_file_finish_callback(
        &self,
        context: &Context,
        params: &SyncFileFinishParams,
    ) -> PluginResult<()> {
        self.inner().sync_file_finish_callback(context, params)
    }

    fn sync_all_file_finish_callback(
        &self,
        context: &Context,
        params: &SyncAllFileFinishParams,
    ) -> PluginResult<()> {
        self.inner().sync_all_file_finish_callback(context, params)
    }

    fn user_token_refresh_finish_callback(
        &self,
        context: &Context,
        params: &UserTokenRefreshFinishParams,
    ) -> PluginResult<()> {
        self.inner().user_token_refresh_finish_callback(context, params)
    }

    fn stop(&self) -> PluginResult<()> {
        self.inner().stop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::js::JsPluginOptions;

    #[test]
    fn test_default_is_idle() {
        let plugin = ActivePlugin::default();
        assert!(plugin.is_idle());
        assert!(plugin.as_js().is_none());
        assert_eq!(plugin.name(), "IdlePlugin");
    }

    #[test]
    fn test_js_variant_delegates() {
        let js = JsPlugin::new(JsPluginOptions::default());
        js.start().expect("start");
        js.load_script(
            "a.js",
            r#"function syncScanLocalFilePrepareCallback(c, p) { return { syncScanLocalApproved: "no" }; }"#,
        )
        .expect("load");

        let plugin = ActivePlugin::Js(js);
        assert!(!plugin.is_idle());
        assert_eq!(plugin.name(), "JsPlugin");
        let result = plugin
            .sync_scan_local_file_prepare_callback(
                &Context::anonymous(),
                &SyncScanLocalFilePrepareParams::default(),
            )
            .expect("call")
            .expect("result");
        assert!(result.is_declined());
    }
}
