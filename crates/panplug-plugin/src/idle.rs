//! The no-op extension used whenever no script plugin is active.

use crate::api::context::Context;
use crate::api::params::{
    DownloadFileFinishParams, DownloadFilePrepareParams, DownloadFilePrepareResult,
    SyncAllFileFinishParams, SyncFileFinishParams, SyncScanLocalFilePrepareParams,
    SyncScanLocalFilePrepareResult, SyncScanPanFilePrepareParams, SyncScanPanFilePrepareResult,
    UploadFileFinishParams, UploadFilePrepareParams, UploadFilePrepareResult,
    UserTokenRefreshFinishParams,
};
use crate::error::PluginResult;
use crate::traits::Plugin;

/// Stateless extension whose every hook has no opinion.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePlugin;

impl IdlePlugin {
    /// Creates the idle plugin.
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for IdlePlugin {
    fn name(&self) -> &str {
        "IdlePlugin"
    }

    fn start(&self) -> PluginResult<()> {
        Ok(())
    }

    fn upload_file_prepare_callback(
        &self,
        _context: &Context,
        _params: &UploadFilePrepareParams,
    ) -> PluginResult<Option<UploadFilePrepareResult>> {
        Ok(None)
    }

    fn upload_file_finish_callback(
        &self,
        _context: &Context,
        _params: &UploadFileFinishParams,
    ) -> PluginResult<()> {
        Ok(())
    }

    fn download_file_prepare_callback(
        &self,
        _context: &Context,
        _params: &DownloadFilePrepareParams,
    ) -> PluginResult<Option<DownloadFilePrepareResult>> {
        Ok(None)
    }

    fn download_file_finish_callback(
        &self,
        _context: &Context,
        _params: &DownloadFileFinishParams,
    ) -> PluginResult<()> {
        Ok(())
    }

    fn sync_scan_local_file_prepare_callback(
        &self,
        _context: &Context,
        _params: &SyncScanLocalFilePrepareParams,
    ) -> PluginResult<Option<SyncScanLocalFilePrepareResult>> {
        Ok(None)
    }

    fn sync_scan_pan_file_prepare_callback(
        &self,
        _context: &Context,
        _params: &SyncScanPanFilePrepareParams,
    ) -> PluginResult<Option<SyncScanPanFilePrepareResult>> {
        Ok(None)
    }

    fn sync_file_finish_callback(
        &self,
        _context: &Context,
        _params: &SyncFileFinishParams,
    ) -> PluginResult<()> {
        Ok(())
    }

    fn sync_all_file_finish_callback(
        &self,
        _context: &Context,
        _params: &SyncAllFileFinishParams,
    ) -> PluginResult<()> {
        Ok(())
    }

    fn user_token_refresh_finish_callback(
        &self,
        _context: &Context,
        _params: &UserTokenRefreshFinishParams,
    ) -> PluginResult<()> {
        Ok(())
    }

    fn stop(&self) -> PluginResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_hook_has_no_opinion() {
        let plugin = IdlePlugin::new();
        let ctx = Context::anonymous();

        plugin.start().expect("start");
        assert!(
            plugin
                .upload_file_prepare_callback(&ctx, &UploadFilePrepareParams::default())
                .expect("upload")
                .is_none()
        );
        assert!(
            plugin
                .download_file_prepare_callback(&ctx, &DownloadFilePrepareParams::default())
                .expect("download")
                .is_none()
        );
        assert!(
            plugin
                .sync_scan_local_file_prepare_callback(&ctx, &SyncScanLocalFilePrepareParams::default())
                .expect("scan local")
                .is_none()
        );
        assert!(
            plugin
                .sync_scan_pan_file_prepare_callback(&ctx, &SyncScanPanFilePrepareParams::default())
                .expect("scan pan")
                .is_none()
        );
        plugin
            .sync_all_file_finish_callback(&ctx, &SyncAllFileFinishParams::default())
            .expect("sync all");
        plugin.stop().expect("stop");
    }
}
