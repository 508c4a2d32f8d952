//! The capability contract every extension implements.

use crate::api::context::Context;
use crate::api::params::{
    DownloadFileFinishParams, DownloadFilePrepareParams, DownloadFilePrepareResult,
    SyncAllFileFinishParams, SyncFileFinishParams, SyncScanLocalFilePrepareParams,
    SyncScanLocalFilePrepareResult, SyncScanPanFilePrepareParams, SyncScanPanFilePrepareResult,
    UploadFileFinishParams, UploadFilePrepareParams, UploadFilePrepareResult,
    UserTokenRefreshFinishParams,
};
use crate::error::PluginResult;

/// Extension surface called by the upload, download, and sync pipelines.
///
/// Calls are synchronous and block the caller until the extension returns.
/// Prepare hooks return `Ok(None)` when the extension has no opinion; the
/// caller then applies its own default. An explicit decline is a `Some`
/// result whose approval flag is `no`.
pub trait Plugin: Send + Sync + std::fmt::Debug {
    /// Short name of the implementation, for diagnostics.
    fn name(&self) -> &str;

    /// Prepares the extension for use.
    fn start(&self) -> PluginResult<()>;

    /// Called before a local file is uploaded.
    fn upload_file_prepare_callback(
        &self,
        context: &Context,
        params: &UploadFilePrepareParams,
    ) -> PluginResult<Option<UploadFilePrepareResult>>;

    /// Called after an upload attempt finishes.
    fn upload_file_finish_callback(
        &self,
        context: &Context,
        params: &UploadFileFinishParams,
    ) -> PluginResult<()>;

    /// Called before a remote file is downloaded.
    fn download_file_prepare_callback(
        &self,
        context: &Context,
        params: &DownloadFilePrepareParams,
    ) -> PluginResult<Option<DownloadFilePrepareResult>>;

    /// Called after a download attempt finishes.
    fn download_file_finish_callback(
        &self,
        context: &Context,
        params: &DownloadFileFinishParams,
    ) -> PluginResult<()>;

    /// Called before a local file joins a sync comparison.
    fn sync_scan_local_file_prepare_callback(
        &self,
        context: &Context,
        params: &SyncScanLocalFilePrepareParams,
    ) -> PluginResult<Option<SyncScanLocalFilePrepareResult>>;

    /// Called before a remote file joins a sync comparison.
    fn sync_scan_pan_file_prepare_callback(
        &self,
        context: &Context,
        params: &SyncScanPanFilePrepareParams,
    ) -> PluginResult<Option<SyncScanPanFilePrepareResult>>;

    /// Called after one file is synchronized.
    fn sync_file_finish_callback(
        &self,
        context: &Context,
        params: &SyncFileFinishParams,
    ) -> PluginResult<()>;

    /// Called after a sync task finishes all files.
    fn sync_all_file_finish_callback(
        &self,
        context: &Context,
        params: &SyncAllFileFinishParams,
    ) -> PluginResult<()>;

    /// Called after the access token is refreshed.
    fn user_token_refresh_finish_callback(
        &self,
        context: &Context,
        params: &UserTokenRefreshFinishParams,
    ) -> PluginResult<()>;

    /// Releases the extension.
    fn stop(&self) -> PluginResult<()>;
}
