//! All hook point definitions.

use serde::{Deserialize, Serialize};

/// Enumeration of every extension point the host fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPoint {
    // ── Upload ──
    /// Fired before a local file is uploaded. Can approve, decline, or rename.
    UploadFilePrepare,
    /// Fired after an upload attempt finishes.
    UploadFileFinish,

    // ── Download ──
    /// Fired before a remote file is downloaded. Can approve, decline, or relocate.
    DownloadFilePrepare,
    /// Fired after a download attempt finishes.
    DownloadFileFinish,

    // ── Sync ──
    /// Fired before a local file joins a sync comparison. Can decline.
    SyncScanLocalFilePrepare,
    /// Fired before a remote file joins a sync comparison. Can decline.
    SyncScanPanFilePrepare,
    /// Fired after one file is synchronized.
    SyncFileFinish,
    /// Fired after a sync task finishes all files.
    SyncAllFileFinish,

    // ── Account ──
    /// Fired after the access token is refreshed.
    UserTokenRefreshFinish,
}

impl HookPoint {
    /// Every hook point, in declaration order.
    pub const ALL: [HookPoint; 9] = [
        Self::UploadFilePrepare,
        Self::UploadFileFinish,
        Self::DownloadFilePrepare,
        Self::DownloadFileFinish,
        Self::SyncScanLocalFilePrepare,
        Self::SyncScanPanFilePrepare,
        Self::SyncFileFinish,
        Self::SyncAllFileFinish,
        Self::UserTokenRefreshFinish,
    ];

    /// Returns the string name of this hook point.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UploadFilePrepare => "upload_file_prepare",
            Self::UploadFileFinish => "upload_file_finish",
            Self::DownloadFilePrepare => "download_file_prepare",
            Self::DownloadFileFinish => "download_file_finish",
            Self::SyncScanLocalFilePrepare => "sync_scan_local_file_prepare",
            Self::SyncScanPanFilePrepare => "sync_scan_pan_file_prepare",
            Self::SyncFileFinish => "sync_file_finish",
            Self::SyncAllFileFinish => "sync_all_file_finish",
            Self::UserTokenRefreshFinish => "user_token_refresh_finish",
        }
    }

    /// Name of the top-level script function implementing this hook.
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::UploadFilePrepare => "uploadFilePrepareCallback",
            Self::UploadFileFinish => "uploadFileFinishCallback",
            Self::DownloadFilePrepare => "downloadFilePrepareCallback",
            Self::DownloadFileFinish => "downloadFileFinishCallback",
            Self::SyncScanLocalFilePrepare => "syncScanLocalFilePrepareCallback",
            Self::SyncScanPanFilePrepare => "syncScanPanFilePrepareCallback",
            Self::SyncFileFinish => "syncFileFinishCallback",
            Self::SyncAllFileFinish => "syncAllFileFinishCallback",
            Self::UserTokenRefreshFinish => "userTokenRefreshFinishCallback",
        }
    }

    /// Returns whether this is a "prepare" hook that produces a result.
    pub fn is_prepare_hook(&self) -> bool {
        matches!(
            self,
            Self::UploadFilePrepare
                | Self::DownloadFilePrepare
                | Self::SyncScanLocalFilePrepare
                | Self::SyncScanPanFilePrepare
        )
    }

    /// Looks a hook up by either its snake-case name or its script function name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|h| h.as_str() == name || h.function_name() == name)
    }
}

impl std::fmt::Display for HookPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_names_are_unique() {
        let mut names: Vec<&str> = HookPoint::ALL.iter().map(|h| h.function_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), HookPoint::ALL.len());
    }

    #[test]
    fn test_parse_accepts_both_spellings() {
        assert_eq!(
            HookPoint::parse("download_file_prepare"),
            Some(HookPoint::DownloadFilePrepare)
        );
        assert_eq!(
            HookPoint::parse("syncScanPanFilePrepareCallback"),
            Some(HookPoint::SyncScanPanFilePrepare)
        );
        assert_eq!(HookPoint::parse("removeFilePrepareCallback"), None);
    }

    #[test]
    fn test_prepare_hooks() {
        let prepare: Vec<HookPoint> = HookPoint::ALL
            .into_iter()
            .filter(HookPoint::is_prepare_hook)
            .collect();
        assert_eq!(prepare.len(), 4);
        assert!(!HookPoint::UploadFileFinish.is_prepare_hook());
    }
}
