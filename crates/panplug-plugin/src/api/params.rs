//! Per-hook parameter and result records.
//!
//! Every record is flat (strings and integers only) and serializes with
//! the camel-case field names scripts see. Result records default every
//! field so a script may return a partial object.
//!
//! Scripts see integers as IEEE-754 doubles, so `*FileSize` values above
//! [`MAX_SCRIPT_SAFE_SIZE`] reach a script rounded to the nearest double.

use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Approval flag value: proceed.
pub const APPROVED: &str = "yes";
/// Approval flag value: the extension declines.
pub const DECLINED: &str = "no";

/// `localFileType` / `driveFileType` value for regular files.
pub const FILE_TYPE_FILE: &str = "file";
/// `localFileType` / `driveFileType` value for directories.
pub const FILE_TYPE_FOLDER: &str = "folder";

/// Largest size a script observes exactly (`Number.MAX_SAFE_INTEGER`).
pub const MAX_SCRIPT_SAFE_SIZE: i64 = (1 << 53) - 1;

/// Timestamp layout used in every `*UpdatedAt` field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a timestamp the way scripts expect it.
pub fn format_timestamp(time: DateTime<Local>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Facts about a local path shared by the local-file params.
struct LocalFileFacts {
    path: String,
    name: String,
    size: i64,
    file_type: &'static str,
    updated_at: String,
}

impl LocalFileFacts {
    fn read(path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        let updated_at = meta
            .modified()
            .map(|t| format_timestamp(DateTime::<Local>::from(t)))
            .unwrap_or_default();
        Ok(Self {
            path: path.to_string_lossy().into_owned(),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size: i64::try_from(meta.len()).unwrap_or(i64::MAX),
            file_type: if meta.is_dir() {
                FILE_TYPE_FOLDER
            } else {
                FILE_TYPE_FILE
            },
            updated_at,
        })
    }
}

// ── Upload ──────────────────────────────────────────────────────────

/// Parameters of `uploadFilePrepareCallback`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadFilePrepareParams {
    /// Absolute local path.
    pub local_file_path: String,
    /// Local file name.
    pub local_file_name: String,
    /// Size in bytes. Exact in scripts up to [`MAX_SCRIPT_SAFE_SIZE`].
    pub local_file_size: i64,
    /// `file` or `folder`.
    pub local_file_type: String,
    /// Modification time.
    pub local_file_updated_at: String,
    /// Destination drive.
    pub drive_id: String,
    /// Destination path, relative to the upload target folder.
    pub drive_file_path: String,
}

impl UploadFilePrepareParams {
    /// Builds params from the metadata of a local path.
    pub fn from_local_path(
        path: &Path,
        drive_id: impl Into<String>,
        drive_file_path: impl Into<String>,
    ) -> std::io::Result<Self> {
        let facts = LocalFileFacts::read(path)?;
        Ok(Self {
            local_file_path: facts.path,
            local_file_name: facts.name,
            local_file_size: facts.size,
            local_file_type: facts.file_type.to_string(),
            local_file_updated_at: facts.updated_at,
            drive_id: drive_id.into(),
            drive_file_path: drive_file_path.into(),
        })
    }
}

/// Result of `uploadFilePrepareCallback`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadFilePrepareResult {
    /// `yes` to upload, anything else skips the file.
    pub upload_approved: String,
    /// Rewritten relative destination; empty keeps the original.
    pub drive_file_path: String,
}

impl UploadFilePrepareResult {
    /// Whether the upload may proceed.
    pub fn is_approved(&self) -> bool {
        self.upload_approved == APPROVED
    }

    /// The rewritten destination, if any.
    pub fn rewritten_path(&self) -> Option<&str> {
        Some(self.drive_file_path.as_str()).filter(|p| !p.is_empty())
    }
}

/// Parameters of `uploadFileFinishCallback`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadFileFinishParams {
    /// Absolute local path.
    pub local_file_path: String,
    /// Local file name.
    pub local_file_name: String,
    /// Size in bytes. Exact in scripts up to [`MAX_SCRIPT_SAFE_SIZE`].
    pub local_file_size: i64,
    /// `file` or `folder`.
    pub local_file_type: String,
    /// Modification time.
    pub local_file_updated_at: String,
    /// Content SHA-1; may be empty.
    pub local_file_sha1: String,
    /// `success` or `fail`.
    pub upload_result: String,
    /// Destination drive.
    pub drive_id: String,
    /// Absolute destination path.
    pub drive_file_path: String,
}

// ── Download ────────────────────────────────────────────────────────

/// Parameters of `downloadFilePrepareCallback`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DownloadFilePrepareParams {
    /// Source drive.
    pub drive_id: String,
    /// Remote file name.
    pub drive_file_name: String,
    /// Remote path.
    pub drive_file_path: String,
    /// Remote content SHA-1.
    pub drive_file_sha1: String,
    /// Size in bytes. Exact in scripts up to [`MAX_SCRIPT_SAFE_SIZE`].
    pub drive_file_size: i64,
    /// `file` or `folder`.
    pub drive_file_type: String,
    /// Remote modification time.
    pub drive_file_updated_at: String,
    /// Proposed local destination.
    pub local_file_path: String,
}

/// Result of `downloadFilePrepareCallback`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DownloadFilePrepareResult {
    /// `yes` to download, anything else skips the file.
    pub download_approved: String,
    /// Rewritten local path relative to the download root; empty keeps the original.
    pub local_file_path: String,
}

impl DownloadFilePrepareResult {
    /// Whether the download may proceed.
    pub fn is_approved(&self) -> bool {
        self.download_approved == APPROVED
    }

    /// The rewritten local path, if any.
    pub fn rewritten_path(&self) -> Option<&str> {
        Some(self.local_file_path.as_str()).filter(|p| !p.is_empty())
    }
}

/// Parameters of `downloadFileFinishCallback`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DownloadFileFinishParams {
    /// Source drive.
    pub drive_id: String,
    /// Remote file id.
    pub drive_file_id: String,
    /// Remote file name.
    pub drive_file_name: String,
    /// Remote path.
    pub drive_file_path: String,
    /// Remote content SHA-1.
    pub drive_file_sha1: String,
    /// Size in bytes. Exact in scripts up to [`MAX_SCRIPT_SAFE_SIZE`].
    pub drive_file_size: i64,
    /// `file` or `folder`.
    pub drive_file_type: String,
    /// Remote modification time.
    pub drive_file_updated_at: String,
    /// `success` or `fail`.
    pub download_result: String,
    /// Final local path.
    pub local_file_path: String,
}

// ── Sync ────────────────────────────────────────────────────────────

/// Parameters of `syncScanLocalFilePrepareCallback`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncScanLocalFilePrepareParams {
    /// Absolute local path.
    pub local_file_path: String,
    /// Local file name.
    pub local_file_name: String,
    /// Size in bytes. Exact in scripts up to [`MAX_SCRIPT_SAFE_SIZE`].
    pub local_file_size: i64,
    /// `file` or `folder`.
    pub local_file_type: String,
    /// Modification time.
    pub local_file_updated_at: String,
    /// Drive the sync task targets.
    pub drive_id: String,
}

impl SyncScanLocalFilePrepareParams {
    /// Builds params from the metadata of a local path.
    pub fn from_local_path(path: &Path, drive_id: impl Into<String>) -> std::io::Result<Self> {
        let facts = LocalFileFacts::read(path)?;
        Ok(Self {
            local_file_path: facts.path,
            local_file_name: facts.name,
            local_file_size: facts.size,
            local_file_type: facts.file_type.to_string(),
            local_file_updated_at: facts.updated_at,
            drive_id: drive_id.into(),
        })
    }
}

/// Result of `syncScanLocalFilePrepareCallback`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncScanLocalFilePrepareResult {
    /// `no` excludes the file from the scan.
    pub sync_scan_local_approved: String,
}

impl SyncScanLocalFilePrepareResult {
    /// Whether the script excluded the file.
    pub fn is_declined(&self) -> bool {
        self.sync_scan_local_approved == DECLINED
    }
}

/// Parameters of `syncScanPanFilePrepareCallback`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncScanPanFilePrepareParams {
    /// Drive the file lives in.
    pub drive_id: String,
    /// Remote file name.
    pub drive_file_name: String,
    /// Remote path.
    pub drive_file_path: String,
    /// Remote content SHA-1.
    pub drive_file_sha1: String,
    /// Size in bytes. Exact in scripts up to [`MAX_SCRIPT_SAFE_SIZE`].
    pub drive_file_size: i64,
    /// `file` or `folder`.
    pub drive_file_type: String,
    /// Remote modification time.
    pub drive_file_updated_at: String,
}

/// Result of `syncScanPanFilePrepareCallback`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncScanPanFilePrepareResult {
    /// `no` excludes the file from the scan.
    pub sync_scan_pan_approved: String,
}

impl SyncScanPanFilePrepareResult {
    /// Whether the script excluded the file.
    pub fn is_declined(&self) -> bool {
        self.sync_scan_pan_approved == DECLINED
    }
}

/// Parameters of `syncFileFinishCallback`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncFileFinishParams {
    /// Sync action taken (upload, download, delete...).
    pub action: String,
    /// `success` or `fail`.
    pub action_result: String,
    /// Drive involved.
    pub drive_id: String,
    /// Remote file id.
    pub drive_file_id: String,
    /// File name.
    pub file_name: String,
    /// File path.
    pub file_path: String,
    /// Content SHA-1.
    pub file_sha1: String,
    /// Size in bytes. Exact in scripts up to [`MAX_SCRIPT_SAFE_SIZE`].
    pub file_size: i64,
    /// `file` or `folder`.
    pub file_type: String,
    /// Modification time.
    pub file_updated_at: String,
}

/// Parameters of `syncAllFileFinishCallback`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncAllFileFinishParams {
    /// Task name.
    pub name: String,
    /// Task id.
    pub id: String,
    /// Account id.
    pub user_id: String,
    /// `backup` or `resource`.
    pub drive_name: String,
    /// Drive id.
    pub drive_id: String,
    /// Local folder being synced.
    pub local_folder_path: String,
    /// Remote folder being synced.
    pub pan_folder_path: String,
    /// Sync mode.
    pub mode: String,
    /// Sync policy.
    pub policy: String,
}

// ── Account ─────────────────────────────────────────────────────────

/// Parameters of `userTokenRefreshFinishCallback`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserTokenRefreshFinishParams {
    /// `success` or `fail`.
    pub result: String,
    /// Diagnostic message.
    pub message: String,
    /// Token before refresh.
    pub old_token: String,
    /// Token after refresh.
    pub new_token: String,
    /// Refresh time.
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_params_field_names() {
        let params = UploadFilePrepareParams {
            local_file_path: "/tmp/a.txt".into(),
            local_file_size: 125330,
            ..Default::default()
        };
        let json = serde_json::to_value(&params).expect("serialize");
        assert_eq!(json["localFilePath"], "/tmp/a.txt");
        assert_eq!(json["localFileSize"], 125330);
        assert!(json.get("driveId").is_some());
        assert!(json.get("driveFilePath").is_some());
    }

    #[test]
    fn test_partial_result_uses_defaults() {
        let result: DownloadFilePrepareResult =
            serde_json::from_str(r#"{"downloadApproved":"no"}"#).expect("parse");
        assert!(!result.is_approved());
        assert_eq!(result.rewritten_path(), None);
    }

    #[test]
    fn test_approval_readings() {
        let upload = UploadFilePrepareResult {
            upload_approved: APPROVED.into(),
            drive_file_path: "new/a.bin".into(),
        };
        assert!(upload.is_approved());
        assert_eq!(upload.rewritten_path(), Some("new/a.bin"));

        // Sync scans only exclude on an explicit "no".
        let scan = SyncScanLocalFilePrepareResult::default();
        assert!(!scan.is_declined());
        let scan = SyncScanPanFilePrepareResult {
            sync_scan_pan_approved: DECLINED.into(),
        };
        assert!(scan.is_declined());
    }

    #[test]
    fn test_params_tolerate_missing_fields() {
        let params: DownloadFilePrepareParams =
            serde_json::from_str(r#"{"driveFileName":"a.tmp"}"#).expect("parse");
        assert_eq!(params.drive_file_name, "a.tmp");
        assert_eq!(params.drive_file_size, 0);
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let parsed = serde_json::from_str::<UploadFilePrepareResult>(r#"{"uploadApproved":1}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_from_local_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("token.bat");
        std::fs::write(&file, b"hello").expect("write");

        let params =
            UploadFilePrepareParams::from_local_path(&file, "19519221", "Downloads/token.bat")
                .expect("params");
        assert_eq!(params.local_file_name, "token.bat");
        assert_eq!(params.local_file_size, 5);
        assert_eq!(params.local_file_type, FILE_TYPE_FILE);
        assert_eq!(params.local_file_updated_at.len(), 19);

        let scan = SyncScanLocalFilePrepareParams::from_local_path(dir.path(), "1").expect("dir");
        assert_eq!(scan.local_file_type, FILE_TYPE_FOLDER);
    }
}
