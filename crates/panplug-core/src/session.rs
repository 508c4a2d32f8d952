//! Read-only snapshot of the signed-in cloud-drive account.
//!
//! The account/session machinery itself lives in the host. Plugins only
//! ever see the identity fields copied out of this snapshot.

use serde::{Deserialize, Serialize};

/// Drive tag for the user's main file space.
pub const DRIVE_TAG_FILE: &str = "File";
/// Drive tag for the user's media (album) space.
pub const DRIVE_TAG_ALBUM: &str = "Album";
/// Drive tag for the user's resource space.
pub const DRIVE_TAG_RESOURCE: &str = "Resource";

/// One storage space owned by the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveInfo {
    /// Drive identifier.
    pub drive_id: String,
    /// Drive tag: `File`, `Album` or `Resource`.
    pub drive_tag: String,
    /// Display name.
    #[serde(default)]
    pub drive_name: String,
}

/// Snapshot of the active account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanUser {
    /// Account identifier.
    pub user_id: String,
    /// Display name.
    #[serde(default)]
    pub nickname: String,
    /// Storage spaces available to the account.
    #[serde(default)]
    pub drives: Vec<DriveInfo>,
}

impl PanUser {
    /// Creates a snapshot with no drives.
    pub fn new(user_id: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            nickname: nickname.into(),
            drives: Vec::new(),
        }
    }

    /// Adds a drive to the snapshot.
    pub fn with_drive(mut self, drive_id: impl Into<String>, drive_tag: &str) -> Self {
        self.drives.push(DriveInfo {
            drive_id: drive_id.into(),
            drive_tag: drive_tag.to_string(),
            drive_name: String::new(),
        });
        self
    }

    /// Returns the id of the drive with the given tag, or an empty string.
    pub fn drive_id_by_tag(&self, tag: &str) -> &str {
        self.drives
            .iter()
            .find(|d| d.drive_tag == tag)
            .map(|d| d.drive_id.as_str())
            .unwrap_or("")
    }

    /// File space id.
    pub fn file_drive_id(&self) -> &str {
        self.drive_id_by_tag(DRIVE_TAG_FILE)
    }

    /// Media space id.
    pub fn album_drive_id(&self) -> &str {
        self.drive_id_by_tag(DRIVE_TAG_ALBUM)
    }

    /// Resource space id.
    pub fn resource_drive_id(&self) -> &str {
        self.drive_id_by_tag(DRIVE_TAG_RESOURCE)
    }
}
