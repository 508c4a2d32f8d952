//! Plugin context: the identity snapshot handed to every hook.

use serde::{Deserialize, Serialize};

use panplug_core::session::PanUser;
use panplug_core::{APP_NAME, APP_VERSION};

/// Read-only per-call snapshot of application and account identity.
///
/// Built fresh for each hook invocation; scripts receive a copy and
/// cannot write back into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    /// Application name.
    pub app_name: String,
    /// Application version.
    pub version: String,
    /// Active user id (empty when nobody is signed in).
    pub user_id: String,
    /// Active user display name.
    pub nickname: String,
    /// File space id of the active user.
    pub file_drive_id: String,
    /// Media space id of the active user.
    pub album_drive_id: String,
}

impl Context {
    /// Builds a context from the active session, if any.
    pub fn from_session(user: Option<&PanUser>) -> Self {
        match user {
            Some(user) => Self {
                app_name: APP_NAME.to_string(),
                version: APP_VERSION.to_string(),
                user_id: user.user_id.clone(),
                nickname: user.nickname.clone(),
                file_drive_id: user.file_drive_id().to_string(),
                album_drive_id: user.album_drive_id().to_string(),
            },
            None => Self::anonymous(),
        }
    }

    /// Context with only the static application fields populated.
    pub fn anonymous() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            version: APP_VERSION.to_string(),
            user_id: String::new(),
            nickname: String::new(),
            file_drive_id: String::new(),
            album_drive_id: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panplug_core::session::{DRIVE_TAG_ALBUM, DRIVE_TAG_FILE};

    #[test]
    fn test_anonymous_context() {
        let ctx = Context::from_session(None);
        assert_eq!(ctx.app_name, APP_NAME);
        assert_eq!(ctx.version, APP_VERSION);
        assert!(ctx.user_id.is_empty());
        assert!(ctx.nickname.is_empty());
        assert!(ctx.file_drive_id.is_empty());
        assert!(ctx.album_drive_id.is_empty());
    }

    #[test]
    fn test_session_context() {
        let user = PanUser::new("11001d48", "tickstep")
            .with_drive("19519111", DRIVE_TAG_FILE)
            .with_drive("29519122", DRIVE_TAG_ALBUM);
        let ctx = Context::from_session(Some(&user));
        assert_eq!(ctx.user_id, "11001d48");
        assert_eq!(ctx.nickname, "tickstep");
        assert_eq!(ctx.file_drive_id, "19519111");
        assert_eq!(ctx.album_drive_id, "29519122");
    }

    #[test]
    fn test_serializes_with_script_field_names() {
        let json = serde_json::to_value(Context::anonymous()).expect("serialize");
        let obj = json.as_object().expect("object");
        for key in [
            "appName",
            "version",
            "userId",
            "nickname",
            "fileDriveId",
            "albumDriveId",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj.len(), 6);
    }
}
