//! Error type for the plugin framework.
//!
//! Load-time and invocation faults are reported through [`PluginError`];
//! absence of a hook is never an error. Everything maps cleanly into
//! `panplug_core::error::AppError`.

use std::path::PathBuf;

use panplug_core::error::{AppError, ErrorKind};
use thiserror::Error;

use crate::hooks::definitions::HookPoint;

/// Unified error type for plugin operations.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The script engine could not be created.
    #[error("Script engine initialization failed: {0}")]
    EngineInit(String),

    /// A hook was called before `start` or after `stop`.
    #[error("Script engine is not running")]
    NotStarted,

    /// A script failed to compile or threw during top-level evaluation.
    #[error("Script '{name}' failed to load: {message}")]
    Script {
        /// Script file name.
        name: String,
        /// Engine diagnostic.
        message: String,
    },

    /// A hook function threw or returned an error value.
    #[error("Hook '{hook}' failed: {message}")]
    Invocation {
        /// Hook that failed.
        hook: HookPoint,
        /// Script-side error message.
        message: String,
    },

    /// The configured plugin path is not a directory.
    #[error("Plugin path must be a folder: {path}")]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },

    /// HTTP client construction failure.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Key/value store failure.
    #[error("KV store error: {0}")]
    Kv(#[from] rusqlite::Error),

    /// JSON (de)serialization failure on the host side.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

impl From<PluginError> for AppError {
    fn from(err: PluginError) -> Self {
        match &err {
            PluginError::NotADirectory { .. } => AppError::validation(err.to_string()),
            PluginError::Io(_) => AppError::storage(err.to_string()),
            PluginError::Json(_) => AppError::new(ErrorKind::Serialization, err.to_string()),
            _ => AppError::plugin(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_kinds() {
        let io = PluginError::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(AppError::from(io).kind, ErrorKind::Storage);

        let dir = PluginError::NotADirectory {
            path: PathBuf::from("/tmp/file.txt"),
        };
        assert_eq!(AppError::from(dir).kind, ErrorKind::Validation);

        let invocation = PluginError::Invocation {
            hook: HookPoint::UploadFileFinish,
            message: "boom".to_string(),
        };
        let err = AppError::from(invocation);
        assert_eq!(err.kind, ErrorKind::Plugin);
        assert!(err.message.contains("upload_file_finish"));
    }
}
