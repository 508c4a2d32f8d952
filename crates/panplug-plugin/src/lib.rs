//! # panplug-plugin
//!
//! Extension framework for the cloud-drive client.
//!
//! The upload, download, and sync pipelines call into a single [`Plugin`]
//! at fixed hook points. [`PluginManager`] decides once per process
//! whether that plugin is the [`IdlePlugin`] or a [`JsPlugin`] built from
//! every `*.js` file in `<plugin_dir>/js`.
//!
//! ## Hooks
//!
//! | Hook | Script function | Returns |
//! |------|-----------------|---------|
//! | upload prepare | `uploadFilePrepareCallback` | approval, remote path |
//! | upload finish | `uploadFileFinishCallback` | nothing |
//! | download prepare | `downloadFilePrepareCallback` | approval, local path |
//! | download finish | `downloadFileFinishCallback` | nothing |
//! | sync local scan | `syncScanLocalFilePrepareCallback` | approval |
//! | sync remote scan | `syncScanPanFilePrepareCallback` | approval |
//! | sync file finish | `syncFileFinishCallback` | nothing |
//! | sync all finish | `syncAllFileFinishCallback` | nothing |
//! | token refresh | `userTokenRefreshFinishCallback` | nothing |

pub mod active;
pub mod api;
pub mod error;
pub mod hooks;
pub mod host;
pub mod idle;
pub mod js;
pub mod manager;
pub mod traits;

pub use active::ActivePlugin;
pub use api::context::Context;
pub use error::{PluginError, PluginResult};
pub use hooks::HookPoint;
pub use idle::IdlePlugin;
pub use js::{JsPlugin, JsPluginOptions};
pub use manager::{FailedScript, LoadReport, PluginManager};
pub use traits::Plugin;
