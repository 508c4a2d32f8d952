//! JavaScript extension adapter.
//!
//! Scripts are evaluated into one shared QuickJS context. A hook is
//! implemented when a global function with its callback name exists.

pub mod bridge;
pub mod plugin;

pub use plugin::{JsPlugin, JsPluginOptions};
