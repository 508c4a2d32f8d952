//! # panplug-core
//!
//! Core crate for panplug. Contains configuration schemas, the read-only
//! session snapshot consumed by the plugin context, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other panplug crates.

pub mod config;
pub mod error;
pub mod result;
pub mod session;

pub use error::AppError;
pub use result::AppResult;

/// Application name reported to plugins.
pub const APP_NAME: &str = "panplug";

/// Application version reported to plugins.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
