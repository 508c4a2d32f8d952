//! Host utilities exposed to plugin scripts.
//!
//! These are plain Rust services; `crate::js::bridge` binds them into the
//! script global scope. Every utility reports failure through its return
//! value and never propagates an error into the script.

pub mod fs;
pub mod http;
pub mod kv;
pub mod mail;

use std::path::PathBuf;
use std::time::Duration;

use panplug_core::config::http::HttpConfig;

use crate::error::PluginResult;

pub use http::{HttpBody, HttpClient};
pub use kv::KvStore;
pub use mail::{MailBody, MailRequest, Mailer};

/// Bundle of host services shared by the bound script functions.
#[derive(Debug)]
pub struct HostServices {
    /// Outbound HTTP client.
    pub http: HttpClient,
    /// Persistent key/value store, when configured.
    pub kv: Option<KvStore>,
    /// SMTP sender.
    pub mail: Mailer,
}

impl HostServices {
    /// Creates the services from configuration.
    pub fn new(http: &HttpConfig, kv_path: Option<PathBuf>) -> PluginResult<Self> {
        Ok(Self {
            http: HttpClient::new(http)?,
            kv: kv_path.map(KvStore::new),
            mail: Mailer::new(Duration::from_secs(http.timeout_seconds)),
        })
    }
}
