//! Blocking HTTP helpers for scripts.
//!
//! Transport errors are logged and turned into an empty body; scripts
//! never see an exception from these calls.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use tracing::{debug, warn};

use panplug_core::config::http::HttpConfig;

use crate::error::PluginResult;

/// Request body for [`HttpClient::post`].
#[derive(Debug, Clone, PartialEq)]
pub enum HttpBody {
    /// No body.
    Empty,
    /// Sent verbatim.
    Text(String),
    /// Serialized as JSON with a JSON content type.
    Json(serde_json::Value),
}

/// Thin wrapper around a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Underlying client.
    client: Client,
}

impl HttpClient {
    /// Builds a client honoring the configured timeout and user agent.
    pub fn new(config: &HttpConfig) -> PluginResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// Performs a GET request and returns the response body, or `""` on failure.
    pub fn get(&self, headers: &HashMap<String, String>, url: &str) -> String {
        let request = with_headers(self.client.get(url), headers);
        fetch("GET", url, request)
    }

    /// Performs a POST request and returns the response body, or `""` on failure.
    pub fn post(&self, headers: &HashMap<String, String>, url: &str, body: HttpBody) -> String {
        let request = with_headers(self.client.post(url), headers);
        let request = match body {
            HttpBody::Empty => request,
            HttpBody::Text(text) => request.body(text),
            HttpBody::Json(value) => request.json(&value),
        };
        fetch("POST", url, request)
    }
}

fn with_headers(mut request: RequestBuilder, headers: &HashMap<String, String>) -> RequestBuilder {
    for (name, value) in headers {
        request = request.header(name, value);
    }
    request
}

fn fetch(method: &str, url: &str, request: RequestBuilder) -> String {
    let response = match request.send() {
        Ok(r) => r,
        Err(e) => {
            warn!(method = %method, url = %url, error = %e, "Script HTTP request failed");
            return String::new();
        }
    };

    let status = response.status();
    match response.text() {
        Ok(body) => {
            debug!(
                method = %method,
                url = %url,
                status = status.as_u16(),
                bytes = body.len(),
                "Script HTTP request completed"
            );
            body
        }
        Err(e) => {
            warn!(method = %method, url = %url, error = %e, "Script HTTP body read failed");
            String::new()
        }
    }
}
