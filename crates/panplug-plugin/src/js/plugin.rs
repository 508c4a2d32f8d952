//! [`JsPlugin`]: the [`Plugin`] implementation backed by QuickJS.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rquickjs::{CatchResultExt, Context as JsContext, Runtime, Value};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use panplug_core::config::http::HttpConfig;
use panplug_core::config::plugin::PluginConfig;

use crate::api::context::Context;
use crate::api::params::{
    DownloadFileFinishParams, DownloadFilePrepareParams, DownloadFilePrepareResult,
    SyncAllFileFinishParams, SyncFileFinishParams, SyncScanLocalFilePrepareParams,
    SyncScanLocalFilePrepareResult, SyncScanPanFilePrepareParams, SyncScanPanFilePrepareResult,
    UploadFileFinishParams, UploadFilePrepareParams, UploadFilePrepareResult,
    UserTokenRefreshFinishParams,
};
use crate::error::{PluginError, PluginResult};
use crate::hooks::definitions::HookPoint;
use crate::host::HostServices;
use crate::js::bridge;
use crate::traits::Plugin;

/// Settings for a [`JsPlugin`] engine.
#[derive(Debug, Clone, Default)]
pub struct JsPluginOptions {
    /// HTTP client settings for `PluginUtil.Http`.
    pub http: HttpConfig,
    /// Backing file for `PluginUtil.KV`; `None` disables the store.
    pub kv_path: Option<PathBuf>,
    /// Engine heap limit in bytes (0 = unlimited).
    pub memory_limit_bytes: usize,
}

impl JsPluginOptions {
    /// Derives engine options from application configuration.
    pub fn from_config(plugins: &PluginConfig, http: &HttpConfig) -> Self {
        Self {
            http: http.clone(),
            kv_path: Some(plugins.kv_path()),
            memory_limit_bytes: plugins.memory_limit_mb.saturating_mul(1024 * 1024),
        }
    }
}

/// A running QuickJS runtime with the host namespace installed.
struct JsEngine {
    context: JsContext,
    // Kept alive for the lifetime of `context`.
    _runtime: Runtime,
}

impl fmt::Debug for JsEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsEngine").finish_non_exhaustive()
    }
}

/// Extension whose hooks are global functions in loaded scripts.
///
/// Hook calls are serialized: one call runs in the engine at a time, and
/// concurrent callers block until it returns.
#[derive(Debug)]
pub struct JsPlugin {
    /// Engine settings.
    options: JsPluginOptions,
    /// Engine, present between `start` and `stop`.
    engine: Mutex<Option<JsEngine>>,
    /// Hooks for which a callable global currently exists.
    implemented: RwLock<HashSet<HookPoint>>,
    /// Names of scripts that evaluated successfully, in load order.
    scripts: RwLock<Vec<String>>,
}

impl JsPlugin {
    /// Creates a stopped plugin.
    pub fn new(options: JsPluginOptions) -> Self {
        Self {
            options,
            engine: Mutex::new(None),
            implemented: RwLock::new(HashSet::new()),
            scripts: RwLock::new(Vec::new()),
        }
    }

    /// Whether the engine is running.
    pub fn is_running(&self) -> bool {
        self.engine.lock().is_some()
    }

    /// Evaluates `source` in the shared global scope.
    ///
    /// Later scripts may redefine globals from earlier ones. The implemented
    /// hook set is refreshed whether or not evaluation succeeded, since a
    /// script can define functions before it throws.
    pub fn load_script(&self, name: &str, source: &str) -> PluginResult<()> {
        let guard = self.engine.lock();
        let engine = guard.as_ref().ok_or(PluginError::NotStarted)?;

        let result = engine.context.with(|ctx| {
            ctx.eval::<Value, _>(source)
                .catch(&ctx)
                .map(|_| ())
                .map_err(|e| PluginError::Script {
                    name: name.to_string(),
                    message: e.to_string(),
                })
        });

        let found = probe_hooks(&engine.context);
        drop(guard);

        match &result {
            Ok(()) => {
                self.scripts.write().push(name.to_string());
                debug!(script = %name, hooks = found.len(), "Script loaded");
            }
            Err(e) => warn!(script = %name, error = %e, "Script failed to load"),
        }
        *self.implemented.write() = found;

        result
    }

    /// Reads and evaluates a script file. The file name is used as the script name.
    pub fn load_script_file(&self, path: &Path) -> PluginResult<()> {
        let source = std::fs::read_to_string(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.load_script(&name, &source)
    }

    /// Hooks currently backed by a script function, in declaration order.
    pub fn implemented_hooks(&self) -> Vec<HookPoint> {
        let implemented = self.implemented.read();
        HookPoint::ALL
            .into_iter()
            .filter(|h| implemented.contains(h))
            .collect()
    }

    /// Whether `hook` is backed by a script function.
    pub fn implements(&self, hook: HookPoint) -> bool {
        self.implemented.read().contains(&hook)
    }

    /// Names of successfully loaded scripts.
    pub fn script_names(&self) -> Vec<String> {
        self.scripts.read().clone()
    }

    /// Invokes a prepare hook and decodes its result.
    ///
    /// A result that does not match the expected shape is treated as no
    /// opinion and logged.
    fn call_prepare<P, R>(&self, hook: HookPoint, context: &Context, params: &P) -> PluginResult<Option<R>>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let Some(raw) = self.invoke(hook, context, params)? else {
            return Ok(None);
        };
        // Only a plain object is a result.
        let value = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value @ serde_json::Value::Object(_)) => value,
            Ok(other) => {
                warn!(hook = %hook, returned = %other, "Ignoring non-object hook result");
                return Ok(None);
            }
            Err(e) => {
                warn!(hook = %hook, error = %e, "Ignoring malformed hook result");
                return Ok(None);
            }
        };
        match serde_json::from_value::<R>(value) {
            Ok(result) => Ok(Some(result)),
            Err(e) => {
                warn!(hook = %hook, error = %e, "Ignoring malformed hook result");
                Ok(None)
            }
        }
    }

    /// Invokes a finish hook; its return value is ignored.
    fn call_finish<P: Serialize>(&self, hook: HookPoint, context: &Context, params: &P) -> PluginResult<()> {
        self.invoke(hook, context, params).map(|_| ())
    }

    /// Calls the script function for `hook` and returns its result as JSON text.
    ///
    /// `Ok(None)` covers a missing function, a stopped engine, and an
    /// `undefined`/`null` return. A returned promise is run to completion:
    /// a rejection is an invocation failure, a promise that cannot settle
    /// is ignored.
    fn invoke<P: Serialize>(&self, hook: HookPoint, context: &Context, params: &P) -> PluginResult<Option<String>> {
        if !self.implements(hook) {
            return Ok(None);
        }

        let context_json = serde_json::to_string(context)?;
        let params_json = serde_json::to_string(params)?;

        let guard = self.engine.lock();
        let Some(engine) = guard.as_ref() else {
            return Ok(None);
        };

        let invocation = |message: String| PluginError::Invocation { hook, message };

        let result = engine.context.with(|ctx| {
            let value: Value = ctx
                .globals()
                .get(hook.function_name())
                .map_err(|e| invocation(e.to_string()))?;
            let Some(func) = value.as_function() else {
                debug!(hook = %hook, "Hook global is no longer a function");
                return Ok(None);
            };

            let js_context = ctx
                .json_parse(context_json)
                .catch(&ctx)
                .map_err(|e| invocation(e.to_string()))?;
            let js_params = ctx
                .json_parse(params_json)
                .catch(&ctx)
                .map_err(|e| invocation(e.to_string()))?;

            let returned: Value = func
                .call((js_context, js_params))
                .catch(&ctx)
                .map_err(|e| invocation(e.to_string()))?;

            let returned = if let Some(promise) = returned.as_promise().cloned() {
                let settled = promise.finish::<Value>();
                if matches!(settled, Err(rquickjs::Error::WouldBlock)) {
                    warn!(hook = %hook, "Hook promise did not settle, ignoring result");
                    return Ok(None);
                }
                settled.catch(&ctx).map_err(|e| invocation(e.to_string()))?
            } else {
                returned
            };

            if returned.is_undefined() || returned.is_null() {
                return Ok(None);
            }
            if let Some(exception) = returned.as_exception() {
                return Err(invocation(exception.message().unwrap_or_default()));
            }

            let json = ctx
                .json_stringify(returned)
                .catch(&ctx)
                .map_err(|e| invocation(e.to_string()))?;
            match json {
                Some(text) => text.to_string().map(Some).map_err(|e| invocation(e.to_string())),
                None => Ok(None),
            }
        });

        if let Err(e) = &result {
            warn!(hook = %hook, error = %e, "Hook invocation failed");
        }
        result
    }
}

/// Collects the hooks whose callback name resolves to a function.
fn probe_hooks(context: &JsContext) -> HashSet<HookPoint> {
    context.with(|ctx| {
        let globals = ctx.globals();
        HookPoint::ALL
            .into_iter()
            .filter(|hook| {
                globals
                    .get::<_, Value>(hook.function_name())
                    .map(|v| v.is_function())
                    .unwrap_or(false)
            })
            .collect()
    })
}

impl Plugin for JsPlugin {
    fn name(&self) -> &str {
        "JsPlugin"
    }

    fn start(&self) -> PluginResult<()> {
        let mut guard = self.engine.lock();
        if guard.is_some() {
            return Ok(());
        }

        let runtime = Runtime::new().map_err(|e| PluginError::EngineInit(e.to_string()))?;
        if self.options.memory_limit_bytes > 0 {
            runtime.set_memory_limit(self.options.memory_limit_bytes);
        }
        let context = JsContext::full(&runtime).map_err(|e| PluginError::EngineInit(e.to_string()))?;

        let services = Arc::new(HostServices::new(
            &self.options.http,
            self.options.kv_path.clone(),
        )?);
        context
            .with(|ctx| bridge::install(&ctx, services))
            .map_err(|e| PluginError::EngineInit(e.to_string()))?;

        *guard = Some(JsEngine {
            context,
            _runtime: runtime,
        });
        info!(
            memory_limit_bytes = self.options.memory_limit_bytes,
            "Script engine started"
        );
        Ok(())
    }

    fn upload_file_prepare_callback(
        &self,
        context: &Context,
        params: &UploadFilePrepareParams,
    ) -> PluginResult<Option<UploadFilePrepareResult>> {
        self.call_prepare(HookPoint::UploadFilePrepare, context, params)
    }

    fn upload_file_finish_callback(
        &self,
        context: &Context,
        params: &UploadFileFinishParams,
    ) -> PluginResult<()> {
        self.call_finish(HookPoint::UploadFileFinish, context, params)
    }

    fn download_file_prepare_callback(
        &self,
        context: &Context,
        params: &DownloadFilePrepareParams,
    ) -> PluginResult<Option<DownloadFilePrepareResult>> {
        self.call_prepare(HookPoint::DownloadFilePrepare, context, params)
    }

    fn download_file_finish_callback(
        &self,
        context: &Context,
        params: &DownloadFileFinishParams,
    ) -> PluginResult<()> {
        self.call_finish(HookPoint::DownloadFileFinish, context, params)
    }

    fn sync_scan_local_file_prepare_callback(
        &self,
        context: &Context,
        params: &SyncScanLocalFilePrepareParams,
    ) -> PluginResult<Option<SyncScanLocalFilePrepareResult>> {
        self.call_prepare(HookPoint::SyncScanLocalFilePrepare, context, params)
    }

    fn sync_scan_pan_file_prepare_callback(
        &self,
        context: &Context,
        params: &SyncScanPanFilePrepareParams,
    ) -> PluginResult<Option<SyncScanPanFilePrepareResult>> {
        self.call_prepare(HookPoint::SyncScanPanFilePrepare, context, params)
    }

    fn sync_file_finish_callback(
        &self,
        context: &Context,
        params: &SyncFileFinishParams,
    ) -> PluginResult<()> {
        self.call_finish(HookPoint::SyncFileFinish, context, params)
    }

    fn sync_all_file_finish_callback(
        &self,
        context: &Context,
        params: &SyncAllFileFinishParams,
    ) -> PluginResult<()> {
        self.call_finish(HookPoint::SyncAllFileFinish, context, params)
    }

    fn user_token_refresh_finish_callback(
        &self,
        context: &Context,
        params: &UserTokenRefreshFinishParams,
    ) -> PluginResult<()> {
        self.call_finish(HookPoint::UserTokenRefreshFinish, context, params)
    }

    fn stop(&self) -> PluginResult<()> {
        let engine = self.engine.lock().take();
        self.implemented.write().clear();
        self.scripts.write().clear();
        if engine.is_some() {
            info!("Script engine stopped");
        }
        Ok(())
    }
}
