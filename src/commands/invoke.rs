//! `panplug invoke`: call one hook with hand-written params.

use clap::Args;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use panplug_core::config::AppConfig;
use panplug_core::{AppError, AppResult};
use panplug_plugin::api::params::{
    DownloadFileFinishParams, DownloadFilePrepareParams, SyncAllFileFinishParams,
    SyncFileFinishParams, SyncScanLocalFilePrepareParams, SyncScanPanFilePrepareParams,
    UploadFileFinishParams, UploadFilePrepareParams, UserTokenRefreshFinishParams,
};
use panplug_plugin::{ActivePlugin, Context, HookPoint, Plugin};

use crate::output::{self, OutputFormat};

/// Arguments for the invoke command
#[derive(Debug, Args)]
pub struct InvokeArgs {
    /// Hook name, e.g. `upload_file_prepare` or `uploadFilePrepareCallback`
    pub hook: String,

    /// Params as inline JSON, or `@path` to read them from a file
    #[arg(short, long, default_value = "{}")]
    pub params: String,
}

/// What the hook call produced.
#[derive(Debug, Serialize)]
struct InvokeOutcome {
    hook: HookPoint,
    function: &'static str,
    plugin: String,
    /// `None` when the plugin had no opinion or the hook is a finish hook.
    result: Option<Value>,
}

/// Execute the invoke command
pub async fn execute(args: &InvokeArgs, config: AppConfig, format: OutputFormat) -> AppResult<()> {
    let hook = HookPoint::parse(&args.hook)
        .ok_or_else(|| AppError::validation(format!("Unknown hook '{}'", args.hook)))?;
    let params = read_params(&args.params)?;

    let outcome = super::with_discovered(config, move |plugin, _, config| {
        let context = Context::from_session(config.session.as_ref());
        let result = dispatch(plugin, hook, &context, params)?;
        Ok(InvokeOutcome {
            hook,
            function: hook.function_name(),
            plugin: plugin.name().to_string(),
            result,
        })
    })
    .await?;

    match format {
        OutputFormat::Json => output::print_json(&outcome),
        OutputFormat::Table => {
            output::print_kv("Hook", outcome.function);
            output::print_kv("Plugin", &outcome.plugin);
            match &outcome.result {
                Some(result) => {
                    output::print_kv("Result", "");
                    output::print_json(result);
                }
                None if hook.is_prepare_hook() => output::print_kv("Result", "(no opinion)"),
                None => output::print_success("Hook completed"),
            }
        }
    }
    Ok(())
}

/// Parses inline JSON or the contents of an `@file`.
fn read_params(raw: &str) -> AppResult<Value> {
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)?,
        None => raw.to_string(),
    };
    Ok(serde_json::from_str(&text)?)
}

fn decode<P: DeserializeOwned>(params: Value) -> AppResult<P> {
    serde_json::from_value(params)
        .map_err(|e| AppError::validation(format!("Invalid params: {e}")))
}

fn encode<R: Serialize>(result: Option<R>) -> AppResult<Option<Value>> {
    result
        .map(|r| serde_json::to_value(r))
        .transpose()
        .map_err(AppError::from)
}

/// Routes `params` to the hook method and returns its result as JSON.
fn dispatch(
    plugin: &ActivePlugin,
    hook: HookPoint,
    context: &Context,
    params: Value,
) -> AppResult<Option<Value>> {
    match hook {
        HookPoint::UploadFilePrepare => {
            let p: UploadFilePrepareParams = decode(params)?;
            encode(plugin.upload_file_prepare_callback(context, &p)?)
        }
        HookPoint::UploadFileFinish => {
            let p: UploadFileFinishParams = decode(params)?;
            plugin.upload_file_finish_callback(context, &p)?;
            Ok(None)
        }
        HookPoint::DownloadFilePrepare => {
            let p: DownloadFilePrepareParams = decode(params)?;
            encode(plugin.download_file_prepare_callback(context, &p)?)
        }
        HookPoint::DownloadFileFinish => {
            let p: DownloadFileFinishParams = decode(params)?;
            plugin.download_file_finish_callback(context, &p)?;
            Ok(None)
        }
        HookPoint::SyncScanLocalFilePrepare => {
            let p: SyncScanLocalFilePrepareParams = decode(params)?;
            encode(plugin.sync_scan_local_file_prepare_callback(context, &p)?)
        }
        HookPoint::SyncScanPanFilePrepare => {
            let p: SyncScanPanFilePrepareParams = decode(params)?;
            encode(plugin.sync_scan_pan_file_prepare_callback(context, &p)?)
        }
        HookPoint::SyncFileFinish => {
            let p: SyncFileFinishParams = decode(params)?;
            plugin.sync_file_finish_callback(context, &p)?;
            Ok(None)
        }
        HookPoint::SyncAllFileFinish => {
            let p: SyncAllFileFinishParams = decode(params)?;
            plugin.sync_all_file_finish_callback(context, &p)?;
            Ok(None)
        }
        HookPoint::UserTokenRefreshFinish => {
            let p: UserTokenRefreshFinishParams = decode(params)?;
            plugin.user_token_refresh_finish_callback(context, &p)?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_inline_params() {
        let value = read_params(r#"{"driveId":"1"}"#).expect("parse");
        assert_eq!(value["driveId"], "1");
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        assert!(read_params("{not json").is_err());

        let plugin = ActivePlugin::default();
        let err = dispatch(
            &plugin,
            HookPoint::UploadFilePrepare,
            &Context::anonymous(),
            serde_json::json!({"localFileSize": "big"}),
        )
        .unwrap_err();
        assert_eq!(err.kind, panplug_core::error::ErrorKind::Validation);
    }

    #[test]
    fn test_idle_plugin_has_no_opinion() {
        let plugin = ActivePlugin::default();
        let result = dispatch(
            &plugin,
            HookPoint::DownloadFilePrepare,
            &Context::anonymous(),
            serde_json::json!({}),
        )
        .expect("dispatch");
        assert!(result.is_none());
    }
}
