//! Binds host services into the script global scope.
//!
//! Scripts see:
//!
//! - `console.log(...)` and `PluginUtil.log(...)`
//! - `PluginUtil.Http.get(headers, url)` / `PluginUtil.Http.post(headers, url, data)`
//! - `PluginUtil.LocalFS.deleteFile(path)`
//! - `PluginUtil.Email.sendTextMail(server, user, password, to, subject, body)`
//!   and `PluginUtil.Email.sendHtmlMail(...)` with the same arguments
//! - `PluginUtil.KV.getString(key)` / `PluginUtil.KV.putString(key, value)`
//!
//! None of these throw into the script; failures come back as `""` or `false`.

use std::collections::HashMap;
use std::sync::Arc;

use rquickjs::convert::Coerced;
use rquickjs::function::Rest;
use rquickjs::{Ctx, FromJs, Function, Object, Value};
use tracing::{info, warn};

use crate::host::fs::delete_local_file;
use crate::host::{HostServices, HttpBody, MailBody, MailRequest};

/// Tracing target for script log output.
pub const SCRIPT_LOG_TARGET: &str = "panplug::script";

/// Installs the host namespace into `ctx`.
pub fn install<'js>(ctx: &Ctx<'js>, services: Arc<HostServices>) -> rquickjs::Result<()> {
    let globals = ctx.globals();

    let console = Object::new(ctx.clone())?;
    console.set("log", log_function(ctx)?)?;
    globals.set("console", console)?;

    let util = Object::new(ctx.clone())?;
    util.set("log", log_function(ctx)?)?;

    let http = Object::new(ctx.clone())?;
    let get_services = services.clone();
    http.set(
        "get",
        Function::new(
            ctx.clone(),
            move |ctx: Ctx<'js>, args: Rest<Value<'js>>| -> String {
                let headers = headers_arg(&ctx, args.0.first());
                let url = string_arg(&ctx, args.0.get(1));
                get_services.http.get(&headers, &url)
            },
        )?,
    )?;
    let post_services = services.clone();
    http.set(
        "post",
        Function::new(
            ctx.clone(),
            move |ctx: Ctx<'js>, args: Rest<Value<'js>>| -> String {
                let headers = headers_arg(&ctx, args.0.first());
                let url = string_arg(&ctx, args.0.get(1));
                let body = body_arg(&ctx, args.0.get(2));
                post_services.http.post(&headers, &url, body)
            },
        )?,
    )?;
    util.set("Http", http)?;

    let local_fs = Object::new(ctx.clone())?;
    local_fs.set(
        "deleteFile",
        Function::new(
            ctx.clone(),
            |ctx: Ctx<'js>, args: Rest<Value<'js>>| -> bool {
                delete_local_file(&string_arg(&ctx, args.0.first()))
            },
        )?,
    )?;
    util.set("LocalFS", local_fs)?;

    let email = Object::new(ctx.clone())?;
    email.set("sendTextMail", mail_function(ctx, services.clone(), MailBody::Text)?)?;
    email.set("sendHtmlMail", mail_function(ctx, services.clone(), MailBody::Html)?)?;
    util.set("Email", email)?;

    let kv = Object::new(ctx.clone())?;
    let kv_get = services.clone();
    kv.set(
        "getString",
        Function::new(
            ctx.clone(),
            move |ctx: Ctx<'js>, args: Rest<Value<'js>>| -> String {
                let key = string_arg(&ctx, args.0.first());
                let Some(store) = kv_get.kv.as_ref() else {
                    return String::new();
                };
                match store.get_string(&key) {
                    Ok(value) => value.unwrap_or_default(),
                    Err(e) => {
                        warn!(key = %key, error = %e, "KV read failed");
                        String::new()
                    }
                }
            },
        )?,
    )?;
    let kv_put = services;
    kv.set(
        "putString",
        Function::new(
            ctx.clone(),
            move |ctx: Ctx<'js>, args: Rest<Value<'js>>| -> bool {
                let key = string_arg(&ctx, args.0.first());
                let value = string_arg(&ctx, args.0.get(1));
                let Some(store) = kv_put.kv.as_ref() else {
                    return false;
                };
                match store.put_string(&key, &value) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(key = %key, error = %e, "KV write failed");
                        false
                    }
                }
            },
        )?,
    )?;
    util.set("KV", kv)?;

    globals.set("PluginUtil", util)?;
    Ok(())
}

fn mail_function<'js>(
    ctx: &Ctx<'js>,
    services: Arc<HostServices>,
    kind: MailBody,
) -> rquickjs::Result<Function<'js>> {
    Function::new(
        ctx.clone(),
        move |ctx: Ctx<'js>, args: Rest<Value<'js>>| -> bool {
            let arg = |i: usize| string_arg(&ctx, args.0.get(i));
            let (server, user_name, password) = (arg(0), arg(1), arg(2));
            let (to, subject, body) = (arg(3), arg(4), arg(5));
            let request = MailRequest {
                server: &server,
                user_name: &user_name,
                password: &password,
                to: &to,
                subject: &subject,
                body: &body,
            };
            services.mail.send(&request, kind)
        },
    )
}

fn log_function<'js>(ctx: &Ctx<'js>) -> rquickjs::Result<Function<'js>> {
    Function::new(ctx.clone(), |ctx: Ctx<'js>, args: Rest<Value<'js>>| {
        let line = args
            .0
            .iter()
            .map(|v| display_value(&ctx, v))
            .collect::<Vec<_>>()
            .join(" ");
        info!(target: SCRIPT_LOG_TARGET, "{}", line);
    })
}

/// Renders a script value the way a console would.
fn display_value<'js>(ctx: &Ctx<'js>, value: &Value<'js>) -> String {
    if value.is_object() && !value.is_function() && value.as_exception().is_none() {
        if let Ok(Some(json)) = ctx.json_stringify(value.clone()) {
            if let Ok(text) = json.to_string() {
                return text;
            }
        }
    }
    Coerced::<String>::from_js(ctx, value.clone())
        .map(|c| c.0)
        .unwrap_or_default()
}

fn string_arg<'js>(ctx: &Ctx<'js>, value: Option<&Value<'js>>) -> String {
    match value {
        Some(v) if !v.is_undefined() && !v.is_null() => display_value(ctx, v),
        _ => String::new(),
    }
}

fn json_arg<'js>(ctx: &Ctx<'js>, value: &Value<'js>) -> Option<serde_json::Value> {
    let json = ctx.json_stringify(value.clone()).ok()??;
    let text = json.to_string().ok()?;
    serde_json::from_str(&text).ok()
}

fn headers_arg<'js>(ctx: &Ctx<'js>, value: Option<&Value<'js>>) -> HashMap<String, String> {
    let Some(value) = value.filter(|v| v.is_object()) else {
        return HashMap::new();
    };
    let Some(serde_json::Value::Object(map)) = json_arg(ctx, value) else {
        return HashMap::new();
    };
    map.into_iter()
        .map(|(name, v)| {
            let v = match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (name, v)
        })
        .collect()
}

fn body_arg<'js>(ctx: &Ctx<'js>, value: Option<&Value<'js>>) -> HttpBody {
    match value {
        None => HttpBody::Empty,
        Some(v) if v.is_undefined() || v.is_null() => HttpBody::Empty,
        Some(v) if v.is_string() => HttpBody::Text(display_value(ctx, v)),
        Some(v) if v.is_object() => match json_arg(ctx, v) {
            Some(json) => HttpBody::Json(json),
            None => HttpBody::Empty,
        },
        Some(v) => HttpBody::Text(display_value(ctx, v)),
    }
}
