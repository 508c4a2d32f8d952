//! `panplug hooks`: list hook points and their script implementations.

use serde::Serialize;
use tabled::Tabled;

use panplug_core::config::AppConfig;
use panplug_core::result::AppResult;
use panplug_plugin::HookPoint;

use crate::output::{self, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
struct HookRow {
    #[tabled(rename = "Hook")]
    hook: &'static str,
    #[tabled(rename = "Function")]
    function: &'static str,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Implemented")]
    implemented: bool,
}

/// Execute the hooks command
pub async fn execute(config: AppConfig, format: OutputFormat) -> AppResult<()> {
    let rows = super::with_discovered(config, |plugin, _, _| {
        let rows = HookPoint::ALL
            .into_iter()
            .map(|hook| HookRow {
                hook: hook.as_str(),
                function: hook.function_name(),
                kind: if hook.is_prepare_hook() { "prepare" } else { "finish" },
                implemented: plugin.as_js().is_some_and(|js| js.implements(hook)),
            })
            .collect::<Vec<_>>();
        Ok(rows)
    })
    .await?;

    output::print_list(&rows, format);
    Ok(())
}
