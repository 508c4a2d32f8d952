//! `panplug check`: report what discovery loaded.

use serde::Serialize;
use tabled::Tabled;

use panplug_core::config::AppConfig;
use panplug_core::result::AppResult;
use panplug_plugin::{LoadReport, Plugin};

use crate::output::{self, OutputFormat};

/// One scanned directory entry.
#[derive(Debug, Serialize, Tabled)]
struct ScriptRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Detail")]
    detail: String,
}

/// Full check outcome for JSON output.
#[derive(Debug, Serialize)]
struct CheckOutcome {
    plugin: String,
    report: LoadReport,
}

fn rows(report: &LoadReport) -> Vec<ScriptRow> {
    let loaded = report.loaded.iter().map(|name| ScriptRow {
        file: name.clone(),
        status: "loaded",
        detail: String::new(),
    });
    let failed = report.failed.iter().map(|f| ScriptRow {
        file: f.name.clone(),
        status: "failed",
        detail: f.reason.clone(),
    });
    let skipped = report.skipped.iter().map(|name| ScriptRow {
        file: name.clone(),
        status: "skipped",
        detail: String::new(),
    });
    loaded.chain(failed).chain(skipped).collect()
}

/// Execute the check command
pub async fn execute(config: AppConfig, format: OutputFormat) -> AppResult<()> {
    let outcome = super::with_discovered(config, |plugin, report, _| {
        Ok(CheckOutcome {
            plugin: plugin.name().to_string(),
            report: report.clone(),
        })
    })
    .await?;

    match format {
        OutputFormat::Json => output::print_json(&outcome),
        OutputFormat::Table => {
            output::print_kv("Script directory", &outcome.report.directory.display().to_string());
            output::print_kv("Active plugin", &outcome.plugin);
            output::print_list(&rows(&outcome.report), format);
            if outcome.report.failed.is_empty() {
                output::print_success(&format!("{} script(s) loaded", outcome.report.loaded.len()));
            } else {
                output::print_warning(&format!(
                    "{} script(s) failed to load",
                    outcome.report.failed.len()
                ));
            }
        }
    }
    Ok(())
}
