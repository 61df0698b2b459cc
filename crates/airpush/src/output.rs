//! Output rendering: human summary or pretty JSON.

use owo_colors::OwoColorize;
use serde::Serialize;

use airpush_acquisition::UpdateCheckResult;

use crate::cli::OutputFormat;

/// JSON envelope for `check` results, tagged by outcome.
#[derive(Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
enum CheckOutput<'a> {
    NoUpdate,
    AppVersionMismatch { target_binary_range: &'a str },
    UpdateAvailable { package: &'a airpush_acquisition::RemotePackage },
}

/// Render an update-check result in the chosen format.
pub fn render_check_result(format: &OutputFormat, result: &UpdateCheckResult) -> String {
    match format {
        OutputFormat::Json => {
            let output = match result {
                UpdateCheckResult::NoUpdate => CheckOutput::NoUpdate,
                UpdateCheckResult::AppVersionMismatch {
                    target_app_version_range,
                } => CheckOutput::AppVersionMismatch {
                    target_binary_range: target_app_version_range,
                },
                UpdateCheckResult::UpdateAvailable(package) => {
                    CheckOutput::UpdateAvailable { package }
                }
            };
            render_json(&output)
        }
        OutputFormat::Human => match result {
            UpdateCheckResult::NoUpdate => {
                format!("{} no update available", "✓".green())
            }
            UpdateCheckResult::AppVersionMismatch {
                target_app_version_range,
            } => format!(
                "{} native binary out of date; deployment targets {}",
                "!".yellow(),
                target_app_version_range.bold()
            ),
            UpdateCheckResult::UpdateAvailable(package) => {
                let mut lines = vec![format!(
                    "{} update available: {}{}",
                    "↑".cyan(),
                    package.label.as_deref().unwrap_or("(unlabeled)").bold(),
                    if package.is_mandatory { " (mandatory)" } else { "" },
                )];
                if let Some(ref description) = package.description {
                    lines.push(format!("  description:  {description}"));
                }
                if let Some(ref hash) = package.package_hash {
                    lines.push(format!("  hash:         {hash}"));
                }
                if let Some(size) = package.package_size {
                    lines.push(format!("  size:         {size} bytes"));
                }
                if let Some(ref url) = package.download_url {
                    lines.push(format!("  download url: {url}"));
                }
                if package.is_bundle_patching_enabled {
                    lines.push("  bundle patching: enabled".to_owned());
                }
                lines.join("\n")
            }
        },
    }
}

/// Render a status-report acknowledgement.
pub fn render_report_ack(format: &OutputFormat, what: &str) -> String {
    match format {
        OutputFormat::Json => render_json(&serde_json::json!({ "reported": what })),
        OutputFormat::Human => format!("{} {what} report sent", "✓".green()),
    }
}

fn render_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_owned())
}
