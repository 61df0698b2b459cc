//! Domain model and wire types for the acquisition protocol.
//!
//! Wire field names are snake_case and map 1:1 onto Rust field names, so no
//! serde renames are needed. The update-check outcome is a tagged union:
//! exactly one of "nothing to do", "native binary too old", or "bundle
//! available" holds at a time.

use serde::{Deserialize, Serialize};

// ── Caller-supplied state ────────────────────────────────────────────

/// Descriptor of the bundle currently installed on the device.
///
/// `app_version` is required; the hash and label are absent on a fresh
/// install that has never taken an OTA update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CurrentPackage {
    /// Native binary version of the running app. Must be non-empty.
    pub app_version: String,
    /// Content hash of the installed bundle, computed by the caller.
    pub package_hash: Option<String>,
    /// Server-assigned release label of the installed bundle.
    pub label: Option<String>,
}

// ── Server-described update ──────────────────────────────────────────

/// A candidate update described by the server.
///
/// Produced fresh per update-check call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemotePackage {
    /// Deployment the update belongs to (echoed from the client config).
    pub deployment_key: String,
    pub description: Option<String>,
    /// Server-assigned release label (e.g. `v12`).
    pub label: Option<String>,
    /// Target binary version range the bundle was released for. May be a
    /// range rather than an exact version.
    pub app_version: Option<String>,
    pub is_mandatory: bool,
    pub package_hash: Option<String>,
    pub package_size: Option<u64>,
    pub download_url: Option<String>,
    /// Whether the server can serve a binary diff against the installed
    /// bundle instead of the full package.
    pub is_bundle_patching_enabled: bool,
}

/// Outcome of one update-check call.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateCheckResult {
    /// No update available (also returned when the breaker skipped the
    /// call -- callers proceed without an update either way).
    NoUpdate,
    /// The installed native binary is incompatible with current releases;
    /// the user needs a new store build, not a bundle.
    AppVersionMismatch {
        /// Binary version range the deployment currently targets.
        target_app_version_range: String,
    },
    /// A newer bundle is available for download.
    UpdateAvailable(RemotePackage),
}

/// Terminal outcome of a deployment, for deploy-status reports only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeploymentStatus {
    #[serde(rename = "DeploymentSucceeded")]
    Succeeded,
    #[serde(rename = "DeploymentFailed")]
    Failed,
}

// ── Wire shapes ──────────────────────────────────────────────────────

/// Response envelope of `GET .../update_check`.
#[derive(Debug, Deserialize)]
pub struct UpdateCheckResponse {
    #[serde(default)]
    pub update_info: Option<UpdateInfo>,
}

/// The `update_info` section of an update-check response.
#[derive(Debug, Deserialize)]
pub struct UpdateInfo {
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub is_mandatory: bool,
    #[serde(default)]
    pub update_app_version: bool,
    #[serde(default)]
    pub target_binary_range: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub package_hash: Option<String>,
    #[serde(default)]
    pub package_size: Option<u64>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub is_bundle_patching_enabled: bool,
}

/// Body of `POST .../report_status/deploy`.
#[derive(Debug, Serialize)]
pub struct DeployReportBody {
    pub app_version: String,
    pub deployment_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_unique_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DeploymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_label_or_app_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_deployment_key: Option<String>,
}

/// Body of `POST .../report_status/download`.
#[derive(Debug, Serialize)]
pub struct DownloadReportBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_unique_id: Option<String>,
    pub deployment_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    #[test]
    fn deployment_status_serializes_to_wire_names() {
        assert_eq!(
            serde_json::to_value(DeploymentStatus::Succeeded).unwrap(),
            json!("DeploymentSucceeded")
        );
        assert_eq!(
            serde_json::to_value(DeploymentStatus::Failed).unwrap(),
            json!("DeploymentFailed")
        );
    }

    #[test]
    fn deploy_body_omits_absent_optionals() {
        let body = DeployReportBody {
            app_version: "1.0.0".into(),
            deployment_key: "key".into(),
            client_unique_id: None,
            label: None,
            status: None,
            previous_label_or_app_version: None,
            previous_deployment_key: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "app_version": "1.0.0", "deployment_key": "key" })
        );
    }

    #[test]
    fn update_info_tolerates_sparse_payloads() {
        let info: UpdateInfo = serde_json::from_value(json!({ "is_available": true })).unwrap();
        assert!(info.is_available);
        assert!(!info.update_app_version);
        assert_eq!(info.label, None);
    }
}
