// Acquisition client: the three protocol operations.
//
// Each operation is one request/response exchange against the update
// server. Nothing is retried internally; every failure surfaces to the
// caller as a typed error. The single implicit behavior is the circuit
// breaker's one-way trip, which makes *subsequent* calls succeed as no-ops
// rather than fail loudly -- a "clean" result observed after a prior
// permanent failure may therefore mean "skipped", not "confirmed".

use serde::Serialize;
use tracing::debug;

use crate::breaker::CircuitBreaker;
use crate::config::ClientConfiguration;
use crate::error::Error;
use crate::query;
use crate::transport::{Method, Transport, TransportResponse};
use crate::types::{
    CurrentPackage, DeployReportBody, DeploymentStatus, DownloadReportBody, RemotePackage,
    UpdateCheckResponse, UpdateCheckResult,
};

/// Path prefix of the public acquisition endpoints, relative to the
/// configured server URL.
const PUBLIC_PREFIX: &str = "v0.1/public/codepush/";

/// Async client for the update-acquisition protocol.
///
/// Holds an immutable [`ClientConfiguration`], an injected [`Transport`],
/// and a [`CircuitBreaker`] handle. Calls hold no other mutable state, so
/// any number of operations may be in flight concurrently from one client.
pub struct AcquisitionClient<T: Transport> {
    config: ClientConfiguration,
    transport: T,
    breaker: CircuitBreaker,
}

impl<T: Transport> AcquisitionClient<T> {
    /// Build a client sharing the process-wide circuit breaker.
    pub fn new(config: ClientConfiguration, transport: T) -> Result<Self, Error> {
        Self::with_breaker(config, transport, CircuitBreaker::global())
    }

    /// Build a client with an explicit breaker handle.
    ///
    /// Tests pass [`CircuitBreaker::isolated`] so cases don't contaminate
    /// each other through the process-wide flag.
    pub fn with_breaker(
        mut config: ClientConfiguration,
        transport: T,
        breaker: CircuitBreaker,
    ) -> Result<Self, Error> {
        config.normalize()?;
        Ok(Self {
            config,
            transport,
            breaker,
        })
    }

    /// The configuration this client was built with (post-normalization).
    pub fn configuration(&self) -> &ClientConfiguration {
        &self.config
    }

    // ── Update check ─────────────────────────────────────────────────

    /// Ask the server whether a newer bundle exists for `current`.
    ///
    /// Fails synchronously with [`Error::Package`] when the current package
    /// lacks an `app_version` -- that is a caller bug, not a network
    /// condition, and no request is issued for it.
    pub async fn check_for_update(
        &self,
        current: &CurrentPackage,
    ) -> Result<UpdateCheckResult, Error> {
        if self.breaker.should_skip(&self.config.server_url) {
            debug!("acquisition calls disabled; skipping update check");
            return Ok(UpdateCheckResult::NoUpdate);
        }

        if current.app_version.is_empty() {
            return Err(Error::Package {
                message: "current package is missing app_version".into(),
            });
        }

        let is_companion = if self.config.ignore_app_version { "true" } else { "false" };
        let query = query::encode(&[
            ("deployment_key", Some(self.config.deployment_key.as_str())),
            ("app_version", Some(current.app_version.as_str())),
            ("package_hash", current.package_hash.as_deref()),
            ("is_companion", Some(is_companion)),
            ("label", current.label.as_deref()),
            ("client_unique_id", self.config.client_unique_id.as_deref()),
        ]);
        let url = format!("{}{PUBLIC_PREFIX}update_check?{query}", self.config.server_url);
        debug!("GET {url}");

        let response = self.transport.request(Method::Get, &url, None).await?;
        if !is_success(response.status) {
            return Err(self.http_failure(response));
        }

        let parsed: UpdateCheckResponse = serde_json::from_str(&response.body).map_err(|e| {
            let preview = &response.body[..response.body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: response.body.clone(),
            }
        })?;

        let Some(info) = parsed.update_info else {
            return Ok(UpdateCheckResult::NoUpdate);
        };

        if info.update_app_version {
            return Ok(UpdateCheckResult::AppVersionMismatch {
                target_app_version_range: info.target_binary_range.unwrap_or_default(),
            });
        }

        if !info.is_available {
            return Ok(UpdateCheckResult::NoUpdate);
        }

        Ok(UpdateCheckResult::UpdateAvailable(RemotePackage {
            deployment_key: self.config.deployment_key.clone(),
            description: info.description,
            label: info.label,
            app_version: info.target_binary_range,
            is_mandatory: info.is_mandatory,
            package_hash: info.package_hash,
            package_size: info.package_size,
            download_url: info.download_url,
            is_bundle_patching_enabled: info.is_bundle_patching_enabled,
        }))
    }

    // ── Status reports ───────────────────────────────────────────────

    /// Report the outcome of applying a bundle (or, with no package, that
    /// the app is running from its store binary).
    ///
    /// When `deployed` is supplied, `status` is mandatory; omitting it
    /// fails synchronously with [`Error::DeployStatus`] before any I/O.
    pub async fn report_status_deploy(
        &self,
        deployed: Option<&CurrentPackage>,
        status: Option<DeploymentStatus>,
        previous_label_or_app_version: Option<&str>,
        previous_deployment_key: Option<&str>,
    ) -> Result<(), Error> {
        if self.breaker.should_skip(&self.config.server_url) {
            debug!("acquisition calls disabled; skipping deploy report");
            return Ok(());
        }

        let mut body = DeployReportBody {
            app_version: self.config.app_version.clone(),
            deployment_key: self.config.deployment_key.clone(),
            client_unique_id: self.config.client_unique_id.clone(),
            label: None,
            status: None,
            previous_label_or_app_version: previous_label_or_app_version.map(str::to_owned),
            previous_deployment_key: previous_deployment_key.map(str::to_owned),
        };

        if let Some(package) = deployed {
            let Some(status) = status else {
                return Err(Error::DeployStatus {
                    message: "missing status argument for deploy report".into(),
                });
            };
            body.label = package.label.clone();
            body.app_version = package.app_version.clone();
            body.status = Some(status);
        }

        self.post_report("report_status/deploy", &body).await
    }

    /// Report that a bundle finished downloading.
    pub async fn report_status_download(&self, downloaded: &CurrentPackage) -> Result<(), Error> {
        if self.breaker.should_skip(&self.config.server_url) {
            debug!("acquisition calls disabled; skipping download report");
            return Ok(());
        }

        let body = DownloadReportBody {
            client_unique_id: self.config.client_unique_id.clone(),
            deployment_key: self.config.deployment_key.clone(),
            label: downloaded.label.clone(),
        };

        self.post_report("report_status/download", &body).await
    }

    // ── Shared plumbing ──────────────────────────────────────────────

    async fn post_report<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), Error> {
        let url = format!("{}{PUBLIC_PREFIX}{path}", self.config.server_url);
        let payload = serde_json::to_string(body)?;
        debug!("POST {url}");

        let response = self.transport.request(Method::Post, &url, Some(payload)).await?;
        if !is_success(response.status) {
            return Err(self.http_failure(response));
        }
        Ok(())
    }

    /// Record a non-2xx response against the breaker and turn it into an
    /// error. The body is opaque error text; it is never parsed.
    fn http_failure(&self, response: TransportResponse) -> Error {
        self.breaker.record_failure(&self.config.server_url, response.status);

        if response.status == 0 {
            return Error::Http {
                status: 0,
                message: "request produced no HTTP status (status 0); this usually \
                          indicates a connectivity problem between the device and \
                          the update server"
                    .into(),
            };
        }

        Error::Http {
            status: response.status,
            message: response.body,
        }
    }
}

const fn is_success(status: u16) -> bool {
    status >= 200 && status < 300
}
