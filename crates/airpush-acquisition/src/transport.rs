// HTTP transport seam.
//
// The acquisition client is generic over `Transport` so hosts can plug in
// their own networking stack (and tests can assert that no request is ever
// issued). `HttpTransport` is the bundled reqwest-backed implementation;
// TLS and timeout settings flow through `TransportConfig`.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::error::Error;

/// The only verbs the acquisition protocol uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Status and raw body of a completed HTTP exchange.
///
/// The body is opaque to the transport; the client interprets it (JSON on
/// success, error text otherwise).
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// The injected HTTP collaborator.
///
/// Contract: given (method, url, payload), asynchronously yield either a
/// transport error or a (status, body) pair. Connection handling, headers,
/// timeouts, and TLS are entirely the transport's concern; the client adds
/// no retry or cancellation on top.
pub trait Transport: Send + Sync {
    fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
    ) -> impl Future<Output = Result<TransportResponse, Error>> + Send;
}

// ── TLS / client construction ────────────────────────────────────────

/// TLS verification mode for the bundled transport.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (for self-hosted servers with self-signed
    /// certificates).
    DangerAcceptInvalid,
}

/// Configuration for building the bundled [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    /// Host package identifier, sent as the User-Agent so server-side logs
    /// can attribute traffic per app.
    pub package_name: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            package_name: None,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let user_agent = match &self.package_name {
            Some(name) => format!("airpush-acquisition/0.1.0 ({name})"),
            None => "airpush-acquisition/0.1.0".to_owned(),
        };

        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(user_agent);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

// ── Bundled reqwest transport ────────────────────────────────────────

/// Production transport wrapping `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Build from a [`TransportConfig`].
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client()?,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages TLS and timeouts).
    pub fn from_reqwest(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
    ) -> Result<TransportResponse, Error> {
        let request = match method {
            Method::Get => self.http.get(url),
            Method::Post => {
                let mut request = self.http.post(url).header(CONTENT_TYPE, "application/json");
                if let Some(body) = body {
                    request = request.body(body);
                }
                request
            }
        };

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportResponse { status, body })
    }
}
