use url::Url;

use crate::error::Error;

/// Immutable per-client configuration.
///
/// Owned exclusively by the [`AcquisitionClient`](crate::AcquisitionClient)
/// once construction succeeds; every request the client issues derives from
/// these fields plus the caller-supplied package descriptor.
#[derive(Debug, Clone)]
pub struct ClientConfiguration {
    /// Update server base URL. Normalized at client construction to end
    /// with exactly one `/`.
    pub server_url: String,
    /// Native binary version of the host application.
    pub app_version: String,
    /// Stable per-install identifier, included in requests when present.
    pub client_unique_id: Option<String>,
    /// Release channel this client pulls from (e.g. Production, Staging).
    pub deployment_key: String,
    /// Companion-app mode: the server skips binary-version compatibility
    /// filtering when set.
    pub ignore_app_version: bool,
    /// Host package identifier, forwarded to the transport for request
    /// attribution.
    pub package_name: Option<String>,
}

impl ClientConfiguration {
    /// Validate the server URL and normalize it to end with `/`.
    pub(crate) fn normalize(&mut self) -> Result<(), Error> {
        Url::parse(&self.server_url)?;
        if !self.server_url.ends_with('/') {
            self.server_url.push('/');
        }
        Ok(())
    }
}
