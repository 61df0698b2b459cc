use thiserror::Error;

/// Whether an HTTP status code indicates a transient failure.
///
/// True for any 5xx, for 408 (request timeout), and for 429 (rate limited).
/// Everything else -- including 401/403/404 -- is permanent: an update check
/// against a deployment key that doesn't exist will never succeed by
/// retrying. This classification only drives the circuit breaker; the client
/// never retries on its own.
pub const fn is_recoverable(status: u16) -> bool {
    status >= 500 || status == 408 || status == 429
}

/// Top-level error type for the `airpush-acquisition` crate.
///
/// The first two variants are synchronous caller bugs, raised before any
/// network I/O. The rest surface transport and protocol failures.
#[derive(Debug, Error)]
pub enum Error {
    // ── Caller bugs (pre-network) ───────────────────────────────────
    /// The supplied current package is structurally invalid.
    #[error("invalid current package: {message}")]
    Package { message: String },

    /// A deploy report supplied a package without a status.
    #[error("invalid deploy status: {message}")]
    DeployStatus { message: String },

    // ── Server responses ────────────────────────────────────────────
    /// The server answered with a non-2xx status. Status 0 is the
    /// connectivity pseudo-status surfaced by some transports.
    #[error("update server returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// A 2xx body that failed JSON parsing, with the raw body for debugging.
    #[error("deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Request body could not be encoded as JSON.
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The HTTP status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a transient failure that a future
    /// identical request might not hit.
    ///
    /// Transport errors are never classified -- no status code exists to
    /// classify them by.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Http { status, .. } if is_recoverable(*status))
    }
}
