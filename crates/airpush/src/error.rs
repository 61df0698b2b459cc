//! CLI error types with miette diagnostics.
//!
//! Maps acquisition-crate errors into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

/// Exit codes for scripting against the CLI.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 3;
    pub const SERVER: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("No value for {field}")]
    #[diagnostic(
        code(airpush::missing_value),
        help(
            "Pass --{flag}, set {env}, or add '{field}' to a profile in {path}."
        )
    )]
    MissingValue {
        field: String,
        flag: String,
        env: String,
        path: String,
    },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(airpush::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(airpush::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(airpush::config))]
    Config(Box<figment::Error>),

    // ── Acquisition failures ─────────────────────────────────────────
    #[error("Could not reach the update server")]
    #[diagnostic(
        code(airpush::connection_failed),
        help(
            "Check the server URL and your network connection.\n\
             For self-signed certificates, use --insecure (-k)."
        )
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Update server rejected the request (HTTP {status}): {message}")]
    #[diagnostic(
        code(airpush::server_rejected),
        help("Verify the deployment key and app version you are presenting.")
    )]
    ServerRejected { status: u16, message: String },

    #[error("{message}")]
    #[diagnostic(
        code(airpush::bad_request),
        help("This is a client-side validation failure; no request was sent.")
    )]
    BadRequest { message: String },

    #[error("Update server returned an unreadable response: {message}")]
    #[diagnostic(code(airpush::bad_response))]
    BadResponse { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(airpush::json))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::ServerRejected { .. } | Self::BadResponse { .. } => exit_code::SERVER,
            Self::MissingValue { .. }
            | Self::ProfileNotFound { .. }
            | Self::Validation { .. }
            | Self::BadRequest { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Acquisition error → CliError mapping ─────────────────────────────

impl From<airpush_acquisition::Error> for CliError {
    fn from(err: airpush_acquisition::Error) -> Self {
        use airpush_acquisition::Error;

        match err {
            Error::Package { message } | Error::DeployStatus { message } => {
                CliError::BadRequest { message }
            }

            Error::Http { status: 0, message } => CliError::ConnectionFailed {
                source: message.into(),
            },

            Error::Http { status, message } => CliError::ServerRejected { status, message },

            Error::Deserialization { message, .. } => CliError::BadResponse { message },

            Error::Transport(e) => CliError::ConnectionFailed { source: e.into() },

            Error::InvalidUrl(e) => CliError::Validation {
                field: "server_url".into(),
                reason: e.to_string(),
            },

            Error::Tls(message) => CliError::ConnectionFailed {
                source: message.into(),
            },

            Error::Json(e) => CliError::Json(e),
        }
    }
}
