//! Clap derive structures for the `airpush` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

use airpush_acquisition::DeploymentStatus;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// airpush -- drive the OTA update-acquisition protocol from a terminal
#[derive(Debug, Parser)]
#[command(
    name = "airpush",
    version,
    about = "Query and report against an airpush update server",
    long_about = "Diagnostic client for the airpush OTA update service.\n\n\
        Runs the same update-check and status-report calls a device would,\n\
        so operators can inspect what a deployment currently serves.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "AIRPUSH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Update server base URL (overrides profile)
    #[arg(long, short = 's', env = "AIRPUSH_SERVER_URL", global = true)]
    pub server_url: Option<String>,

    /// Deployment key (release channel) to query
    #[arg(long, short = 'd', env = "AIRPUSH_DEPLOYMENT_KEY", global = true)]
    pub deployment_key: Option<String>,

    /// Native binary version to present to the server
    #[arg(long, short = 'a', env = "AIRPUSH_APP_VERSION", global = true)]
    pub app_version: Option<String>,

    /// Stable client identifier to include in requests
    #[arg(long, env = "AIRPUSH_CLIENT_ID", global = true)]
    pub client_id: Option<String>,

    /// Query as a companion app (skip binary-version filtering)
    #[arg(long, global = true)]
    pub companion: bool,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "AIRPUSH_OUTPUT",
        default_value = "human",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "AIRPUSH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "AIRPUSH_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Readable summary (default, interactive)
    Human,
    /// Pretty-printed JSON
    Json,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one update check and print the server's decision
    #[command(alias = "c")]
    Check(CheckArgs),

    /// Report a deployment outcome
    ReportDeploy(ReportDeployArgs),

    /// Report a completed bundle download
    ReportDownload(ReportDownloadArgs),
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Hash of the currently installed bundle
    #[arg(long)]
    pub package_hash: Option<String>,

    /// Release label of the currently installed bundle
    #[arg(long, short = 'l')]
    pub label: Option<String>,
}

#[derive(Debug, Args)]
pub struct ReportDeployArgs {
    /// Outcome of the deployment (required when reporting a bundle)
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// Release label of the deployed bundle
    #[arg(long, short = 'l')]
    pub label: Option<String>,

    /// Binary version the bundle was deployed against
    /// (defaults to --app-version)
    #[arg(long)]
    pub package_version: Option<String>,

    /// Label or binary version that was running before this deployment
    #[arg(long)]
    pub previous_label: Option<String>,

    /// Deployment key the previous bundle came from
    #[arg(long)]
    pub previous_deployment_key: Option<String>,
}

#[derive(Debug, Args)]
pub struct ReportDownloadArgs {
    /// Release label of the downloaded bundle
    #[arg(long, short = 'l', required = true)]
    pub label: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Succeeded,
    Failed,
}

impl From<StatusArg> for DeploymentStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Succeeded => Self::Succeeded,
            StatusArg::Failed => Self::Failed,
        }
    }
}
