//! Command handlers. Each handler builds the shared acquisition client,
//! runs one protocol call, and prints the result.

pub mod check;
pub mod report;

use airpush_acquisition::{AcquisitionClient, HttpTransport};

use crate::cli::{Command, GlobalOpts};
use crate::config::{self, ResolvedConfig};
use crate::error::CliError;

/// Dispatch a parsed command.
pub async fn dispatch(command: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let client = build_client(global)?;

    match command {
        Command::Check(args) => check::handle(&client, &args, global).await,
        Command::ReportDeploy(args) => report::handle_deploy(&client, &args, global).await,
        Command::ReportDownload(args) => report::handle_download(&client, &args, global).await,
    }
}

fn build_client(global: &GlobalOpts) -> Result<AcquisitionClient<HttpTransport>, CliError> {
    let config = config::load_config_or_default()?;
    let ResolvedConfig { client, transport } = config::resolve(global, &config)?;

    tracing::debug!(server_url = %client.server_url, "building acquisition client");

    let transport = HttpTransport::new(&transport)?;
    Ok(AcquisitionClient::new(client, transport)?)
}
