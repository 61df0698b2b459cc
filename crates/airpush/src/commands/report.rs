//! `airpush report-deploy` / `airpush report-download` -- status reports.

use airpush_acquisition::{AcquisitionClient, CurrentPackage, Transport};

use crate::cli::{GlobalOpts, ReportDeployArgs, ReportDownloadArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle_deploy<T: Transport>(
    client: &AcquisitionClient<T>,
    args: &ReportDeployArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // A label (or explicit package version) means we are reporting a bundle
    // deployment; otherwise the report announces the store binary itself.
    let deployed = args.label.as_ref().map(|label| CurrentPackage {
        app_version: args
            .package_version
            .clone()
            .unwrap_or_else(|| client.configuration().app_version.clone()),
        package_hash: None,
        label: Some(label.clone()),
    });

    client
        .report_status_deploy(
            deployed.as_ref(),
            args.status.map(Into::into),
            args.previous_label.as_deref(),
            args.previous_deployment_key.as_deref(),
        )
        .await?;

    println!("{}", output::render_report_ack(&global.output, "deploy"));
    Ok(())
}

pub async fn handle_download<T: Transport>(
    client: &AcquisitionClient<T>,
    args: &ReportDownloadArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let downloaded = CurrentPackage {
        app_version: client.configuration().app_version.clone(),
        package_hash: None,
        label: Some(args.label.clone()),
    };

    client.report_status_download(&downloaded).await?;

    println!("{}", output::render_report_ack(&global.output, "download"));
    Ok(())
}
