//! `airpush check` -- run one update check.

use airpush_acquisition::{AcquisitionClient, CurrentPackage, Transport};

use crate::cli::{CheckArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle<T: Transport>(
    client: &AcquisitionClient<T>,
    args: &CheckArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let current = CurrentPackage {
        app_version: client.configuration().app_version.clone(),
        package_hash: args.package_hash.clone(),
        label: args.label.clone(),
    };

    let result = client.check_for_update(&current).await?;
    println!("{}", output::render_check_result(&global.output, &result));
    Ok(())
}
