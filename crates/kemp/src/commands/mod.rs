//! Command dispatch: bridges CLI args -> client calls -> output formatting.

pub mod config_cmd;
pub mod params;
pub mod rs;
pub mod stats;
pub mod util;
pub mod vs;

use kemp_api::Client;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Appliance-bound commands. Config and completions never reach a client.
#[derive(Debug)]
pub enum ApplianceCommand {
    Get(crate::cli::GetArgs),
    Set(crate::cli::SetArgs),
    Vs(crate::cli::VsArgs),
    Rs(crate::cli::RsArgs),
    Stats(crate::cli::StatsArgs),
}

/// Dispatch an appliance-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: ApplianceCommand,
    client: &Client,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        ApplianceCommand::Get(args) => params::get(client, args, global).await,
        ApplianceCommand::Set(args) => params::set(client, args, global).await,
        ApplianceCommand::Vs(args) => vs::handle(client, args, global).await,
        ApplianceCommand::Rs(args) => rs::handle(client, args, global).await,
        ApplianceCommand::Stats(args) => stats::handle(client, args, global).await,
    }
}
