mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kemp_api::Client;

use crate::cli::{Cli, Command};
use crate::commands::ApplianceCommand;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.debug);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, debug: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // --debug alone should still surface the wire log.
    let filter = if debug && verbosity < 2 {
        format!("{filter},kemp_api::wire=debug")
    } else {
        filter.to_owned()
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        mut global,
        command,
    } = cli;

    let cmd = match command {
        // Config commands don't need an appliance
        Command::Config(args) => return commands::config_cmd::handle(args, &global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "kemp", &mut std::io::stdout());
            return Ok(());
        }

        Command::Get(args) => ApplianceCommand::Get(args),
        Command::Set(args) => ApplianceCommand::Set(args),
        Command::Vs(args) => ApplianceCommand::Vs(args),
        Command::Rs(args) => ApplianceCommand::Rs(args),
        Command::Stats(args) => ApplianceCommand::Stats(args),
    };

    let cfg = kemp_config::load_config()?;
    global.output = Some(config::output_format(&global, &cfg)?);

    let client_config = config::resolve_client_config(&global, &cfg)?;
    let client = Client::new(client_config)?;

    tracing::debug!(command = ?cmd, endpoint = %client.endpoint(), "dispatching command");
    commands::dispatch(cmd, &client, &global).await
}
