//! Real server command handlers.

use kemp_api::{Client, RealServerParams};

use crate::cli::{GlobalOpts, RsArgs, RsCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(client: &Client, args: RsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        RsCommand::Add(add) => {
            let target = util::resolve_selector(&add.vs)?;
            let server = RealServerParams {
                address: add.rs_address,
                port: add.rs_port,
            };
            client.add_real_server(&target, &server).await?;
            if !global.quiet {
                eprintln!(
                    "Real server {}:{} added to {target}",
                    server.address, server.port
                );
            }
            Ok(())
        }
    }
}
