//! Virtual service command handlers.

use tabled::Tabled;

use kemp_api::{Client, VirtualService, VirtualServiceParams};

use crate::cli::{GlobalOpts, VsArgs, VsCommand, VsSettings};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct VsRow {
    #[tabled(rename = "Index")]
    index: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Proto")]
    protocol: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "RS")]
    real_servers: usize,
}

fn row(vs: &VirtualService) -> VsRow {
    VsRow {
        index: vs.id,
        name: util::or_dash(&vs.name),
        address: vs.address.clone(),
        port: vs.port.clone(),
        protocol: vs.protocol.clone(),
        status: vs.status.clone(),
        real_servers: vs.real_servers.len(),
    }
}

fn detail(vs: &VirtualService) -> String {
    let mut fields = vec![
        ("Index", vs.id.to_string()),
        ("Name", util::or_dash(&vs.name)),
        ("Address", vs.address.clone()),
        ("Port", vs.port.clone()),
        ("Protocol", vs.protocol.clone()),
        ("Status", vs.status.clone()),
        ("Enabled", vs.enable.clone()),
        ("Type", util::or_dash(&vs.vs_type)),
        ("Check", util::or_dash(&vs.check_type)),
        ("Check URL", util::or_dash(&vs.check_url)),
        ("Check port", util::or_dash(&vs.check_port)),
        ("Transparent", vs.transparent.clone()),
        ("SSL accel", vs.ssl_acceleration.clone()),
    ];
    for rs in &vs.real_servers {
        fields.push((
            "Real server",
            format!("{}:{} ({}, weight {})", rs.address, rs.port, rs.status, rs.weight),
        ));
    }
    output::detail_table(fields)
}

fn id_of(vs: &VirtualService) -> String {
    vs.id.to_string()
}

fn settings_into(settings: VsSettings, params: &mut VirtualServiceParams) {
    params.name = settings.name.unwrap_or_default();
    params.check_type = settings.check_type.unwrap_or_default();
    params.check_url = settings.check_url.unwrap_or_default();
    params.check_port = settings.check_port.unwrap_or_default();
    params.ssl_acceleration = settings.ssl_acceleration;
    params.transparent = settings.transparent;
}

// ── Handler ──────────────────────────────────────────────────────────

pub async fn handle(client: &Client, args: VsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        VsCommand::List => {
            let services = client.list_virtual_services().await?;
            let out = output::render_list(&global.output_format(), &services, row, id_of)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VsCommand::Show(selector) => {
            let target = util::resolve_selector(&selector)?;
            let vs = client.show_virtual_service(&target).await?;
            let out = output::render_single(&global.output_format(), &vs, detail, id_of)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VsCommand::Find { name } => {
            let vs = client
                .find_virtual_service_by_name(&name)
                .await?
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "virtual service".into(),
                    identifier: name.clone(),
                    list_command: "vs list".into(),
                })?;
            let out = output::render_single(&global.output_format(), &vs, detail, id_of)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VsCommand::Add(add) => {
            let mut params = VirtualServiceParams {
                address: add.address,
                port: add.port,
                protocol: add.protocol,
                ..VirtualServiceParams::default()
            };
            settings_into(add.settings, &mut params);

            let vs = client.add_virtual_service(&params).await?;
            if !global.quiet {
                eprintln!("Virtual service {} created", vs.id);
            }
            let out = output::render_single(&global.output_format(), &vs, detail, id_of)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VsCommand::Update(update) => {
            let mut params = VirtualServiceParams {
                address: update.address.unwrap_or_default(),
                port: update.port.unwrap_or_default(),
                protocol: update.protocol.unwrap_or_default(),
                ..VirtualServiceParams::default()
            };
            settings_into(update.settings, &mut params);

            let vs = client
                .update_virtual_service(update.index, &params)
                .await?;
            let out = output::render_single(&global.output_format(), &vs, detail, id_of)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VsCommand::Delete(selector) => {
            let target = util::resolve_selector(&selector)?;
            if !util::confirm(
                &format!("Delete virtual service {target}?"),
                "vs delete",
                global.yes,
            )? {
                return Ok(());
            }
            client.delete_virtual_service(&target).await?;
            if !global.quiet {
                eprintln!("Virtual service {target} deleted");
            }
            Ok(())
        }
    }
}
