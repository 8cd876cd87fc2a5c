//! Statistics handlers.

use tabled::Tabled;

use kemp_api::{Client, RealServerStats, Statistics, Totals, VirtualServerStats};

use crate::cli::{GlobalOpts, StatsArgs, StatsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct VsStatsRow {
    #[tabled(rename = "Index")]
    index: u32,
    #[tabled(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "Active")]
    active: u64,
    #[tabled(rename = "Conn/s")]
    cps: u64,
    #[tabled(rename = "Total conns")]
    total: u64,
    #[tabled(rename = "Bytes")]
    bytes: u64,
}

fn vs_row(s: &VirtualServerStats) -> VsStatsRow {
    VsStatsRow {
        index: s.index,
        endpoint: format!("{}:{}/{}", s.address, s.port, s.protocol),
        active: s.active_connections,
        cps: s.connections_per_sec,
        total: s.total_connections,
        bytes: s.total_bytes,
    }
}

#[derive(Tabled)]
struct RsStatsRow {
    #[tabled(rename = "VS")]
    vs_index: u32,
    #[tabled(rename = "RS")]
    rs_index: u32,
    #[tabled(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "Active")]
    active: u64,
    #[tabled(rename = "Conn/s")]
    cps: u64,
    #[tabled(rename = "Weight")]
    weight: u32,
}

fn rs_row(s: &RealServerStats) -> RsStatsRow {
    RsStatsRow {
        vs_index: s.vs_index,
        rs_index: s.rs_index,
        endpoint: format!("{}:{}", s.address, s.port),
        active: s.active_connections,
        cps: s.connections_per_sec,
        weight: s.weight,
    }
}

fn totals_detail(t: &Totals) -> String {
    output::detail_table([
        ("Connections/s", t.connections_per_sec.to_string()),
        ("Bits/s", t.bits_per_sec.to_string()),
        ("Bytes/s", t.bytes_per_sec.to_string()),
        ("Packets/s", t.packets_per_sec.to_string()),
    ])
}

fn summary_detail(stats: &Statistics) -> String {
    let t = &stats.totals;
    output::detail_table([
        ("Connections/s", t.connections_per_sec.to_string()),
        ("Bits/s", t.bits_per_sec.to_string()),
        ("Bytes/s", t.bytes_per_sec.to_string()),
        ("Packets/s", t.packets_per_sec.to_string()),
        ("Virtual services", stats.virtual_servers.len().to_string()),
        ("Real servers", stats.real_servers.len().to_string()),
    ])
}

pub async fn handle(client: &Client, args: StatsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let stats = client.get_statistics().await?;

    let out = match args.command {
        Some(StatsCommand::Totals) => output::render_single(
            &global.output_format(),
            &stats.totals,
            totals_detail,
            |t| t.connections_per_sec.to_string(),
        )?,

        Some(StatsCommand::Vs) => output::render_list(
            &global.output_format(),
            &stats.virtual_servers,
            vs_row,
            |s| format!("{}:{}/{}", s.address, s.port, s.protocol),
        )?,

        Some(StatsCommand::Rs) => output::render_list(
            &global.output_format(),
            &stats.real_servers,
            rs_row,
            |s| format!("{}:{}", s.address, s.port),
        )?,

        None => output::render_single(&global.output_format(), &stats, summary_detail, |s| {
            s.totals.connections_per_sec.to_string()
        })?,
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
