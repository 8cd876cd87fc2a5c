//! Clap derive structures for the `kemp` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// kemp -- command-line access to Kemp LoadMaster appliances
#[derive(Debug, Parser)]
#[command(
    name = "kemp",
    version,
    about = "Manage Kemp LoadMaster appliances from the command line",
    long_about = "Talks to the LoadMaster XML/HTTP management API.\n\n\
        Reads and writes appliance parameters, manages virtual services\n\
        and real servers, and reports traffic statistics.",
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
    /// Appliance profile to use
    #[arg(long, short = 'p', env = "KEMP_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API endpoint, e.g. https://10.0.0.5/access/ (overrides profile)
    #[arg(long, short = 'e', env = "KEMP_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// API username (overrides profile; KEMP_USERNAME is read after the profile)
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// API password (overrides the profile's password_env, KEMP_PASSWORD and password)
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Output format [default: the config's defaults.output, else table]
    #[arg(long, short = 'o', env = "KEMP_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "KEMP_INSECURE", global = true, conflicts_with = "strict_tls")]
    pub insecure: bool,

    /// Always verify TLS certificates, even if the profile says otherwise
    #[arg(long, global = true)]
    pub strict_tls: bool,

    /// Request timeout in seconds
    #[arg(long, env = "KEMP_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Log raw response XML (shown with -vv)
    #[arg(long, env = "KEMP_DEBUG", global = true)]
    pub debug: bool,
}

impl GlobalOpts {
    /// The output format once `[defaults].output` has been folded in.
    pub fn output_format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }
}

// ── Output ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read an appliance parameter
    Get(GetArgs),

    /// Write an appliance parameter (prints the previous value)
    Set(SetArgs),

    /// Manage virtual services
    #[command(alias = "virtual-services")]
    Vs(VsArgs),

    /// Manage real servers
    #[command(alias = "real-servers")]
    Rs(RsArgs),

    /// Show traffic statistics
    Stats(StatsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Parameters ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Parameter name (e.g. hostname, ntphost)
    pub param: String,

    /// Print every element the appliance returned, not just `param`
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Parameter name
    pub param: String,

    /// New value
    pub value: String,
}

// ── Virtual services ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProtocolArg {
    Tcp,
    Udp,
}

/// Select a virtual service by index or by address/port/protocol.
#[derive(Debug, Args)]
pub struct VsSelector {
    /// Virtual service index
    #[arg(required_unless_present = "address", conflicts_with = "address")]
    pub index: Option<u32>,

    /// Virtual service address
    #[arg(long, requires = "port")]
    pub address: Option<String>,

    /// Virtual service port
    #[arg(long)]
    pub port: Option<u16>,

    /// Virtual service protocol [default: tcp]
    #[arg(long, value_enum)]
    pub protocol: Option<ProtocolArg>,
}

#[derive(Debug, Args)]
pub struct VsArgs {
    #[command(subcommand)]
    pub command: VsCommand,
}

#[derive(Debug, Subcommand)]
pub enum VsCommand {
    /// List all virtual services
    #[command(alias = "ls")]
    List,

    /// Show one virtual service in detail
    Show(VsSelector),

    /// Find a virtual service by nickname
    Find {
        /// Nickname to look for
        name: String,
    },

    /// Create a virtual service
    Add(VsAddArgs),

    /// Modify a virtual service
    Update(VsUpdateArgs),

    /// Delete a virtual service
    #[command(alias = "rm")]
    Delete(VsSelector),
}

/// Settings shared by `vs add` and `vs update`.
#[derive(Debug, Args)]
pub struct VsSettings {
    /// Nickname
    #[arg(long)]
    pub name: Option<String>,

    /// Health check type (e.g. tcp, http, https, icmp)
    #[arg(long)]
    pub check_type: Option<String>,

    /// Health check URL
    #[arg(long)]
    pub check_url: Option<String>,

    /// Health check port
    #[arg(long)]
    pub check_port: Option<String>,

    /// Enable SSL acceleration
    #[arg(long)]
    pub ssl_acceleration: bool,

    /// Enable transparency
    #[arg(long)]
    pub transparent: bool,
}

#[derive(Debug, Args)]
pub struct VsAddArgs {
    /// Listen address (IPv4 or IPv6 literal)
    #[arg(long)]
    pub address: String,

    /// Listen port
    #[arg(long)]
    pub port: String,

    /// Protocol: tcp or udp
    #[arg(long, default_value = "tcp")]
    pub protocol: String,

    #[command(flatten)]
    pub settings: VsSettings,
}

#[derive(Debug, Args)]
pub struct VsUpdateArgs {
    /// Virtual service index
    pub index: u32,

    /// New listen address
    #[arg(long)]
    pub address: Option<String>,

    /// New listen port
    #[arg(long)]
    pub port: Option<String>,

    /// New protocol
    #[arg(long)]
    pub protocol: Option<String>,

    #[command(flatten)]
    pub settings: VsSettings,
}

// ── Real servers ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RsArgs {
    #[command(subcommand)]
    pub command: RsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RsCommand {
    /// Attach a real server to a virtual service
    Add(RsAddArgs),
}

#[derive(Debug, Args)]
pub struct RsAddArgs {
    #[command(flatten)]
    pub vs: VsSelector,

    /// Real server address
    #[arg(long = "rs")]
    pub rs_address: String,

    /// Real server port
    #[arg(long)]
    pub rs_port: String,
}

// ── Statistics ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub command: Option<StatsCommand>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum StatsCommand {
    /// Appliance-wide throughput
    Totals,
    /// Per virtual service counters
    Vs,
    /// Per real server counters
    Rs,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Show the resolved configuration (passwords redacted)
    Show,

    /// Create or replace a profile
    Init(ConfigInitArgs),
}

/// Endpoint and username come from the global `--endpoint` / `--username`.
#[derive(Debug, Args)]
pub struct ConfigInitArgs {
    /// Profile name
    #[arg(long, default_value = "default")]
    pub name: String,

    /// Environment variable holding the password
    #[arg(long)]
    pub password_env: Option<String>,

    /// Require valid TLS certificates for this profile
    #[arg(long)]
    pub verify_tls: bool,

    /// Make this the default profile
    #[arg(long)]
    pub set_default: bool,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
