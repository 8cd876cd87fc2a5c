// Entity records returned by the fixed-schema commands.
//
// Field names on the wire are the appliance's XML element names; they are
// mapped with `rename(deserialize = ...)` so that serializing a record
// (e.g. for JSON output) uses the Rust field names instead.

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

use crate::command::Command;

// ── Selectors & inputs ──────────────────────────────────────────────

/// Transport protocol of a virtual service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

/// Identifies a virtual service either by index or by its listen triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VirtualServiceRef {
    Index(u32),
    Endpoint {
        address: IpAddr,
        port: u16,
        protocol: Protocol,
    },
}

impl VirtualServiceRef {
    /// Add `vs` (and `port`/`prot` for an endpoint) to a command.
    pub(crate) fn apply(&self, cmd: Command) -> Command {
        match self {
            Self::Index(index) => cmd.param("vs", index.to_string()),
            Self::Endpoint {
                address,
                port,
                protocol,
            } => cmd
                .param("vs", address.to_string())
                .param("port", port.to_string())
                .param("prot", protocol.to_string()),
        }
    }
}

impl fmt::Display for VirtualServiceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{index}"),
            Self::Endpoint {
                address: IpAddr::V6(addr),
                port,
                protocol,
            } => write!(f, "[{addr}]:{port}/{protocol}"),
            Self::Endpoint {
                address,
                port,
                protocol,
            } => write!(f, "{address}:{port}/{protocol}"),
        }
    }
}

/// Settings for creating or modifying a virtual service.
///
/// Values are kept as the user typed them; `add_virtual_service` validates
/// address, port and protocol before anything is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualServiceParams {
    pub name: String,
    pub address: String,
    pub port: String,
    pub protocol: String,
    pub check_type: String,
    pub check_url: String,
    pub check_port: String,
    pub ssl_acceleration: bool,
    pub transparent: bool,
}

/// A real server to attach to a virtual service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RealServerParams {
    pub address: String,
    pub port: String,
}

// ── Virtual services ────────────────────────────────────────────────

/// A virtual service as returned by `showvs`, `listvs`, `addvs` and `modvs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct VirtualService {
    #[serde(rename(deserialize = "Index"), deserialize_with = "lenient_u32")]
    pub id: u32,
    #[serde(rename(deserialize = "NickName"))]
    pub name: String,
    #[serde(rename(deserialize = "VSAddress"))]
    pub address: String,
    #[serde(rename(deserialize = "VSPort"))]
    pub port: String,
    #[serde(rename(deserialize = "Protocol"))]
    pub protocol: String,
    #[serde(rename(deserialize = "Status"))]
    pub status: String,
    #[serde(rename(deserialize = "Enable"))]
    pub enable: String,
    #[serde(rename(deserialize = "SSLReverse"))]
    pub ssl_reverse: String,
    #[serde(rename(deserialize = "SSLReencrypt"))]
    pub ssl_reencrypt: String,
    #[serde(rename(deserialize = "Intercept"))]
    pub intercept: String,
    #[serde(rename(deserialize = "InterceptOpts"), deserialize_with = "opt_list")]
    pub intercept_opts: Vec<String>,
    #[serde(rename(deserialize = "AlertThreshold"))]
    pub alert_threshold: String,
    #[serde(rename(deserialize = "Transactionlimit"))]
    pub transaction_limit: String,
    #[serde(rename(deserialize = "Transparent"))]
    pub transparent: String,
    #[serde(rename(deserialize = "ServerInit"))]
    pub server_init: String,
    #[serde(rename(deserialize = "StartTLSMode"))]
    pub start_tls_mode: String,
    #[serde(rename(deserialize = "Idletime"))]
    pub idle_time: String,
    #[serde(rename(deserialize = "Cache"))]
    pub cache: String,
    #[serde(rename(deserialize = "Compress"))]
    pub compress: String,
    #[serde(rename(deserialize = "Verify"))]
    pub verify: String,
    #[serde(rename(deserialize = "UseforSnat"))]
    pub use_for_snat: String,
    #[serde(rename(deserialize = "ForceL7"))]
    pub force_l7: String,
    #[serde(rename(deserialize = "ClientCert"))]
    pub client_cert: String,
    #[serde(rename(deserialize = "ErrorCode"))]
    pub error_code: String,
    #[serde(rename(deserialize = "CertFile"))]
    pub cert_file: String,
    #[serde(rename(deserialize = "CheckUrl"))]
    pub check_url: String,
    #[serde(rename(deserialize = "CheckUse1.1"))]
    pub check_use_http11: String,
    #[serde(rename(deserialize = "MatchLen"))]
    pub match_len: String,
    #[serde(rename(deserialize = "CheckUseGet"))]
    pub check_use_get: String,
    #[serde(rename(deserialize = "SSLRewrite"))]
    pub ssl_rewrite: String,
    #[serde(rename(deserialize = "VStype"))]
    pub vs_type: String,
    #[serde(rename(deserialize = "FollowVSID"), deserialize_with = "lenient_u32")]
    pub follow_vs_id: u32,
    #[serde(rename(deserialize = "Schedule"))]
    pub schedule: String,
    #[serde(rename(deserialize = "CheckType"))]
    pub check_type: String,
    #[serde(rename(deserialize = "PersistTimeout"))]
    pub persist_timeout: String,
    #[serde(rename(deserialize = "SSLAcceleration"))]
    pub ssl_acceleration: String,
    #[serde(rename(deserialize = "CheckPort"))]
    pub check_port: String,
    #[serde(rename(deserialize = "NRules"))]
    pub n_rules: String,
    #[serde(rename(deserialize = "NRequestRules"))]
    pub n_request_rules: String,
    #[serde(rename(deserialize = "NResponseRules"))]
    pub n_response_rules: String,
    #[serde(rename(deserialize = "NPreProcessRules"))]
    pub n_preprocess_rules: String,
    #[serde(rename(deserialize = "EspEnabled"))]
    pub esp_enabled: String,
    #[serde(rename(deserialize = "InputAuthMode"))]
    pub input_auth_mode: String,
    #[serde(rename(deserialize = "OutputAuthMode"))]
    pub output_auth_mode: String,
    #[serde(rename(deserialize = "MasterVS"))]
    pub master_vs: String,
    #[serde(rename(deserialize = "MasterVSID"), deserialize_with = "lenient_u32")]
    pub master_vs_id: u32,
    #[serde(rename(deserialize = "AddVia"))]
    pub add_via: String,
    #[serde(rename(deserialize = "TlsType"))]
    pub tls_type: String,
    #[serde(rename(deserialize = "NeedHostName"))]
    pub need_host_name: String,
    #[serde(rename(deserialize = "OCSPVerify"))]
    pub ocsp_verify: String,
    #[serde(rename(deserialize = "NumberOfRSs"))]
    pub number_of_rss: String,
    #[serde(rename(deserialize = "Rs"))]
    pub real_servers: Vec<RealServer>,
}

/// `listvs` payload: one `<VS>` element per service.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct VirtualServiceList {
    #[serde(rename = "VS", default)]
    pub vs: Vec<VirtualService>,
}

// ── Real servers ────────────────────────────────────────────────────

/// A real server behind a virtual service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RealServer {
    #[serde(rename(deserialize = "RsIndex"))]
    pub id: String,
    #[serde(rename(deserialize = "Status"))]
    pub status: String,
    #[serde(rename(deserialize = "VsIndex"))]
    pub virtual_service: String,
    #[serde(rename(deserialize = "Addr"))]
    pub address: String,
    #[serde(rename(deserialize = "Port"))]
    pub port: String,
    #[serde(rename(deserialize = "Forward"))]
    pub forward: String,
    #[serde(rename(deserialize = "Weight"))]
    pub weight: String,
    #[serde(rename(deserialize = "Limit"))]
    pub limit: String,
    #[serde(rename(deserialize = "Enable"))]
    pub enable: String,
}

// ── Statistics ──────────────────────────────────────────────────────

/// `stats` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Statistics {
    #[serde(rename(deserialize = "VStotals"))]
    pub totals: Totals,
    #[serde(rename(deserialize = "Vs"))]
    pub virtual_servers: Vec<VirtualServerStats>,
    #[serde(rename(deserialize = "Rs"))]
    pub real_servers: Vec<RealServerStats>,
}

/// Appliance-wide throughput.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Totals {
    #[serde(rename(deserialize = "ConnsPerSec"))]
    pub connections_per_sec: u64,
    #[serde(rename(deserialize = "BitsPerSec"))]
    pub bits_per_sec: u64,
    #[serde(rename(deserialize = "BytesPerSec"))]
    pub bytes_per_sec: u64,
    #[serde(rename(deserialize = "PktsPerSec"))]
    pub packets_per_sec: u64,
}

/// Per virtual service counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct VirtualServerStats {
    #[serde(rename(deserialize = "Index"))]
    pub index: u32,
    #[serde(rename(deserialize = "VSAddress"))]
    pub address: String,
    #[serde(rename(deserialize = "VSPort"))]
    pub port: u32,
    #[serde(rename(deserialize = "VSProt"))]
    pub protocol: String,
    #[serde(rename(deserialize = "TotalConns"))]
    pub total_connections: u64,
    #[serde(rename(deserialize = "TotalPkts"))]
    pub total_packets: u64,
    #[serde(rename(deserialize = "TotalBytes"))]
    pub total_bytes: u64,
    #[serde(rename(deserialize = "TotalBits"))]
    pub total_bits: u64,
    #[serde(rename(deserialize = "ActiveConns"))]
    pub active_connections: u64,
    #[serde(rename(deserialize = "ConnsPerSec"))]
    pub connections_per_sec: u64,
    #[serde(rename(deserialize = "BytesRead"))]
    pub bytes_read: u64,
    #[serde(rename(deserialize = "BytesWritten"))]
    pub bytes_written: u64,
    #[serde(rename(deserialize = "Enable"))]
    pub enabled: u32,
    #[serde(rename(deserialize = "WafEnable"))]
    pub waf_enable: u32,
    #[serde(rename(deserialize = "ErrorCode"))]
    pub error_code: u32,
}

/// Per real server counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RealServerStats {
    #[serde(rename(deserialize = "VSIndex"))]
    pub vs_index: u32,
    #[serde(rename(deserialize = "RSIndex"))]
    pub rs_index: u32,
    #[serde(rename(deserialize = "Addr"))]
    pub address: String,
    #[serde(rename(deserialize = "Port"))]
    pub port: u32,
    #[serde(rename(deserialize = "Conns"))]
    pub total_connections: u64,
    #[serde(rename(deserialize = "Pkts"))]
    pub total_packets: u64,
    #[serde(rename(deserialize = "Bytes"))]
    pub total_bytes: u64,
    #[serde(rename(deserialize = "Bits"))]
    pub total_bits: u64,
    #[serde(rename(deserialize = "ActivConns"))]
    pub active_connections: u64,
    #[serde(rename(deserialize = "ConnsPerSec"))]
    pub connections_per_sec: u64,
    #[serde(rename(deserialize = "BytesRead"))]
    pub bytes_read: u64,
    #[serde(rename(deserialize = "BytesWritten"))]
    pub bytes_written: u64,
    #[serde(rename(deserialize = "Enable"))]
    pub enabled: u32,
    #[serde(rename(deserialize = "Weight"))]
    pub weight: u32,
    #[serde(rename(deserialize = "Persist"))]
    pub persist: u32,
}

// ── Field helpers ───────────────────────────────────────────────────

/// Integer field that the appliance sometimes sends as an empty element.
fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse().map_err(serde::de::Error::custom)
}

/// `<InterceptOpts><Opt>a</Opt><Opt>b</Opt></InterceptOpts>`
fn opt_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    struct Opts {
        #[serde(rename = "Opt", default)]
        opt: Vec<String>,
    }
    Ok(Opts::deserialize(deserializer)?.opt)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn protocol_parses_lowercase_only() {
        assert_eq!(Protocol::from_str("tcp").unwrap(), Protocol::Tcp);
        assert_eq!(Protocol::from_str("udp").unwrap(), Protocol::Udp);
        assert!(Protocol::from_str("sctp").is_err());
        assert_eq!(Protocol::Udp.to_string(), "udp");
    }

    #[test]
    fn selector_params() {
        let by_index = VirtualServiceRef::Index(7).apply(Command::new("showvs"));
        assert_eq!(by_index.get_param("vs"), Some("7"));
        assert_eq!(by_index.get_param("port"), None);

        let by_endpoint = VirtualServiceRef::Endpoint {
            address: "10.0.0.10".parse().unwrap(),
            port: 443,
            protocol: Protocol::Tcp,
        }
        .apply(Command::new("showvs"));
        assert_eq!(by_endpoint.get_param("vs"), Some("10.0.0.10"));
        assert_eq!(by_endpoint.get_param("port"), Some("443"));
        assert_eq!(by_endpoint.get_param("prot"), Some("tcp"));
    }

    #[test]
    fn selector_display() {
        let v6 = VirtualServiceRef::Endpoint {
            address: "::1".parse().unwrap(),
            port: 80,
            protocol: Protocol::Udp,
        };
        assert_eq!(v6.to_string(), "[::1]:80/udp");
        assert_eq!(VirtualServiceRef::Index(3).to_string(), "#3");
    }
}
