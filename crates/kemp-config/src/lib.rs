//! Shared configuration for Kemp LoadMaster tools.
//!
//! TOML profiles, credential resolution (env + plaintext), and translation
//! to `kemp_api::ClientConfig`. The CLI layers its flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use kemp_api::{ClientConfig, Credentials, TlsMode, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named appliance profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Accept self-signed appliance certificates.
    #[serde(default = "default_insecure")]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Log raw response XML.
    #[serde(default)]
    pub debug: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: default_insecure(),
            timeout: default_timeout(),
            debug: false,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_insecure() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}

/// A named appliance profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// API root (e.g., "https://10.0.0.5/access/").
    pub endpoint: String,

    /// Username for basic auth.
    pub username: Option<String>,

    /// Password in plaintext; prefer `password_env`.
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override raw response logging.
    pub debug: Option<bool>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "kemp", "kemp").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("kemp");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` + `KEMP_`-prefixed environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("KEMP_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parent dirs.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Username from the profile, then `KEMP_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var("KEMP_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve username + password without CLI flags.
///
/// Password order: the profile's `password_env` variable, `KEMP_PASSWORD`,
/// then plaintext `password`.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Credentials, ConfigError> {
    let username = resolve_username(profile, profile_name)?;

    let password = profile
        .password_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
        .or_else(|| std::env::var("KEMP_PASSWORD").ok())
        .or_else(|| profile.password.clone())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    Ok(Credentials::new(username, SecretString::from(password)))
}

/// Parse an endpoint string.
pub fn parse_endpoint(raw: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "endpoint".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// TLS mode for a profile: insecure wins, then a custom CA, then system roots.
pub fn tls_mode(insecure: bool, ca_cert: Option<&Path>) -> TlsMode {
    if insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(path) = ca_cert {
        TlsMode::CustomCa(path.to_path_buf())
    } else {
        TlsMode::System
    }
}

/// Build a `ClientConfig` from a profile and already-resolved credentials.
///
/// Unset profile values fall back to `defaults`.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
    credentials: Credentials,
) -> Result<ClientConfig, ConfigError> {
    let endpoint = parse_endpoint(&profile.endpoint)?;

    let insecure = profile.insecure.unwrap_or(defaults.insecure);
    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(ClientConfig {
        endpoint,
        credentials,
        transport: TransportConfig {
            tls: tls_mode(insecure, profile.ca_cert.as_deref()),
            timeout,
        },
        debug: profile.debug.unwrap_or(defaults.debug),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "lab"

[defaults]
output = "json"
timeout = 15

[profiles.lab]
endpoint = "https://10.0.0.5/access/"
username = "bal"
password = "plain"
insecure = false
timeout = 5
debug = true
"#;

    #[test]
    fn loads_profiles_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("lab"));
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.timeout, 15);
        assert!(cfg.defaults.insecure);

        let lab = &cfg.profiles["lab"];
        assert_eq!(lab.endpoint, "https://10.0.0.5/access/");
        assert_eq!(lab.timeout, Some(5));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
        assert!(cfg.defaults.insecure);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "edge".into(),
            Profile {
                endpoint: "https://lb.example/access/".into(),
                username: Some("admin".into()),
                password_env: Some("EDGE_PW".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let edge = &loaded.profiles["edge"];
        assert_eq!(edge.username.as_deref(), Some("admin"));
        assert_eq!(edge.password_env.as_deref(), Some("EDGE_PW"));
    }

    #[test]
    fn profile_translates_to_client_config() {
        let profile = Profile {
            endpoint: "https://10.0.0.5/access/".into(),
            username: Some("bal".into()),
            password: Some("plain".into()),
            insecure: Some(false),
            timeout: Some(5),
            debug: Some(true),
            ..Profile::default()
        };

        let creds = resolve_credentials(&profile, "lab").unwrap();
        let cfg = profile_to_client_config(&profile, &Defaults::default(), creds).unwrap();
        assert_eq!(cfg.endpoint.as_str(), "https://10.0.0.5/access/");
        assert_eq!(cfg.credentials.username(), "bal");
        assert_eq!(cfg.transport.tls, TlsMode::System);
        assert_eq!(cfg.transport.timeout, Duration::from_secs(5));
        assert!(cfg.debug);
    }

    #[test]
    fn profile_inherits_defaults() {
        let profile = Profile {
            endpoint: "https://10.0.0.5/access/".into(),
            username: Some("bal".into()),
            password: Some("plain".into()),
            ..Profile::default()
        };

        let creds = resolve_credentials(&profile, "lab").unwrap();
        let cfg = profile_to_client_config(&profile, &Defaults::default(), creds).unwrap();
        assert_eq!(cfg.transport.tls, TlsMode::DangerAcceptInvalid);
        assert_eq!(cfg.transport.timeout, Duration::from_secs(30));
        assert!(!cfg.debug);
    }

    #[test]
    fn bad_endpoint_is_rejected() {
        let profile = Profile {
            endpoint: "not a url".into(),
            username: Some("bal".into()),
            password: Some("plain".into()),
            ..Profile::default()
        };
        let creds = Credentials::new("bal", SecretString::from("plain"));
        let err = profile_to_client_config(&profile, &Defaults::default(), creds).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "endpoint"));
    }

    #[test]
    fn tls_mode_precedence() {
        let ca = Path::new("/etc/kemp/ca.pem");
        assert_eq!(tls_mode(true, Some(ca)), TlsMode::DangerAcceptInvalid);
        assert_eq!(tls_mode(false, Some(ca)), TlsMode::CustomCa(ca.to_path_buf()));
        assert_eq!(tls_mode(false, None), TlsMode::System);
    }
}
