//! CLI error types with miette diagnostics.
//!
//! Maps `kemp_api::Error` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use kemp_api::{DecodeError, ValidationError};
use kemp_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to appliance at {url}")]
    #[diagnostic(
        code(kemp::connection_failed),
        help(
            "Check that the appliance is reachable and the API is enabled.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(kemp::tls_error),
        help("Use --insecure (-k) to accept self-signed certificates, or configure ca_cert in your profile.")
    )]
    Tls { message: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(kemp::timeout),
        help("Increase timeout with --timeout or check appliance responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(kemp::auth_failed),
        help("Verify the username and password for profile '{profile}'.")
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(kemp::no_credentials),
        help(
            "Pass --username and --password, set KEMP_USERNAME / KEMP_PASSWORD,\n\
             or create a profile with: kemp config init"
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(kemp::not_found),
        help("Run: kemp {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Appliance ────────────────────────────────────────────────────
    #[error("Appliance rejected the request ({code}): {message}")]
    #[diagnostic(code(kemp::remote))]
    Remote { code: u16, message: String },

    #[error("Could not understand the appliance response")]
    #[diagnostic(
        code(kemp::decode),
        help("Re-run with --debug -vv to log the raw response body.")
    )]
    Decode(#[source] DecodeError),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(kemp::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(kemp::invalid_input))]
    InvalidInput(#[from] ValidationError),

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(kemp::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: kemp config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No appliance configured")]
    #[diagnostic(
        code(kemp::no_config),
        help(
            "Create a profile with: kemp config init\n\
             Or pass --endpoint. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(kemp::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(kemp::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    #[diagnostic(code(kemp::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to serialize output: {0}")]
    #[diagnostic(code(kemp::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Tls { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::InvalidInput(_)
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── kemp_api::Error → CliError mapping ───────────────────────────────

impl From<kemp_api::Error> for CliError {
    fn from(err: kemp_api::Error) -> Self {
        match err {
            kemp_api::Error::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            kemp_api::Error::Tls(message) => CliError::Tls { message },

            kemp_api::Error::Remote { code: 401, message } => CliError::AuthFailed {
                profile: "current".into(),
                message,
            },

            kemp_api::Error::Remote { code, message } => CliError::Remote { code, message },

            kemp_api::Error::Decode(source) => CliError::Decode(source),

            kemp_api::Error::Validation(source) => CliError::InvalidInput(source),

            kemp_api::Error::InvalidUrl(e) => CliError::Validation {
                field: "endpoint".into(),
                reason: e.to_string(),
            },

            kemp_api::Error::Transport(e) => CliError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "(unknown)".into(), ToString::to_string),
                source: e.into(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}
