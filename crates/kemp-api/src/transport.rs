// HTTP transport: one GET per command.
//
// Builds the `reqwest::Client` (TLS + timeout), turns a `Command` into a
// URL, attaches basic auth and hands back the raw status and body. No
// interpretation of the body happens here.

use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::command::Command;
use crate::error::Error;

/// TLS verification mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (appliances ship with self-signed ones).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::DangerAcceptInvalid,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("kemp-api/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// Status code and undecoded body of one appliance response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

/// Issues commands against one appliance endpoint.
///
/// Endpoint and credentials are fixed at construction. The type holds no
/// mutable state, so a shared reference can be used from several tasks.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    endpoint: Url,
    credentials: Credentials,
    timeout: Option<Duration>,
}

impl Transport {
    /// Create a transport from a `TransportConfig`.
    ///
    /// `endpoint` is the API root, e.g. `https://10.0.0.5/access/`.
    pub fn new(
        endpoint: Url,
        credentials: Credentials,
        config: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = config.build_client()?;
        Ok(Self {
            http,
            endpoint,
            credentials,
            timeout: Some(config.timeout),
        })
    }

    /// Create a transport around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, endpoint: Url, credentials: Credentials) -> Self {
        Self {
            http,
            endpoint,
            credentials,
            timeout: None,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// `{endpoint}/{command}?{params}`, form-urlencoded in key order.
    pub fn command_url(&self, command: &Command) -> Result<Url, Error> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/{}", command.name()))?;
        if !command.params().is_empty() {
            url.query_pairs_mut().extend_pairs(command.params());
        }
        Ok(url)
    }

    /// Send one command and return the raw response.
    pub async fn execute(&self, command: &Command) -> Result<RawResponse, Error> {
        let url = self.command_url(command)?;
        debug!(
            command = command.name(),
            params = ?command.params().keys().collect::<Vec<_>>(),
            "GET {}",
            url.path()
        );

        let resp = self
            .credentials
            .apply(self.http.get(url))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| self.transport_error(e))?;
        debug!(command = command.name(), status, len = body.len(), "response received");

        Ok(RawResponse { status, body })
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        match self.timeout {
            Some(timeout) if err.is_timeout() => Error::Timeout {
                timeout_secs: timeout.as_secs(),
            },
            _ => Error::Transport(err),
        }
    }
}
