// Appliance API client
//
// Couples a `Transport` with response dispatch and decoding. Entity
// operations (virtual services, real servers, statistics, parameters) are
// inherent methods implemented in their own files; this module only knows
// how to run a command and decode what comes back.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::command::Command;
use crate::dispatch::dispatch;
use crate::error::Error;
use crate::params::ParameterMap;
use crate::transport::{RawResponse, Transport, TransportConfig};
use crate::xml;

/// Everything needed to talk to one appliance. Immutable once built.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://10.0.0.5/access/`.
    pub endpoint: Url,
    pub credentials: Credentials,
    pub transport: TransportConfig,
    /// Log each raw response body under the `kemp_api::wire` target.
    pub debug: bool,
}

/// Client for the appliance's XML/HTTP management API.
///
/// Every method issues its HTTP calls one after another and returns once
/// the last has been decoded. The client keeps no state between calls.
#[derive(Debug, Clone)]
pub struct Client {
    transport: Transport,
    debug: bool,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let transport = Transport::new(config.endpoint, config.credentials, &config.transport)?;
        Ok(Self {
            transport,
            debug: config.debug,
        })
    }

    /// Build a client around an existing transport (debug logging off).
    pub fn from_transport(transport: Transport) -> Self {
        Self {
            transport,
            debug: false,
        }
    }

    /// Toggle raw response logging.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn endpoint(&self) -> &Url {
        self.transport.endpoint()
    }

    /// Run a command and decode `Success > Data` into `T`.
    pub async fn request<T: DeserializeOwned>(&self, command: &Command) -> Result<T, Error> {
        let raw = self.execute(command).await?;
        dispatch(&raw, xml::decode_success::<T>)
    }

    /// Run a command and capture `Success > Data` as a parameter map.
    pub async fn request_parameters(&self, command: &Command) -> Result<ParameterMap, Error> {
        let raw = self.execute(command).await?;
        dispatch(&raw, |body| {
            xml::decode_parameters(body).map(ParameterMap::from_captured)
        })
    }

    async fn execute(&self, command: &Command) -> Result<RawResponse, Error> {
        let raw = self.transport.execute(command).await?;
        if self.debug {
            debug!(
                target: "kemp_api::wire",
                command = command.name(),
                status = raw.status,
                "{}",
                String::from_utf8_lossy(&raw.body)
            );
        }
        Ok(raw)
    }
}
