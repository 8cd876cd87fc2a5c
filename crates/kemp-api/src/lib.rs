// kemp-api: Async Rust client for the Kemp LoadMaster management API
//
// The appliance speaks a pseudo-RPC protocol: one HTTP GET per command,
// basic auth, XML responses that are either an `<Error>` or a
// `<Success><Data>` document depending on the status code.

pub mod auth;
pub mod client;
pub mod command;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod params;
pub mod transport;
pub mod xml;

mod real_servers;
mod stats;
mod validate;
mod virtual_services;

pub use auth::Credentials;
pub use client::{Client, ClientConfig};
pub use command::Command;
pub use error::{DecodeError, Error, ValidationError};
pub use models::{
    Protocol, RealServer, RealServerParams, RealServerStats, Statistics, Totals,
    VirtualServerStats, VirtualService, VirtualServiceParams, VirtualServiceRef,
};
pub use params::ParameterMap;
pub use transport::{RawResponse, TlsMode, Transport, TransportConfig};
