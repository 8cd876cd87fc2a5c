// Local checks run before a create command is sent.

use std::net::IpAddr;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::models::{Protocol, RealServerParams, VirtualServiceParams};

pub(crate) fn address(raw: &str) -> Result<IpAddr, ValidationError> {
    raw.parse()
        .map_err(|_| ValidationError::InvalidAddress(raw.to_owned()))
}

pub(crate) fn port(raw: &str, what: &'static str) -> Result<(), ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::MissingPort(what));
    }
    Ok(())
}

pub(crate) fn protocol(raw: &str) -> Result<Protocol, ValidationError> {
    Protocol::from_str(raw).map_err(|_| ValidationError::InvalidProtocol(raw.to_owned()))
}

impl VirtualServiceParams {
    /// Checks required by `addvs`: a literal IP, a port, and tcp/udp.
    pub fn validate(&self) -> Result<(), ValidationError> {
        address(&self.address)?;
        port(&self.port, "virtual service")?;
        protocol(&self.protocol)?;
        Ok(())
    }
}

impl RealServerParams {
    /// Checks required by `addrs`: a literal IP and a port.
    pub fn validate(&self) -> Result<(), ValidationError> {
        address(&self.address)?;
        port(&self.port, "real server")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vs(address: &str, port: &str, protocol: &str) -> VirtualServiceParams {
        VirtualServiceParams {
            address: address.into(),
            port: port.into(),
            protocol: protocol.into(),
            ..VirtualServiceParams::default()
        }
    }

    #[test]
    fn valid_virtual_service() {
        assert_eq!(vs("10.0.0.1", "80", "tcp").validate(), Ok(()));
        assert_eq!(vs("2001:db8::1", "53", "udp").validate(), Ok(()));
    }

    #[test]
    fn each_rule_is_checked() {
        assert_eq!(
            vs("not-an-ip", "80", "tcp").validate(),
            Err(ValidationError::InvalidAddress("not-an-ip".into()))
        );
        assert_eq!(
            vs("10.0.0.1", "", "tcp").validate(),
            Err(ValidationError::MissingPort("virtual service"))
        );
        assert_eq!(
            vs("10.0.0.1", "80", "TCP").validate(),
            Err(ValidationError::InvalidProtocol("TCP".into()))
        );
    }

    #[test]
    fn real_server_needs_port() {
        let rs = RealServerParams {
            address: "192.168.1.20".into(),
            port: String::new(),
        };
        assert_eq!(
            rs.validate(),
            Err(ValidationError::MissingPort("real server"))
        );
    }
}
