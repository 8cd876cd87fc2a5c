//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::net::IpAddr;

use kemp_api::{Protocol, ValidationError, VirtualServiceRef};

use crate::cli::{ProtocolArg, VsSelector};
use crate::error::CliError;

/// Turn `<index>` or `--address/--port/--protocol` into a `VirtualServiceRef`.
pub fn resolve_selector(selector: &VsSelector) -> Result<VirtualServiceRef, CliError> {
    if let Some(index) = selector.index {
        return Ok(VirtualServiceRef::Index(index));
    }

    let raw = selector.address.as_deref().ok_or_else(|| CliError::Validation {
        field: "vs".into(),
        reason: "give an index or --address/--port/--protocol".into(),
    })?;
    let address: IpAddr = raw
        .parse()
        .map_err(|_| ValidationError::InvalidAddress(raw.to_owned()))?;
    let port = selector
        .port
        .ok_or(ValidationError::MissingPort("virtual service"))?;
    let protocol = match selector.protocol.unwrap_or(ProtocolArg::Tcp) {
        ProtocolArg::Tcp => Protocol::Tcp,
        ProtocolArg::Udp => Protocol::Udp,
    };

    Ok(VirtualServiceRef::Endpoint {
        address,
        port,
        protocol,
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so the operation is refused.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Render an empty string as a dash for table cells.
pub fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".into()
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn selector(index: Option<u32>, address: Option<&str>, port: Option<u16>) -> VsSelector {
        VsSelector {
            index,
            address: address.map(str::to_owned),
            port,
            protocol: Some(ProtocolArg::Udp),
        }
    }

    #[test]
    fn index_wins() {
        let r = resolve_selector(&selector(Some(7), None, None)).unwrap();
        assert_eq!(r, VirtualServiceRef::Index(7));
    }

    #[test]
    fn endpoint_selector() {
        let r = resolve_selector(&selector(None, Some("10.0.0.9"), Some(53))).unwrap();
        assert_eq!(r.to_string(), "10.0.0.9:53/udp");
    }

    #[test]
    fn bad_address_is_usage_error() {
        let err = resolve_selector(&selector(None, Some("web01"), Some(80))).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_code::USAGE);
    }

    #[test]
    fn missing_port_is_usage_error() {
        let err = resolve_selector(&selector(None, Some("10.0.0.9"), None)).unwrap_err();
        assert_eq!(err.to_string(), "a virtual service needs a port");
    }

    #[test]
    fn confirm_skipped_with_yes() {
        assert!(confirm("Delete?", "vs delete", true).unwrap());
    }
}
