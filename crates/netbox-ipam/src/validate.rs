//! Address and prefix syntax checks
//!
//! Run before any request is sent, so a malformed input never reaches NetBox.
//! Values are checked exactly as they will be posted, without trimming.

use crate::error::NetBoxError;
use ipnetwork::IpNetwork;

/// Parse a network in strict CIDR form
///
/// Host bits beyond the prefix length must be zero, so `10.0.0.0/24` passes
/// and `10.0.0.1/24` is rejected.
pub fn network(value: &str) -> Result<IpNetwork, NetBoxError> {
    let net = parse(value)?;
    if net.ip() != net.network() {
        return Err(NetBoxError::InvalidNetwork {
            value: value.to_string(),
            reason: format!("host bits set, did you mean {}/{}?", net.network(), net.prefix()),
        });
    }
    Ok(net)
}

/// Parse an interface address such as `10.0.0.5/24`
///
/// Host bits are allowed. A bare address is taken as a host route.
pub fn host_address(value: &str) -> Result<IpNetwork, NetBoxError> {
    parse(value)
}

fn parse(value: &str) -> Result<IpNetwork, NetBoxError> {
    value.parse::<IpNetwork>().map_err(|e| NetBoxError::InvalidNetwork {
        value: value.to_string(),
        reason: e.to_string(),
    })
}
