//! Local network address lookup, logged at startup so phones on the same
//! LAN know where to point their browser.

use std::net::IpAddr;

/// The machine's non-loopback local address, if one can be found.
pub fn lan_address() -> Option<IpAddr> {
    match local_ip_address::local_ip() {
        Ok(ip) if !ip.is_loopback() => Some(ip),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "Failed to get local ip address");
            None
        }
    }
}

/// URL a browser on the LAN should open.
pub fn access_url(ip: IpAddr, port: u16) -> String {
    match ip {
        IpAddr::V4(v4) => format!("http://{v4}:{port}"),
        IpAddr::V6(v6) => format!("http://[{v6}]:{port}"),
    }
}
