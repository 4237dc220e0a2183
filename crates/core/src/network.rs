//! Client address classification used by submission enrichment.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Whether `addr` is private, loopback or otherwise not worth a geolocation
/// lookup.
///
/// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) are classified by their
/// IPv4 part.
pub fn is_local_address(addr: IpAddr) -> bool {
    match addr {
        IpAddr::V4(v4) => is_local_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_local_v4(v4),
            None => is_local_v6(v6),
        },
    }
}

fn is_local_v4(addr: Ipv4Addr) -> bool {
    let [a, b, ..] = addr.octets();
    addr.is_private()
        || addr.is_loopback()
        || addr.is_link_local()
        || addr.is_unspecified()
        || addr.is_broadcast()
        // Carrier-grade NAT, 100.64.0.0/10.
        || (a == 100 && (b & 0b1100_0000) == 64)
}

fn is_local_v6(addr: Ipv6Addr) -> bool {
    let first = addr.segments()[0];
    addr.is_loopback()
        || addr.is_unspecified()
        // Unique local, fc00::/7.
        || (first & 0xfe00) == 0xfc00
        // Link local, fe80::/10.
        || (first & 0xffc0) == 0xfe80
}

/// First parseable address of an `X-Forwarded-For` header value.
///
/// The header is `client, proxy1, proxy2`; the left-most valid entry is the
/// originating client.
pub fn parse_forwarded_for(value: &str) -> Option<IpAddr> {
    value
        .split(',')
        .map(str::trim)
        .find_map(|entry| entry.parse::<IpAddr>().ok())
}
