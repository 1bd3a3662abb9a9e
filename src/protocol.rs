//! Address classification and integer search keys.
//!
//! The same functions classify a range's start address while the table is
//! built and a query address while it is searched, so both paths always
//! agree on the protocol and the key.

use std::fmt;
use std::net::{IpAddr, Ipv6Addr};

/// Protocol family of an indexed address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// IPv4, including IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`)
    V4,
    /// Any other IPv6 address
    V6,
}

impl Protocol {
    /// Get the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::V4 => "IPv4",
            Protocol::V6 => "IPv6",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed-width search key derived from an address.
///
/// IPv6 keys keep only the leading 64 bits of the address. Addresses that
/// share their top 64 bits therefore compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpKey {
    V4(u32),
    V6(u64),
}

impl IpKey {
    /// Protocol list this key is searched in.
    pub fn protocol(&self) -> Protocol {
        match self {
            IpKey::V4(_) => Protocol::V4,
            IpKey::V6(_) => Protocol::V6,
        }
    }
}

/// Classify an address and derive its search key.
pub fn classify(addr: IpAddr) -> IpKey {
    match addr {
        IpAddr::V4(v4) => IpKey::V4(u32::from(v4)),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpKey::V4(u32::from(v4)),
            None => IpKey::V6(v6_prefix(v6)),
        },
    }
}

/// Classify a textual address.
///
/// Returns `None` for text that is neither an IPv4 nor an IPv6 address.
pub fn classify_str(addr: &str) -> Option<IpKey> {
    addr.parse::<IpAddr>().ok().map(classify)
}

fn v6_prefix(addr: Ipv6Addr) -> u64 {
    (u128::from(addr) >> 64) as u64
}
