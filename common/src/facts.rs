//! Structured records extracted from switch console output.

use std::fmt;

use crate::port;

/// One outgoing-interface line of the multicast routing table: `port`
/// forwards traffic for `group`. Duplicates are legitimate and kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    pub group: String,
    pub port: String,
}

impl Subscription {
    pub fn new(group: impl Into<String>, port: &str) -> Self {
        Self {
            group: group.into(),
            port: port::normalize(port),
        }
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.group, self.port)
    }
}

/// The device LLDP reports on the far side of a local port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LldpNeighbor {
    pub port: String,
    pub remote_host: String,
}

impl LldpNeighbor {
    pub fn new(port: &str, remote_host: impl Into<String>) -> Self {
        Self {
            port: port::normalize(port),
            remote_host: remote_host.into(),
        }
    }
}

impl fmt::Display for LldpNeighbor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.port, self.remote_host)
    }
}

/// A configured human-readable name for one multicast address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MaddrMapping {
    pub address: String,
    pub name: String,
}

impl MaddrMapping {
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
        }
    }
}
