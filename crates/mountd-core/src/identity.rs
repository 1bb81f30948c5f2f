//! # Daemon and Control-Machine Identities
//!
//! Newtype wrappers for the two name namespaces a mount configuration
//! refers to, and the resolved records those names map to.

use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

/// Name of a daemon as listed in the deployment registry (e.g. `"mount"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DaemonName(pub String);

/// Name of a control machine as listed in the deployment registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MachineName(pub String);

impl DaemonName {
    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl MachineName {
    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DaemonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "daemon:{}", self.0)
    }
}

impl std::fmt::Display for MachineName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "machine:{}", self.0)
    }
}

/// A daemon resolved from the registry: where it listens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonDescriptor {
    /// Registry name of the daemon.
    pub name: DaemonName,
    /// Host the daemon binds to.
    pub host: IpAddr,
    /// Port the daemon listens on.
    pub port: u16,
}

impl DaemonDescriptor {
    /// The socket address clients connect to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// A control machine resolved from the registry.
///
/// Commands that change mount state are only accepted from the addresses
/// of the configured control machines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlMachine {
    /// Registry name of the machine.
    pub name: MachineName,
    /// Network address of the machine.
    pub address: IpAddr,
}
