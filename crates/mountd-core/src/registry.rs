//! # Name Registries
//!
//! The hosting process owns the catalog of daemons and control machines.
//! Configuration validation and binding consume it through the two lookup
//! traits below; [`Registry`] is the file-backed implementation used by the
//! CLI and by tests.
//!
//! Registry files are JSON or YAML:
//!
//! ```json
//! {
//!   "daemons": { "mount": { "host": "10.2.6.200", "port": 9036 } },
//!   "machines": { "tcs": "10.2.6.100" }
//! }
//! ```

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::identity::{ControlMachine, DaemonDescriptor, DaemonName, MachineName};

/// Lookup of daemon names to descriptors.
pub trait DaemonRegistry {
    /// Returns the descriptor registered under `name`, if any.
    fn daemon(&self, name: &str) -> Option<DaemonDescriptor>;

    /// Resolve `name`, failing with [`RegistryError::UnknownDaemon`].
    fn resolve_daemon(&self, name: &str) -> Result<DaemonDescriptor, RegistryError> {
        self.daemon(name)
            .ok_or_else(|| RegistryError::UnknownDaemon(name.to_string()))
    }
}

/// Lookup of control-machine names to network addresses.
pub trait MachineRegistry {
    /// Returns the machine registered under `name`, if any.
    fn machine(&self, name: &str) -> Option<ControlMachine>;

    /// Resolve `name`, failing with [`RegistryError::UnknownMachine`].
    fn resolve_machine(&self, name: &str) -> Result<ControlMachine, RegistryError> {
        self.machine(name)
            .ok_or_else(|| RegistryError::UnknownMachine(name.to_string()))
    }
}

/// Network endpoint of a daemon entry in a registry file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DaemonEndpoint {
    /// Host the daemon binds to.
    pub host: IpAddr,
    /// Port the daemon listens on.
    pub port: u16,
}

/// In-memory registry of daemons and control machines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Registry {
    daemons: BTreeMap<String, DaemonEndpoint>,
    machines: BTreeMap<String, IpAddr>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a daemon entry, replacing any existing entry with the same name.
    pub fn with_daemon(mut self, name: impl Into<String>, host: IpAddr, port: u16) -> Self {
        self.daemons.insert(name.into(), DaemonEndpoint { host, port });
        self
    }

    /// Add a control-machine entry, replacing any existing entry with the same name.
    pub fn with_machine(mut self, name: impl Into<String>, address: IpAddr) -> Self {
        self.machines.insert(name.into(), address);
        self
    }

    /// Load a registry file.
    ///
    /// `.yaml`/`.yml` files are parsed as YAML, everything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Load`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let load_error = |reason: String| RegistryError::Load {
            path: path.display().to_string(),
            reason,
        };

        let content = std::fs::read_to_string(path)
            .map_err(|e| load_error(format!("cannot read file: {e}")))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| load_error(format!("invalid YAML: {e}"))),
            _ => serde_json::from_str(&content)
                .map_err(|e| load_error(format!("invalid JSON: {e}"))),
        }
    }

    /// Names of all registered daemons, sorted.
    pub fn daemon_names(&self) -> Vec<&str> {
        self.daemons.keys().map(String::as_str).collect()
    }

    /// Names of all registered control machines, sorted.
    pub fn machine_names(&self) -> Vec<&str> {
        self.machines.keys().map(String::as_str).collect()
    }
}

impl DaemonRegistry for Registry {
    fn daemon(&self, name: &str) -> Option<DaemonDescriptor> {
        self.daemons.get(name).map(|endpoint| DaemonDescriptor {
            name: DaemonName(name.to_string()),
            host: endpoint.host,
            port: endpoint.port,
        })
    }
}

impl MachineRegistry for Registry {
    fn machine(&self, name: &str) -> Option<ControlMachine> {
        self.machines.get(name).map(|address| ControlMachine {
            name: MachineName(name.to_string()),
            address: *address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::Ipv4Addr;

    fn sample() -> Registry {
        Registry::new()
            .with_daemon("mount", IpAddr::V4(Ipv4Addr::new(10, 2, 6, 200)), 9036)
            .with_machine("tcs", IpAddr::V4(Ipv4Addr::new(10, 2, 6, 100)))
    }

    #[test]
    fn test_resolve_known_daemon() {
        let daemon = sample().resolve_daemon("mount").unwrap();
        assert_eq!(daemon.name.as_str(), "mount");
        assert_eq!(daemon.port, 9036);
    }

    #[test]
    fn test_resolve_unknown_daemon() {
        let err = sample().resolve_daemon("dome").unwrap_err();
        assert_eq!(err, RegistryError::UnknownDaemon("dome".to_string()));
        assert!(err.to_string().contains("unknown daemon identifier"));
    }

    #[test]
    fn test_resolve_unknown_machine() {
        let err = sample().resolve_machine("laptop").unwrap_err();
        assert_eq!(err, RegistryError::UnknownMachine("laptop".to_string()));
        assert!(err.to_string().contains("unknown control-machine identifier"));
    }

    #[test]
    fn test_load_json_registry() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"daemons": {{"mount": {{"host": "127.0.0.1", "port": 9036}}}},
                "machines": {{"tcs": "127.0.0.2"}}}}"#
        )
        .unwrap();

        let registry = Registry::from_path(file.path()).unwrap();
        assert_eq!(registry.daemon_names(), vec!["mount"]);
        assert_eq!(
            registry.resolve_machine("tcs").unwrap().address.to_string(),
            "127.0.0.2"
        );
    }

    #[test]
    fn test_load_yaml_registry() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "daemons:\n  mount:\n    host: 127.0.0.1\n    port: 9036").unwrap();

        let registry = Registry::from_path(file.path()).unwrap();
        assert!(registry.daemon("mount").is_some());
        assert!(registry.machine_names().is_empty());
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"telescopes": {{}}}}"#).unwrap();

        let err = Registry::from_path(file.path()).unwrap_err();
        assert!(matches!(err, RegistryError::Load { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Registry::from_path(Path::new("/nonexistent/registry.json")).unwrap_err();
        match err {
            RegistryError::Load { reason, .. } => assert!(reason.contains("cannot read file")),
            other => panic!("Expected Load, got: {other}"),
        }
    }
}
