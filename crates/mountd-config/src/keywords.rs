//! # Mount Custom Keywords
//!
//! `daemon_name` and `machine_name` check configuration strings against the
//! hosting process's registries during validation, so unknown names are
//! reported in the same batch as structural errors.

use mountd_core::{DaemonRegistry, MachineRegistry, RegistryError};
use mountd_schema::{InstancePath, KeywordRegistry, KeywordValidator};
use serde_json::Value;

use crate::builder::{DAEMON_NAME, MACHINE_NAME};

/// Accepts strings naming a registered daemon.
pub fn daemon_name_validator<'a>(daemons: &'a dyn DaemonRegistry) -> impl KeywordValidator + 'a {
    move |value: &Value, _path: &InstancePath| match value.as_str() {
        Some(name) if daemons.daemon(name).is_some() => Ok(()),
        Some(name) => Err(RegistryError::UnknownDaemon(name.to_string()).to_string()),
        None => Err("daemon name must be a string".to_string()),
    }
}

/// Accepts strings naming a registered control machine.
pub fn machine_name_validator<'a>(
    machines: &'a dyn MachineRegistry,
) -> impl KeywordValidator + 'a {
    move |value: &Value, _path: &InstancePath| match value.as_str() {
        Some(name) if machines.machine(name).is_some() => Ok(()),
        Some(name) => Err(RegistryError::UnknownMachine(name.to_string()).to_string()),
        None => Err("machine name must be a string".to_string()),
    }
}

/// Keyword registry for the mount configuration schemas.
pub fn mount_keywords<'a>(
    daemons: &'a dyn DaemonRegistry,
    machines: &'a dyn MachineRegistry,
) -> KeywordRegistry<'a> {
    KeywordRegistry::new()
        .with(DAEMON_NAME, daemon_name_validator(daemons))
        .with(MACHINE_NAME, machine_name_validator(machines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mountd_core::Registry;
    use serde_json::json;
    use std::net::{IpAddr, Ipv4Addr};

    fn registry() -> Registry {
        Registry::new()
            .with_daemon("mount", IpAddr::V4(Ipv4Addr::LOCALHOST), 9036)
            .with_machine("tcs", IpAddr::V4(Ipv4Addr::LOCALHOST))
    }

    #[test]
    fn test_daemon_name_keyword() {
        let registry = registry();
        let keywords = mount_keywords(&registry, &registry);
        let validator = keywords.get(DAEMON_NAME).unwrap();
        let path = InstancePath::root().key("daemon");

        assert!(validator.validate(&json!("mount"), &path).is_ok());
        let message = validator.validate(&json!("dome"), &path).unwrap_err();
        assert_eq!(message, "unknown daemon identifier 'dome'");
    }

    #[test]
    fn test_machine_name_keyword() {
        let registry = registry();
        let keywords = mount_keywords(&registry, &registry);
        let validator = keywords.get(MACHINE_NAME).unwrap();
        let path = InstancePath::root().key("control_machines").index(0);

        assert!(validator.validate(&json!("tcs"), &path).is_ok());
        let message = validator.validate(&json!("laptop"), &path).unwrap_err();
        assert!(message.contains("unknown control-machine identifier"));
    }

    #[test]
    fn test_daemon_and_machine_namespaces_are_separate() {
        let registry = registry();
        let keywords = mount_keywords(&registry, &registry);
        let path = InstancePath::root();
        assert!(keywords
            .get(DAEMON_NAME)
            .unwrap()
            .validate(&json!("tcs"), &path)
            .is_err());
        assert!(keywords
            .get(MACHINE_NAME)
            .unwrap()
            .validate(&json!("mount"), &path)
            .is_err());
    }
}
