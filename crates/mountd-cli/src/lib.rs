//! # mountd-cli: Mount Configuration Command-Line Interface
//!
//! Provides the `mountd-config` tool operators run before (re)starting a
//! mount daemon, so a broken configuration is caught at the desk rather
//! than at the telescope.
//!
//! ## Subcommands
//!
//! - `mountd-config validate`: Validate a configuration file and list every diagnostic.
//! - `mountd-config show`: Validate, bind and print the resulting configuration.
//! - `mountd-config schema`: Print (and optionally audit) a root schema.
//!
//! ```bash
//! mountd-config validate w1m.json --registry registry.yaml --variant extended
//! mountd-config show w1m.json --registry registry.yaml
//! mountd-config schema --variant baseline --audit
//! ```
//!
//! ## Exit Codes
//!
//! `0` valid, `1` validation failure, `2` operational error (unreadable
//! files, broken registry, engine misuse).

pub mod schema;
pub mod show;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use mountd_config::SchemaVariant;
use mountd_core::Registry;
use mountd_schema::ValidationViolations;

/// Arguments shared by the subcommands that operate on a configuration file.
#[derive(Args, Debug)]
pub struct DocumentArgs {
    /// Path to the JSON configuration file.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Registry of known daemons and control machines (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub registry: PathBuf,

    /// Root schema variant to validate against.
    #[arg(long, default_value_t = SchemaVariant::Baseline)]
    pub variant: SchemaVariant,
}

/// Load the daemon/machine registry named on the command line.
pub fn load_registry(path: &Path) -> Result<Registry> {
    let registry = Registry::from_path(path)
        .with_context(|| format!("failed to load registry {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        daemons = registry.daemon_names().len(),
        machines = registry.machine_names().len(),
        "loaded registry"
    );
    Ok(registry)
}

/// Print a failure summary followed by one line per violation.
pub fn print_violations(source: &Path, violations: &ValidationViolations) {
    println!("FAIL: {} ({} error(s))", source.display(), violations.len());
    for violation in violations {
        println!("{violation}");
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::DocumentArgs;
    use mountd_config::SchemaVariant;
    use std::path::Path;

    pub const REGISTRY_YAML: &str = "\
daemons:
  mount:
    host: 10.2.6.200
    port: 9036
machines:
  tcs: 10.2.6.100
";

    pub fn minimal_config(daemon: &str) -> String {
        let axis = r#"{
            "step_pin": "PF0", "dir_pin": "PF1", "enable_pin": "PD7",
            "rotation_microsteps": 3200, "rotation_distance": 360,
            "position_min": -180, "position_max": 180,
            "speed": 5, "acceleration": 10, "homing_backoff": 5
        }"#;
        format!(
            r#"{{
                "daemon": "{daemon}", "log_name": "mountd", "control_machines": ["tcs"],
                "serial_port": "/dev/ttyACM0", "serial_baud": 250000,
                "latitude": 28.76, "longitude": -17.88, "altitude": 2326,
                "connect_timeout": 5, "move_timeout": 60, "home_timeout": 120,
                "ha": {axis}, "dec": {axis}, "focus": {axis}
            }}"#
        )
    }

    /// Write a registry and `config` into `dir` and point the arguments at them.
    pub fn document_args(dir: &Path, config: &str) -> DocumentArgs {
        let registry = dir.join("registry.yaml");
        std::fs::write(&registry, REGISTRY_YAML).unwrap();
        let path = dir.join("mount.json");
        std::fs::write(&path, config).unwrap();
        DocumentArgs {
            config: path,
            registry,
            variant: SchemaVariant::Baseline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_registry_reads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.yaml");
        std::fs::write(&path, fixtures::REGISTRY_YAML).unwrap();
        let registry = load_registry(&path).unwrap();
        assert_eq!(registry.daemon_names(), vec!["mount"]);
        assert_eq!(registry.machine_names(), vec!["tcs"]);
    }

    #[test]
    fn load_registry_missing_file_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_registry(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to load registry"));
    }
}
