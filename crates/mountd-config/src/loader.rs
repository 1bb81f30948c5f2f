//! # Configuration Loader
//!
//! The single entry point the daemon calls at startup: read the file, parse
//! it, validate it, and only then bind it. No partial configuration is ever
//! returned.

use std::path::Path;

use mountd_core::{DaemonRegistry, MachineRegistry};
use serde_json::Value;

use crate::binder::{validate_config, Binder};
use crate::bound::BoundConfig;
use crate::error::ConfigError;
use crate::variant::SchemaVariant;

/// Read and parse a JSON configuration file without validating it.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
pub fn read_document(path: &Path) -> Result<Value, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Validate and bind an already-parsed document.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] with every violation if validation
/// fails (binding is then never attempted), or [`ConfigError::Bind`] if
/// binding fails afterwards.
pub fn bind_document<R>(
    source_name: &str,
    document: &Value,
    variant: SchemaVariant,
    registry: &R,
) -> Result<BoundConfig, ConfigError>
where
    R: DaemonRegistry + MachineRegistry,
{
    let validated = validate_config(source_name, document, variant, registry, registry)?;
    Ok(Binder::new(registry, registry).bind(validated)?)
}

/// Load, validate and bind the configuration file at `path`.
///
/// # Errors
///
/// See [`read_document`] and [`bind_document`].
pub fn load_config<R>(
    path: &Path,
    variant: SchemaVariant,
    registry: &R,
) -> Result<BoundConfig, ConfigError>
where
    R: DaemonRegistry + MachineRegistry,
{
    tracing::debug!(path = %path.display(), %variant, "loading mount configuration");
    let document = read_document(path)?;
    bind_document(&path.display().to_string(), &document, variant, registry)
}
