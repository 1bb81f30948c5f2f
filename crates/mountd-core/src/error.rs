//! # Error Types
//!
//! Errors raised when a daemon or control-machine name cannot be resolved,
//! or when the registry catalog itself cannot be loaded.

use thiserror::Error;

/// Error resolving a name against the deployment registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The daemon name has no entry in the daemon registry.
    #[error("unknown daemon identifier '{0}'")]
    UnknownDaemon(String),

    /// The machine name has no entry in the machine registry.
    #[error("unknown control-machine identifier '{0}'")]
    UnknownMachine(String),

    /// The registry catalog file could not be read or parsed.
    #[error("registry load error for '{path}': {reason}")]
    Load {
        /// Path to the registry file.
        path: String,
        /// Reason the file could not be loaded.
        reason: String,
    },
}
