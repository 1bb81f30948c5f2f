//! # Error Types
//!
//! The configuration load path distinguishes:
//!
//! - file and parse errors: fatal, no validation attempted;
//! - schema violations, including unknown daemon or machine names: every
//!   violation is collected and returned together;
//! - binder errors: a precondition violation (stale or never-validated
//!   document), fatal and not retried.

use mountd_core::RegistryError;
use mountd_schema::{EngineError, ValidationViolations};
use thiserror::Error;

/// Error while binding a validated document into a [`crate::BoundConfig`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    /// A name validated earlier no longer resolves.
    #[error("registry changed between validation and binding: {0}")]
    Registry(#[from] RegistryError),

    /// The document does not have the shape validation guarantees.
    #[error("binder precondition violated at '{path}': expected {expected}")]
    Precondition {
        /// JSON Pointer to the offending value.
        path: String,
        /// What the binder expected to find.
        expected: String,
    },
}

/// Error loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config '{path}': {source}")]
    Read {
        /// Path to the configuration file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not well-formed JSON.
    #[error("config '{path}' is not valid JSON: {reason}")]
    Parse {
        /// Path to the configuration file.
        path: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The document violates the schema.
    #[error("config '{source_name}' failed validation against the {variant} schema:\n{violations}")]
    Invalid {
        /// Path or label of the document.
        source_name: String,
        /// Name of the schema variant used.
        variant: String,
        /// Every violation, in document order.
        violations: ValidationViolations,
    },

    /// The validation engine was misused.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Binding failed after successful validation.
    #[error(transparent)]
    Bind(#[from] BindError),
}

impl ConfigError {
    /// The collected violations, if this is a validation failure.
    pub fn violations(&self) -> Option<&ValidationViolations> {
        match self {
            ConfigError::Invalid { violations, .. } => Some(violations),
            _ => None,
        }
    }
}

/// A schema variant name that does not exist.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown schema variant '{0}' (expected 'baseline' or 'extended')")]
pub struct UnknownVariant(pub String);
