//! # mountd-config: Mount Configuration Validation & Binding
//!
//! Validates a mount daemon's JSON configuration against a fixed root
//! schema and binds it into a [`BoundConfig`] that downstream motion and
//! networking code can trust without re-checking.
//!
//! ## Flow
//!
//! ```text
//! file ─▶ read_document ─▶ validate_config ─▶ Binder::bind ─▶ BoundConfig
//!                              │
//!                              └─▶ ConfigError::Invalid (all violations)
//! ```
//!
//! - [`builder`] assembles schema fragments; the three stepper axes share
//!   one parameterized builder.
//! - [`SchemaVariant`] selects the root schema (`baseline` or `extended`);
//!   each is built once per process.
//! - [`keywords`] supplies the `daemon_name` and `machine_name` checks
//!   against the injected registries.
//! - [`Binder`] only accepts a [`ValidatedDocument`], which only
//!   [`validate_config`] produces.
//!
//! ## Crate Policy
//!
//! - Depends on `mountd-core` and `mountd-schema` internally.
//! - Optional sections are always bound as a [`Section`], never omitted.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod binder;
pub mod bound;
pub mod builder;
pub mod error;
pub mod keywords;
pub mod loader;
pub mod variant;

// Re-export primary types for ergonomic imports.
pub use binder::{validate_config, Binder, ValidatedDocument};
pub use bound::{
    BoundConfig, ControllerFanConfig, EndstopConfig, InterfaceConfig, OrientationConfig, Section,
    StatusLightConfig, StepperConfig, TrackingConfig, UartConfig,
};
pub use builder::{RootLayout, StepperRequirements};
pub use error::{BindError, ConfigError, UnknownVariant};
pub use keywords::mount_keywords;
pub use loader::{bind_document, load_config, read_document};
pub use variant::SchemaVariant;
