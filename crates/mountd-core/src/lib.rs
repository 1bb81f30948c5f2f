//! # mountd-core: Foundational Types for the Mount Daemon
//!
//! This crate is the leaf of the mount daemon workspace. It defines the
//! identities the configuration layer resolves names into and the registry
//! interfaces the hosting process injects.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for names.** `DaemonName` and `MachineName` are
//!    distinct types; a machine name cannot be passed where a daemon name
//!    is expected.
//!
//! 2. **Registries are explicit lookups.** Resolution goes through the
//!    [`DaemonRegistry`] and [`MachineRegistry`] traits and fails with a
//!    named [`RegistryError`] variant, never a generic not-found.
//!
//! 3. **Read-only collaborators.** Nothing in the configuration path mutates
//!    a registry once it is constructed.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mountd-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod registry;

// Re-export primary types for ergonomic imports.
pub use error::RegistryError;
pub use identity::{ControlMachine, DaemonDescriptor, DaemonName, MachineName};
pub use registry::{DaemonRegistry, MachineRegistry, Registry};
