//! # mountd-schema: Schema Model & Validation Engine
//!
//! A small, purpose-built schema engine for daemon configuration documents.
//! It is not a general JSON Schema implementation: there is no `$ref`, no
//! remote resolution and no format checking beyond caller-supplied
//! keywords.
//!
//! ## Schema Model (`node`)
//!
//! [`SchemaNode`] is an immutable tree of typed constraints: required keys,
//! closed-world objects, dependency maps, enums, inclusive numeric bounds,
//! array item schemas and lengths, `oneOf` alternatives, and custom keyword
//! tags.
//!
//! ## Validation (`validate`)
//!
//! [`Validator`] walks a `serde_json::Value` against a schema and collects
//! every [`ValidationError`] in document order. Data problems are never
//! returned as `Err`; only engine misuse ([`EngineError`]) is.
//!
//! ## Custom Keywords (`keyword`)
//!
//! [`KeywordRegistry`] maps keyword names to [`KeywordValidator`]s supplied
//! by the caller, keeping deployment-specific catalogs out of the engine.
//!
//! ## Audit (`audit`)
//!
//! [`audit_schema`] and [`open_objects`] check assembled schema trees for
//! construction defects; they are meant to run in tests.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mountd-*` crates.
//! - No knowledge of mounts, daemons or machines.

pub mod audit;
pub mod keyword;
pub mod node;
pub mod validate;
pub mod violation;

// Re-export primary types for ergonomic imports.
pub use audit::{audit_schema, open_objects, SchemaFinding};
pub use keyword::{KeywordRegistry, KeywordValidator};
pub use node::{AdditionalProperties, SchemaKind, SchemaNode};
pub use validate::{EngineError, SchemaValidationError, Validator};
pub use violation::{
    InstancePath, PathToken, ValidationError, ValidationViolations, ViolationKind,
};
