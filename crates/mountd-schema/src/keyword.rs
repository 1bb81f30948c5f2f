//! # Custom Keyword Registry
//!
//! Schema nodes may carry named custom keywords (e.g. `daemon_name`). The
//! engine has no built-in knowledge of any keyword: the caller supplies a
//! [`KeywordRegistry`] mapping each name to a [`KeywordValidator`] when it
//! constructs the [`crate::Validator`]. A node tagged with a keyword that is
//! missing from the registry is an engine misuse, not a data problem.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::violation::InstancePath;

/// A domain-specific predicate over a single value.
///
/// `Err` carries the message reported at `path`.
pub trait KeywordValidator {
    fn validate(&self, value: &Value, path: &InstancePath) -> Result<(), String>;
}

impl<F> KeywordValidator for F
where
    F: Fn(&Value, &InstancePath) -> Result<(), String>,
{
    fn validate(&self, value: &Value, path: &InstancePath) -> Result<(), String> {
        self(value, path)
    }
}

/// Mapping from keyword name to validator.
#[derive(Default)]
pub struct KeywordRegistry<'a> {
    validators: BTreeMap<String, Box<dyn KeywordValidator + 'a>>,
}

impl<'a> KeywordRegistry<'a> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            validators: BTreeMap::new(),
        }
    }

    /// Register `validator` under `name`, replacing any previous entry.
    pub fn with(mut self, name: impl Into<String>, validator: impl KeywordValidator + 'a) -> Self {
        self.validators.insert(name.into(), Box::new(validator));
        self
    }

    pub fn get(&self, name: &str) -> Option<&(dyn KeywordValidator + 'a)> {
        self.validators.get(name).map(|v| v.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Registered keyword names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.validators.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Debug for KeywordRegistry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordRegistry")
            .field("keywords", &self.names())
            .finish()
    }
}
