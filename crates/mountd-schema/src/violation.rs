//! # Structured Validation Diagnostics
//!
//! A [`ValidationError`] pairs the location of a violating value with a
//! classification and a human-readable message. Locations are rendered as
//! JSON Pointers (`/ha/uart_address`), the document root as `(root)`.

use std::fmt;

use serde::Serialize;

/// One step into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathToken {
    /// An object property name.
    Key(String),
    /// An array element index.
    Index(usize),
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // RFC 6901 escaping.
            PathToken::Key(key) => write!(f, "{}", key.replace('~', "~0").replace('/', "~1")),
            PathToken::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Ordered path from the document root to a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct InstancePath(Vec<PathToken>);

impl InstancePath {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// A copy of this path extended by `token`.
    pub fn child(&self, token: PathToken) -> Self {
        let mut tokens = self.0.clone();
        tokens.push(token);
        Self(tokens)
    }

    /// A copy of this path extended by an object key.
    pub fn key(&self, key: &str) -> Self {
        self.child(PathToken::Key(key.to_string()))
    }

    /// A copy of this path extended by an array index.
    pub fn index(&self, index: usize) -> Self {
        self.child(PathToken::Index(index))
    }

    pub(crate) fn push(&mut self, token: PathToken) {
        self.0.push(token);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("(root)");
        }
        for token in &self.0 {
            write!(f, "/{token}")?;
        }
        Ok(())
    }
}

impl<'a> FromIterator<&'a str> for InstancePath {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Self(iter.into_iter().map(|k| PathToken::Key(k.to_string())).collect())
    }
}

/// Classification of a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "keyword")]
pub enum ViolationKind {
    /// The value has the wrong JSON type.
    Type,
    /// A required property is missing.
    Required,
    /// A property is not declared on a closed object.
    NotPermitted,
    /// The value is not one of the permitted literals.
    Enum,
    /// The number is below the inclusive minimum.
    Minimum,
    /// The number is above the inclusive maximum.
    Maximum,
    /// The array has too few elements.
    MinItems,
    /// The array has too many elements.
    MaxItems,
    /// A property is present without one of its co-dependencies.
    Dependency,
    /// The value matches none of the `oneOf` alternatives.
    OneOf,
    /// A custom keyword rejected the value.
    Keyword(String),
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Location of the violating value.
    pub path: InstancePath,
    /// What kind of check failed.
    pub kind: ViolationKind,
    /// Human-readable description of the violation.
    pub message: String,
}

impl ValidationError {
    pub fn new(path: InstancePath, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: {}", self.path, self.message)
    }
}

/// Ordered collection of validation violations.
///
/// Order is depth-first document order, so diagnostics read top-to-bottom.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationViolations {
    violations: Vec<ValidationError>,
}

impl ValidationViolations {
    pub fn new(violations: Vec<ValidationError>) -> Self {
        Self { violations }
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[ValidationError] {
        &self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ValidationViolations {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}
