//! # Validation Engine
//!
//! Walks a parsed JSON value against a [`SchemaNode`] tree and collects every
//! independent violation instead of stopping at the first one, so a user
//! fixing a configuration sees all problems in one pass.
//!
//! ## Ordering
//!
//! Diagnostics are emitted in depth-first document order. For an object, the
//! missing-required errors come first, then each present property in the
//! order it appears in the document (with its subtree), then unmet
//! dependencies. Documents must be parsed with key order preserved for this
//! to match the source text.
//!
//! ## Failure Policy
//!
//! Data problems never produce `Err`. `Err` is reserved for misuse of the
//! engine itself ([`EngineError`]), e.g. a schema tagged with a custom
//! keyword the caller did not register. Once a node's own type check fails
//! the engine does not descend further into that value.

use serde_json::Value;
use thiserror::Error;

use crate::keyword::KeywordRegistry;
use crate::node::{AdditionalProperties, SchemaKind, SchemaNode};
use crate::violation::{
    InstancePath, PathToken, ValidationError, ValidationViolations, ViolationKind,
};

/// Misuse of the validation engine. Never caused by document content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A schema node references a keyword with no registered validator.
    #[error("schema at '{path}' uses custom keyword '{keyword}' which is not registered")]
    UnregisteredKeyword {
        /// The keyword name on the schema node.
        keyword: String,
        /// Location in the document being validated when the keyword was hit.
        path: String,
    },
}

/// Error during schema validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The document did not conform to the schema.
    #[error("validation failed against schema '{schema_name}':\n{violations}")]
    ValidationFailed {
        /// Name of the schema that was validated against.
        schema_name: String,
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// The engine was misused; no verdict on the document is available.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A schema validator bound to a custom keyword registry.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    keywords: &'a KeywordRegistry<'a>,
}

impl<'a> Validator<'a> {
    pub fn new(keywords: &'a KeywordRegistry<'a>) -> Self {
        Self { keywords }
    }

    /// Validate `value` against `schema`, appending violations to `sink`.
    ///
    /// Returns `Ok(true)` when `value` is fully valid. `value` is never
    /// modified.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] only for engine misuse.
    pub fn validate(
        &self,
        value: &Value,
        schema: &SchemaNode,
        sink: &mut Vec<ValidationError>,
    ) -> Result<bool, EngineError> {
        let before = sink.len();
        let mut path = InstancePath::root();
        self.validate_node(value, schema, &mut path, sink)?;
        Ok(sink.len() == before)
    }

    /// Validate a whole document, returning all violations as an error.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidationFailed` with every violation
    /// in document order, or `SchemaValidationError::Engine` on misuse.
    pub fn validate_document(
        &self,
        schema_name: &str,
        instance: &Value,
        schema: &SchemaNode,
    ) -> Result<(), SchemaValidationError> {
        let mut errors = Vec::new();
        let valid = self.validate(instance, schema, &mut errors)?;

        tracing::debug!(
            schema = schema_name,
            violations = errors.len(),
            "validated document"
        );

        if valid {
            Ok(())
        } else {
            Err(SchemaValidationError::ValidationFailed {
                schema_name: schema_name.to_string(),
                violations: ValidationViolations::new(errors),
            })
        }
    }

    fn validate_node(
        &self,
        value: &Value,
        schema: &SchemaNode,
        path: &mut InstancePath,
        sink: &mut Vec<ValidationError>,
    ) -> Result<(), EngineError> {
        if !kind_matches(value, schema.kind()) {
            sink.push(ValidationError::new(
                path.clone(),
                ViolationKind::Type,
                format!("expected {}, found {}", schema.kind(), describe(value)),
            ));
            return Ok(());
        }

        match value {
            Value::Object(map) => self.validate_object(map, schema, path, sink)?,
            Value::Array(elements) => self.validate_array(elements, schema, path, sink)?,
            _ => check_scalar(value, schema, path, sink),
        }

        if !schema.alternatives().is_empty() {
            self.validate_one_of(value, schema.alternatives(), path, sink)?;
        }

        for keyword in schema.keywords() {
            let validator =
                self.keywords
                    .get(keyword)
                    .ok_or_else(|| EngineError::UnregisteredKeyword {
                        keyword: keyword.clone(),
                        path: path.to_string(),
                    })?;
            if let Err(message) = validator.validate(value, path) {
                sink.push(ValidationError::new(
                    path.clone(),
                    ViolationKind::Keyword(keyword.clone()),
                    message,
                ));
            }
        }

        Ok(())
    }

    fn validate_object(
        &self,
        map: &serde_json::Map<String, Value>,
        schema: &SchemaNode,
        path: &mut InstancePath,
        sink: &mut Vec<ValidationError>,
    ) -> Result<(), EngineError> {
        for name in schema.required() {
            if !map.contains_key(name) {
                sink.push(ValidationError::new(
                    path.key(name),
                    ViolationKind::Required,
                    format!("required property '{name}' is missing"),
                ));
            }
        }

        for (key, child) in map {
            let child_schema = match (schema.property_schema(key), schema.additional()) {
                (Some(declared), _) => declared,
                (None, AdditionalProperties::Schema(extra)) => &**extra,
                (None, AdditionalProperties::Allow) => continue,
                (None, AdditionalProperties::Deny) => {
                    sink.push(ValidationError::new(
                        path.key(key),
                        ViolationKind::NotPermitted,
                        format!("property '{key}' is not permitted here"),
                    ));
                    continue;
                }
            };
            path.push(PathToken::Key(key.clone()));
            let result = self.validate_node(child, child_schema, path, sink);
            path.pop();
            result?;
        }

        for key in map.keys() {
            let Some(requires) = schema.dependencies().get(key) else {
                continue;
            };
            for name in requires.iter().filter(|name| !map.contains_key(*name)) {
                sink.push(ValidationError::new(
                    path.key(key),
                    ViolationKind::Dependency,
                    format!("property '{key}' requires property '{name}' to also be set"),
                ));
            }
        }

        Ok(())
    }

    fn validate_array(
        &self,
        elements: &[Value],
        schema: &SchemaNode,
        path: &mut InstancePath,
        sink: &mut Vec<ValidationError>,
    ) -> Result<(), EngineError> {
        if let Some(min) = schema.min_items_bound() {
            if elements.len() < min {
                sink.push(ValidationError::new(
                    path.clone(),
                    ViolationKind::MinItems,
                    format!("expected at least {min} items, found {}", elements.len()),
                ));
            }
        }
        if let Some(max) = schema.max_items_bound() {
            if elements.len() > max {
                sink.push(ValidationError::new(
                    path.clone(),
                    ViolationKind::MaxItems,
                    format!("expected at most {max} items, found {}", elements.len()),
                ));
            }
        }

        if let Some(items) = schema.items() {
            for (index, element) in elements.iter().enumerate() {
                path.push(PathToken::Index(index));
                let result = self.validate_node(element, items, path, sink);
                path.pop();
                result?;
            }
        }

        Ok(())
    }

    /// Exactly one alternative must validate. Each attempt runs against its
    /// own scratch sink; on zero matches a single aggregate error is
    /// reported. Several matches are accepted: alternatives are expected to
    /// be disjoint by construction.
    fn validate_one_of(
        &self,
        value: &Value,
        alternatives: &[SchemaNode],
        path: &mut InstancePath,
        sink: &mut Vec<ValidationError>,
    ) -> Result<(), EngineError> {
        let mut matches = 0usize;
        for alternative in alternatives {
            let mut scratch = Vec::new();
            self.validate_node(value, alternative, path, &mut scratch)?;
            if scratch.is_empty() {
                matches += 1;
            }
        }

        match matches {
            0 => sink.push(ValidationError::new(
                path.clone(),
                ViolationKind::OneOf,
                format!(
                    "value does not match any of the {} permitted alternatives",
                    alternatives.len()
                ),
            )),
            1 => {}
            n => tracing::debug!(path = %path, matches = n, "oneOf matched several alternatives"),
        }

        Ok(())
    }
}

/// Enum membership, then inclusive bounds for numeric kinds.
fn check_scalar(
    value: &Value,
    schema: &SchemaNode,
    path: &InstancePath,
    sink: &mut Vec<ValidationError>,
) {
    if let Some(permitted) = schema.enum_values() {
        if !permitted.iter().any(|literal| literal_eq(literal, value)) {
            let listed: Vec<String> = permitted.iter().map(Value::to_string).collect();
            sink.push(ValidationError::new(
                path.clone(),
                ViolationKind::Enum,
                format!("value {value} is not one of [{}]", listed.join(", ")),
            ));
        }
    }

    if !schema.kind().is_numeric() {
        return;
    }
    let Some(number) = value.as_f64() else {
        return;
    };
    if let Some(min) = schema.minimum_bound() {
        if number < min {
            sink.push(ValidationError::new(
                path.clone(),
                ViolationKind::Minimum,
                format!("value {value} is less than the minimum of {min}"),
            ));
        }
    }
    if let Some(max) = schema.maximum_bound() {
        if number > max {
            sink.push(ValidationError::new(
                path.clone(),
                ViolationKind::Maximum,
                format!("value {value} is greater than the maximum of {max}"),
            ));
        }
    }
}

fn kind_matches(value: &Value, kind: SchemaKind) -> bool {
    match kind {
        SchemaKind::Object => value.is_object(),
        SchemaKind::Array => value.is_array(),
        SchemaKind::String => value.is_string(),
        SchemaKind::Boolean => value.is_boolean(),
        SchemaKind::Number => value.is_number(),
        SchemaKind::Integer => is_integer(value),
    }
}

/// Integral JSON numbers, including floats such as `4.0`.
fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => true,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0),
        _ => false,
    }
}

/// Literal equality with numbers compared by value (`1` equals `1.0`).
fn literal_eq(literal: &Value, value: &Value) -> bool {
    match (literal, value) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => a.as_f64() == b.as_f64(),
        },
        _ => literal == value,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
