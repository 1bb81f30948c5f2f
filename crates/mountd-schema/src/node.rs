//! # Schema Model
//!
//! An in-memory schema tree. Each [`SchemaNode`] carries a fixed
//! [`SchemaKind`] plus the constraints that apply to that kind.
//!
//! Nodes are built by chaining the consuming constructor methods below and
//! are never mutated afterwards: there is no `&mut self` API. Constraints
//! that do not apply to a node's kind are ignored by the engine and flagged
//! by [`crate::audit::audit_schema`].
//!
//! Nodes serialize to the familiar JSON Schema keyword layout so that the
//! effective schema can be printed for operators.

use std::collections::BTreeMap;

use serde::ser::{Serialize, Serializer};
use serde_json::Value;

/// The JSON type a schema node accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// A key/value mapping.
    Object,
    /// An ordered sequence.
    Array,
    /// A UTF-8 string.
    String,
    /// Any JSON number.
    Number,
    /// A JSON number with no fractional part.
    Integer,
    /// `true` or `false`.
    Boolean,
}

impl SchemaKind {
    /// Whether `minimum`/`maximum` apply to this kind.
    pub fn is_numeric(self) -> bool {
        matches!(self, SchemaKind::Number | SchemaKind::Integer)
    }

    /// Lowercase name as used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaKind::Object => "object",
            SchemaKind::Array => "array",
            SchemaKind::String => "string",
            SchemaKind::Number => "number",
            SchemaKind::Integer => "integer",
            SchemaKind::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy for object properties not listed in `properties`.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    /// Any extra property is accepted unchecked.
    Allow,
    /// Any extra property is a closed-world violation.
    Deny,
    /// Every extra property must satisfy this schema (named-entry maps).
    Schema(Box<SchemaNode>),
}

impl AdditionalProperties {
    /// Whether this policy is [`AdditionalProperties::Allow`].
    pub fn is_allow(&self) -> bool {
        matches!(self, AdditionalProperties::Allow)
    }
}

impl Serialize for AdditionalProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AdditionalProperties::Allow => serializer.serialize_bool(true),
            AdditionalProperties::Deny => serializer.serialize_bool(false),
            AdditionalProperties::Schema(node) => node.serialize(serializer),
        }
    }
}

/// Describes the shape one JSON value must satisfy.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SchemaNode {
    #[serde(rename = "type")]
    kind: SchemaKind,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    required: Vec<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, SchemaNode>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "AdditionalProperties::is_allow"
    )]
    additional_properties: AdditionalProperties,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    dependencies: BTreeMap<String, Vec<String>>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    enum_values: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    minimum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    maximum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Box<SchemaNode>>,

    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    min_items: Option<usize>,

    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    max_items: Option<usize>,

    #[serde(rename = "oneOf", skip_serializing_if = "Vec::is_empty")]
    one_of: Vec<SchemaNode>,

    #[serde(rename = "x-keywords", skip_serializing_if = "Vec::is_empty")]
    keywords: Vec<String>,
}

impl SchemaNode {
    fn of_kind(kind: SchemaKind) -> Self {
        Self {
            kind,
            required: Vec::new(),
            properties: BTreeMap::new(),
            additional_properties: AdditionalProperties::Allow,
            dependencies: BTreeMap::new(),
            enum_values: None,
            minimum: None,
            maximum: None,
            items: None,
            min_items: None,
            max_items: None,
            one_of: Vec::new(),
            keywords: Vec::new(),
        }
    }

    /// An object node with no properties, open to extra keys.
    pub fn object() -> Self {
        Self::of_kind(SchemaKind::Object)
    }

    /// An array node whose elements must satisfy `items`.
    pub fn array(items: SchemaNode) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of_kind(SchemaKind::Array)
        }
    }

    /// A string node.
    pub fn string() -> Self {
        Self::of_kind(SchemaKind::String)
    }

    /// A number node.
    pub fn number() -> Self {
        Self::of_kind(SchemaKind::Number)
    }

    /// An integer node.
    pub fn integer() -> Self {
        Self::of_kind(SchemaKind::Integer)
    }

    /// A boolean node.
    pub fn boolean() -> Self {
        Self::of_kind(SchemaKind::Boolean)
    }

    /// Declare an optional property.
    pub fn property(mut self, name: impl Into<String>, schema: SchemaNode) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Declare a property and mark it required.
    pub fn required_property(self, name: impl Into<String>, schema: SchemaNode) -> Self {
        let name = name.into();
        self.property(name.clone(), schema).require([name])
    }

    /// Mark already-declared (or about to be declared) properties required.
    ///
    /// Names already required are not duplicated.
    pub fn require<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.required.contains(&name) {
                self.required.push(name);
            }
        }
        self
    }

    /// Reject any property not declared in `properties`.
    pub fn closed(mut self) -> Self {
        self.additional_properties = AdditionalProperties::Deny;
        self
    }

    /// Validate every undeclared property against `schema`.
    pub fn additional_properties(mut self, schema: SchemaNode) -> Self {
        self.additional_properties = AdditionalProperties::Schema(Box::new(schema));
        self
    }

    /// Whenever `key` is present, every name in `requires` must be too.
    pub fn dependency<I, S>(mut self, key: impl Into<String>, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.dependencies.entry(key.into()).or_default();
        for name in requires {
            let name = name.into();
            if !entry.contains(&name) {
                entry.push(name);
            }
        }
        self
    }

    /// Restrict the value to the given literals.
    pub fn one_of_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Inclusive lower bound.
    pub fn minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Inclusive upper bound.
    pub fn maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    /// Inclusive lower and upper bounds.
    pub fn range(self, minimum: f64, maximum: f64) -> Self {
        self.minimum(minimum).maximum(maximum)
    }

    /// Minimum number of array elements, inclusive.
    pub fn min_items(mut self, min_items: usize) -> Self {
        self.min_items = Some(min_items);
        self
    }

    /// Maximum number of array elements, inclusive.
    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Exact array length.
    pub fn exact_items(self, count: usize) -> Self {
        self.min_items(count).max_items(count)
    }

    /// Require the value to satisfy exactly one of `alternatives`.
    pub fn one_of(mut self, alternatives: impl IntoIterator<Item = SchemaNode>) -> Self {
        self.one_of = alternatives.into_iter().collect();
        self
    }

    /// Tag the node with a custom keyword resolved at validation time.
    pub fn keyword(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.keywords.contains(&name) {
            self.keywords.push(name);
        }
        self
    }

    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn properties(&self) -> &BTreeMap<String, SchemaNode> {
        &self.properties
    }

    /// Schema of a declared property.
    pub fn property_schema(&self, name: &str) -> Option<&SchemaNode> {
        self.properties.get(name)
    }

    pub fn additional(&self) -> &AdditionalProperties {
        &self.additional_properties
    }

    pub fn dependencies(&self) -> &BTreeMap<String, Vec<String>> {
        &self.dependencies
    }

    pub fn enum_values(&self) -> Option<&[Value]> {
        self.enum_values.as_deref()
    }

    pub fn minimum_bound(&self) -> Option<f64> {
        self.minimum
    }

    pub fn maximum_bound(&self) -> Option<f64> {
        self.maximum
    }

    pub fn items(&self) -> Option<&SchemaNode> {
        self.items.as_deref()
    }

    pub fn min_items_bound(&self) -> Option<usize> {
        self.min_items
    }

    pub fn max_items_bound(&self) -> Option<usize> {
        self.max_items
    }

    pub fn alternatives(&self) -> &[SchemaNode] {
        &self.one_of
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether a property not in `properties` is rejected outright.
    pub fn is_closed(&self) -> bool {
        matches!(self.additional_properties, AdditionalProperties::Deny)
    }
}
