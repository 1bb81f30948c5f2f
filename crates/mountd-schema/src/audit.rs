//! # Schema Audit
//!
//! Schema trees are assembled in code, so construction mistakes are caught
//! by auditing the finished tree in tests rather than at runtime. The audit
//! reports:
//!
//! - constraints set on a node whose kind they do not apply to
//!   (e.g. `minimum` on a string),
//! - required or dependency names that a closed object never declares
//!   (such a document could never validate),
//! - enum literals whose JSON type does not match the node kind,
//! - object nodes left open to arbitrary extra properties.

use serde_json::Value;

use crate::node::{AdditionalProperties, SchemaKind, SchemaNode};

/// A defect found in a schema tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFinding {
    /// JSON Pointer path to the offending node within the schema.
    pub schema_path: String,
    /// What is wrong.
    pub issue: String,
}

impl std::fmt::Display for SchemaFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = if self.schema_path.is_empty() {
            "(root)"
        } else {
            self.schema_path.as_str()
        };
        write!(f, "  {path}: {}", self.issue)
    }
}

/// Audit a schema tree for construction defects.
pub fn audit_schema(schema: &SchemaNode) -> Vec<SchemaFinding> {
    let mut findings = Vec::new();
    audit_node(schema, "", &mut findings);
    findings
}

/// Schema paths of object nodes that accept arbitrary extra properties.
///
/// Objects with schema-valued `additionalProperties` (named-entry maps) are
/// not open: every entry is still checked.
pub fn open_objects(schema: &SchemaNode) -> Vec<String> {
    let mut open = Vec::new();
    collect_open(schema, "", &mut open);
    open
}

fn audit_node(node: &SchemaNode, path: &str, findings: &mut Vec<SchemaFinding>) {
    let mut report = |issue: String| {
        findings.push(SchemaFinding {
            schema_path: path.to_string(),
            issue,
        })
    };
    let kind = node.kind();

    if kind != SchemaKind::Object {
        if !node.required().is_empty() || !node.properties().is_empty() {
            report(format!("properties/required set on {kind} node"));
        }
        if !node.dependencies().is_empty() {
            report(format!("dependencies set on {kind} node"));
        }
        if !node.additional().is_allow() {
            report(format!("additionalProperties set on {kind} node"));
        }
    }
    if kind != SchemaKind::Array
        && (node.items().is_some()
            || node.min_items_bound().is_some()
            || node.max_items_bound().is_some())
    {
        report(format!("array constraints set on {kind} node"));
    }
    if !kind.is_numeric() && (node.minimum_bound().is_some() || node.maximum_bound().is_some()) {
        report(format!("minimum/maximum set on {kind} node"));
    }
    if let (Some(min), Some(max)) = (node.minimum_bound(), node.maximum_bound()) {
        if min > max {
            report(format!("minimum {min} exceeds maximum {max}"));
        }
    }
    if let Some(literals) = node.enum_values() {
        if literals.is_empty() {
            report("enum admits no values".to_string());
        }
        for literal in literals.iter().filter(|l| !literal_fits(l, kind)) {
            report(format!("enum literal {literal} is not a {kind}"));
        }
    }

    if node.is_closed() {
        for name in node.required() {
            if node.property_schema(name).is_none() {
                report(format!("required property '{name}' is not declared"));
            }
        }
        for (key, requires) in node.dependencies() {
            for name in std::iter::once(key).chain(requires) {
                if node.property_schema(name).is_none() {
                    report(format!("dependency on '{name}' which is not declared"));
                }
            }
        }
    }

    for (name, child) in node.properties() {
        audit_node(child, &format!("{path}/properties/{name}"), findings);
    }
    if let AdditionalProperties::Schema(extra) = node.additional() {
        audit_node(extra, &format!("{path}/additionalProperties"), findings);
    }
    if let Some(items) = node.items() {
        audit_node(items, &format!("{path}/items"), findings);
    }
    for (i, alternative) in node.alternatives().iter().enumerate() {
        audit_node(alternative, &format!("{path}/oneOf/{i}"), findings);
    }
}

fn literal_fits(literal: &Value, kind: SchemaKind) -> bool {
    match kind {
        SchemaKind::String => literal.is_string(),
        SchemaKind::Boolean => literal.is_boolean(),
        SchemaKind::Number => literal.is_number(),
        SchemaKind::Integer => literal.is_i64() || literal.is_u64(),
        SchemaKind::Object | SchemaKind::Array => false,
    }
}

fn collect_open(node: &SchemaNode, path: &str, open: &mut Vec<String>) {
    // An object whose oneOf alternatives are all closed is effectively closed.
    let constrained_by_alternatives =
        !node.alternatives().is_empty() && node.alternatives().iter().all(SchemaNode::is_closed);
    if node.kind() == SchemaKind::Object
        && node.additional().is_allow()
        && !constrained_by_alternatives
    {
        open.push(if path.is_empty() { "(root)".to_string() } else { path.to_string() });
    }

    for (name, child) in node.properties() {
        collect_open(child, &format!("{path}/properties/{name}"), open);
    }
    if let AdditionalProperties::Schema(extra) = node.additional() {
        collect_open(extra, &format!("{path}/additionalProperties"), open);
    }
    if let Some(items) = node.items() {
        collect_open(items, &format!("{path}/items"), open);
    }
    for (i, alternative) in node.alternatives().iter().enumerate() {
        collect_open(alternative, &format!("{path}/oneOf/{i}"), open);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_clean_schema() {
        let schema = SchemaNode::object()
            .required_property("serial_baud", SchemaNode::integer().range(250000.0, 250000.0))
            .property("endstop_pos", SchemaNode::string().one_of_values(["max", "min"]))
            .closed();
        let findings = audit_schema(&schema);
        assert!(findings.is_empty(), "unexpected findings: {findings:?}");
        assert!(open_objects(&schema).is_empty());
    }

    #[test]
    fn test_audit_inapplicable_constraint() {
        let schema = SchemaNode::object()
            .property("pin", SchemaNode::string().minimum(0.0))
            .closed();
        let findings = audit_schema(&schema);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].schema_path, "/properties/pin");
        assert!(findings[0].issue.contains("minimum/maximum set on string node"));
    }

    #[test]
    fn test_audit_undeclared_required_on_closed_object() {
        let schema = SchemaNode::object().require(["pin"]).closed();
        let findings = audit_schema(&schema);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].issue.contains("'pin'"));
        assert!(findings[0].to_string().contains("(root)"));
    }

    #[test]
    fn test_audit_undeclared_dependency() {
        let schema = SchemaNode::object()
            .property("interface", SchemaNode::string())
            .dependency("interface", ["uart_address"])
            .closed();
        let findings = audit_schema(&schema);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].issue.contains("uart_address"));
    }

    #[test]
    fn test_audit_mistyped_enum_literal() {
        let schema = SchemaNode::integer().one_of_values([serde_json::json!(1), serde_json::json!("2")]);
        let findings = audit_schema(&schema);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].issue.contains("is not a integer"));
    }

    #[test]
    fn test_open_objects_reported() {
        let schema = SchemaNode::object()
            .property("fan", SchemaNode::object())
            .property(
                "interfaces",
                SchemaNode::object().additional_properties(
                    SchemaNode::object().one_of([SchemaNode::object().closed()]),
                ),
            )
            .closed();
        assert_eq!(open_objects(&schema), vec!["/properties/fan".to_string()]);
    }
}
