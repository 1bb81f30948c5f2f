//! # Root Schema Variants
//!
//! Each daemon deployment validates against one fixed root schema. The two
//! variants are built on first use and shared for the rest of the process;
//! nothing mutates them afterwards.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use mountd_schema::SchemaNode;
use serde::{Deserialize, Serialize};

use crate::builder::{root_schema, RootLayout, StepperRequirements};
use crate::error::UnknownVariant;

/// Selects which root schema a configuration is validated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// Plain mount: no stepper parameter groups are mandatory.
    #[default]
    Baseline,
    /// Homing/tracking mount: endstops on every axis, tracking on the
    /// sky axes, and an optional status light.
    Extended,
}

static BASELINE_SCHEMA: OnceLock<SchemaNode> = OnceLock::new();
static EXTENDED_SCHEMA: OnceLock<SchemaNode> = OnceLock::new();

impl SchemaVariant {
    pub const ALL: [SchemaVariant; 2] = [SchemaVariant::Baseline, SchemaVariant::Extended];

    pub fn name(self) -> &'static str {
        match self {
            SchemaVariant::Baseline => "baseline",
            SchemaVariant::Extended => "extended",
        }
    }

    /// Per-axis requirements and optional blocks for this variant.
    pub fn layout(self) -> RootLayout {
        match self {
            SchemaVariant::Baseline => RootLayout {
                ha: StepperRequirements::default(),
                dec: StepperRequirements::default(),
                focus: StepperRequirements::default(),
                status_light: false,
            },
            SchemaVariant::Extended => RootLayout {
                ha: StepperRequirements::homing_tracking(),
                dec: StepperRequirements::homing_tracking(),
                focus: StepperRequirements::homing(),
                status_light: true,
            },
        }
    }

    /// The root schema, built once per process.
    pub fn schema(self) -> &'static SchemaNode {
        let cell = match self {
            SchemaVariant::Baseline => &BASELINE_SCHEMA,
            SchemaVariant::Extended => &EXTENDED_SCHEMA,
        };
        cell.get_or_init(|| root_schema(&self.layout()))
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchemaVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaVariant::ALL
            .into_iter()
            .find(|variant| variant.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mountd_schema::{audit_schema, open_objects};

    #[test]
    fn test_schema_is_memoized() {
        let a = SchemaVariant::Extended.schema();
        let b = SchemaVariant::Extended.schema();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_variants_share_required_top_level_keys() {
        assert_eq!(
            SchemaVariant::Baseline.schema().required(),
            SchemaVariant::Extended.schema().required()
        );
    }

    #[test]
    fn test_status_light_only_in_extended() {
        assert!(SchemaVariant::Baseline
            .schema()
            .property_schema("status_light")
            .is_none());
        assert!(SchemaVariant::Extended
            .schema()
            .property_schema("status_light")
            .is_some());
    }

    #[test]
    fn test_root_schemas_pass_audit() {
        for variant in SchemaVariant::ALL {
            let findings = audit_schema(variant.schema());
            assert!(findings.is_empty(), "{variant}: {findings:?}");
            assert!(
                open_objects(variant.schema()).is_empty(),
                "{variant} leaves objects open"
            );
        }
    }

    #[test]
    fn test_parse_variant_names() {
        assert_eq!("baseline".parse::<SchemaVariant>().unwrap(), SchemaVariant::Baseline);
        assert_eq!("Extended".parse::<SchemaVariant>().unwrap(), SchemaVariant::Extended);
        let err = "heliostat".parse::<SchemaVariant>().unwrap_err();
        assert!(err.to_string().contains("heliostat"));
    }
}
