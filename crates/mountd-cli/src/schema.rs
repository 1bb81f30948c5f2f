//! # Schema Subcommand
//!
//! Prints a root schema variant as JSON, optionally with a structural audit
//! of the schema tree itself.

use anyhow::{Context, Result};
use clap::Args;

use mountd_config::SchemaVariant;
use mountd_schema::{audit_schema, open_objects};

/// Arguments for the `mountd-config schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Root schema variant to print.
    #[arg(long, default_value_t = SchemaVariant::Baseline)]
    pub variant: SchemaVariant,

    /// Audit the schema instead of printing it.
    #[arg(long)]
    pub audit: bool,
}

/// Execute the schema subcommand.
///
/// With `--audit`, returns exit code 1 if the schema has findings or
/// objects that accept undeclared properties.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    let schema = args.variant.schema();

    if !args.audit {
        let rendered = serde_json::to_string_pretty(schema).context("failed to render schema")?;
        println!("{rendered}");
        return Ok(0);
    }

    let findings = audit_schema(schema);
    let open = open_objects(schema);
    for finding in &findings {
        println!("  FINDING: {finding}");
    }
    for path in &open {
        println!("  OPEN: {path} accepts undeclared properties");
    }

    if findings.is_empty() && open.is_empty() {
        println!("Schema '{}': no findings", args.variant);
        Ok(0)
    } else {
        println!(
            "Schema '{}': {} finding(s), {} open object(s)",
            args.variant,
            findings.len(),
            open.len()
        );
        Ok(1)
    }
}
