//! # Validate Subcommand
//!
//! Checks a configuration file against a root schema variant and reports
//! every violation in one run, structural and registry-backed alike.

use anyhow::{Context, Result};
use clap::Args;

use mountd_config::{read_document, validate_config, ConfigError};

use crate::DocumentArgs;

/// Arguments for the `mountd-config validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub document: DocumentArgs,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when the file is valid, 1 when it is malformed or
/// fails validation. Unreadable inputs are returned as errors.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let DocumentArgs {
        config,
        registry,
        variant,
    } = &args.document;
    let registry = crate::load_registry(registry)?;

    let document = match read_document(config) {
        Ok(document) => document,
        Err(e @ ConfigError::Parse { .. }) => {
            println!("FAIL: {e}");
            return Ok(1);
        }
        Err(e) => return Err(e).context("failed to read configuration"),
    };

    let source_name = config.display().to_string();
    match validate_config(&source_name, &document, *variant, &registry, &registry) {
        Ok(_) => {
            println!("OK: {} ({variant})", config.display());
            Ok(0)
        }
        Err(ConfigError::Invalid { violations, .. }) => {
            crate::print_violations(config, &violations);
            Ok(1)
        }
        Err(e) => Err(e).context("validation could not run"),
    }
}
