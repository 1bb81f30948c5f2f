//! # Show Subcommand
//!
//! Validates and binds a configuration file, then prints the bound
//! configuration as pretty JSON. Sections the file omits appear as
//! `"not_configured"`, which makes the daemon's view of the file explicit.

use anyhow::{Context, Result};
use clap::Args;

use mountd_config::{load_config, ConfigError};

use crate::DocumentArgs;

/// Arguments for the `mountd-config show` subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub document: DocumentArgs,
}

/// Execute the show subcommand.
///
/// Returns exit code: 0 when the configuration bound, 1 when it is
/// malformed or failed validation.
pub fn run_show(args: &ShowArgs) -> Result<u8> {
    let registry = crate::load_registry(&args.document.registry)?;
    let config = &args.document.config;

    match load_config(config, args.document.variant, &registry) {
        Ok(bound) => {
            let rendered =
                serde_json::to_string_pretty(&bound).context("failed to render configuration")?;
            println!("{rendered}");
            Ok(0)
        }
        Err(ConfigError::Invalid { violations, .. }) => {
            crate::print_violations(config, &violations);
            Ok(1)
        }
        Err(e @ ConfigError::Parse { .. }) => {
            println!("FAIL: {e}");
            Ok(1)
        }
        Err(e) => Err(e).with_context(|| format!("failed to load {}", config.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{document_args, minimal_config};

    #[test]
    fn run_show_valid_config_returns_0() {
        let dir = tempfile::tempdir().unwrap();
        let args = ShowArgs {
            document: document_args(dir.path(), &minimal_config("mount")),
        };
        assert_eq!(run_show(&args).unwrap(), 0);
    }

    #[test]
    fn run_show_invalid_config_returns_1() {
        let dir = tempfile::tempdir().unwrap();
        let args = ShowArgs {
            document: document_args(dir.path(), &minimal_config("heliostat")),
        };
        assert_eq!(run_show(&args).unwrap(), 1);
    }

    #[test]
    fn run_show_malformed_json_returns_1() {
        let dir = tempfile::tempdir().unwrap();
        let args = ShowArgs {
            document: document_args(dir.path(), "[1, 2"),
        };
        assert_eq!(run_show(&args).unwrap(), 1);
    }

    #[test]
    fn run_show_missing_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = ShowArgs {
            document: document_args(dir.path(), "{}"),
        };
        args.document.config = dir.path().join("absent.json");
        let err = run_show(&args).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load"));
    }
}
