//! Use command for the gover CLI.
//!
//! Switches the active toolchain to an installed version and prints the
//! shell exports for it.
//!
//! ## Usage
//!
//! ```bash
//! gover use go1.21.4          # Exact release
//! gover use 1.21              # Newest stable go1.21.x
//! gover use --auto            # Release line declared in go.mod
//! eval "$(gover use 1.21)"    # Apply the exports to the current shell
//! ```

use anyhow::{Result, bail};
use clap::Args;

use super::report_activation;
use crate::config::Config;
use crate::toolchain::{VersionSpec, activate, resolve_target};

/// Arguments for the use command.
#[derive(Args)]
pub struct UseArgs {
    /// Version to activate (e.g., "go1.21.4" or "1.21").
    #[arg(required_unless_present = "auto")]
    pub version: Option<String>,

    /// Use the version declared in the nearest go.mod.
    #[arg(long, conflicts_with = "version")]
    pub auto: bool,
}

/// Executes the use command.
///
/// # Errors
///
/// Returns an error if the version cannot be resolved, is not installed or
/// the pointer cannot be replaced.
pub async fn execute(args: &UseArgs, config: &Config) -> Result<()> {
    let spec = match (&args.version, args.auto) {
        (_, true) => VersionSpec::Auto,
        (Some(version), false) => VersionSpec::parse(version),
        (None, false) => bail!("A version or --auto is required"),
    };

    let version = resolve_target(config, &spec).await?;
    let activation = activate(config, &version)?;
    report_activation(config, &activation);
    Ok(())
}
