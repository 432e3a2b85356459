//! Upgrade command for the gover CLI.
//!
//! Installs the newest stable patch release of a release line and makes it
//! the active version.
//!
//! ## Usage
//!
//! ```bash
//! gover upgrade 1.21
//! ```

use anyhow::{Result, bail};
use clap::Args;

use super::report_activation;
use crate::config::Config;
use crate::toolchain::{
    HttpFetcher, VersionSpec, activate, console_progress, ensure_installed, latest_target,
};

/// Arguments for the upgrade command.
#[derive(Args)]
pub struct UpgradeArgs {
    /// Release line to upgrade (e.g., "1.21").
    pub major: String,
}

/// Executes the upgrade command.
///
/// # Errors
///
/// Returns an error if the argument is not a release line, or if
/// resolution, installation or switching fails.
pub async fn execute(args: &UpgradeArgs, config: &Config) -> Result<()> {
    let VersionSpec::Prefix(prefix) = VersionSpec::parse(&args.major) else {
        bail!("Expected a release line such as 1.21, got {}", args.major);
    };

    let version = latest_target(config, &prefix).await?;
    let installed = ensure_installed(config, &HttpFetcher, &version, console_progress()).await?;
    if installed.freshly_installed {
        eprintln!("Installed {version}");
    }

    let activation = activate(config, &installed.version)?;
    report_activation(config, &activation);
    Ok(())
}
