//! Uninstall command for the gover CLI.
//!
//! Removes an installed toolchain version from the system.
//!
//! ## Usage
//!
//! ```bash
//! gover uninstall go1.20.1          # Remove go1.20.1
//! gover uninstall 1.21.4 --force    # Remove even if it is the active version
//! ```

use anyhow::Result;
use clap::Args;

use crate::config::Config;
use crate::toolchain::resolver::normalize;
use crate::toolchain::uninstall::uninstall;

/// Arguments for the uninstall command.
#[derive(Args)]
pub struct UninstallArgs {
    /// Version to uninstall (e.g., "go1.20.1").
    pub version: String,

    /// Remove the version even if it is currently active.
    #[arg(short, long)]
    pub force: bool,
}

/// Executes the uninstall command.
///
/// # Errors
///
/// Returns an error if the version is active and `--force` is not given,
/// if it is not installed, or if removal fails.
#[allow(clippy::unused_async)]
pub async fn execute(args: &UninstallArgs, config: &Config) -> Result<()> {
    let version = normalize(args.version.trim());
    uninstall(&config.paths, &version, args.force)?;

    println!("Uninstalled {version}.");
    Ok(())
}
