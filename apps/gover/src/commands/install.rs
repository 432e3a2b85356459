//! Install command for the gover CLI.
//!
//! Downloads and unpacks a Go toolchain into `versions/<version>`.
//!
//! ## Usage
//!
//! ```bash
//! gover install go1.21.4   # Exact release
//! gover install 1.21       # Newest stable go1.21.x
//! gover install auto       # Release line declared in go.mod
//! ```

use anyhow::Result;
use clap::Args;

use crate::config::Config;
use crate::toolchain::{HttpFetcher, VersionSpec, console_progress, ensure_installed, resolve_target};

/// Arguments for the install command.
#[derive(Args)]
pub struct InstallArgs {
    /// Version to install (e.g., "go1.21.4", "1.21" or "auto").
    pub version: String,
}

/// Executes the install command.
///
/// Concrete versions are installed without consulting the release catalog.
///
/// # Errors
///
/// Returns an error if resolution, download or extraction fails.
pub async fn execute(args: &InstallArgs, config: &Config) -> Result<()> {
    let spec = VersionSpec::parse(&args.version);
    let version = resolve_target(config, &spec).await?;

    if config.paths.is_installed(&version) {
        println!("{version} is already installed.");
        return Ok(());
    }

    eprintln!("Installing {version} for {}...", config.platform);
    let installed = ensure_installed(config, &HttpFetcher, &version, console_progress()).await?;

    println!(
        "Installed {} to {}",
        installed.version,
        installed.root.display()
    );
    Ok(())
}
