//! Current command for the gover CLI.
//!
//! ## Usage
//!
//! ```bash
//! gover current
//! ```

use anyhow::{Result, bail};

use crate::config::Config;
use crate::toolchain::current_version;

/// Executes the current command.
///
/// # Errors
///
/// Returns an error if no version is active.
#[allow(clippy::unused_async)]
pub async fn execute(config: &Config) -> Result<()> {
    let Some(version) = current_version(&config.paths)? else {
        bail!("No Go version currently active. Use `gover use <version>`.");
    };

    println!("Current Go version: {version}");
    println!("GOROOT: {}", config.paths.current.display());
    if !config.paths.current.exists() {
        eprintln!("Warning: {version} is no longer installed.");
    }
    Ok(())
}
