//! Init command for the gover CLI.
//!
//! Creates the state root and downloads a fresh copy of the release index.
//!
//! ## Usage
//!
//! ```bash
//! gover init
//! ```

use anyhow::Result;

use crate::config::Config;
use crate::toolchain::{HttpReleaseSource, catalog};

/// Executes the init command.
///
/// # Errors
///
/// Returns an error if the state directories cannot be created or no
/// catalog is available.
pub async fn execute(config: &Config) -> Result<()> {
    config.paths.ensure_directories()?;

    eprintln!("Fetching release list...");
    let releases = catalog::load(config, &HttpReleaseSource, true).await?;

    println!(
        "gover initialized in {} ({} releases cached)",
        config.paths.root.display(),
        releases.len()
    );
    Ok(())
}
