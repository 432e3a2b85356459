//! Detect command for the gover CLI.
//!
//! Prints the release the nearest `go.mod` resolves to.
//!
//! ## Usage
//!
//! ```bash
//! gover detect
//! ```

use anyhow::Result;

use crate::config::Config;
use crate::toolchain::{VersionSpec, resolve_target};

/// Executes the detect command.
///
/// # Errors
///
/// Returns an error if no `go.mod` declares a version or the catalog has no
/// matching release.
pub async fn execute(config: &Config) -> Result<()> {
    let version = resolve_target(config, &VersionSpec::Auto).await?;
    println!("{version}");
    Ok(())
}
