//! Prompt command for the gover CLI.
//!
//! Prints a short segment for shell prompts, or nothing when no valid
//! version is active. Never fails, so it is safe to call from `PS1`.
//!
//! ## Usage
//!
//! ```bash
//! PS1='$(gover prompt)'$PS1
//! ```

use crate::config::Config;
use crate::toolchain::current_version;

/// Executes the prompt command.
#[allow(clippy::unused_async)]
pub async fn execute(config: &Config) {
    if let Some(segment) = segment(config) {
        print!("{segment}");
    }
}

fn segment(config: &Config) -> Option<String> {
    if !config.paths.current.is_dir() {
        return None;
    }
    let version = current_version(&config.paths).ok()??;
    version.starts_with("go").then(|| format!("[go {}] ", &version[2..]))
}
