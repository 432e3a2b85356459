//! List command for the gover CLI.
//!
//! Lists the releases published for this platform, grouped by release line
//! (`go1.21`, `go1.22`, ...). Lines are printed in lexicographic order and
//! each shows at most its last 20 releases.
//!
//! ## Usage
//!
//! ```bash
//! gover list               # Stable releases
//! gover list --all         # Include betas and release candidates
//! gover list --major 1.21  # Only the go1.21 line
//! gover list --force       # Refresh the cached release index first
//! ```

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use clap::Args;

use crate::config::Config;
use crate::toolchain::catalog;
use crate::toolchain::{HttpReleaseSource, Platform, ReleaseDescriptor, current_version};

/// Releases shown per release line.
const MAX_PER_GROUP: usize = 20;

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Include unstable versions (beta, rc).
    #[arg(short, long)]
    pub all: bool,

    /// Only show release lines starting with this prefix (e.g. "1.21").
    #[arg(short, long)]
    pub major: Option<String>,

    /// Refresh the release index before listing.
    #[arg(short, long)]
    pub force: bool,
}

/// Executes the list command.
///
/// # Errors
///
/// Returns an error if the catalog is unavailable.
pub async fn execute(args: &ListArgs, config: &Config) -> Result<()> {
    let releases = catalog::load(config, &HttpReleaseSource, args.force).await?;
    let groups = group_releases(
        &releases,
        config.platform,
        args.all,
        args.major.as_deref(),
    );

    if groups.is_empty() {
        eprintln!("No releases found for {}.", config.platform);
        return Ok(());
    }

    let installed: BTreeSet<String> = config.paths.list_installed()?.into_iter().collect();
    let active = current_version(&config.paths)?;

    for version in groups.values().flatten() {
        if active.as_deref() == Some(version.as_str()) && installed.contains(version) {
            println!("{version} (active)");
        } else if installed.contains(version) {
            println!("{version} (installed)");
        } else {
            println!("{version}");
        }
    }

    Ok(())
}

/// Groups releases for this platform by release line.
///
/// Each group is sorted and keeps only its last [`MAX_PER_GROUP`] entries.
fn group_releases(
    releases: &[ReleaseDescriptor],
    platform: Platform,
    include_unstable: bool,
    major: Option<&str>,
) -> BTreeMap<String, Vec<String>> {
    let major = major.map(|m| m.trim_start_matches("go"));
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for release in releases {
        if !(release.stable || include_unstable) || !release.supports(platform) {
            continue;
        }
        let Some(line) = release_line(&release.version) else {
            continue;
        };
        if let Some(major) = major
            && !line.trim_start_matches("go").starts_with(major)
        {
            continue;
        }
        groups.entry(line).or_default().push(release.version.clone());
    }

    for versions in groups.values_mut() {
        versions.sort();
        versions.dedup();
        let excess = versions.len().saturating_sub(MAX_PER_GROUP);
        versions.drain(..excess);
    }

    groups
}

/// First two dot-separated parts of a version (`go1.21.4` → `go1.21`).
fn release_line(version: &str) -> Option<String> {
    let mut parts = version.splitn(3, '.');
    let major = parts.next()?;
    let minor = parts.next()?;
    Some(format!("{major}.{minor}"))
}
