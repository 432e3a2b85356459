//! Uninstall guard.

use anyhow::{Context, Result};
use tracing::debug;

use super::paths::{GoverPaths, check_version_name};
use crate::errors::GoverError;

/// Removes the install directory of `version`.
///
/// The active version is refused unless `force` is set. A forced removal
/// leaves `current` dangling; it is repaired by the next switch.
///
/// # Errors
///
/// Returns [`GoverError::VersionInUse`] or [`GoverError::NotInstalled`]
/// without modifying the filesystem, or an I/O error if removal fails.
pub fn uninstall(paths: &GoverPaths, version: &str, force: bool) -> Result<()> {
    check_version_name(version)?;
    let install_dir = paths.install_dir(version);

    if !force && is_active(paths, &install_dir) {
        return Err(GoverError::version_in_use(version).into());
    }

    if !install_dir.is_dir() {
        return Err(GoverError::not_installed(version).into());
    }

    debug!(dir = %install_dir.display(), "removing toolchain");
    std::fs::remove_dir_all(&install_dir)
        .with_context(|| format!("Failed to remove {}", install_dir.display()))
}

/// Whether `current` resolves to `install_dir`. A dangling pointer resolves to nothing.
fn is_active(paths: &GoverPaths, install_dir: &std::path::Path) -> bool {
    match (
        std::fs::canonicalize(&paths.current),
        std::fs::canonicalize(install_dir),
    ) {
        (Ok(current), Ok(target)) => current == target,
        _ => false,
    }
}
