//! Path management for gover.
//!
//! All state lives under one root directory, `~/.gover/` by default or
//! `GOVER_HOME` when set.
//!
//! ## Directory Structure
//!
//! ```text
//! ~/.gover/                   # Root directory (or GOVER_HOME)
//!   releases.json             # Cached release catalog
//!   versions/                 # Installed toolchains
//!     go1.21.4/               # Toolchain root (archive's `go/` stripped)
//!       bin/
//!       pkg/tool/linux_amd64/
//!     go1.22.0/
//!       ...
//!   downloads/                # Archives while they are being installed
//!   current -> versions/...   # The active toolchain pointer
//! ```
//!
//! The existence of `versions/<version>/` is the only record that a version is
//! installed; no separate manifest is kept.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

/// Paths of the gover state root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoverPaths {
    /// Root directory for all gover state.
    pub root: PathBuf,
    /// Directory containing one subdirectory per installed version.
    pub versions: PathBuf,
    /// The active-version symlink.
    pub current: PathBuf,
    /// Cached release catalog.
    pub releases: PathBuf,
    /// Directory for archives being installed.
    pub downloads: PathBuf,
}

impl GoverPaths {
    /// Creates the path set for a state root.
    #[must_use = "returns new paths instance without side effects"]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            versions: root.join("versions"),
            current: root.join("current"),
            releases: root.join("releases.json"),
            downloads: root.join("downloads"),
            root,
        }
    }

    /// Returns the toolchain root for `version`.
    #[must_use = "returns the path without side effects"]
    pub fn install_dir(&self, version: &str) -> PathBuf {
        self.versions.join(version)
    }

    /// Returns the path for a downloaded archive file.
    #[must_use = "returns the path without side effects"]
    pub fn download_path(&self, filename: &str) -> PathBuf {
        self.downloads.join(filename)
    }

    /// Checks if a version has an install directory.
    #[must_use = "returns installation status without side effects"]
    pub fn is_installed(&self, version: &str) -> bool {
        self.install_dir(version).is_dir()
    }

    /// Ensures the root, versions and downloads directories exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.root, &self.versions, &self.downloads] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Lists installed versions, sorted lexicographically.
    ///
    /// # Errors
    ///
    /// Returns an error if the versions directory exists but cannot be read.
    pub fn list_installed(&self) -> Result<Vec<String>> {
        if !self.versions.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.versions).with_context(|| {
            format!(
                "Failed to read versions directory: {}",
                self.versions.display()
            )
        })?;

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| "Failed to read directory entry")?;
            let path = entry.path();
            if path.is_dir()
                && let Some(name) = path.file_name().and_then(|n| n.to_str())
            {
                versions.push(name.to_string());
            }
        }

        versions.sort();
        Ok(versions)
    }

    /// Reads the target of the active-version symlink.
    ///
    /// Returns `None` when no pointer exists. A pointer whose target was
    /// removed is still returned.
    ///
    /// # Errors
    ///
    /// Returns an error if `current` exists but is not a readable symlink.
    pub fn read_pointer(&self) -> Result<Option<PathBuf>> {
        match std::fs::read_link(&self.current) {
            Ok(target) => Ok(Some(target)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to read symlink: {}", self.current.display())
            }),
        }
    }
}

/// Rejects version strings that would escape the versions directory.
///
/// # Errors
///
/// Returns an error for empty names, `.`/`..`, or names containing path separators.
pub fn check_version_name(version: &str) -> Result<()> {
    if version.is_empty()
        || version == "."
        || version == ".."
        || version.contains(['/', '\\'])
        || Path::new(version).is_absolute()
    {
        bail!("Invalid version name: {version:?}");
    }
    Ok(())
}
