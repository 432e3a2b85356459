//! Install manager.
//!
//! [`ensure_installed`] downloads and unpacks a toolchain unless its version
//! directory already exists. Presence of the directory is the only check:
//! a directory left behind by a failed extraction counts as installed and has
//! to be removed with `gover uninstall` before retrying.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::archive::extract_tar_gz;
use super::download::{ArchiveFetcher, ProgressCallback};
use super::paths::check_version_name;
use crate::config::Config;
use crate::errors::GoverError;

/// An installed toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledVersion {
    /// Concrete version name.
    pub version: String,
    /// Toolchain root, `versions/<version>`.
    pub root: PathBuf,
    /// `false` when the directory already existed.
    pub freshly_installed: bool,
}

/// Makes sure `version` is installed, downloading it if needed.
///
/// On success the downloaded archive is deleted. When extraction fails the
/// archive stays in `downloads/` and the partial install directory is not
/// cleaned up.
///
/// # Errors
///
/// Returns [`GoverError::DownloadFailed`] or [`GoverError::ExtractionFailed`],
/// or an I/O error when the state directories cannot be created.
pub async fn ensure_installed<F: ArchiveFetcher>(
    config: &Config,
    fetcher: &F,
    version: &str,
    progress: ProgressCallback,
) -> Result<InstalledVersion> {
    check_version_name(version)?;
    let paths = &config.paths;
    let root = paths.install_dir(version);

    if root.is_dir() {
        debug!(%version, "already installed");
        return Ok(InstalledVersion {
            version: version.to_string(),
            root,
            freshly_installed: false,
        });
    }

    paths.ensure_directories()?;

    let url = config.archive_url(version);
    let archive = paths.download_path(&config.platform.archive_name(version));
    info!(%url, "downloading");
    fetcher.fetch(&url, &archive, progress).await?;

    debug!(archive = %archive.display(), dest = %root.display(), "extracting");
    if let Err(e) = extract_tar_gz(&archive, &root) {
        return Err(GoverError::extraction_failed(&archive, format!("{e:#}")).into());
    }

    std::fs::remove_file(&archive)
        .with_context(|| format!("Failed to remove archive: {}", archive.display()))?;

    Ok(InstalledVersion {
        version: version.to_string(),
        root,
        freshly_installed: true,
    })
}
