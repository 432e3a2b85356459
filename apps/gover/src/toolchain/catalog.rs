//! Release catalog.
//!
//! The catalog is the list of published Go releases as served by the
//! distribution server's JSON index. It is cached in `releases.json` under the
//! state root; once a cache exists it is used as-is until a refresh is forced,
//! no matter how old it is.
//!
//! ## Index Format
//!
//! ```json
//! [
//!   {
//!     "version": "go1.21.4",
//!     "stable": true,
//!     "files": [
//!       { "filename": "go1.21.4.linux-amd64.tar.gz", "os": "linux", "arch": "amd64", "kind": "archive" }
//!     ]
//!   }
//! ]
//! ```
//!
//! Fields the index carries beyond these (checksums, sizes) are ignored when
//! parsing but kept in the cache, which stores the response body verbatim.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::Platform;
use crate::config::Config;
use crate::errors::GoverError;

/// User agent sent with every request to the distribution server.
pub const USER_AGENT: &str = concat!("gover/", env!("CARGO_PKG_VERSION"));

/// One downloadable file of a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseFile {
    /// File name on the distribution server.
    pub filename: String,
    /// Go OS name; empty for source archives.
    #[serde(default)]
    pub os: String,
    /// Go architecture name; empty for source archives.
    #[serde(default)]
    pub arch: String,
    /// `archive`, `installer` or `source`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A published release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDescriptor {
    /// Concrete version, e.g. `go1.21.4`.
    pub version: String,
    /// `false` for beta and release candidate builds.
    pub stable: bool,
    /// Per-platform artifacts, in index order.
    #[serde(default)]
    pub files: Vec<ReleaseFile>,
}

impl ReleaseDescriptor {
    /// Whether the release ships a file for `platform`.
    #[must_use]
    pub fn supports(&self, platform: Platform) -> bool {
        self.files
            .iter()
            .any(|file| platform.matches(&file.os, &file.arch))
    }
}

/// The release catalog in index order.
pub type Releases = Vec<ReleaseDescriptor>;

/// Finds the release with exactly this version string.
#[must_use]
pub fn find<'a>(releases: &'a [ReleaseDescriptor], version: &str) -> Option<&'a ReleaseDescriptor> {
    releases.iter().find(|release| release.version == version)
}

/// Remote source of the release index.
pub trait ReleaseSource {
    /// Fetches the raw index document at `url`.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches the index over HTTP(S).
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpReleaseSource;

impl ReleaseSource for HttpReleaseSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        let response = client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch release index from {url}"))?;

        if !response.status().is_success() {
            return Err(handle_http_error(response.status(), url));
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read response from {url}"))
    }
}

/// Handles HTTP errors with user-friendly messages.
fn handle_http_error(status: reqwest::StatusCode, url: &str) -> anyhow::Error {
    match status.as_u16() {
        404 => anyhow::anyhow!("Release index not found at {url}"),
        code if code >= 500 => anyhow::anyhow!("Server error ({code}): {url}"),
        code => anyhow::anyhow!("HTTP error {code}: {url}"),
    }
}

/// Loads the release catalog.
///
/// Without `force_refresh` an existing cache is returned without touching the
/// network. Otherwise the index is fetched and the response body is written to
/// the cache as received. A forced refresh that fails, or returns a document
/// that does not parse, falls back to the cache.
///
/// # Errors
///
/// Returns [`GoverError::CatalogUnavailable`] when no usable cache exists and
/// the remote fetch fails.
pub async fn load<S: ReleaseSource>(
    config: &Config,
    source: &S,
    force_refresh: bool,
) -> Result<Releases> {
    let cache = &config.paths.releases;
    let cached = read_cache(cache);

    if !force_refresh && let Some(releases) = cached {
        debug!(path = %cache.display(), "using cached release catalog");
        return Ok(releases);
    }

    let url = config.releases_url();
    debug!(%url, "fetching release catalog");
    match fetch_index(source, &url).await {
        Ok((body, releases)) => {
            if let Err(e) = write_cache(cache, &body) {
                warn!("Failed to cache release catalog: {e:#}");
            }
            Ok(releases)
        }
        Err(e) => match cached {
            Some(releases) => {
                warn!("Failed to refresh release catalog, using cached copy: {e:#}");
                Ok(releases)
            }
            None => Err(GoverError::catalog_unavailable(format!("{e:#}")).into()),
        },
    }
}

/// Fetches the index and parses it, returning the body alongside.
async fn fetch_index<S: ReleaseSource>(source: &S, url: &str) -> Result<(String, Releases)> {
    let body = source.fetch(url).await?;
    let releases = serde_json::from_str(&body)
        .with_context(|| format!("Failed to parse release index from {url}"))?;
    Ok((body, releases))
}

/// Reads the cache, treating missing or unparsable files as absent.
fn read_cache(path: &Path) -> Option<Releases> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("Failed to read {}: {e}", path.display());
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(releases) => Some(releases),
        Err(e) => {
            warn!("Ignoring corrupt release cache {}: {e}", path.display());
            None
        }
    }
}

/// Writes the cache through a sibling temporary file so readers never see a
/// truncated document.
fn write_cache(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;
    std::fs::rename(&temp_path, path).with_context(|| {
        format!(
            "Failed to rename {} to {}",
            temp_path.display(),
            path.display()
        )
    })
}
