//! Error types for the gover CLI.
//!
//! `GoverError` enumerates the failure kinds of the version manager core.
//! Core functions return `anyhow::Result` and raise these values directly,
//! so callers can recover the kind with `downcast_ref::<GoverError>()` while
//! incidental I/O failures keep their `anyhow` context chain.
//!
//! None of these failures is retried; each one ends the invoking command.

use std::path::PathBuf;
use thiserror::Error;

/// Failure kinds of the version manager core.
#[derive(Debug, Error)]
pub enum GoverError {
    /// Neither a usable release cache nor the remote release index was available.
    #[error("release catalog unavailable: {message}")]
    CatalogUnavailable {
        /// Description of the remote fetch failure.
        message: String,
    },

    /// No stable release matches the requested version spec.
    #[error("no stable release matches {spec}")]
    NoMatchingVersion {
        /// The normalized spec that was resolved.
        spec: String,
    },

    /// No `go.mod` declaring a `go` directive exists between the start directory and the root.
    #[error("no go.mod with a go directive found from {}", start.display())]
    NoManifestFound {
        /// Directory the upward search started from.
        start: PathBuf,
    },

    /// The archive server answered with a non-success status or could not be reached.
    #[error("download failed: {status} ({url})")]
    DownloadFailed {
        /// The archive URL.
        url: String,
        /// Status line or transport error description.
        status: String,
    },

    /// The downloaded archive could not be unpacked into the install directory.
    #[error("failed to extract {}: {message}", archive.display())]
    ExtractionFailed {
        /// The archive that was kept for diagnostics.
        archive: PathBuf,
        /// Description of the extraction failure.
        message: String,
    },

    /// The version has no install directory.
    #[error("version {version} is not installed")]
    NotInstalled {
        /// The requested version.
        version: String,
    },

    /// The version is the active toolchain and removal was not forced.
    #[error("{version} is currently in use, use --force to uninstall it anyway")]
    VersionInUse {
        /// The requested version.
        version: String,
    },
}

impl GoverError {
    /// Creates a new `CatalogUnavailable` error.
    #[must_use]
    pub fn catalog_unavailable(message: impl Into<String>) -> Self {
        Self::CatalogUnavailable {
            message: message.into(),
        }
    }

    /// Creates a new `NoMatchingVersion` error.
    #[must_use]
    pub fn no_matching_version(spec: impl Into<String>) -> Self {
        Self::NoMatchingVersion { spec: spec.into() }
    }

    /// Creates a new `NoManifestFound` error.
    #[must_use]
    pub fn no_manifest_found(start: impl Into<PathBuf>) -> Self {
        Self::NoManifestFound {
            start: start.into(),
        }
    }

    /// Creates a new `DownloadFailed` error.
    #[must_use]
    pub fn download_failed(url: impl Into<String>, status: impl Into<String>) -> Self {
        Self::DownloadFailed {
            url: url.into(),
            status: status.into(),
        }
    }

    /// Creates a new `ExtractionFailed` error.
    #[must_use]
    pub fn extraction_failed(archive: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            archive: archive.into(),
            message: message.into(),
        }
    }

    /// Creates a new `NotInstalled` error.
    #[must_use]
    pub fn not_installed(version: impl Into<String>) -> Self {
        Self::NotInstalled {
            version: version.into(),
        }
    }

    /// Creates a new `VersionInUse` error.
    #[must_use]
    pub fn version_in_use(version: impl Into<String>) -> Self {
        Self::VersionInUse {
            version: version.into(),
        }
    }
}
