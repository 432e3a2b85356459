//! Version resolution.
//!
//! Maps what the user typed (or what the project declares) to one concrete
//! release name.
//!
//! ## Spec Forms
//!
//! - `go1.21.4`, `1.21.4`, `go1.22rc1`: concrete, used verbatim
//! - `1.21`, `go1.21`, `1`: prefix, resolved to the greatest stable match
//!   unless the catalog lists a release with exactly that name (`go1.20`)
//! - `auto`: prefix taken from the nearest `go.mod`
//!
//! Release names are compared as plain strings. This keeps the ordering the
//! `go.dev` tooling has always shown but means `go1.21.3` sorts above
//! `go1.21.10`. A prefix only matches at a component boundary, so `go1.2`
//! does not pick up `go1.21.4`.

use std::fmt;
use std::path::Path;

use anyhow::Result;
use tracing::debug;

use super::catalog::{self, HttpReleaseSource, ReleaseDescriptor};
use super::gomod;
use crate::config::Config;
use crate::errors::GoverError;

/// A parsed version request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    /// A full release name such as `go1.21.4`.
    Concrete(String),
    /// A `go<major>[.<minor>]` prefix.
    Prefix(String),
    /// The version declared by the nearest `go.mod`.
    Auto,
}

impl VersionSpec {
    /// Parses user input, adding the `go` prefix when missing.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input == "auto" {
            return Self::Auto;
        }

        let version = normalize(input);
        let numeric = &version["go".len()..];
        let components: Vec<&str> = numeric.split('.').collect();
        let is_prefix = (1..=2).contains(&components.len())
            && components
                .iter()
                .all(|c| !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit()));

        if is_prefix {
            Self::Prefix(version)
        } else {
            Self::Concrete(version)
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete(version) | Self::Prefix(version) => f.write_str(version),
            Self::Auto => f.write_str("auto"),
        }
    }
}

/// Adds the `go` prefix to a version string if it is missing.
#[must_use]
pub fn normalize(version: &str) -> String {
    if version.starts_with("go") {
        version.to_string()
    } else {
        format!("go{version}")
    }
}

/// Whether `version` belongs to the release line `prefix`.
///
/// `go1.21` matches `go1.21` and `go1.21.4` but not `go1.210`.
#[must_use]
pub fn matches_prefix(version: &str, prefix: &str) -> bool {
    version
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

/// Returns the greatest stable release on the `prefix` line.
///
/// # Errors
///
/// Returns [`GoverError::NoMatchingVersion`] when no stable release matches.
pub fn latest_matching(releases: &[ReleaseDescriptor], prefix: &str) -> Result<String> {
    releases
        .iter()
        .filter(|release| release.stable && matches_prefix(&release.version, prefix))
        .map(|release| release.version.as_str())
        .max()
        .map(str::to_string)
        .ok_or_else(|| GoverError::no_matching_version(prefix).into())
}

/// Resolves `spec` against the catalog.
///
/// Concrete specs are returned unchanged whether or not the catalog lists
/// them. A prefix naming a listed release is returned unchanged too. `Auto`
/// reads the project manifest from `work_dir` upward and always takes the
/// greatest stable match.
///
/// # Errors
///
/// Returns [`GoverError::NoMatchingVersion`] or [`GoverError::NoManifestFound`].
pub fn resolve(
    spec: &VersionSpec,
    releases: &[ReleaseDescriptor],
    work_dir: &Path,
) -> Result<String> {
    match spec {
        VersionSpec::Concrete(version) => {
            if catalog::find(releases, version).is_none() {
                debug!(%version, "version not listed in catalog, using as given");
            }
            Ok(version.clone())
        }
        VersionSpec::Prefix(prefix) => match catalog::find(releases, prefix) {
            Some(release) => Ok(release.version.clone()),
            None => latest_matching(releases, prefix),
        },
        VersionSpec::Auto => {
            let declared = normalize(&gomod::project_version(work_dir)?);
            debug!(%declared, "project declares go version");
            latest_matching(releases, &declared)
        }
    }
}

/// Resolves `spec` for a command, loading the catalog only when needed.
///
/// For `Auto` the manifest is read before the catalog so a project without a
/// `go.mod` fails without network access.
///
/// # Errors
///
/// Propagates catalog and resolution failures.
pub async fn resolve_target(config: &Config, spec: &VersionSpec) -> Result<String> {
    match spec {
        VersionSpec::Concrete(version) => Ok(version.clone()),
        VersionSpec::Prefix(_) => {
            let releases = catalog::load(config, &HttpReleaseSource, false).await?;
            resolve(spec, &releases, &config.work_dir)
        }
        VersionSpec::Auto => {
            let declared = normalize(&gomod::project_version(&config.work_dir)?);
            latest_target(config, &declared).await
        }
    }
}

/// Loads the catalog and returns the greatest stable release on the `prefix`
/// line, ignoring any release named exactly `prefix`.
///
/// # Errors
///
/// Propagates catalog failures and [`GoverError::NoMatchingVersion`].
pub async fn latest_target(config: &Config, prefix: &str) -> Result<String> {
    let releases = catalog::load(config, &HttpReleaseSource, false).await?;
    latest_matching(&releases, prefix)
}
