//! Runtime configuration.
//!
//! [`Config`] is resolved once in `main` from the process environment and then
//! passed by reference to every command, so no component looks up the home
//! directory or environment variables on its own.
//!
//! ## Environment Variables
//!
//! - `GOVER_HOME`: state root (default `~/.gover`)
//! - `GOVER_DIST_SERVER`: base URL of the release index and archives
//!   (default `https://go.dev/dl`)
//! - `GOVER_LOG`: log filter, see [`crate::logging`]

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::toolchain::{GoverPaths, Platform};

/// Environment variable overriding the state root.
pub const GOVER_HOME_ENV: &str = "GOVER_HOME";

/// Environment variable overriding the distribution server.
pub const DIST_SERVER_ENV: &str = "GOVER_DIST_SERVER";

/// Default distribution server for release metadata and archives.
const DEFAULT_DIST_SERVER: &str = "https://go.dev/dl";

/// Query that makes the distribution server answer with the full JSON index.
const RELEASES_QUERY: &str = "/?mode=json&include=all";

/// Resolved environment for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// State root and derived paths.
    pub paths: GoverPaths,
    /// Host platform in Go naming.
    pub platform: Platform,
    /// User home directory, the parent of `GOPATH`.
    pub home: PathBuf,
    /// Directory `auto` resolution starts from.
    pub work_dir: PathBuf,
    /// Base URL without a trailing slash.
    pub dist_server: String,
}

impl Config {
    /// Resolves the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory, working directory or host
    /// platform cannot be determined.
    pub fn from_env() -> Result<Self> {
        let home = dirs::home_dir().context("Cannot determine home directory")?;
        let root = match std::env::var(GOVER_HOME_ENV) {
            Ok(value) if !value.trim().is_empty() => PathBuf::from(value),
            _ => home.join(".gover"),
        };
        // The pointer stores this path as its target, so it must not be relative.
        let root = std::path::absolute(&root)
            .with_context(|| format!("Cannot resolve state directory: {}", root.display()))?;
        let work_dir = std::env::current_dir().context("Cannot determine working directory")?;

        Ok(Self {
            paths: GoverPaths::with_root(root),
            platform: Platform::detect()?,
            home,
            work_dir,
            dist_server: dist_server_from_env(),
        })
    }

    /// Builds a configuration over synthetic directories.
    #[cfg(test)]
    pub fn with_root(root: PathBuf, home: PathBuf, work_dir: PathBuf) -> Self {
        Self {
            paths: GoverPaths::with_root(root),
            platform: Platform::new("linux", "amd64"),
            home,
            work_dir,
            dist_server: DEFAULT_DIST_SERVER.to_string(),
        }
    }

    /// URL of the JSON release index.
    #[must_use]
    pub fn releases_url(&self) -> String {
        format!("{}{RELEASES_QUERY}", self.dist_server)
    }

    /// URL of the archive for `version` on the configured platform.
    #[must_use]
    pub fn archive_url(&self, version: &str) -> String {
        format!(
            "{}/{}",
            self.dist_server,
            self.platform.archive_name(version)
        )
    }
}

/// Reads `GOVER_DIST_SERVER`, treating empty or whitespace-only values as unset.
fn dist_server_from_env() -> String {
    let server = std::env::var(DIST_SERVER_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DIST_SERVER.to_string());
    server.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config::with_root(
            PathBuf::from("/state"),
            PathBuf::from("/home/user"),
            PathBuf::from("/work"),
        )
    }

    #[test]
    fn releases_url_requests_full_index() {
        assert_eq!(
            test_config().releases_url(),
            "https://go.dev/dl/?mode=json&include=all"
        );
    }

    #[test]
    fn archive_url_uses_platform_names() {
        assert_eq!(
            test_config().archive_url("go1.21.4"),
            "https://go.dev/dl/go1.21.4.linux-amd64.tar.gz"
        );
    }

    #[test]
    #[serial_test::serial]
    fn dist_server_uses_default_when_env_not_set() {
        unsafe { std::env::remove_var(DIST_SERVER_ENV) };
        assert_eq!(dist_server_from_env(), DEFAULT_DIST_SERVER);
    }

    #[test]
    #[serial_test::serial]
    fn dist_server_uses_env_when_set() {
        unsafe { std::env::set_var(DIST_SERVER_ENV, "http://localhost:8080") };
        assert_eq!(dist_server_from_env(), "http://localhost:8080");
        unsafe { std::env::remove_var(DIST_SERVER_ENV) };
    }

    #[test]
    #[serial_test::serial]
    fn dist_server_trims_trailing_slash() {
        unsafe { std::env::set_var(DIST_SERVER_ENV, "http://localhost:8080/") };
        assert_eq!(dist_server_from_env(), "http://localhost:8080");
        unsafe { std::env::remove_var(DIST_SERVER_ENV) };
    }

    #[test]
    #[serial_test::serial]
    fn dist_server_ignores_whitespace_only_value() {
        unsafe { std::env::set_var(DIST_SERVER_ENV, "   ") };
        assert_eq!(dist_server_from_env(), DEFAULT_DIST_SERVER);
        unsafe { std::env::remove_var(DIST_SERVER_ENV) };
    }

    #[test]
    #[serial_test::serial]
    fn from_env_honours_gover_home() {
        let root = std::env::temp_dir().join("gover_config_home");
        unsafe { std::env::set_var(GOVER_HOME_ENV, &root) };
        let config = Config::from_env();
        unsafe { std::env::remove_var(GOVER_HOME_ENV) };

        let config = config.unwrap();
        assert_eq!(config.paths.root, root);
        assert_eq!(config.paths.current, root.join("current"));
    }
}
