//! Active-version switch.
//!
//! The active toolchain is the target of the `current` symlink in the state
//! root. Switching removes the old link before creating the new one, so an
//! interrupted switch leaves no pointer rather than a stale one.
//!
//! There is no locking. Two `gover` processes switching or uninstalling at
//! the same time race on `current`, and the last one to create the link wins.
//!
//! After the link is in place the files under `bin/` and
//! `pkg/tool/<os>_<arch>/` are made executable. Failures there are returned
//! as warnings because the switch itself has already happened.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::Platform;
use super::paths::{GoverPaths, check_version_name};
use crate::config::Config;
use crate::errors::GoverError;

/// Outcome of a successful switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// The version now active.
    pub version: String,
    /// Directory the pointer now targets.
    pub target: PathBuf,
    /// Permission fix-ups that failed.
    pub warnings: Vec<String>,
}

/// Points `current` at the installed `version`.
///
/// # Errors
///
/// Returns [`GoverError::NotInstalled`] without touching the pointer when the
/// version has no install directory, or an I/O error when the link cannot be
/// replaced.
pub fn activate(config: &Config, version: &str) -> Result<Activation> {
    check_version_name(version)?;
    let paths = &config.paths;
    let target = paths.install_dir(version);
    if !target.is_dir() {
        return Err(GoverError::not_installed(version).into());
    }

    remove_pointer(&paths.current)?;
    create_link(&target, &paths.current)?;
    debug!(%version, target = %target.display(), "switched active version");

    let warnings = mark_executables(&target, config.platform);
    Ok(Activation {
        version: version.to_string(),
        target,
        warnings,
    })
}

/// Removes the pointer, treating a missing one as success.
fn remove_pointer(current: &Path) -> Result<()> {
    match std::fs::remove_file(current) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        #[cfg(windows)]
        Err(_) if current.symlink_metadata().is_ok() => std::fs::remove_dir(current)
            .with_context(|| format!("Failed to remove symlink: {}", current.display())),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to remove symlink: {}", current.display()))
        }
    }
}

/// Creates a directory symlink at `link` pointing to `target`.
#[cfg(unix)]
fn create_link(target: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link).with_context(|| {
        format!(
            "Failed to create symlink from {} to {}",
            link.display(),
            target.display()
        )
    })
}

/// Creates a directory symlink at `link` pointing to `target`.
#[cfg(windows)]
fn create_link(target: &Path, link: &Path) -> Result<()> {
    std::os::windows::fs::symlink_dir(target, link).with_context(|| {
        format!(
            "Failed to create symlink from {} to {}",
            link.display(),
            target.display()
        )
    })
}

/// Sets mode 0755 on the regular files of the toolchain's executable directories.
#[cfg(unix)]
fn mark_executables(root: &Path, platform: Platform) -> Vec<String> {
    use std::os::unix::fs::PermissionsExt;

    let dirs = [
        root.join("bin"),
        root.join("pkg").join("tool").join(platform.tool_dir_name()),
    ];
    let mut warnings = Vec::new();

    for dir in &dirs {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                let message = format!("could not read {}: {e}", dir.display());
                warn!("{message}");
                warnings.push(message);
                continue;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let permissions = std::fs::Permissions::from_mode(0o755);
            if let Err(e) = std::fs::set_permissions(&path, permissions) {
                let message = format!("could not make {} executable: {e}", path.display());
                warn!("{message}");
                warnings.push(message);
            }
        }
    }

    warnings
}

#[cfg(not(unix))]
fn mark_executables(_root: &Path, _platform: Platform) -> Vec<String> {
    Vec::new()
}

/// Returns the active version, if a pointer exists.
///
/// A pointer whose target has been removed still reports its version.
///
/// # Errors
///
/// Returns an error if `current` exists but cannot be read as a symlink.
pub fn current_version(paths: &GoverPaths) -> Result<Option<String>> {
    Ok(paths
        .read_pointer()?
        .and_then(|target| version_from_target(paths, &target)))
}

fn version_from_target(paths: &GoverPaths, target: &Path) -> Option<String> {
    let name = match target.strip_prefix(&paths.versions) {
        Ok(relative) => relative.components().next()?.as_os_str().to_str()?,
        Err(_) => target.file_name()?.to_str()?,
    };
    Some(name.to_string())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use std::os::unix::fs::PermissionsExt;

    fn config(temp: &TempDir) -> Config {
        Config::with_root(
            temp.path().join("state"),
            temp.path().to_path_buf(),
            temp.path().to_path_buf(),
        )
    }

    fn install_fake(config: &Config, version: &str) -> PathBuf {
        let root = config.paths.install_dir(version);
        let tool = root.join("pkg").join("tool").join("linux_amd64");
        std::fs::create_dir_all(root.join("bin")).unwrap();
        std::fs::create_dir_all(&tool).unwrap();
        std::fs::write(root.join("bin").join("go"), "#!/bin/sh\n").unwrap();
        std::fs::write(tool.join("compile"), "").unwrap();
        for file in [root.join("bin").join("go"), tool.join("compile")] {
            std::fs::set_permissions(file, std::fs::Permissions::from_mode(0o644)).unwrap();
        }
        root
    }

    fn mode(path: &Path) -> u32 {
        std::fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[test]
    fn activate_points_current_at_install_dir() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let root = install_fake(&config, "go1.21.4");

        let activation = activate(&config, "go1.21.4").unwrap();

        assert_eq!(activation.target, root);
        assert!(activation.warnings.is_empty());
        assert_eq!(std::fs::read_link(&config.paths.current).unwrap(), root);
        assert_eq!(
            current_version(&config.paths).unwrap().as_deref(),
            Some("go1.21.4")
        );
    }

    #[test]
    fn activate_makes_toolchain_executable() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let root = install_fake(&config, "go1.21.4");

        activate(&config, "go1.21.4").unwrap();

        assert_eq!(mode(&root.join("bin").join("go")), 0o755);
        assert_eq!(
            mode(&root.join("pkg").join("tool").join("linux_amd64").join("compile")),
            0o755
        );
    }

    #[test]
    fn activate_replaces_previous_pointer() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        install_fake(&config, "go1.20.1");
        let newer = install_fake(&config, "go1.21.4");

        activate(&config, "go1.20.1").unwrap();
        activate(&config, "go1.21.4").unwrap();

        assert_eq!(std::fs::read_link(&config.paths.current).unwrap(), newer);
    }

    #[test]
    fn activate_replaces_dangling_pointer() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        install_fake(&config, "go1.21.4");
        std::os::unix::fs::symlink(config.paths.install_dir("go1.19"), &config.paths.current)
            .unwrap();

        activate(&config, "go1.21.4").unwrap();

        assert_eq!(
            current_version(&config.paths).unwrap().as_deref(),
            Some("go1.21.4")
        );
    }

    #[test]
    fn activate_not_installed_keeps_pointer() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let root = install_fake(&config, "go1.21.4");
        activate(&config, "go1.21.4").unwrap();

        let err = activate(&config, "go1.22.0").unwrap_err();

        assert!(matches!(
            err.downcast_ref::<GoverError>(),
            Some(GoverError::NotInstalled { .. })
        ));
        assert_eq!(std::fs::read_link(&config.paths.current).unwrap(), root);
    }

    #[test]
    fn missing_tool_dir_is_a_warning() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let root = config.paths.install_dir("go1.21.4");
        std::fs::create_dir_all(root.join("bin")).unwrap();

        let activation = activate(&config, "go1.21.4").unwrap();

        assert_eq!(activation.warnings.len(), 1);
        assert!(activation.warnings[0].contains("linux_amd64"));
        assert!(config.paths.current.symlink_metadata().is_ok());
    }

    #[test]
    fn current_version_none_without_pointer() {
        let temp = TempDir::new().unwrap();
        assert_eq!(current_version(&config(&temp).paths).unwrap(), None);
    }

    #[test]
    fn version_from_foreign_target_uses_file_name() {
        let paths = GoverPaths::with_root(PathBuf::from("/state"));
        assert_eq!(
            version_from_target(&paths, Path::new("/opt/go1.20")).as_deref(),
            Some("go1.20")
        );
    }
}
