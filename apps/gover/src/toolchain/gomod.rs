//! Reads the Go version a project declares in its `go.mod`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::errors::GoverError;

/// Manifest file name searched for.
pub const MANIFEST_NAME: &str = "go.mod";

/// Finds the nearest `go.mod` in `start` or any of its ancestors.
#[must_use]
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(MANIFEST_NAME))
        .find(|candidate| candidate.is_file())
}

/// Extracts `<major>.<minor>` from the first `go` directive.
///
/// `go 1.21.4` yields `1.21`. Returns `None` when no directive is present.
#[must_use]
pub fn declared_version(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let version = line.trim().strip_prefix("go ")?.trim();
        let version = version.split("//").next()?.trim();
        let mut parts = version.split('.');
        let major = parts.next().filter(|p| is_number(p))?;
        let minor = parts.next().filter(|p| is_number(p))?;
        Some(format!("{major}.{minor}"))
    })
}

fn is_number(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

/// Resolves the `<major>.<minor>` the project around `start` declares.
///
/// Only the nearest manifest is consulted.
///
/// # Errors
///
/// Returns [`GoverError::NoManifestFound`] when no manifest exists up to the
/// filesystem root or the nearest one has no `go` directive.
pub fn project_version(start: &Path) -> Result<String> {
    let manifest = find_manifest(start).ok_or_else(|| GoverError::no_manifest_found(start))?;
    let contents = std::fs::read_to_string(&manifest)
        .with_context(|| format!("Failed to read {}", manifest.display()))?;

    tracing::debug!(manifest = %manifest.display(), "reading go directive");
    declared_version(&contents).ok_or_else(|| GoverError::no_manifest_found(start).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;

    #[test]
    fn declared_version_keeps_major_minor() {
        let contents = "module example.com/app\n\ngo 1.21.4\n\nrequire golang.org/x/text v0.14.0\n";
        assert_eq!(declared_version(contents).as_deref(), Some("1.21"));
    }

    #[test]
    fn declared_version_accepts_two_components_and_comments() {
        assert_eq!(declared_version("go 1.22 // minimum").as_deref(), Some("1.22"));
        assert_eq!(declared_version("  go 1.20\n").as_deref(), Some("1.20"));
    }

    #[test]
    fn declared_version_ignores_toolchain_and_module_lines() {
        let contents = "module go.example/x\ntoolchain go1.22.1\n";
        assert_eq!(declared_version(contents), None);
    }

    #[test]
    fn find_manifest_walks_upward() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("go.mod"), "module x\n\ngo 1.21\n").unwrap();
        let nested = temp.path().join("cmd").join("server");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_manifest(&nested), Some(temp.path().join("go.mod")));
        assert_eq!(project_version(&nested).unwrap(), "1.21");
    }

    #[test]
    fn nearest_manifest_wins() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("go.mod"), "go 1.19\n").unwrap();
        let inner = temp.path().join("inner");
        std::fs::create_dir_all(&inner).unwrap();
        std::fs::write(inner.join("go.mod"), "go 1.22.0\n").unwrap();

        assert_eq!(project_version(&inner).unwrap(), "1.22");
    }

    #[test]
    fn manifest_without_directive_is_not_found() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("go.mod"), "module x\n").unwrap();

        let err = project_version(temp.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GoverError>(),
            Some(GoverError::NoManifestFound { .. })
        ));
    }
}
