//! PATH conflict detection.
//!
//! After a switch the `go` found first on `PATH` should be
//! `current/bin/go`. When another installation comes first, the switch has
//! no visible effect, so the user is warned.

use std::path::{Path, PathBuf};

use super::Platform;

/// A `go` binary on PATH that shadows the managed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathConflict {
    /// Name of the binary (e.g., "go").
    pub binary: String,
    /// Path where the binary was found in PATH.
    pub found: PathBuf,
    /// Path of the managed binary.
    pub expected: PathBuf,
}

/// Checks whether `go` on PATH resolves to the toolchain behind `current`.
///
/// Returns `None` when PATH has no `go`, when it is the managed one, or when
/// the managed binary does not exist.
#[must_use]
pub fn detect_go_conflict(current: &Path, platform: Platform) -> Option<PathConflict> {
    let binary = format!("go{}", platform.executable_extension());
    let expected = current.join("bin").join(&binary);
    let found = which::which(&binary).ok()?;
    conflict_between(binary, found, expected)
}

fn conflict_between(binary: String, found: PathBuf, expected: PathBuf) -> Option<PathConflict> {
    if found == expected || !expected.exists() {
        return None;
    }
    if let (Ok(a), Ok(b)) = (found.canonicalize(), expected.canonicalize())
        && a == b
    {
        return None;
    }
    Some(PathConflict {
        binary,
        found,
        expected,
    })
}

/// Formats a user-friendly warning message for a PATH conflict.
#[must_use]
pub fn format_conflict_warning(conflict: &PathConflict) -> String {
    let mut lines = vec![
        "Warning: PATH conflict detected".to_string(),
        format!(
            "  '{}' found at: {}",
            conflict.binary,
            conflict.found.display()
        ),
        format!("  Expected:        {}", conflict.expected.display()),
        String::new(),
        "The selected toolchain may not be used. To fix:".to_string(),
    ];

    if let Some(parent) = conflict.found.parent() {
        lines.push(format!("  - Remove {} from your PATH, or", parent.display()));
    }
    if let Some(parent) = conflict.expected.parent() {
        lines.push(format!(
            "  - Ensure {} comes before other paths in $PATH",
            parent.display()
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;

    fn managed(temp: &TempDir) -> PathBuf {
        let bin = temp.path().join("current").join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("go"), "").unwrap();
        bin.join("go")
    }

    #[test]
    fn same_path_is_no_conflict() {
        let temp = TempDir::new().unwrap();
        let expected = managed(&temp);
        assert!(conflict_between("go".into(), expected.clone(), expected).is_none());
    }

    #[test]
    fn other_binary_is_conflict() {
        let temp = TempDir::new().unwrap();
        let expected = managed(&temp);
        let conflict =
            conflict_between("go".into(), PathBuf::from("/usr/local/go/bin/go"), expected).unwrap();
        assert_eq!(conflict.found, PathBuf::from("/usr/local/go/bin/go"));
    }

    #[test]
    fn missing_managed_binary_is_no_conflict() {
        assert!(
            conflict_between(
                "go".into(),
                PathBuf::from("/usr/bin/go"),
                PathBuf::from("/nonexistent/current/bin/go"),
            )
            .is_none()
        );
    }

    #[test]
    fn format_warning_includes_details_and_fixes() {
        let warning = format_conflict_warning(&PathConflict {
            binary: "go".to_string(),
            found: PathBuf::from("/usr/local/go/bin/go"),
            expected: PathBuf::from("/home/user/.gover/current/bin/go"),
        });

        assert!(warning.contains("PATH conflict detected"));
        assert!(warning.contains("/usr/local/go/bin/go"));
        assert!(warning.contains("Remove /usr/local/go/bin from your PATH"));
        assert!(warning.contains("Ensure /home/user/.gover/current/bin comes before"));
    }
}
