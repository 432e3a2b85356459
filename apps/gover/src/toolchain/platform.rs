//! Platform detection for gover.
//!
//! Go publishes archives keyed by its own operating system and architecture
//! names (`linux-amd64`, `darwin-arm64`, ...), which differ from the names
//! Rust reports in [`std::env::consts`]. This module translates between the
//! two so archive names, release filtering and the `pkg/tool/<os>_<arch>`
//! directory all agree.

use anyhow::{Result, bail};
use std::fmt;

/// A Go `os`/`arch` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    os: &'static str,
    arch: &'static str,
}

impl Platform {
    /// Creates a platform from Go names.
    #[must_use]
    pub const fn new(os: &'static str, arch: &'static str) -> Self {
        Self { os, arch }
    }

    /// Detects the platform the binary is running on.
    ///
    /// # Errors
    ///
    /// Returns an error if Go publishes no toolchain for the host OS or architecture.
    pub fn detect() -> Result<Self> {
        Self::from_rust(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Maps Rust target names to Go names.
    ///
    /// # Errors
    ///
    /// Returns an error for combinations without a Go name.
    pub fn from_rust(os: &str, arch: &str) -> Result<Self> {
        let go_os = match os {
            "linux" => "linux",
            "macos" => "darwin",
            "windows" => "windows",
            "freebsd" => "freebsd",
            _ => bail!("Unsupported operating system: {os}"),
        };

        let go_arch = match arch {
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            "x86" => "386",
            "arm" => "armv6l",
            "powerpc64" => "ppc64le",
            "s390x" => "s390x",
            "riscv64" => "riscv64",
            "loongarch64" => "loong64",
            _ => bail!("Unsupported architecture: {arch} on {os}"),
        };

        Ok(Self::new(go_os, go_arch))
    }

    /// Name of the compiler tool directory under `pkg/tool/`.
    #[must_use]
    pub fn tool_dir_name(self) -> String {
        format!("{}_{}", self.os, self.arch)
    }

    /// Archive file name published for `version` on this platform.
    #[must_use]
    pub fn archive_name(self, version: &str) -> String {
        format!("{version}.{}-{}.tar.gz", self.os, self.arch)
    }

    /// Whether a release file built for `os`/`arch` runs here.
    #[must_use]
    pub fn matches(self, os: &str, arch: &str) -> bool {
        self.os == os && self.arch == arch
    }

    /// Returns `.exe` on Windows, empty string elsewhere.
    #[must_use]
    pub fn executable_extension(self) -> &'static str {
        if self.os == "windows" { ".exe" } else { "" }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}
