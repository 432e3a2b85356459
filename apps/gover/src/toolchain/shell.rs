//! Shell environment snippets.
//!
//! `gover use` prints the variables a shell needs to pick up the active
//! toolchain, in the syntax of the user's shell:
//!
//! ```bash
//! export GOROOT="$HOME/.gover/current"
//! export PATH="$HOME/.gover/current/bin:$PATH"
//! export GOPATH="$HOME/go"
//! ```
//!
//! ```fish
//! set -gx GOROOT $HOME/.gover/current
//! set -gx PATH $HOME/.gover/current/bin $PATH
//! set -gx GOPATH $HOME/go
//! ```
//!
//! The exports point at the `current` link rather than a version directory,
//! so they stay valid across switches.

use std::path::{Path, PathBuf};

/// Shell dialects with distinct export syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    /// Any other shell, addressed with POSIX `sh` syntax.
    Posix,
}

impl Shell {
    /// Detects the user's shell from the SHELL environment variable.
    ///
    /// Falls back to [`Shell::Posix`] when unset or unrecognised.
    #[must_use]
    pub fn detect() -> Self {
        std::env::var("SHELL")
            .ok()
            .and_then(|path| Self::from_path(&path))
            .unwrap_or(Self::Posix)
    }

    /// Parses a shell from a path string (e.g., "/bin/bash").
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let shell_name = Path::new(path).file_name()?.to_str()?;
        match shell_name {
            "bash" => Some(Self::Bash),
            "zsh" => Some(Self::Zsh),
            "fish" => Some(Self::Fish),
            "sh" | "dash" | "ksh" => Some(Self::Posix),
            _ => None,
        }
    }

    /// Profile file the exports belong in.
    #[must_use]
    pub fn profile(self, home_dir: &Path) -> PathBuf {
        match self {
            Self::Bash => home_dir.join(".bashrc"),
            Self::Zsh => home_dir.join(".zshrc"),
            Self::Fish => home_dir.join(".config").join("fish").join("config.fish"),
            Self::Posix => home_dir.join(".profile"),
        }
    }
}

/// Environment for the active toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellExports {
    /// `GOROOT`, the `current` link.
    pub goroot: PathBuf,
    /// Directory prepended to `PATH`.
    pub bin: PathBuf,
    /// `GOPATH`, `~/go`.
    pub gopath: PathBuf,
}

impl ShellExports {
    #[must_use]
    pub fn for_pointer(current: &Path, home: &Path) -> Self {
        Self {
            goroot: current.to_path_buf(),
            bin: current.join("bin"),
            gopath: home.join("go"),
        }
    }

    /// Renders the assignments for `shell`, one per line.
    #[must_use]
    pub fn render(&self, shell: Shell) -> String {
        match shell {
            Shell::Bash | Shell::Zsh | Shell::Posix => format!(
                "export GOROOT=\"{}\"\nexport PATH=\"{}:$PATH\"\nexport GOPATH=\"{}\"\n",
                double_quoted(&self.goroot),
                double_quoted(&self.bin),
                double_quoted(&self.gopath),
            ),
            Shell::Fish => format!(
                "set -gx GOROOT {}\nset -gx PATH {} $PATH\nset -gx GOPATH {}\n",
                fish_word(&self.goroot),
                fish_word(&self.bin),
                fish_word(&self.gopath),
            ),
        }
    }
}

/// Escapes `$`, backticks, `"` and `\` for use inside double quotes.
fn double_quoted(path: &Path) -> String {
    path.display()
        .to_string()
        .replace('\\', "\\\\")
        .replace('$', "\\$")
        .replace('`', "\\`")
        .replace('"', "\\\"")
}

/// Single-quotes a path for fish when it contains special characters.
fn fish_word(path: &Path) -> String {
    let path_str = path.display().to_string();
    let needs_quotes = path_str.contains([
        ' ', '$', '\\', '\'', '*', '?', '(', ')', '[', ']', '{', '}', ';', '&', '|', '#',
    ]);
    if needs_quotes {
        format!(
            "'{}'",
            path_str.replace('\\', "\\\\").replace('\'', "\\'")
        )
    } else {
        path_str
    }
}
