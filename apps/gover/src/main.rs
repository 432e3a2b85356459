#![warn(clippy::pedantic)]

//! # gover
//!
//! A version manager for Go toolchains. Releases are installed side by side
//! under `~/.gover/versions/` and the active one is selected by the
//! `~/.gover/current` symlink.
//!
//! ## Subcommands
//!
//! - `init` - Create the state directory and cache the release index
//! - `list` - List available releases
//! - `install` - Install a version
//! - `use` - Switch the active version
//! - `upgrade` - Install and switch to the newest patch of a release line
//! - `uninstall` - Remove a version
//! - `current` - Show the active version
//! - `detect` - Show the version the nearest go.mod resolves to
//! - `prompt` - Print a prompt segment for the active version
//!
//! ## Examples
//!
//! Install and activate the newest Go 1.21:
//! ```bash
//! gover install 1.21
//! eval "$(gover use 1.21)"
//! ```
//!
//! Follow the project's go.mod:
//! ```bash
//! gover use --auto
//! ```

mod commands;
mod config;
mod errors;
mod logging;
mod toolchain;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{current, detect, init, install, list, prompt, uninstall, upgrade, use_cmd};
use config::Config;

/// Go toolchain version manager.
#[derive(Parser)]
#[command(
    name = "gover",
    author,
    version,
    about = "Install and switch between Go toolchain versions",
    after_help = "\
ENVIRONMENT VARIABLES:
    GOVER_HOME              State directory (default: ~/.gover)
    GOVER_DIST_SERVER       Release server URL (default: https://go.dev/dl)
    GOVER_LOG               Log filter, e.g. debug (default: warn)"
)]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the gover CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the gover environment.
    ///
    /// Creates the state directory and downloads the release index.
    Init,

    /// List available Go versions.
    ///
    /// Shows releases published for this platform, marking installed and
    /// active ones.
    List(list::ListArgs),

    /// Install a Go version.
    Install(install::InstallArgs),

    /// Switch to an installed Go version.
    ///
    /// Prints the shell exports for the new version on stdout.
    Use(use_cmd::UseArgs),

    /// Install and use the newest patch release of a release line.
    Upgrade(upgrade::UpgradeArgs),

    /// Uninstall a Go version.
    Uninstall(uninstall::UninstallArgs),

    /// Show the currently active Go version.
    Current,

    /// Detect the Go version from the nearest go.mod.
    Detect,

    /// Print the active version for a shell prompt.
    Prompt,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        std::process::exit(handle_error(&e));
    }
}

/// Prints the error chain and returns the exit code.
fn handle_error(e: &anyhow::Error) -> i32 {
    eprintln!("Error: {e:?}");
    1
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let config = Config::from_env()?;

    match cli.command {
        Commands::Init => init::execute(&config).await,
        Commands::List(args) => list::execute(&args, &config).await,
        Commands::Install(args) => install::execute(&args, &config).await,
        Commands::Use(args) => use_cmd::execute(&args, &config).await,
        Commands::Upgrade(args) => upgrade::execute(&args, &config).await,
        Commands::Uninstall(args) => uninstall::execute(&args, &config).await,
        Commands::Current => current::execute(&config).await,
        Commands::Detect => detect::execute(&config).await,
        Commands::Prompt => {
            prompt::execute(&config).await;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn use_accepts_auto_without_version() {
        let cli = Cli::try_parse_from(["gover", "use", "--auto"]).unwrap();
        assert!(matches!(cli.command, Commands::Use(ref args) if args.auto));
    }

    #[test]
    fn use_rejects_version_with_auto() {
        assert!(Cli::try_parse_from(["gover", "use", "1.21", "--auto"]).is_err());
    }

    #[test]
    fn list_flags_parse() {
        let cli = Cli::try_parse_from(["gover", "list", "-a", "-m", "1.21", "-f"]).unwrap();
        let Commands::List(args) = cli.command else {
            panic!("expected list");
        };
        assert!(args.all && args.force);
        assert_eq!(args.major.as_deref(), Some("1.21"));
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["gover", "current", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
