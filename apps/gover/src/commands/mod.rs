//! Command modules for the gover CLI.
//!
//! ## Catalog
//!
//! - [`init`] - Create the state root and refresh the release cache
//! - [`list`] - List available releases
//! - [`detect`] - Show the version the current project asks for
//!
//! ## Toolchains
//!
//! - [`install`] - Install a version
//! - [`use_cmd`] - Switch the active version
//! - [`upgrade`] - Install and switch to the newest patch of a release line
//! - [`uninstall`] - Remove a version
//! - [`current`] - Show the active version
//! - [`prompt`] - Prompt segment for the active version

pub mod current;
pub mod detect;
pub mod init;
pub mod install;
pub mod list;
pub mod prompt;
pub mod uninstall;
pub mod upgrade;
pub mod use_cmd;

use crate::config::Config;
use crate::toolchain::conflict::{detect_go_conflict, format_conflict_warning};
use crate::toolchain::{Activation, Shell, ShellExports};

/// Reports a finished switch.
///
/// The exports go to stdout so they can be evaluated directly
/// (`eval "$(gover use 1.21)"`); everything else goes to stderr.
pub(crate) fn report_activation(config: &Config, activation: &Activation) {
    for warning in &activation.warnings {
        eprintln!("Warning: {warning}");
    }

    let shell = Shell::detect();
    let exports = ShellExports::for_pointer(&config.paths.current, &config.home);
    eprintln!(
        "Now using {} ({})",
        activation.version,
        activation.target.display()
    );
    print!("{}", exports.render(shell));
    eprintln!(
        "Add the lines above to {} to make them permanent.",
        shell.profile(&config.home).display()
    );

    if let Some(conflict) = detect_go_conflict(&config.paths.current, config.platform) {
        eprintln!("{}", format_conflict_warning(&conflict));
    }
}
