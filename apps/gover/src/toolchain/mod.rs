//! Toolchain management for gover.
//!
//! ## Module Structure
//!
//! - [`platform`] - Go OS and architecture names for the host
//! - [`paths`] - State root layout
//! - [`catalog`] - Release index fetching and caching
//! - [`gomod`] - Project `go.mod` reading
//! - [`resolver`] - Version spec resolution
//! - [`download`] - HTTP download with progress tracking
//! - [`archive`] - tar.gz extraction
//! - [`install`] - Idempotent installs
//! - [`activate`] - Switching the active version
//! - [`uninstall`] - Guarded removal
//! - [`shell`] - Shell export snippets
//! - [`conflict`] - PATH conflict detection

pub mod activate;
pub mod archive;
pub mod catalog;
pub mod conflict;
pub mod download;
pub mod gomod;
pub mod install;
pub mod paths;
pub mod platform;
pub mod resolver;
pub mod shell;
pub mod uninstall;

pub use activate::{Activation, activate, current_version};
pub use catalog::{HttpReleaseSource, ReleaseDescriptor};
pub use download::{HttpFetcher, console_progress};
pub use install::ensure_installed;
pub use paths::GoverPaths;
pub use platform::Platform;
pub use resolver::{VersionSpec, latest_target, resolve_target};
pub use shell::{Shell, ShellExports};
