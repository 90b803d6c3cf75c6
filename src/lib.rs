//! Rustle APT - Debian package provider for rustle execution modules
//!
//! Installs, upgrades, removes and queries packages through `apt-get`,
//! `apt-cache` and `dpkg`, with a single refresh-and-retry on failed installs
//! and per-call repository overrides.

pub mod cli;
pub mod modules;

pub use modules::core::PackageModule;
pub use modules::system::package_managers::{
    normalize_package_name, AptConfig, AptPackageManager, InstallOutcome, PackageManager,
    PackageState, RemoveOutcome, RepoSet,
};
pub use modules::system::process::{CommandResult, CommandSpec, ProcessExecutor, SystemExecutor};
pub use modules::{ModuleError, PackageManagerError};
