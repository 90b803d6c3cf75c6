//! System-level modules: package managers and process execution

pub mod package_managers;
pub mod process;

pub use package_managers::{AptConfig, AptPackageManager, PackageManager};
pub use process::{CommandResult, CommandSpec, ProcessExecutor, SystemExecutor};
