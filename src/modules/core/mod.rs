//! Core execution modules

pub mod package;

pub use package::{PackageArgs, PackageModule};
