use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line front end for the apt provider
#[derive(Parser, Debug)]
#[command(name = "rustle-apt")]
#[command(about = "Install, upgrade, remove and query Debian packages the way rustle modules do")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct RustleAptCli {
    #[command(subcommand)]
    pub command: Commands,

    /// Provider configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output and apt-get's verbose command variants
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a package unless it is already present
    Install(InstallArgs),

    /// Reinstall a package to pick up a newer version
    Upgrade(InstallArgs),

    /// Remove a package if it is installed
    Remove {
        /// Package name
        name: String,
    },

    /// Report whether a package (or every package matching a pattern) is installed
    Check {
        /// Package name or pattern
        name: String,
    },
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Package name
    pub name: String,

    /// Restrict sources to these repositories from sources.list.d ('base' keeps the defaults)
    #[arg(long = "use-repo", value_delimiter = ',')]
    pub use_repos: Vec<String>,
}
