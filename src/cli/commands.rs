use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::options::{Commands, RustleAptCli};
use crate::cli::output::{print_existence, print_install_outcome, print_remove_outcome};
use crate::modules::system::package_managers::{AptConfig, AptPackageManager, RepoSet};

/// Resolve the provider configuration: file first, then flag overrides
pub fn load_config(cli: &RustleAptCli) -> Result<AptConfig> {
    let config = match &cli.config {
        Some(path) => AptConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AptConfig::default(),
    };
    Ok(if cli.verbose {
        config.with_log_output(true)
    } else {
        config
    })
}

/// Run the selected subcommand. Returns the process exit code.
pub async fn run(cli: RustleAptCli) -> Result<i32> {
    let config = load_config(&cli)?;
    debug!("Using configuration: {config:?}");
    let apt = AptPackageManager::new(config);

    match cli.command {
        Commands::Install(args) => {
            let repos: RepoSet = args.use_repos.into_iter().collect();
            let outcome = apt.install(&args.name, &repos).await?;
            print_install_outcome(&args.name, outcome);
        }
        Commands::Upgrade(args) => {
            let repos: RepoSet = args.use_repos.into_iter().collect();
            let outcome = apt.upgrade_package(&args.name, &repos).await?;
            print_install_outcome(&args.name, outcome);
        }
        Commands::Remove { name } => {
            let outcome = apt.remove(&name).await?;
            print_remove_outcome(&name, outcome);
        }
        Commands::Check { name } => {
            let installed = apt.check_existence(&name).await?;
            print_existence(&name, installed);
            return Ok(if installed { 0 } else { 1 });
        }
    }
    Ok(0)
}
