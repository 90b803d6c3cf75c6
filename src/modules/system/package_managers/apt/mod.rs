//! APT package manager for Debian/Ubuntu systems

pub mod commands;
pub mod config;
pub mod selection;
pub mod sources;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::modules::{
    error::PackageManagerError,
    system::package_managers::{
        normalize_package_name, InstallOutcome, PackageManager, PackageState, RemoveOutcome,
        RepoSet,
    },
    system::process::{CommandResult, CommandSpec, ProcessExecutor, SystemExecutor},
};

use commands::{
    command_template, source_list_option, source_parts_option, AptOperation, NONINTERACTIVE_ENV,
};
use selection::{
    has_installed_status, is_pattern_name, search_expression, search_results, selected_packages,
    NameMatcher,
};
use sources::SourcesOverride;

pub use config::AptConfig;

pub struct AptPackageManager {
    config: AptConfig,
    executor: Arc<dyn ProcessExecutor>,
}

impl Default for AptPackageManager {
    fn default() -> Self {
        Self::new(AptConfig::default())
    }
}

impl AptPackageManager {
    pub fn new(config: AptConfig) -> Self {
        let executor = Arc::new(SystemExecutor::new(config.r#become()));
        Self { config, executor }
    }

    pub fn with_executor(config: AptConfig, executor: Arc<dyn ProcessExecutor>) -> Self {
        Self { config, executor }
    }

    pub fn config(&self) -> &AptConfig {
        &self.config
    }

    /// Install `name`, or reinstall it from `use_repos` when any are given.
    ///
    /// A failed install triggers one `apt-get update` and one retry; only the
    /// retry's failure is returned. Temporary sources are removed on every
    /// path out of this function.
    pub async fn install(
        &self,
        name: &str,
        use_repos: &RepoSet,
    ) -> Result<InstallOutcome, PackageManagerError> {
        let name = normalize_package_name(name)?;

        if use_repos.is_empty() && self.package_exists(&name).await? {
            info!("Skipping installing existent package {name}");
            return Ok(InstallOutcome::Skipped);
        }

        let mut overrides = Vec::new();
        let sources = if use_repos.is_empty() {
            None
        } else {
            Some(self.prepare_sources(use_repos, &mut overrides).await?)
        };

        let log_output = self.config.log_output;
        let cmd = command_template(AptOperation::Install, log_output)
            .build(&self.config.apt_get, &overrides, &[name.as_str()])
            .elevated()
            .env(NONINTERACTIVE_ENV.0, NONINTERACTIVE_ENV.1)
            .log_output(log_output);

        let result = self.install_with_retry(&name, &cmd).await;

        let Some(sources) = sources else {
            return result;
        };
        match (result, sources.remove().await) {
            (Ok(outcome), Ok(())) => Ok(outcome),
            (Ok(_), Err(cleanup)) => Err(cleanup),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(cleanup)) => {
                warn!("Failed to remove temporary sources after failed install: {cleanup}");
                Err(e)
            }
        }
    }

    /// Same as [`install`](Self::install); apt has no separate upgrade step
    pub async fn upgrade_package(
        &self,
        name: &str,
        use_repos: &RepoSet,
    ) -> Result<InstallOutcome, PackageManagerError> {
        self.install(name, use_repos).await
    }

    pub async fn remove(&self, name: &str) -> Result<RemoveOutcome, PackageManagerError> {
        let name = normalize_package_name(name)?;

        if !self.package_exists(&name).await? {
            info!("Skipping removing non-existent package {name}");
            return Ok(RemoveOutcome::Skipped);
        }

        let log_output = self.config.log_output;
        let cmd = command_template(AptOperation::Remove, log_output)
            .build(&self.config.apt_get, &[], &[name.as_str()])
            .elevated()
            .log_output(log_output);

        info!("Removing package {name} ('{cmd}')");
        self.executor.run_checked(&cmd).await?;
        info!("Package {name} removed");
        Ok(RemoveOutcome::Removed)
    }

    /// Whether `name` is installed. Pattern names require every package the
    /// pattern matches to be fully installed.
    pub async fn check_existence(&self, name: &str) -> Result<bool, PackageManagerError> {
        let name = normalize_package_name(name)?;
        self.package_exists(&name).await
    }

    async fn package_exists(&self, name: &str) -> Result<bool, PackageManagerError> {
        let matcher = NameMatcher::for_name(name)?;

        let selections = CommandSpec::new(&self.config.dpkg).arg("--get-selections");
        let Some(result) = self.query(&selections).await else {
            return Ok(false);
        };
        if !result.success() {
            debug!("'{selections}' returned {}", result.exit_code);
            return Ok(false);
        }
        if !selected_packages(&result.output).any(|pkg| matcher.matches(pkg)) {
            return Ok(false);
        }

        if !is_pattern_name(name) {
            return Ok(true);
        }

        let search = CommandSpec::new(&self.config.apt_cache)
            .args(["--names-only", "search"])
            .arg(search_expression(name));
        let found = self.query(&search).await.unwrap_or_default();

        // An empty match list falls through to `true`.
        for package in search_results(&found.output) {
            let status = CommandSpec::new(&self.config.dpkg)
                .arg("--status")
                .arg(package);
            let installed = match self.query(&status).await {
                Some(status) => has_installed_status(&status.output),
                None => false,
            };
            if !installed {
                debug!("Package {package} matching {name} is not fully installed");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Run a read-only query. A command that cannot be started yields `None`.
    async fn query(&self, command: &CommandSpec) -> Option<CommandResult> {
        match self.executor.run(command).await {
            Ok(result) => Some(result),
            Err(e) => {
                debug!("Query '{command}' could not run: {e}");
                None
            }
        }
    }

    async fn prepare_sources(
        &self,
        use_repos: &RepoSet,
        overrides: &mut Vec<String>,
    ) -> Result<SourcesOverride, PackageManagerError> {
        let mut sources = SourcesOverride::create(self.config.temp_dir.as_deref())?;

        if !use_repos.includes_base() {
            overrides.extend(source_list_option(
                &self.config.empty_sources_file.to_string_lossy(),
            ));
        }
        for repo in use_repos.extra_repos() {
            sources
                .copy_repo(&self.config.sources_list_dir, repo)
                .await?;
        }
        overrides.extend(source_parts_option(&sources.path().to_string_lossy()));

        Ok(sources)
    }

    async fn install_with_retry(
        &self,
        name: &str,
        cmd: &CommandSpec,
    ) -> Result<InstallOutcome, PackageManagerError> {
        info!("Installing package {name} ('{cmd}')");
        let first = self.executor.run(cmd).await?;
        if first.success() {
            info!("Package {name} installed");
            return Ok(InstallOutcome::Installed { retried: false });
        }

        // The package index is usually just stale.
        info!(
            "Execution of '{cmd}' returned {}. {}",
            first.exit_code, first.output
        );
        let log_output = self.config.log_output;
        let update = command_template(AptOperation::Update, log_output)
            .build(&self.config.apt_get, &[], &[])
            .elevated()
            .log_output(log_output);
        info!("Failed to install package {name}. Executing '{update}'");
        match self.executor.run(&update).await {
            Ok(result) if !result.success() => {
                info!(
                    "Execution of '{update}' returned {}. {}",
                    result.exit_code, result.output
                );
            }
            Ok(_) => {}
            Err(e) => warn!("Repository refresh could not run: {e}"),
        }

        info!("Retrying to install package {name}");
        self.executor.run_checked(cmd).await?;
        info!("Package {name} installed");
        Ok(InstallOutcome::Installed { retried: true })
    }
}

#[async_trait]
impl PackageManager for AptPackageManager {
    async fn query_package(&self, name: &str) -> Result<PackageState, PackageManagerError> {
        if self.check_existence(name).await? {
            Ok(PackageState::Present)
        } else {
            Ok(PackageState::Absent)
        }
    }

    async fn install_package(
        &self,
        name: &str,
        use_repos: &RepoSet,
    ) -> Result<InstallOutcome, PackageManagerError> {
        self.install(name, use_repos).await
    }

    async fn upgrade_package(
        &self,
        name: &str,
        use_repos: &RepoSet,
    ) -> Result<InstallOutcome, PackageManagerError> {
        self.install(name, use_repos).await
    }

    async fn remove_package(&self, name: &str) -> Result<RemoveOutcome, PackageManagerError> {
        self.remove(name).await
    }
}
