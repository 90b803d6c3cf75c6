//! Package manager implementations

use crate::modules::error::PackageManagerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod apt;

pub use apt::{AptConfig, AptPackageManager};

/// Repository sentinel meaning "keep the default source list too"
pub const BASE_REPO: &str = "base";

#[derive(Debug, Clone, PartialEq, Copy)]
pub enum PackageState {
    Present,
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The package manager ran; `retried` is set when the first attempt failed
    Installed { retried: bool },
    /// Already installed and no repository override was requested
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// Nothing to remove
    Skipped,
}

#[async_trait]
pub trait PackageManager: Send + Sync {
    async fn query_package(&self, name: &str) -> Result<PackageState, PackageManagerError>;

    async fn install_package(
        &self,
        name: &str,
        use_repos: &RepoSet,
    ) -> Result<InstallOutcome, PackageManagerError>;

    async fn upgrade_package(
        &self,
        name: &str,
        use_repos: &RepoSet,
    ) -> Result<InstallOutcome, PackageManagerError>;

    async fn remove_package(&self, name: &str) -> Result<RemoveOutcome, PackageManagerError>;
}

/// Package names reach the package manager with underscores as hyphens.
pub fn normalize_package_name(name: &str) -> Result<String, PackageManagerError> {
    let normalized = name.replace('_', "-");
    if normalized.trim().is_empty() {
        return Err(PackageManagerError::InvalidPackageName {
            name: name.to_string(),
        });
    }
    Ok(normalized)
}

/// Ordered set of repository identifiers for a single install call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RepoSet {
    repos: Vec<String>,
}

impl RepoSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, repo: impl Into<String>) -> bool {
        let repo = repo.into();
        if repo.is_empty() || self.repos.contains(&repo) {
            return false;
        }
        self.repos.push(repo);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn contains(&self, repo: &str) -> bool {
        self.repos.iter().any(|r| r == repo)
    }

    pub fn includes_base(&self) -> bool {
        self.contains(BASE_REPO)
    }

    /// Repositories whose definition files need copying
    pub fn extra_repos(&self) -> impl Iterator<Item = &str> {
        self.repos
            .iter()
            .map(String::as_str)
            .filter(|r| *r != BASE_REPO)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.repos.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RepoSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = RepoSet::new();
        for repo in iter {
            set.insert(repo);
        }
        set
    }
}

impl From<Vec<String>> for RepoSet {
    fn from(repos: Vec<String>) -> Self {
        repos.into_iter().collect()
    }
}

impl From<RepoSet> for Vec<String> {
    fn from(set: RepoSet) -> Self {
        set.repos
    }
}
