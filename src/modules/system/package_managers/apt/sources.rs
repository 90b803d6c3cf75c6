//! Temporary apt source directories for per-call repository overrides

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::info;

use crate::modules::error::PackageManagerError;

pub const TEMP_DIR_SUFFIX: &str = "-rustle-apt-sources-d";

/// A temporary `Dir::Etc::SourceParts` directory holding copied `.list` files.
///
/// Call [`SourcesOverride::remove`] to tear it down and observe failures. If
/// the value is dropped first, the directory is removed recursively and
/// errors are ignored.
#[derive(Debug)]
pub struct SourcesOverride {
    dir: TempDir,
    copied: Vec<PathBuf>,
}

impl SourcesOverride {
    pub fn create(temp_root: Option<&Path>) -> Result<Self, PackageManagerError> {
        let mut builder = tempfile::Builder::new();
        builder.suffix(TEMP_DIR_SUFFIX);
        let dir = match temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|source| PackageManagerError::SourcesIo {
            operation: "create",
            path: temp_root
                .map(Path::to_path_buf)
                .unwrap_or_else(std::env::temp_dir),
            source,
        })?;

        info!(
            "Temporary sources directory was created: {}",
            dir.path().display()
        );
        Ok(Self {
            dir,
            copied: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn copied_files(&self) -> &[PathBuf] {
        &self.copied
    }

    /// Copy `<sources_list_dir>/<repo>.list` into the override directory
    pub async fn copy_repo(
        &mut self,
        sources_list_dir: &Path,
        repo: &str,
    ) -> Result<PathBuf, PackageManagerError> {
        let file_name = format!("{repo}.list");
        let source = sources_list_dir.join(&file_name);
        let target = self.dir.path().join(&file_name);

        info!("Temporary sources file will be copied: {}", target.display());
        if let Err(e) = tokio::fs::copy(&source, &target).await {
            return Err(PackageManagerError::SourcesIo {
                operation: "copy",
                path: source,
                source: e,
            });
        }

        self.copied.push(target.clone());
        Ok(target)
    }

    /// Remove every copied file, then the directory itself
    pub async fn remove(mut self) -> Result<(), PackageManagerError> {
        for file in std::mem::take(&mut self.copied) {
            info!("Removing temporary sources file: {}", file.display());
            tokio::fs::remove_file(&file)
                .await
                .map_err(|source| PackageManagerError::SourcesIo {
                    operation: "remove",
                    path: file.clone(),
                    source,
                })?;
        }

        let dir = self.dir.path().to_path_buf();
        info!("Removing temporary sources directory: {}", dir.display());
        match tokio::fs::remove_dir(&dir).await {
            Ok(()) => Ok(()),
            Err(source) => Err(PackageManagerError::SourcesIo {
                operation: "remove",
                path: dir,
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_copy_and_remove() {
        let sources = tempdir().unwrap();
        std::fs::write(sources.path().join("custom.list"), "deb http://repo/ stable main\n").unwrap();
        let root = tempdir().unwrap();

        let mut over = SourcesOverride::create(Some(root.path())).unwrap();
        let dir = over.path().to_path_buf();
        assert!(dir.starts_with(root.path()));
        assert!(dir.to_string_lossy().ends_with(TEMP_DIR_SUFFIX));

        let copied = over.copy_repo(sources.path(), "custom").await.unwrap();
        assert_eq!(
            std::fs::read_to_string(&copied).unwrap(),
            "deb http://repo/ stable main\n"
        );
        assert_eq!(over.copied_files(), &[copied.clone()]);

        over.remove().await.unwrap();
        assert!(!copied.exists());
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_missing_repo_file_is_error_and_drop_cleans_up() {
        let sources = tempdir().unwrap();
        let root = tempdir().unwrap();

        let mut over = SourcesOverride::create(Some(root.path())).unwrap();
        let dir = over.path().to_path_buf();
        let err = over.copy_repo(sources.path(), "missing").await.unwrap_err();
        assert!(matches!(
            err,
            PackageManagerError::SourcesIo { operation: "copy", .. }
        ));

        drop(over);
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_remove_fails_when_directory_has_foreign_files() {
        let root = tempdir().unwrap();
        let over = SourcesOverride::create(Some(root.path())).unwrap();
        let dir = over.path().to_path_buf();
        std::fs::write(dir.join("stray.list"), "").unwrap();

        let err = over.remove().await.unwrap_err();
        assert!(matches!(err, PackageManagerError::SourcesIo { .. }));
        // the guard still swept the directory when it went out of scope
        assert!(!dir.exists());
    }
}
