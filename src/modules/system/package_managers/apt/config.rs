use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::modules::error::PackageManagerError;
use crate::modules::interface::BecomeConfig;

/// Settings for the APT provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AptConfig {
    pub apt_get: String,
    pub apt_cache: String,
    pub dpkg: String,
    /// Where `<repo>.list` definitions are copied from
    pub sources_list_dir: PathBuf,
    /// Stands in for the main sources.list when `base` is not requested
    pub empty_sources_file: PathBuf,
    /// Parent for temporary source directories; system temp dir when unset
    pub temp_dir: Option<PathBuf>,
    pub become_method: String,
    pub become_flags: Vec<String>,
    /// Selects the verbose command templates and echoes command output
    pub log_output: bool,
}

impl Default for AptConfig {
    fn default() -> Self {
        Self {
            apt_get: "/usr/bin/apt-get".to_string(),
            apt_cache: "apt-cache".to_string(),
            dpkg: "dpkg".to_string(),
            sources_list_dir: PathBuf::from("/etc/apt/sources.list.d"),
            empty_sources_file: PathBuf::from("/dev/null"),
            temp_dir: None,
            become_method: "sudo".to_string(),
            become_flags: Vec::new(),
            log_output: false,
        }
    }
}

impl AptConfig {
    /// Load from a YAML or JSON file, chosen by extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PackageManagerError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| PackageManagerError::Config {
                message: format!("failed to read {}: {e}", path.display()),
            })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(serde_json::from_str(&contents)?),
            Some("yml") | Some("yaml") => Ok(serde_yaml::from_str(&contents)?),
            other => Err(PackageManagerError::Config {
                message: format!(
                    "unsupported config format {:?} for {}",
                    other.unwrap_or(""),
                    path.display()
                ),
            }),
        }
    }

    pub fn with_log_output(mut self, log_output: bool) -> Self {
        self.log_output = log_output;
        self
    }

    pub fn r#become(&self) -> BecomeConfig {
        BecomeConfig {
            method: self.become_method.clone(),
            flags: self.become_flags.clone(),
        }
    }
}
