//! Module interface traits and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::modules::error::{ModuleExecutionError, ValidationError};

/// Unified interface for all execution modules
#[async_trait]
pub trait ExecutionModule: Send + Sync {
    /// Module name (e.g., "apt")
    fn name(&self) -> &'static str;

    /// Module version
    fn version(&self) -> &'static str;

    /// Supported platforms
    fn supported_platforms(&self) -> &[Platform];

    /// Execute the module with given arguments
    async fn execute(
        &self,
        args: &ModuleArgs,
        context: &ExecutionContext,
    ) -> Result<ModuleResult, ModuleExecutionError>;

    /// Validate module arguments before execution
    fn validate_args(&self, args: &ModuleArgs) -> Result<(), ValidationError>;

    /// Check if module operation would make changes (dry-run)
    async fn check_mode(
        &self,
        args: &ModuleArgs,
        context: &ExecutionContext,
    ) -> Result<ModuleResult, ModuleExecutionError>;

    /// Get module documentation
    fn documentation(&self) -> ModuleDocumentation;
}

/// Module execution arguments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleArgs {
    /// Direct module arguments
    pub args: HashMap<String, serde_json::Value>,
    /// Special parameters
    #[serde(default)]
    pub special: SpecialParameters,
}

impl ModuleArgs {
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecialParameters {
    pub r#become: Option<BecomeConfig>,
    pub check_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BecomeConfig {
    pub method: String, // sudo, doas, etc.
    pub flags: Vec<String>,
}

impl Default for BecomeConfig {
    fn default() -> Self {
        Self {
            method: "sudo".to_string(),
            flags: Vec::new(),
        }
    }
}

/// Module execution context
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub host_info: HostInfo,
    pub check_mode: bool,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self {
            host_info: HostInfo::detect(),
            check_mode: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HostInfo {
    pub platform: Platform,
}

impl HostInfo {
    pub fn detect() -> Self {
        let platform = if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "freebsd") {
            Platform::FreeBSD
        } else {
            Platform::Linux // Default fallback
        };

        Self { platform }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    MacOS,
    Windows,
    FreeBSD,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Linux => "linux",
            Platform::MacOS => "macos",
            Platform::Windows => "windows",
            Platform::FreeBSD => "freebsd",
        };
        f.write_str(name)
    }
}

/// Module execution result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleResult {
    pub changed: bool,
    pub failed: bool,
    pub msg: Option<String>,
    pub rc: Option<i32>,
    pub results: HashMap<String, serde_json::Value>,
}

/// Module documentation
#[derive(Debug, Clone)]
pub struct ModuleDocumentation {
    pub description: String,
    pub arguments: Vec<ArgumentSpec>,
    pub examples: Vec<String>,
    pub return_values: Vec<ReturnValueSpec>,
}

#[derive(Debug, Clone)]
pub struct ArgumentSpec {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub argument_type: String,
    pub default: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReturnValueSpec {
    pub name: String,
    pub description: String,
    pub returned: String,
    pub value_type: String,
}
