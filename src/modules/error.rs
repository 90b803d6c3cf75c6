use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during module operations
#[derive(Error, Debug)]
pub enum ModuleError {
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(crate::modules::interface::Platform),

    #[error("Package manager error: {0}")]
    PackageManager(#[from] PackageManagerError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Errors that can occur during module argument validation
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required argument: {arg}")]
    MissingRequiredArg { arg: String },

    #[error("Invalid argument value: {arg} = {value} - {reason}")]
    InvalidArgValue {
        arg: String,
        value: String,
        reason: String,
    },
}

/// Module execution error
pub type ModuleExecutionError = ModuleError;

/// Package manager specific errors
#[derive(Error, Debug)]
pub enum PackageManagerError {
    #[error("Invalid package name: '{name}'")]
    InvalidPackageName { name: String },

    #[error("Invalid package pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Execution of '{command}' returned {exit_code}. {output}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        output: String,
    },

    #[error("Failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Sources override failed to {operation} '{}': {source}", .path.display())]
    SourcesIo {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PackageManagerError {
    /// Exit code of the failed external command, if this error came from one
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            PackageManagerError::CommandFailed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PackageManagerError {
    fn from(err: serde_json::Error) -> Self {
        PackageManagerError::Config {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for PackageManagerError {
    fn from(err: serde_yaml::Error) -> Self {
        PackageManagerError::Config {
            message: err.to_string(),
        }
    }
}
