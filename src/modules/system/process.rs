//! External process execution for package manager providers

use async_trait::async_trait;
use std::fmt;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::modules::error::PackageManagerError;
use crate::modules::interface::BecomeConfig;

/// A fully-specified external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Run with elevated privileges when the agent is not root
    pub elevated: bool,
    pub env: Vec<(String, String)>,
    /// Echo captured output at info level instead of debug
    pub log_output: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            elevated: false,
            env: Vec::new(),
            log_output: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn elevated(mut self) -> Self {
        self.elevated = true;
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn log_output(mut self, log_output: bool) -> Self {
        self.log_output = log_output;
        self
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&shell_words::join(self.argv()))
    }
}

/// Exit code and combined output of a finished command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResult {
    pub exit_code: i32,
    pub output: String,
}

impl CommandResult {
    pub fn new(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    /// Run a command to completion. A non-zero exit is not an error here.
    async fn run(&self, command: &CommandSpec) -> Result<CommandResult, PackageManagerError>;

    /// Run a command and fail on a non-zero exit code
    async fn run_checked(
        &self,
        command: &CommandSpec,
    ) -> Result<CommandResult, PackageManagerError> {
        let result = self.run(command).await?;
        if result.success() {
            Ok(result)
        } else {
            Err(PackageManagerError::CommandFailed {
                command: command.to_string(),
                exit_code: result.exit_code,
                output: result.output,
            })
        }
    }
}

/// Executes commands on the local host through `tokio::process`
#[derive(Debug, Clone, Default)]
pub struct SystemExecutor {
    r#become: BecomeConfig,
}

impl SystemExecutor {
    pub fn new(r#become: BecomeConfig) -> Self {
        Self { r#become }
    }

    /// Final argv, wrapped in the become method when elevation is needed.
    ///
    /// Environment variables do not survive `sudo`, so they are passed
    /// through `env` inside the elevated command.
    fn effective_argv(&self, command: &CommandSpec, as_root: bool) -> Vec<String> {
        let mut argv = Vec::new();
        if command.elevated && !as_root {
            argv.push(self.r#become.method.clone());
            argv.extend(self.r#become.flags.iter().cloned());
            if !command.env.is_empty() {
                argv.push("env".to_string());
                argv.extend(command.env.iter().map(|(k, v)| format!("{k}={v}")));
            }
        }
        argv.extend(command.argv().into_iter().map(String::from));
        argv
    }
}

#[async_trait]
impl ProcessExecutor for SystemExecutor {
    async fn run(&self, command: &CommandSpec) -> Result<CommandResult, PackageManagerError> {
        let as_root = running_as_root();
        let argv = self.effective_argv(command, as_root);

        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in &command.env {
            cmd.env(key, value);
        }

        let output = cmd
            .output()
            .await
            .map_err(|source| PackageManagerError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let exit_code = output.status.code().unwrap_or(-1);
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        for line in text.lines() {
            if command.log_output {
                info!("{line}");
            } else {
                debug!("{line}");
            }
        }

        Ok(CommandResult::new(exit_code, text))
    }
}

#[cfg(unix)]
fn running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

#[cfg(not(unix))]
fn running_as_root() -> bool {
    false
}
