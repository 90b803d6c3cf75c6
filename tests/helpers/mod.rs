//! Shared fixtures for apt provider tests
#![allow(dead_code)]

use async_trait::async_trait;
use rustle_apt::{
    AptConfig, AptPackageManager, CommandResult, CommandSpec, PackageManagerError,
    ProcessExecutor,
};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

type Observer = Box<dyn FnMut(&CommandSpec) + Send>;

struct Rule {
    needle: String,
    responses: VecDeque<CommandResult>,
}

/// Records every command and answers from scripted responses.
///
/// A rule matches when its needle occurs in the rendered command line; the
/// first matching rule wins. Queued responses are consumed in order and the
/// last one repeats. Unmatched commands succeed with empty output.
/// Commands registered with [`MockExecutor::fail_to_spawn`] never start.
#[derive(Default)]
pub struct MockExecutor {
    calls: Mutex<Vec<CommandSpec>>,
    rules: Mutex<Vec<Rule>>,
    unstartable: Mutex<Vec<String>>,
    observer: Mutex<Option<Observer>>,
}

impl MockExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, needle: &str, exit_code: i32, output: &str) {
        let mut rules = self.rules.lock().unwrap();
        let response = CommandResult::new(exit_code, output);
        match rules.iter_mut().find(|r| r.needle == needle) {
            Some(rule) => rule.responses.push_back(response),
            None => rules.push(Rule {
                needle: needle.to_string(),
                responses: VecDeque::from([response]),
            }),
        }
    }

    /// Commands containing `needle` fail to start, like a missing binary
    pub fn fail_to_spawn(&self, needle: &str) {
        self.unstartable.lock().unwrap().push(needle.to_string());
    }

    pub fn observe(&self, observer: impl FnMut(&CommandSpec) + Send + 'static) {
        *self.observer.lock().unwrap() = Some(Box::new(observer));
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    pub fn calls_matching(&self, needle: &str) -> Vec<CommandSpec> {
        self.calls()
            .into_iter()
            .filter(|c| c.to_string().contains(needle))
            .collect()
    }
}

#[async_trait]
impl ProcessExecutor for MockExecutor {
    async fn run(&self, command: &CommandSpec) -> Result<CommandResult, PackageManagerError> {
        self.calls.lock().unwrap().push(command.clone());
        if let Some(observer) = self.observer.lock().unwrap().as_mut() {
            observer(command);
        }

        let line = command.to_string();
        if self
            .unstartable
            .lock()
            .unwrap()
            .iter()
            .any(|needle| line.contains(needle.as_str()))
        {
            return Err(PackageManagerError::Spawn {
                command: line,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
            });
        }

        let mut rules = self.rules.lock().unwrap();
        let result = rules
            .iter_mut()
            .find(|r| line.contains(&r.needle))
            .map(|rule| {
                if rule.responses.len() > 1 {
                    rule.responses.pop_front().unwrap_or_default()
                } else {
                    rule.responses.front().cloned().unwrap_or_default()
                }
            })
            .unwrap_or_default();
        Ok(result)
    }
}

pub const INSTALL: &str = " install ";
pub const REMOVE: &str = " remove ";
pub const UPDATE: &str = " update";
pub const SELECTIONS: &str = "--get-selections";
pub const SEARCH: &str = "--names-only search";

/// `dpkg --get-selections` output for the given (name, state) pairs
pub fn selections(entries: &[(&str, &str)]) -> String {
    entries
        .iter()
        .map(|(name, state)| format!("{name}\t\t\t\t\t{state}\n"))
        .collect()
}

pub fn installed_status(name: &str) -> String {
    format!("Package: {name}\nStatus: install ok installed\nPriority: optional\n")
}

/// An apt provider wired to a mock executor and sandboxed directories
pub struct AptFixture {
    pub executor: Arc<MockExecutor>,
    pub apt: AptPackageManager,
    pub sources_dir: TempDir,
    pub temp_root: TempDir,
}

impl AptFixture {
    pub fn new() -> Self {
        Self::with_config(AptConfig::default())
    }

    pub fn with_config(config: AptConfig) -> Self {
        let sources_dir = tempdir().expect("Failed to create sources directory");
        let temp_root = tempdir().expect("Failed to create temp root");
        let config = AptConfig {
            sources_list_dir: sources_dir.path().to_path_buf(),
            temp_dir: Some(temp_root.path().to_path_buf()),
            ..config
        };
        let executor = MockExecutor::new();
        let apt = AptPackageManager::with_executor(config, executor.clone());
        Self {
            executor,
            apt,
            sources_dir,
            temp_root,
        }
    }

    pub fn add_repo(&self, repo: &str) -> PathBuf {
        let path = self.sources_dir.path().join(format!("{repo}.list"));
        std::fs::write(&path, format!("deb http://repo.example/{repo} stable main\n"))
            .expect("Failed to write repo file");
        path
    }

    pub fn temp_root_entries(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.temp_root.path())
            .expect("Failed to read temp root")
            .map(|e| e.expect("bad dir entry").path())
            .collect()
    }
}
