//! apt-get command lines

use crate::modules::system::process::CommandSpec;

/// Forces apt and debconf to never prompt
pub const NONINTERACTIVE_ENV: (&str, &str) = ("DEBIAN_FRONTEND", "noninteractive");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AptOperation {
    Install,
    Remove,
    Update,
}

/// Options and operation words for one apt-get invocation.
///
/// Extra options are spliced between the two halves so source overrides
/// always precede the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    pub options: Vec<&'static str>,
    pub operation: Vec<&'static str>,
}

impl CommandTemplate {
    /// Full argument list with no extra options or operands
    pub fn args(&self) -> Vec<String> {
        self.options
            .iter()
            .chain(self.operation.iter())
            .map(|s| s.to_string())
            .collect()
    }

    pub fn build(&self, program: &str, extra_options: &[String], operands: &[&str]) -> CommandSpec {
        CommandSpec::new(program)
            .args(self.options.iter().copied())
            .args(extra_options.iter().cloned())
            .args(self.operation.iter().copied())
            .args(operands.iter().copied())
    }
}

/// Template for `operation`; `verbose` mirrors the provider's log_output flag.
pub fn command_template(operation: AptOperation, verbose: bool) -> CommandTemplate {
    match operation {
        AptOperation::Install => {
            let mut options = Vec::with_capacity(7);
            if !verbose {
                options.push("-q");
            }
            options.extend([
                "-o",
                "Dpkg::Options::=--force-confdef",
                "-o",
                "Dpkg::Options::=--force-overwrite",
                "--allow-unauthenticated",
                "--assume-yes",
            ]);
            CommandTemplate {
                options,
                operation: vec!["install"],
            }
        }
        AptOperation::Remove => CommandTemplate {
            options: if verbose { vec!["-y"] } else { vec!["-y", "-q"] },
            operation: vec!["remove"],
        },
        AptOperation::Update => CommandTemplate {
            options: Vec::new(),
            operation: vec!["update", "-qq"],
        },
    }
}

/// `-o Dir::Etc::SourceList=<file>`
pub fn source_list_option(empty_file: &str) -> [String; 2] {
    ["-o".to_string(), format!("Dir::Etc::SourceList={empty_file}")]
}

/// `-o Dir::Etc::SourceParts=<dir>`
pub fn source_parts_option(dir: &str) -> [String; 2] {
    ["-o".to_string(), format!("Dir::Etc::SourceParts={dir}")]
}
