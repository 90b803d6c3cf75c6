//! Package module - manages Debian packages through apt

use async_trait::async_trait;

use crate::modules::{
    error::{ModuleExecutionError, ValidationError},
    interface::{
        ArgumentSpec, ExecutionContext, ExecutionModule, ModuleArgs, ModuleDocumentation,
        ModuleResult, Platform, ReturnValueSpec,
    },
    system::package_managers::{
        normalize_package_name, AptConfig, AptPackageManager, InstallOutcome, PackageManager,
        PackageState, RemoveOutcome, RepoSet,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesiredState {
    Present,
    Latest,
    Absent,
}

impl DesiredState {
    fn parse(state: &str) -> Result<Self, ValidationError> {
        match state {
            "present" | "installed" => Ok(DesiredState::Present),
            "latest" => Ok(DesiredState::Latest),
            "absent" | "removed" => Ok(DesiredState::Absent),
            other => Err(ValidationError::InvalidArgValue {
                arg: "state".to_string(),
                value: other.to_string(),
                reason: "expected present, installed, latest, absent or removed".to_string(),
            }),
        }
    }
}

/// Parsed arguments of the apt module
#[derive(Debug, Clone, PartialEq)]
pub struct PackageArgs {
    pub name: String,
    pub state: DesiredState,
    pub use_repos: RepoSet,
}

impl PackageArgs {
    pub fn from_module_args(args: &ModuleArgs) -> Result<Self, ValidationError> {
        let name = match args.args.get("name") {
            Some(value) => value
                .as_str()
                .ok_or_else(|| ValidationError::InvalidArgValue {
                    arg: "name".to_string(),
                    value: value.to_string(),
                    reason: "name must be a string".to_string(),
                })?
                .to_string(),
            None => {
                return Err(ValidationError::MissingRequiredArg {
                    arg: "name".to_string(),
                })
            }
        };

        let state = DesiredState::parse(args.get_str("state").unwrap_or("present"))?;

        let use_repos = match args.args.get("use_repos") {
            None | Some(serde_json::Value::Null) => RepoSet::new(),
            Some(serde_json::Value::String(list)) => {
                list.split(',').map(str::trim).filter(|r| !r.is_empty()).collect()
            }
            Some(serde_json::Value::Array(items)) => {
                let mut repos = RepoSet::new();
                for item in items {
                    let repo = item.as_str().ok_or_else(|| ValidationError::InvalidArgValue {
                        arg: "use_repos".to_string(),
                        value: item.to_string(),
                        reason: "repository identifiers must be strings".to_string(),
                    })?;
                    repos.insert(repo);
                }
                repos
            }
            Some(other) => {
                return Err(ValidationError::InvalidArgValue {
                    arg: "use_repos".to_string(),
                    value: other.to_string(),
                    reason: "use_repos must be a list or a comma-separated string".to_string(),
                })
            }
        };

        Ok(Self {
            name,
            state,
            use_repos,
        })
    }
}

/// Package module - manages system packages
pub struct PackageModule {
    manager: Box<dyn PackageManager>,
}

impl Default for PackageModule {
    fn default() -> Self {
        Self::new(AptConfig::default())
    }
}

impl PackageModule {
    pub fn new(config: AptConfig) -> Self {
        Self::with_manager(Box::new(AptPackageManager::new(config)))
    }

    pub fn with_manager(manager: Box<dyn PackageManager>) -> Self {
        Self { manager }
    }

    fn result(changed: bool, msg: String) -> ModuleResult {
        ModuleResult {
            changed,
            failed: false,
            msg: Some(msg),
            rc: Some(0),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ExecutionModule for PackageModule {
    fn name(&self) -> &'static str {
        "apt"
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn supported_platforms(&self) -> &[Platform] {
        &[Platform::Linux]
    }

    async fn execute(
        &self,
        args: &ModuleArgs,
        context: &ExecutionContext,
    ) -> Result<ModuleResult, ModuleExecutionError> {
        if !self.supported_platforms().contains(&context.host_info.platform) {
            return Err(ModuleExecutionError::UnsupportedPlatform(
                context.host_info.platform.clone(),
            ));
        }

        if context.check_mode || args.special.check_mode {
            return self.check_mode(args, context).await;
        }

        let PackageArgs {
            name,
            state,
            use_repos,
        } = PackageArgs::from_module_args(args)?;

        let result = match state {
            DesiredState::Present | DesiredState::Latest => {
                let outcome = if state == DesiredState::Latest {
                    self.manager.upgrade_package(&name, &use_repos).await?
                } else {
                    self.manager.install_package(&name, &use_repos).await?
                };
                match outcome {
                    InstallOutcome::Skipped => {
                        Self::result(false, format!("Package {name} is already installed"))
                    }
                    InstallOutcome::Installed { retried } => {
                        let mut result =
                            Self::result(true, format!("Package {name} installed"));
                        result
                            .results
                            .insert("retried".to_string(), serde_json::json!(retried));
                        result
                    }
                }
            }
            DesiredState::Absent => match self.manager.remove_package(&name).await? {
                RemoveOutcome::Skipped => {
                    Self::result(false, format!("Package {name} is not installed"))
                }
                RemoveOutcome::Removed => Self::result(true, format!("Package {name} removed")),
            },
        };

        Ok(result)
    }

    fn validate_args(&self, args: &ModuleArgs) -> Result<(), ValidationError> {
        let parsed = PackageArgs::from_module_args(args)?;
        normalize_package_name(&parsed.name).map_err(|e| ValidationError::InvalidArgValue {
            arg: "name".to_string(),
            value: parsed.name.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    async fn check_mode(
        &self,
        args: &ModuleArgs,
        _context: &ExecutionContext,
    ) -> Result<ModuleResult, ModuleExecutionError> {
        let PackageArgs {
            name,
            state,
            use_repos,
        } = PackageArgs::from_module_args(args)?;

        let current = self.manager.query_package(&name).await?;
        let (changed, msg) = match state {
            DesiredState::Present | DesiredState::Latest => {
                if current == PackageState::Present && use_repos.is_empty() {
                    (false, format!("Package {name} is already installed"))
                } else {
                    (true, format!("Package {name} would be installed"))
                }
            }
            DesiredState::Absent => {
                if current == PackageState::Present {
                    (true, format!("Package {name} would be removed"))
                } else {
                    (false, format!("Package {name} is not installed"))
                }
            }
        };

        Ok(ModuleResult {
            rc: None,
            ..Self::result(changed, msg)
        })
    }

    fn documentation(&self) -> ModuleDocumentation {
        ModuleDocumentation {
            description: "Manage Debian packages with apt-get".to_string(),
            arguments: vec![
                ArgumentSpec {
                    name: "name".to_string(),
                    description: "Package name. '*' and '.' make it a pattern that must be fully installed to count as present. Underscores are treated as hyphens."
                        .to_string(),
                    required: true,
                    argument_type: "str".to_string(),
                    default: None,
                },
                ArgumentSpec {
                    name: "state".to_string(),
                    description: "present/installed, latest, or absent/removed".to_string(),
                    required: false,
                    argument_type: "str".to_string(),
                    default: Some("present".to_string()),
                },
                ArgumentSpec {
                    name: "use_repos".to_string(),
                    description: "Install only from these repositories in sources.list.d; include 'base' to keep the default sources"
                        .to_string(),
                    required: false,
                    argument_type: "list".to_string(),
                    default: None,
                },
            ],
            examples: vec![
                r#"apt:
    name: hadoop_client
    state: present"#
                    .to_string(),
                r#"apt:
    name: hdp-select
    use_repos: [HDP, base]"#
                    .to_string(),
            ],
            return_values: vec![
                ReturnValueSpec {
                    name: "msg".to_string(),
                    description: "A short description of what happened".to_string(),
                    returned: "always".to_string(),
                    value_type: "str".to_string(),
                },
                ReturnValueSpec {
                    name: "retried".to_string(),
                    description: "Whether the install needed an index refresh and a second attempt"
                        .to_string(),
                    returned: "when installed".to_string(),
                    value_type: "bool".to_string(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn args(pairs: &[(&str, serde_json::Value)]) -> ModuleArgs {
        ModuleArgs {
            args: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<HashMap<_, _>>(),
            special: Default::default(),
        }
    }

    #[test]
    fn test_parse_defaults_to_present() {
        let parsed = PackageArgs::from_module_args(&args(&[("name", json!("vim"))])).unwrap();
        assert_eq!(parsed.state, DesiredState::Present);
        assert!(parsed.use_repos.is_empty());
    }

    #[test]
    fn test_parse_use_repos_list_and_string() {
        let from_list = PackageArgs::from_module_args(&args(&[
            ("name", json!("vim")),
            ("use_repos", json!(["custom", "base"])),
        ]))
        .unwrap();
        let from_string = PackageArgs::from_module_args(&args(&[
            ("name", json!("vim")),
            ("use_repos", json!("custom, base")),
        ]))
        .unwrap();
        assert_eq!(from_list.use_repos, from_string.use_repos);
        assert!(from_list.use_repos.includes_base());
    }

    #[test]
    fn test_parse_rejects_missing_name_and_bad_state() {
        assert!(matches!(
            PackageArgs::from_module_args(&args(&[])),
            Err(ValidationError::MissingRequiredArg { .. })
        ));
        assert!(matches!(
            PackageArgs::from_module_args(&args(&[
                ("name", json!("vim")),
                ("state", json!("purged"))
            ])),
            Err(ValidationError::InvalidArgValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let module = PackageModule::default();
        assert!(module.validate_args(&args(&[("name", json!(""))])).is_err());
        assert!(module.validate_args(&args(&[("name", json!("vim"))])).is_ok());
    }
}
