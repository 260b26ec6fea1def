// ABOUTME: Hooks system for deployment lifecycle events.
// ABOUTME: Discovers and executes shell scripts at pre-deploy, post-deploy, and on-error points.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::config::Environment;
use crate::strategy::DeploymentInfo;
use crate::types::{AppName, FoundationUrl, Operation};

/// Hook execution points in the deployment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPoint {
    /// Before deployment starts. Failure aborts deployment.
    PreDeploy,
    /// After successful deployment. Failure logs warning.
    PostDeploy,
    /// On deployment failure. Failure logs warning.
    OnError,
}

impl HookPoint {
    /// Get the hook filename for this point.
    pub fn filename(&self) -> &'static str {
        match self {
            HookPoint::PreDeploy => "pre-deploy",
            HookPoint::PostDeploy => "post-deploy",
            HookPoint::OnError => "on-error",
        }
    }

    /// Whether failure at this hook point should abort deployment.
    pub fn is_fatal(&self) -> bool {
        matches!(self, HookPoint::PreDeploy)
    }
}

/// Context passed to hooks via environment variables.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub operation: Operation,
    pub app: AppName,
    pub environment: String,
    pub foundations: Vec<FoundationUrl>,
    pub org: String,
    pub space: String,
    pub error: Option<String>,
}

impl HookContext {
    pub fn new(
        operation: Operation,
        info: &DeploymentInfo,
        environment: &Environment,
    ) -> Self {
        Self {
            operation,
            app: info.app.clone(),
            environment: environment.name.clone(),
            foundations: environment.foundations.iter().cloned().collect(),
            org: info.org.clone(),
            space: info.space.clone(),
            error: None,
        }
    }

    /// Attach the failure an on-error hook is reacting to.
    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }

    /// Convert context to environment variables.
    pub fn to_env(&self) -> HashMap<String, String> {
        let foundations = self
            .foundations
            .iter()
            .map(FoundationUrl::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let mut env = HashMap::new();
        env.insert(
            "CFDEPLOY_OPERATION".to_string(),
            self.operation.to_string(),
        );
        env.insert("CFDEPLOY_APP".to_string(), self.app.to_string());
        env.insert(
            "CFDEPLOY_ENVIRONMENT".to_string(),
            self.environment.clone(),
        );
        env.insert("CFDEPLOY_FOUNDATIONS".to_string(), foundations);
        env.insert("CFDEPLOY_ORG".to_string(), self.org.clone());
        env.insert("CFDEPLOY_SPACE".to_string(), self.space.clone());
        if let Some(ref error) = self.error {
            env.insert("CFDEPLOY_ERROR".to_string(), error.clone());
        }
        env
    }
}

/// Result of running a hook.
#[derive(Debug)]
pub struct HookResult {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Discovers and runs hooks from a project directory.
pub struct HookRunner {
    hooks_dir: PathBuf,
}

impl HookRunner {
    /// Create a new hook runner looking for hooks in the given project directory.
    pub fn new(project_dir: &Path) -> Self {
        Self {
            hooks_dir: project_dir.join(".cfdeploy").join("hooks"),
        }
    }

    /// Check if a hook exists for the given point.
    pub fn hook_exists(&self, point: HookPoint) -> bool {
        self.hook_path(point).is_file()
    }

    /// Get the path to a hook script.
    fn hook_path(&self, point: HookPoint) -> PathBuf {
        self.hooks_dir.join(point.filename())
    }

    /// Run a hook if it exists.
    ///
    /// Returns None if the hook doesn't exist, or Some(HookResult) if it was run.
    pub async fn run(&self, point: HookPoint, context: &HookContext) -> Option<HookResult> {
        let hook_path = self.hook_path(point);

        if !hook_path.is_file() {
            return None;
        }

        tracing::info!("Running {} hook: {}", point.filename(), hook_path.display());

        let env_vars = context.to_env();

        let output = Command::new(&hook_path)
            .envs(&env_vars)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        match output {
            Ok(output) => {
                let result = HookResult {
                    success: output.status.success(),
                    exit_code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                };

                if result.success {
                    tracing::info!("{} hook completed successfully", point.filename());
                } else {
                    tracing::warn!(
                        "{} hook failed with exit code {:?}",
                        point.filename(),
                        result.exit_code
                    );
                }

                Some(result)
            }
            Err(e) => {
                tracing::error!("Failed to execute {} hook: {}", point.filename(), e);
                Some(HookResult {
                    success: false,
                    exit_code: None,
                    stdout: String::new(),
                    stderr: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_point_filenames() {
        assert_eq!(HookPoint::PreDeploy.filename(), "pre-deploy");
        assert_eq!(HookPoint::PostDeploy.filename(), "post-deploy");
        assert_eq!(HookPoint::OnError.filename(), "on-error");
    }

    #[test]
    fn pre_deploy_is_fatal() {
        assert!(HookPoint::PreDeploy.is_fatal());
        assert!(!HookPoint::PostDeploy.is_fatal());
        assert!(!HookPoint::OnError.is_fatal());
    }

    fn context() -> HookContext {
        HookContext {
            operation: Operation::Push,
            app: AppName::new("orders").unwrap(),
            environment: "production".to_string(),
            foundations: vec![
                FoundationUrl::parse("https://api.east.example.com").unwrap(),
                FoundationUrl::parse("https://api.west.example.com").unwrap(),
            ],
            org: "payments".to_string(),
            space: "live".to_string(),
            error: None,
        }
    }

    #[test]
    fn hook_context_to_env() {
        let env = context().to_env();
        assert_eq!(env.get("CFDEPLOY_OPERATION"), Some(&"push".to_string()));
        assert_eq!(env.get("CFDEPLOY_APP"), Some(&"orders".to_string()));
        assert_eq!(
            env.get("CFDEPLOY_ENVIRONMENT"),
            Some(&"production".to_string())
        );
        assert_eq!(
            env.get("CFDEPLOY_FOUNDATIONS"),
            Some(&"https://api.east.example.com,https://api.west.example.com".to_string())
        );
        assert_eq!(env.get("CFDEPLOY_ORG"), Some(&"payments".to_string()));
        assert_eq!(env.get("CFDEPLOY_SPACE"), Some(&"live".to_string()));
        assert!(!env.contains_key("CFDEPLOY_ERROR"));
    }

    #[test]
    fn hook_context_with_error() {
        let env = context().with_error("push failed: boom").to_env();
        assert_eq!(
            env.get("CFDEPLOY_ERROR"),
            Some(&"push failed: boom".to_string())
        );
    }

    #[test]
    fn hook_runner_checks_hooks_dir() {
        let runner = HookRunner::new(Path::new("/nonexistent"));
        assert!(!runner.hook_exists(HookPoint::PreDeploy));
    }
}
