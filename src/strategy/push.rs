// ABOUTME: Blue-green push of a new app version to every foundation.
// ABOUTME: Parks the running version as venerable, pushes, maps routes, then deletes or restores it.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Environment;
use crate::courier::CourierFactory;
use crate::deploy::{Action, ActionCreator, ActionError, DeployError, OutputBuffer};
use crate::types::{AppName, FoundationUrl, Operation};

use super::target::Target;
use super::{CreatorContext, DeploymentInfo};

/// Push-specific settings.
#[derive(Debug, Clone)]
pub struct PushOptions {
    /// Directory or archive handed to the platform.
    pub artifact: PathBuf,
    /// Overrides the environment's default instance count.
    pub instances: Option<u16>,
    /// Route hostname on the environment's domain; defaults to the app name.
    pub hostname: Option<String>,
}

/// Creates a `PushAction` per foundation.
#[derive(Debug)]
pub struct PushCreator {
    context: CreatorContext,
    options: PushOptions,
}

impl PushCreator {
    pub fn new(
        factory: Arc<dyn CourierFactory>,
        info: DeploymentInfo,
        options: PushOptions,
    ) -> Self {
        Self {
            context: CreatorContext::new(factory, info),
            options,
        }
    }
}

impl ActionCreator for PushCreator {
    type Action = PushAction;

    fn operation(&self) -> Operation {
        Operation::Push
    }

    fn create(
        &self,
        environment: &Environment,
        output: OutputBuffer,
        foundation: &FoundationUrl,
    ) -> Result<PushAction, DeployError> {
        let target = self
            .context
            .target(Operation::Push, environment, output, foundation)?;
        let hostname = self
            .options
            .hostname
            .clone()
            .unwrap_or_else(|| self.context.info().app.to_string());

        Ok(PushAction {
            target,
            artifact: self.options.artifact.clone(),
            instances: self.options.instances.unwrap_or(environment.instances),
            domain: environment.domain.clone(),
            hostname,
            disable_rollback: environment.disable_rollback,
            renamed: false,
            pushed: false,
        })
    }

    fn initially_error(&self, errors: Vec<ActionError>) -> DeployError {
        DeployError::login(Operation::Push, errors)
    }

    fn execute_error(&self, errors: Vec<ActionError>) -> DeployError {
        DeployError::operation(Operation::Push, errors)
    }

    fn undo_error(
        &self,
        execute_errors: Vec<ActionError>,
        undo_errors: Vec<ActionError>,
    ) -> DeployError {
        DeployError::rollback(Operation::Push, execute_errors, undo_errors)
    }

    fn success_error(&self, errors: Vec<ActionError>) -> DeployError {
        DeployError::finish(Operation::Push, errors)
    }

    fn set_up(&self, _environment: &Environment) -> Result<(), DeployError> {
        if !self.options.artifact.exists() {
            return Err(DeployError::SetUp {
                operation: Operation::Push,
                reason: format!("artifact not found: {}", self.options.artifact.display()),
            });
        }
        Ok(())
    }

    fn on_start(&self, environment: &Environment, response: &mut (dyn Write + Send)) {
        self.context.announce(Operation::Push, environment, response);
    }
}

/// Pushes one app version to one foundation.
pub struct PushAction {
    target: Target,
    artifact: PathBuf,
    instances: u16,
    domain: Option<String>,
    hostname: String,
    disable_rollback: bool,
    /// The previously running version was parked under its venerable name.
    renamed: bool,
    /// A new version may now sit under the app's name.
    pushed: bool,
}

impl PushAction {
    fn venerable(&self) -> AppName {
        self.target.app().venerable()
    }
}

#[async_trait]
impl Action for PushAction {
    async fn initially(&mut self) -> Result<(), ActionError> {
        self.target.login().await
    }

    async fn execute(&mut self) -> Result<(), ActionError> {
        let app = self.target.app().clone();

        if self.target.exists(&app).await? {
            let venerable = self.venerable();
            self.target
                .note(&format!("renaming {} to {}", app, venerable));
            let result = self.target.courier.rename(&app, &venerable).await;
            self.target.record("rename", result)?;
            self.renamed = true;
        }

        self.target.note(&format!(
            "pushing {} with {} instance(s)",
            app, self.instances
        ));
        self.pushed = true;
        let result = self
            .target
            .courier
            .push(&app, &self.artifact, self.instances)
            .await;
        self.target.record("push", result)
    }

    async fn post_execute(&mut self) -> Result<(), ActionError> {
        let Some(domain) = self.domain.clone() else {
            return Ok(());
        };

        let app = self.target.app().clone();
        self.target
            .note(&format!("mapping route {}.{} to {}", self.hostname, domain, app));
        let result = self
            .target
            .courier
            .map_route(&app, &domain, &self.hostname)
            .await;
        self.target.record("map-route", result)
    }

    async fn success(&mut self) -> Result<(), ActionError> {
        if !self.renamed {
            return Ok(());
        }

        let venerable = self.venerable();
        self.target.note(&format!("deleting {}", venerable));
        let result = self.target.courier.delete(&venerable).await;
        self.target.record("delete", result)
    }

    async fn undo(&mut self) -> Result<(), ActionError> {
        let app = self.target.app().clone();

        if self.disable_rollback {
            self.target.note(&format!(
                "rollback disabled, leaving {} in place on {}",
                app, self.target.foundation
            ));
            return Ok(());
        }

        self.target.note(&format!("rolling back {}", app));

        // Until the push starts, the app under its own name is still the
        // live version and must be left alone.
        if self.pushed && self.target.exists(&app).await? {
            let result = self.target.courier.delete(&app).await;
            self.target.record("delete", result)?;
            self.pushed = false;
        }

        if self.renamed {
            let venerable = self.venerable();
            let result = self.target.courier.rename(&venerable, &app).await;
            self.target.record("rename", result)?;
            self.renamed = false;
        }

        Ok(())
    }

    async fn finally(&mut self) -> Result<(), ActionError> {
        self.target.logout().await
    }
}
