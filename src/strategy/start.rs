// ABOUTME: Starts an app on every foundation of an environment.
// ABOUTME: A failure anywhere stops it again everywhere.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Environment;
use crate::courier::CourierFactory;
use crate::deploy::{Action, ActionCreator, ActionError, DeployError, OutputBuffer};
use crate::types::{FoundationUrl, Operation};

use super::target::Target;
use super::{CreatorContext, DeploymentInfo};

#[derive(Debug)]
pub struct StartCreator {
    context: CreatorContext,
}

impl StartCreator {
    pub fn new(factory: Arc<dyn CourierFactory>, info: DeploymentInfo) -> Self {
        Self {
            context: CreatorContext::new(factory, info),
        }
    }
}

impl ActionCreator for StartCreator {
    type Action = StartAction;

    fn operation(&self) -> Operation {
        Operation::Start
    }

    fn create(
        &self,
        environment: &Environment,
        output: OutputBuffer,
        foundation: &FoundationUrl,
    ) -> Result<StartAction, DeployError> {
        let target = self
            .context
            .target(Operation::Start, environment, output, foundation)?;
        Ok(StartAction { target })
    }

    fn initially_error(&self, errors: Vec<ActionError>) -> DeployError {
        DeployError::login(Operation::Start, errors)
    }

    fn execute_error(&self, errors: Vec<ActionError>) -> DeployError {
        DeployError::operation(Operation::Start, errors)
    }

    fn undo_error(
        &self,
        execute_errors: Vec<ActionError>,
        undo_errors: Vec<ActionError>,
    ) -> DeployError {
        DeployError::rollback(Operation::Start, execute_errors, undo_errors)
    }

    fn success_error(&self, errors: Vec<ActionError>) -> DeployError {
        DeployError::finish(Operation::Start, errors)
    }

    fn on_start(&self, environment: &Environment, response: &mut (dyn Write + Send)) {
        self.context.announce(Operation::Start, environment, response);
    }
}

pub struct StartAction {
    target: Target,
}

#[async_trait]
impl Action for StartAction {
    async fn initially(&mut self) -> Result<(), ActionError> {
        self.target.login().await
    }

    async fn execute(&mut self) -> Result<(), ActionError> {
        let app = self.target.app().clone();
        self.target.note(&format!("starting {}", app));
        let result = self.target.courier.start(&app).await;
        self.target.record("start", result)
    }

    async fn post_execute(&mut self) -> Result<(), ActionError> {
        Ok(())
    }

    async fn success(&mut self) -> Result<(), ActionError> {
        Ok(())
    }

    async fn undo(&mut self) -> Result<(), ActionError> {
        let app = self.target.app().clone();
        self.target.note(&format!("stopping {} again", app));
        let result = self.target.courier.stop(&app).await;
        self.target.record("stop", result)
    }

    async fn finally(&mut self) -> Result<(), ActionError> {
        self.target.logout().await
    }
}
