// ABOUTME: Stops an app on every foundation of an environment.
// ABOUTME: A failure anywhere starts it again everywhere.

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
pub struct StopCreator {
    context: CreatorContext,
}

impl StopCreator {
    pub fn new(factory: Arc<dyn CourierFactory>, info: DeploymentInfo) -> Self {
        Self {
            context: CreatorContext::new(factory, info),
        }
    }
}

impl ActionCreator for StopCreator {
    type Action = StopAction;

    fn operation(&self) -> Operation {
        Operation::Stop
    }

    fn create(
        &self,
        environment: &Environment,
        output: OutputBuffer,
        foundation: &FoundationUrl,
    ) -> Result<StopAction, DeployError> {
        let target = self
            .context
            .target(Operation::Stop, environment, output, foundation)?;
        Ok(StopAction { target })
    }

    fn initially_error(&self, errors: Vec<ActionError>) -> DeployError {
        DeployError::login(Operation::Stop, errors)
    }

    fn execute_error(&self, errors: Vec<ActionError>) -> DeployError {
        DeployError::operation(Operation::Stop, errors)
    }

    fn undo_error(
        &self,
        execute_errors: Vec<ActionError>,
        undo_errors: Vec<ActionError>,
    ) -> DeployError {
        DeployError::rollback(Operation::Stop, execute_errors, undo_errors)
    }

    fn success_error(&self, errors: Vec<ActionError>) -> DeployError {
        DeployError::finish(Operation::Stop, errors)
    }

    fn on_start(&self, environment: &Environment, response: &mut (dyn Write + Send)) {
        self.context.announce(Operation::Stop, environment, response);
    }
}

pub struct StopAction {
    target: Target,
}

#[async_trait]
impl Action for StopAction {
    async fn initially(&mut self) -> Result<(), ActionError> {
        self.target.login().await
    }

    async fn execute(&mut self) -> Result<(), ActionError> {
        let app = self.target.app().clone();
        self.target.note(&format!("stopping {}", app));
        let result = self.target.courier.stop(&app).await;
        self.target.record("stop", result)
    }

    async fn post_execute(&mut self) -> Result<(), ActionError> {
        Ok(())
    }

    async fn success(&mut self) -> Result<(), ActionError> {
        Ok(())
    }

    async fn undo(&mut self) -> Result<(), ActionError> {
        let app = self.target.app().clone();
        self.target.note(&format!("starting {} again", app));
        let result = self.target.courier.start(&app).await;
        self.target.record("start", result)
    }

    async fn finally(&mut self) -> Result<(), ActionError> {
        self.target.logout().await
    }
}
