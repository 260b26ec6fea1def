// ABOUTME: Removes an app from every foundation of an environment.
// ABOUTME: Stops it everywhere first and only deletes once every foundation stopped cleanly.

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
pub struct DeleteCreator {
    context: CreatorContext,
}

impl DeleteCreator {
    pub fn new(factory: Arc<dyn CourierFactory>, info: DeploymentInfo) -> Self {
        Self {
            context: CreatorContext::new(factory, info),
        }
    }
}

impl ActionCreator for DeleteCreator {
    type Action = DeleteAction;

    fn operation(&self) -> Operation {
        Operation::Delete
    }

    fn create(
        &self,
        environment: &Environment,
        output: OutputBuffer,
        foundation: &FoundationUrl,
    ) -> Result<DeleteAction, DeployError> {
        let target = self
            .context
            .target(Operation::Delete, environment, output, foundation)?;
        Ok(DeleteAction { target })
    }

    fn initially_error(&self, errors: Vec<ActionError>) -> DeployError {
        DeployError::login(Operation::Delete, errors)
    }

    fn execute_error(&self, errors: Vec<ActionError>) -> DeployError {
        DeployError::operation(Operation::Delete, errors)
    }

    fn undo_error(
        &self,
        execute_errors: Vec<ActionError>,
        undo_errors: Vec<ActionError>,
    ) -> DeployError {
        DeployError::rollback(Operation::Delete, execute_errors, undo_errors)
    }

    fn success_error(&self, errors: Vec<ActionError>) -> DeployError {
        DeployError::finish(Operation::Delete, errors)
    }

    fn on_start(&self, environment: &Environment, response: &mut (dyn Write + Send)) {
        self.context.announce(Operation::Delete, environment, response);
    }
}

/// Deleting can't be undone, so the app is only stopped until every
/// foundation has confirmed.
pub struct DeleteAction {
    target: Target,
}

#[async_trait]
impl Action for DeleteAction {
    async fn initially(&mut self) -> Result<(), ActionError> {
        self.target.login().await
    }

    async fn execute(&mut self) -> Result<(), ActionError> {
        let app = self.target.app().clone();
        self.target.note(&format!("stopping {} before delete", app));
        let result = self.target.courier.stop(&app).await;
        self.target.record("stop", result)
    }

    async fn post_execute(&mut self) -> Result<(), ActionError> {
        Ok(())
    }

    async fn success(&mut self) -> Result<(), ActionError> {
        let app = self.target.app().clone();
        self.target.note(&format!("deleting {}", app));
        let result = self.target.courier.delete(&app).await;
        self.target.record("delete", result)
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
