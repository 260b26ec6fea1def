// ABOUTME: Concrete deployment strategies: push, start, stop, and delete.
// ABOUTME: Each pairs an Action with an ActionCreator; Strategy is the closed set the CLI picks from.

mod delete;
mod push;
mod start;
mod stop;
mod target;

pub use delete::{DeleteAction, DeleteCreator};
pub use push::{PushAction, PushCreator, PushOptions};
pub use start::{StartAction, StartCreator};
pub use stop::{StopAction, StopCreator};

use std::io::Write;
use std::sync::Arc;

use crate::config::{Credentials, Environment};
use crate::courier::CourierFactory;
use crate::deploy::{DeployError, Deployer, OutputBuffer};
use crate::types::{AppName, FoundationUrl, Operation};

use target::Target;

/// What is being deployed, and where in each foundation.
#[derive(Debug, Clone)]
pub struct DeploymentInfo {
    pub app: AppName,
    pub org: String,
    pub space: String,
    pub credentials: Credentials,
}

/// State shared by every creator: how to reach the platform and what to act on.
#[derive(Clone)]
pub(crate) struct CreatorContext {
    factory: Arc<dyn CourierFactory>,
    info: Arc<DeploymentInfo>,
}

impl CreatorContext {
    pub(crate) fn new(factory: Arc<dyn CourierFactory>, info: DeploymentInfo) -> Self {
        Self {
            factory,
            info: Arc::new(info),
        }
    }

    pub(crate) fn info(&self) -> &DeploymentInfo {
        &self.info
    }

    /// Build the per-foundation target an action works through.
    pub(crate) fn target(
        &self,
        operation: Operation,
        environment: &Environment,
        output: OutputBuffer,
        foundation: &FoundationUrl,
    ) -> Result<Target, DeployError> {
        let courier = self
            .factory
            .build()
            .map_err(|e| DeployError::Initialization {
                operation,
                foundation: foundation.clone(),
                reason: e.to_string(),
            })?;

        Ok(Target::new(
            courier,
            foundation.clone(),
            Arc::clone(&self.info),
            environment.skip_ssl,
            output,
        ))
    }

    /// Header written to the response before the engine starts.
    pub(crate) fn announce(
        &self,
        operation: Operation,
        environment: &Environment,
        response: &mut (dyn Write + Send),
    ) {
        let result = writeln!(
            response,
            "{} {} to {} ({} foundation(s), org {}, space {})",
            operation,
            self.info.app,
            environment.name,
            environment.foundations.len(),
            self.info.org,
            self.info.space
        );
        if let Err(e) = result {
            tracing::warn!("failed to write deployment header: {}", e);
        }
    }
}

impl std::fmt::Debug for CreatorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatorContext")
            .field("info", &self.info)
            .finish()
    }
}

/// The closed set of strategies a deployment can run.
#[derive(Debug)]
pub enum Strategy {
    Push(PushCreator),
    Start(StartCreator),
    Stop(StopCreator),
    Delete(DeleteCreator),
}

impl Strategy {
    pub fn operation(&self) -> Operation {
        match self {
            Strategy::Push(_) => Operation::Push,
            Strategy::Start(_) => Operation::Start,
            Strategy::Stop(_) => Operation::Stop,
            Strategy::Delete(_) => Operation::Delete,
        }
    }

    /// Run this strategy against every foundation of `environment`.
    pub async fn deploy(
        &self,
        deployer: &Deployer,
        environment: &Environment,
        response: &mut (dyn Write + Send),
    ) -> Result<(), DeployError> {
        match self {
            Strategy::Push(creator) => deployer.deploy(creator, environment, response).await,
            Strategy::Start(creator) => deployer.deploy(creator, environment, response).await,
            Strategy::Stop(creator) => deployer.deploy(creator, environment, response).await,
            Strategy::Delete(creator) => deployer.deploy(creator, environment, response).await,
        }
    }
}
