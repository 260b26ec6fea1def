// ABOUTME: The Action lifecycle contract and the ActionCreator factory contract.
// ABOUTME: Every deployment strategy implements both; the engine is programmed against them.

use std::io::Write;

use async_trait::async_trait;

use crate::config::Environment;
use crate::types::{FoundationUrl, Operation};

use super::buffer::OutputBuffer;
use super::error::{ActionError, DeployError};

/// One deployment strategy's work on one foundation.
///
/// The engine calls the methods in this order:
/// `initially` → `execute` → `post_execute` → `success` or `undo` → `finally`.
/// `initially` may be called twice on the first foundation and must be
/// idempotent. `finally` is called exactly once, whatever happened before,
/// and its result is ignored.
#[async_trait]
pub trait Action: Send {
    /// Authenticate against the foundation.
    async fn initially(&mut self) -> Result<(), ActionError>;

    /// Reserved hook. The engine never calls it.
    async fn verify(&mut self) -> Result<(), ActionError> {
        Ok(())
    }

    /// Perform the primary operation.
    async fn execute(&mut self) -> Result<(), ActionError>;

    /// Secondary steps once `execute` succeeded on every foundation.
    async fn post_execute(&mut self) -> Result<(), ActionError>;

    /// Finalize once every foundation got through `post_execute`.
    async fn success(&mut self) -> Result<(), ActionError>;

    /// Compensate for `execute` (and `post_execute`) after a failure anywhere.
    async fn undo(&mut self) -> Result<(), ActionError>;

    /// Release whatever the action holds.
    async fn finally(&mut self) -> Result<(), ActionError>;
}

/// A single lifecycle step, sent to an actor to run against its action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Initially,
    Verify,
    Execute,
    PostExecute,
    Success,
    Undo,
    Finally,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Initially => "initially",
            Command::Verify => "verify",
            Command::Execute => "execute",
            Command::PostExecute => "post_execute",
            Command::Success => "success",
            Command::Undo => "undo",
            Command::Finally => "finally",
        }
    }

    pub(crate) async fn apply<A>(self, action: &mut A) -> Result<(), ActionError>
    where
        A: Action + ?Sized,
    {
        match self {
            Command::Initially => action.initially().await,
            Command::Verify => action.verify().await,
            Command::Execute => action.execute().await,
            Command::PostExecute => action.post_execute().await,
            Command::Success => action.success().await,
            Command::Undo => action.undo().await,
            Command::Finally => action.finally().await,
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Factory and error classifier supplied by a deployment strategy.
///
/// The engine only knows whether each foundation failed; turning the raw
/// per-foundation errors into a typed outcome is the creator's job.
pub trait ActionCreator: Send + Sync {
    type Action: Action + 'static;

    /// Which operation this creator's actions perform.
    fn operation(&self) -> Operation;

    /// Build the action for one foundation. `output` is where the action
    /// writes everything the operator should see for that foundation.
    fn create(
        &self,
        environment: &Environment,
        output: OutputBuffer,
        foundation: &FoundationUrl,
    ) -> Result<Self::Action, DeployError>;

    fn initially_error(&self, errors: Vec<ActionError>) -> DeployError;

    fn execute_error(&self, errors: Vec<ActionError>) -> DeployError;

    fn undo_error(
        &self,
        execute_errors: Vec<ActionError>,
        undo_errors: Vec<ActionError>,
    ) -> DeployError;

    fn success_error(&self, errors: Vec<ActionError>) -> DeployError;

    /// Prepare the run before any foundation is contacted.
    fn set_up(&self, _environment: &Environment) -> Result<(), DeployError> {
        Ok(())
    }

    /// Called right before the engine starts.
    fn on_start(&self, _environment: &Environment, _response: &mut (dyn Write + Send)) {}

    /// Called with the engine's outcome; may replace it.
    fn on_finish(
        &self,
        _environment: &Environment,
        _response: &mut (dyn Write + Send),
        result: Result<(), DeployError>,
    ) -> Result<(), DeployError> {
        result
    }

    /// Release whatever `set_up` acquired.
    fn clean_up(&self) {}
}
