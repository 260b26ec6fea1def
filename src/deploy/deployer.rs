// ABOUTME: Drives one deployment through the creator's lifecycle hooks and the engine.
// ABOUTME: set_up, on_start, blue-green execution, on_finish, clean_up.

use std::io::Write;

use crate::config::Environment;

use super::action::ActionCreator;
use super::blue_green::BlueGreen;
use super::error::DeployError;

/// Runs an `ActionCreator` end to end against one environment.
#[derive(Debug, Clone, Default)]
pub struct Deployer {
    engine: BlueGreen,
}

impl Deployer {
    pub fn new(engine: BlueGreen) -> Self {
        Self { engine }
    }

    /// Deploy with `creator` to every foundation of `environment`.
    ///
    /// `clean_up` runs once `set_up` has been attempted, whatever the outcome.
    pub async fn deploy<C>(
        &self,
        creator: &C,
        environment: &Environment,
        response: &mut (dyn Write + Send),
    ) -> Result<(), DeployError>
    where
        C: ActionCreator + ?Sized,
    {
        let operation = creator.operation();
        tracing::info!(
            %operation,
            environment = %environment.name,
            foundations = environment.foundations.len(),
            "starting deployment"
        );

        if let Err(e) = creator.set_up(environment) {
            tracing::error!(%operation, "set up failed: {}", e);
            creator.clean_up();
            return Err(e);
        }

        creator.on_start(environment, response);
        let result = self.engine.execute(creator, environment, response).await;
        let result = creator.on_finish(environment, response, result);
        creator.clean_up();

        match &result {
            Ok(()) => tracing::info!(%operation, environment = %environment.name, "deployment succeeded"),
            Err(e) => tracing::error!(
                %operation,
                environment = %environment.name,
                kind = e.kind().as_str(),
                "deployment failed: {}",
                e
            ),
        }

        result
    }
}
