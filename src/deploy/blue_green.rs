// ABOUTME: Blue-green orchestration engine driving one actor per foundation.
// ABOUTME: Runs the fixed phase sequence concurrently and rolls back the whole environment on failure.

use std::io::Write;

use crate::config::Environment;

use super::action::{ActionCreator, Command};
use super::actor::Actor;
use super::buffer::{CapturedOutput, OutputBuffer};
use super::error::{ActionError, DeployError};

/// Banner written before each foundation's output.
pub const OUTPUT_BANNER: &str =
    "------------------- Cloud Foundry Output -------------------";

/// Banner written once after all foundations' output.
pub const END_OUTPUT_BANNER: &str =
    "----------------- End Cloud Foundry Output -----------------";

/// Drives an operation across every foundation of an environment.
///
/// One run creates one action and one actor per foundation, logs in to the
/// first foundation alone, then to all of them, then executes, post-executes
/// and finalizes concurrently. A failure during execute or post-execute
/// undoes the operation on every foundation, including the ones where it
/// succeeded.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlueGreen;

impl BlueGreen {
    pub fn new() -> Self {
        BlueGreen
    }

    /// Run one orchestration over `environment`.
    ///
    /// Each foundation's output is written to `response` once the run is
    /// over, whichever way it ended.
    pub async fn execute<C>(
        &self,
        creator: &C,
        environment: &Environment,
        response: &mut (dyn Write + Send),
    ) -> Result<(), DeployError>
    where
        C: ActionCreator + ?Sized,
    {
        let mut actors = Vec::with_capacity(environment.foundations.len());
        let mut captured = Vec::with_capacity(environment.foundations.len());

        for foundation in environment.foundations.iter() {
            let (buffer, output) = OutputBuffer::channel();
            match creator.create(environment, buffer, foundation) {
                Ok(action) => {
                    actors.push(Actor::new(foundation.clone(), action));
                    captured.push(output);
                }
                Err(e) => {
                    tracing::error!(foundation = %foundation, "cannot create action: {}", e);
                    finish(actors).await;
                    return Err(e);
                }
            }
        }

        let result = run_phases(creator, &mut actors).await;

        finish(actors).await;
        write_output(response, &mut captured);

        result
    }

    /// Send `command` to every actor, then collect one result from each in
    /// foundation order.
    ///
    /// Returns the errors of the foundations where the command failed.
    pub async fn command_all(actors: &mut [Actor], command: Command) -> Vec<ActionError> {
        let mut delivered = Vec::with_capacity(actors.len());
        for actor in actors.iter() {
            delivered.push(actor.send(command).await);
        }

        let mut errors = Vec::new();
        for (actor, sent) in actors.iter_mut().zip(delivered) {
            let result = match sent {
                Ok(()) => actor.receive().await,
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                errors.push(e);
            }
        }
        errors
    }
}

async fn run_phases<C>(creator: &C, actors: &mut [Actor]) -> Result<(), DeployError>
where
    C: ActionCreator + ?Sized,
{
    let Some(first) = actors.first_mut() else {
        return Ok(());
    };

    // Check the first foundation alone so a bad login or unreachable
    // endpoint doesn't get tried against the rest of the environment.
    let first_login = match first.send(Command::Initially).await {
        Ok(()) => first.receive().await,
        Err(e) => Err(e),
    };
    if let Err(e) = first_login {
        return Err(creator.initially_error(vec![e]));
    }

    let errors = BlueGreen::command_all(actors, Command::Initially).await;
    if !errors.is_empty() {
        return Err(creator.initially_error(errors));
    }

    let errors = BlueGreen::command_all(actors, Command::Execute).await;
    if !errors.is_empty() {
        return Err(rollback(creator, actors, errors).await);
    }

    let errors = BlueGreen::command_all(actors, Command::PostExecute).await;
    if !errors.is_empty() {
        return Err(rollback(creator, actors, errors).await);
    }

    // Past this point the new state is live everywhere; a failure only
    // means cleanup didn't finish, so nothing is undone.
    let errors = BlueGreen::command_all(actors, Command::Success).await;
    if !errors.is_empty() {
        return Err(creator.success_error(errors));
    }

    Ok(())
}

async fn rollback<C>(creator: &C, actors: &mut [Actor], errors: Vec<ActionError>) -> DeployError
where
    C: ActionCreator + ?Sized,
{
    tracing::warn!(
        operation = %creator.operation(),
        failed = errors.len(),
        foundations = actors.len(),
        "{} failed, rolling back all foundations",
        creator.operation()
    );

    let undo_errors = BlueGreen::command_all(actors, Command::Undo).await;
    if undo_errors.is_empty() {
        creator.execute_error(errors)
    } else {
        creator.undo_error(errors, undo_errors)
    }
}

/// Finalize every action and stop its worker.
async fn finish(mut actors: Vec<Actor>) {
    let errors = BlueGreen::command_all(&mut actors, Command::Finally).await;
    for e in errors {
        tracing::debug!("ignoring finally error: {}", e);
    }

    let states = futures::future::join_all(actors.into_iter().map(Actor::close)).await;
    tracing::debug!(?states, "all actors stopped");
}

fn write_output(response: &mut (dyn Write + Send), captured: &mut [CapturedOutput]) {
    if let Err(e) = try_write_output(response, captured) {
        tracing::warn!("failed to write foundation output: {}", e);
    }
}

fn try_write_output(
    response: &mut (dyn Write + Send),
    captured: &mut [CapturedOutput],
) -> std::io::Result<()> {
    for output in captured.iter_mut() {
        write!(response, "\n{}\n", OUTPUT_BANNER)?;
        response.write_all(&output.drain())?;
    }
    write!(response, "\n{}\n", END_OUTPUT_BANNER)?;
    response.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banners_have_exact_dash_counts() {
        assert_eq!(
            OUTPUT_BANNER,
            format!("{} Cloud Foundry Output {}", "-".repeat(19), "-".repeat(19))
        );
        assert_eq!(
            END_OUTPUT_BANNER,
            format!(
                "{} End Cloud Foundry Output {}",
                "-".repeat(17),
                "-".repeat(17)
            )
        );
    }
}
