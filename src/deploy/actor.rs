// ABOUTME: Per-foundation worker that runs lifecycle commands against one action.
// ABOUTME: Commands go in over one channel, results come back over another, strictly in order.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::types::FoundationUrl;

use super::action::{Action, Command};
use super::error::ActionError;
use super::state::ActionState;

/// Handle to a worker task that owns exactly one action.
///
/// The worker applies commands one at a time, in send order, and results come
/// back in the same order. Both channels hold one message, so a caller that
/// sends again before receiving lets the worker start the next command while
/// the previous result is still queued; callers that need lockstep execution
/// alternate `send` and `receive`, as the engine does. Dropping or closing
/// the handle closes the command channel, which is the only way to stop it.
#[derive(Debug)]
pub struct Actor {
    foundation: FoundationUrl,
    commands: mpsc::Sender<Command>,
    results: mpsc::Receiver<Result<(), ActionError>>,
    worker: JoinHandle<ActionState>,
}

impl Actor {
    /// Spawn a worker for `action` on the current tokio runtime.
    pub fn new<A>(foundation: FoundationUrl, action: A) -> Self
    where
        A: Action + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel(1);
        let (result_tx, result_rx) = mpsc::channel(1);

        let worker = tokio::spawn(run_worker(
            foundation.clone(),
            action,
            command_rx,
            result_tx,
        ));

        Actor {
            foundation,
            commands: command_tx,
            results: result_rx,
            worker,
        }
    }

    pub fn foundation(&self) -> &FoundationUrl {
        &self.foundation
    }

    /// Hand a command to the worker.
    ///
    /// Fails with `ActorStopped` if the worker has already exited.
    pub async fn send(&self, command: Command) -> Result<(), ActionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| self.stopped())
    }

    /// Wait for the result of the oldest unanswered command.
    pub async fn receive(&mut self) -> Result<(), ActionError> {
        match self.results.recv().await {
            Some(result) => result,
            None => Err(self.stopped()),
        }
    }

    /// Close the command channel and wait for the worker to exit.
    ///
    /// Returns the state the action was left in, or `None` if the worker died.
    pub async fn close(self) -> Option<ActionState> {
        let Actor {
            foundation,
            commands,
            results,
            worker,
        } = self;
        drop(commands);
        drop(results);

        match worker.await {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::error!(foundation = %foundation, "actor worker failed: {}", e);
                None
            }
        }
    }

    fn stopped(&self) -> ActionError {
        ActionError::ActorStopped {
            foundation: self.foundation.clone(),
        }
    }
}

async fn run_worker<A>(
    foundation: FoundationUrl,
    mut action: A,
    mut commands: mpsc::Receiver<Command>,
    results: mpsc::Sender<Result<(), ActionError>>,
) -> ActionState
where
    A: Action,
{
    let mut state = ActionState::default();

    while let Some(command) = commands.recv().await {
        tracing::debug!(foundation = %foundation, %command, "running command");
        let result = command.apply(&mut action).await;

        if result.is_ok() || command == Command::Finally {
            match state.after(command) {
                Some(next) if next != state => {
                    tracing::debug!(foundation = %foundation, from = %state, to = %next, "action state changed");
                    state = next;
                }
                Some(_) => {}
                None => {
                    tracing::warn!(foundation = %foundation, %command, %state, "command out of order, state unchanged");
                }
            }
        }

        if let Err(ref e) = result {
            tracing::debug!(foundation = %foundation, %command, "command failed: {}", e);
        }

        if results.send(result).await.is_err() {
            break;
        }
    }

    tracing::debug!(foundation = %foundation, %state, "actor stopped");
    state
}
