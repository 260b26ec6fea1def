// ABOUTME: Lifecycle states an action moves through during one run.
// ABOUTME: Tracked by the actor's worker so every transition can be logged.

use std::fmt;

use super::action::Command;

/// Where an action is in its lifecycle.
///
/// ```text
/// NotStarted -> LoggedIn -> Executed -> PostExecuted -> Succeeded  -> Finalized
///                  |           |             |
///                  +-----------+-------------+---> RolledBack -> Finalized
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionState {
    #[default]
    NotStarted,
    LoggedIn,
    Executed,
    PostExecuted,
    Succeeded,
    RolledBack,
    Finalized,
}

impl ActionState {
    /// State after `command` completed successfully, or `None` if the
    /// command is out of order for this state.
    ///
    /// `Finally` finalizes whether or not it succeeded, so callers pass it
    /// through here regardless of its result.
    pub fn after(self, command: Command) -> Option<ActionState> {
        use ActionState::*;

        match (self, command) {
            // Re-login of an already logged in foundation is a no-op.
            (NotStarted | LoggedIn, Command::Initially) => Some(LoggedIn),
            (LoggedIn, Command::Execute) => Some(Executed),
            (Executed, Command::PostExecute) => Some(PostExecuted),
            (PostExecuted, Command::Success) => Some(Succeeded),
            (LoggedIn | Executed | PostExecuted, Command::Undo) => Some(RolledBack),
            (Finalized, _) => None,
            (state, Command::Verify) => Some(state),
            (_, Command::Finally) => Some(Finalized),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ActionState::Finalized)
    }
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionState::NotStarted => "not started",
            ActionState::LoggedIn => "logged in",
            ActionState::Executed => "executed",
            ActionState::PostExecuted => "post-executed",
            ActionState::Succeeded => "succeeded",
            ActionState::RolledBack => "rolled back",
            ActionState::Finalized => "finalized",
        };
        f.write_str(name)
    }
}
