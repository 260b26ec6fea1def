// ABOUTME: Error types for orchestration runs.
// ABOUTME: Per-foundation ActionError and the typed DeployError aggregates built from them.

use crate::types::{FoundationUrl, Operation};

/// Error returned by a single lifecycle step on a single foundation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// Authenticating against the foundation failed.
    #[error("cannot login to {foundation}: {reason}")]
    Login {
        foundation: FoundationUrl,
        reason: String,
    },

    /// A platform call made by the step failed.
    #[error("{step} failed on {foundation}: {reason}")]
    Step {
        step: &'static str,
        foundation: FoundationUrl,
        reason: String,
    },

    /// The actor's worker exited before answering a command.
    #[error("worker for {foundation} stopped before reporting a result")]
    ActorStopped { foundation: FoundationUrl },

    /// Free-form failure.
    #[error("{0}")]
    Failed(String),
}

impl ActionError {
    pub fn failed(message: impl Into<String>) -> Self {
        ActionError::Failed(message.into())
    }

    pub fn step(step: &'static str, foundation: &FoundationUrl, reason: impl ToString) -> Self {
        ActionError::Step {
            step,
            foundation: foundation.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Outcome of one orchestration run that did not succeed.
///
/// Only ever built by an `ActionCreator`; the engine decides which variant is
/// needed purely from the presence of per-foundation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeployError {
    /// The per-foundation action could not be created.
    #[error("cannot initialize {operation} for {foundation}: {reason}")]
    Initialization {
        operation: Operation,
        foundation: FoundationUrl,
        reason: String,
    },

    /// Preparing the run failed before any foundation was contacted.
    #[error("{operation} set up failed: {reason}")]
    SetUp { operation: Operation, reason: String },

    /// One or more foundations could not be logged into.
    #[error("{operation} failed: login failed: {}", join(.errors))]
    Login {
        operation: Operation,
        errors: Vec<ActionError>,
    },

    /// The operation failed and every foundation was rolled back.
    #[error("{operation} failed: {}", join(.errors))]
    Operation {
        operation: Operation,
        errors: Vec<ActionError>,
    },

    /// The operation failed and the rollback failed too.
    #[error("{operation} failed: {}: rollback failed: {}", join(.errors), join(.undo_errors))]
    Rollback {
        operation: Operation,
        errors: Vec<ActionError>,
        undo_errors: Vec<ActionError>,
    },

    /// The new state is live but finishing it failed somewhere.
    #[error("finish {operation} failed: {}", join(.errors))]
    Finish {
        operation: Operation,
        errors: Vec<ActionError>,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Initialization,
    SetUp,
    Login,
    Operation,
    Rollback,
    Finish,
}

impl DeployErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployErrorKind::Initialization => "initialization",
            DeployErrorKind::SetUp => "set_up",
            DeployErrorKind::Login => "login",
            DeployErrorKind::Operation => "operation",
            DeployErrorKind::Rollback => "rollback",
            DeployErrorKind::Finish => "finish",
        }
    }
}

impl DeployError {
    pub fn login(operation: Operation, errors: Vec<ActionError>) -> Self {
        DeployError::Login { operation, errors }
    }

    pub fn operation(operation: Operation, errors: Vec<ActionError>) -> Self {
        DeployError::Operation { operation, errors }
    }

    pub fn rollback(
        operation: Operation,
        errors: Vec<ActionError>,
        undo_errors: Vec<ActionError>,
    ) -> Self {
        DeployError::Rollback {
            operation,
            errors,
            undo_errors,
        }
    }

    pub fn finish(operation: Operation, errors: Vec<ActionError>) -> Self {
        DeployError::Finish { operation, errors }
    }

    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Initialization { .. } => DeployErrorKind::Initialization,
            DeployError::SetUp { .. } => DeployErrorKind::SetUp,
            DeployError::Login { .. } => DeployErrorKind::Login,
            DeployError::Operation { .. } => DeployErrorKind::Operation,
            DeployError::Rollback { .. } => DeployErrorKind::Rollback,
            DeployError::Finish { .. } => DeployErrorKind::Finish,
        }
    }

    /// The operation the failed run was performing.
    pub fn operation_kind(&self) -> Operation {
        match self {
            DeployError::Initialization { operation, .. }
            | DeployError::SetUp { operation, .. }
            | DeployError::Login { operation, .. }
            | DeployError::Operation { operation, .. }
            | DeployError::Rollback { operation, .. }
            | DeployError::Finish { operation, .. } => *operation,
        }
    }

    /// Per-foundation errors that triggered this outcome, in foundation order.
    pub fn errors(&self) -> &[ActionError] {
        match self {
            DeployError::Login { errors, .. }
            | DeployError::Operation { errors, .. }
            | DeployError::Rollback { errors, .. }
            | DeployError::Finish { errors, .. } => errors,
            DeployError::Initialization { .. } | DeployError::SetUp { .. } => &[],
        }
    }

    /// Errors raised while rolling back, if a rollback failed.
    pub fn undo_errors(&self) -> &[ActionError] {
        match self {
            DeployError::Rollback { undo_errors, .. } => undo_errors,
            _ => &[],
        }
    }
}

fn join(errors: &[ActionError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}
