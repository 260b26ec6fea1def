// ABOUTME: Courier error types with SNAFU pattern.
// ABOUTME: Distinguishes setup, spawn, timeout, and non-zero exit failures of platform commands.

use std::time::Duration;

use snafu::Snafu;

/// Failure of a single platform call.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CourierError {
    #[snafu(display("cannot create CF_HOME directory: {source}"))]
    CfHome { source: std::io::Error },

    #[snafu(display("cannot run `{command}`: {source}"))]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[snafu(display("`{command}` timed out after {}s", timeout.as_secs()))]
    TimedOut { command: String, timeout: Duration },

    #[snafu(display("`{command}` exited with {status}"))]
    Failed {
        command: String,
        status: String,
        output: Vec<u8>,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourierErrorKind {
    Setup,
    Spawn,
    TimedOut,
    Failed,
}

impl CourierError {
    pub fn kind(&self) -> CourierErrorKind {
        match self {
            CourierError::CfHome { .. } => CourierErrorKind::Setup,
            CourierError::Spawn { .. } => CourierErrorKind::Spawn,
            CourierError::TimedOut { .. } => CourierErrorKind::TimedOut,
            CourierError::Failed { .. } => CourierErrorKind::Failed,
        }
    }

    /// Whether the platform rejected the call because the app is unknown.
    pub fn is_not_found(&self) -> bool {
        match self {
            CourierError::Failed { output, .. } => String::from_utf8_lossy(output)
                .to_ascii_lowercase()
                .contains("not found"),
            _ => false,
        }
    }

    /// Whatever the command printed before it failed.
    pub fn output(&self) -> &[u8] {
        match self {
            CourierError::Failed { output, .. } => output,
            _ => &[],
        }
    }
}
