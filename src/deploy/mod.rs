// ABOUTME: Multi-foundation orchestration: actions, actors, and the blue-green engine.
// ABOUTME: Exports the contracts strategies implement and the engine that drives them.

mod action;
mod actor;
mod blue_green;
mod buffer;
mod deployer;
mod error;
mod state;

pub use action::{Action, ActionCreator, Command};
pub use actor::Actor;
pub use blue_green::{BlueGreen, END_OUTPUT_BANNER, OUTPUT_BANNER};
pub use buffer::{CapturedOutput, OutputBuffer};
pub use deployer::Deployer;
pub use error::{ActionError, DeployError, DeployErrorKind};
pub use state::ActionState;
