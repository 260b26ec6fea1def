// ABOUTME: Command module aggregator for the cfdeploy CLI.
// ABOUTME: Re-exports the deploy and environments command handlers.

mod deploy;
mod environments;

pub use deploy::{DeployRequest, deploy};
pub use environments::list_environments;
