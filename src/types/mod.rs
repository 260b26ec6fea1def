// ABOUTME: Validated domain types shared across the crate.
// ABOUTME: App names, foundation endpoints, and the operation tag.

mod app_name;
mod foundation_url;
mod operation;

pub use app_name::{AppName, AppNameError};
pub use foundation_url::{FoundationUrl, FoundationUrlError};
pub use operation::Operation;
