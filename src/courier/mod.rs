// ABOUTME: Boundary to the platform each foundation runs.
// ABOUTME: Defines the Courier capability trait, its factory, and the cf CLI implementation.

mod cf_cli;
mod error;

pub use cf_cli::{CfCli, CfCliFactory};
pub use error::{CourierError, CourierErrorKind};

use std::path::Path;

use async_trait::async_trait;

use crate::config::Credentials;
use crate::types::{AppName, FoundationUrl};

/// Output captured from a successful platform call.
pub type CourierResult = Result<Vec<u8>, CourierError>;

/// Everything needed to authenticate and target an org and space.
#[derive(Debug, Clone, Copy)]
pub struct LoginRequest<'a> {
    pub foundation: &'a FoundationUrl,
    pub credentials: &'a Credentials,
    pub org: &'a str,
    pub space: &'a str,
    pub skip_ssl: bool,
}

/// Platform operations against a single foundation.
///
/// One courier serves one foundation for one run; implementations may keep
/// per-foundation session state (such as a CLI home directory) between calls.
#[async_trait]
pub trait Courier: Send + Sync {
    /// Authenticate and target the org and space.
    async fn login(&self, request: &LoginRequest<'_>) -> CourierResult;

    /// Whether an app with this name exists in the targeted space.
    ///
    /// Only the platform reporting the app as unknown means `false`; any
    /// other failure is returned so callers never mistake it for absence.
    async fn exists(&self, app: &AppName) -> Result<bool, CourierError>;

    async fn push(&self, app: &AppName, path: &Path, instances: u16) -> CourierResult;

    async fn rename(&self, from: &AppName, to: &AppName) -> CourierResult;

    async fn start(&self, app: &AppName) -> CourierResult;

    async fn stop(&self, app: &AppName) -> CourierResult;

    async fn delete(&self, app: &AppName) -> CourierResult;

    async fn map_route(&self, app: &AppName, domain: &str, hostname: &str) -> CourierResult;

    async fn logout(&self) -> CourierResult;
}

/// Builds one fresh courier per foundation.
pub trait CourierFactory: Send + Sync {
    fn build(&self) -> Result<Box<dyn Courier>, CourierError>;
}
