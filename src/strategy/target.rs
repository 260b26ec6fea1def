// ABOUTME: One foundation as seen by a strategy's action.
// ABOUTME: Wraps the courier, records its output, and turns courier failures into ActionErrors.

use std::io::Write;
use std::sync::Arc;

use crate::courier::{Courier, CourierResult, LoginRequest};
use crate::deploy::{ActionError, OutputBuffer};
use crate::types::{AppName, FoundationUrl};

use super::DeploymentInfo;

pub(crate) struct Target {
    pub(crate) courier: Box<dyn Courier>,
    pub(crate) foundation: FoundationUrl,
    pub(crate) info: Arc<DeploymentInfo>,
    skip_ssl: bool,
    output: OutputBuffer,
}

impl Target {
    pub(crate) fn new(
        courier: Box<dyn Courier>,
        foundation: FoundationUrl,
        info: Arc<DeploymentInfo>,
        skip_ssl: bool,
        output: OutputBuffer,
    ) -> Self {
        Self {
            courier,
            foundation,
            info,
            skip_ssl,
            output,
        }
    }

    pub(crate) fn app(&self) -> &AppName {
        &self.info.app
    }

    /// Log in and target the org and space. Safe to repeat.
    pub(crate) async fn login(&mut self) -> Result<(), ActionError> {
        let request = LoginRequest {
            foundation: &self.foundation,
            credentials: &self.info.credentials,
            org: &self.info.org,
            space: &self.info.space,
            skip_ssl: self.skip_ssl,
        };
        let result = self.courier.login(&request).await;

        match result {
            Ok(output) => {
                self.write(&output);
                Ok(())
            }
            Err(e) => {
                self.write(e.output());
                Err(ActionError::Login {
                    foundation: self.foundation.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Whether the app exists on this foundation. Lookup failures are errors.
    pub(crate) async fn exists(&mut self, app: &AppName) -> Result<bool, ActionError> {
        match self.courier.exists(app).await {
            Ok(found) => Ok(found),
            Err(e) => {
                self.write(e.output());
                tracing::debug!(foundation = %self.foundation, "app lookup failed: {}", e);
                Err(ActionError::step("app", &self.foundation, e))
            }
        }
    }

    pub(crate) async fn logout(&mut self) -> Result<(), ActionError> {
        let result = self.courier.logout().await;
        self.record("logout", result)
    }

    /// Write a courier call's output and map its failure.
    pub(crate) fn record(
        &mut self,
        step: &'static str,
        result: CourierResult,
    ) -> Result<(), ActionError> {
        match result {
            Ok(output) => {
                self.write(&output);
                Ok(())
            }
            Err(e) => {
                self.write(e.output());
                tracing::debug!(foundation = %self.foundation, step, "platform call failed: {}", e);
                Err(ActionError::step(step, &self.foundation, e))
            }
        }
    }

    /// Write a progress line for the operator.
    pub(crate) fn note(&mut self, message: &str) {
        self.write(format!("{message}\n").as_bytes());
    }

    fn write(&mut self, bytes: &[u8]) {
        // OutputBuffer writes are infallible.
        let _ = self.output.write_all(bytes);
    }
}
