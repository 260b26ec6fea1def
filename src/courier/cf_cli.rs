// ABOUTME: Courier implementation that drives the cf command line client.
// ABOUTME: Each instance gets a private CF_HOME so foundations never share a session.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use snafu::ResultExt;
use tempfile::TempDir;
use tokio::process::Command;

use super::error::{CfHomeSnafu, CourierError, SpawnSnafu};
use super::{Courier, CourierFactory, CourierResult, LoginRequest};
use crate::config::CfConfig;
use crate::types::AppName;

/// Runs `cf` subcommands for one foundation.
#[derive(Debug)]
pub struct CfCli {
    binary: PathBuf,
    timeout: Duration,
    cf_home: TempDir,
}

impl CfCli {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Result<Self, CourierError> {
        let cf_home = tempfile::Builder::new()
            .prefix("cfdeploy-home-")
            .tempdir()
            .context(CfHomeSnafu)?;

        Ok(Self {
            binary: binary.into(),
            timeout,
            cf_home,
        })
    }

    pub fn cf_home(&self) -> &Path {
        self.cf_home.path()
    }

    /// Run one cf subcommand and return its combined stdout and stderr.
    async fn run(&self, args: &[&str], envs: &[(&str, &str)]) -> CourierResult {
        let command = format!("cf {}", args.join(" "));
        tracing::debug!(cf_home = %self.cf_home.path().display(), "running {}", command);

        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .env("CF_HOME", self.cf_home.path())
            .envs(envs.iter().copied())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(output) => output.context(SpawnSnafu {
                command: command.clone(),
            })?,
            Err(_) => {
                return Err(CourierError::TimedOut {
                    command,
                    timeout: self.timeout,
                });
            }
        };

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        if output.status.success() {
            Ok(combined)
        } else {
            Err(CourierError::Failed {
                command,
                status: output.status.to_string(),
                output: combined,
            })
        }
    }
}

#[async_trait]
impl Courier for CfCli {
    async fn login(&self, request: &LoginRequest<'_>) -> CourierResult {
        let mut api = vec!["api", request.foundation.as_str()];
        if request.skip_ssl {
            api.push("--skip-ssl-validation");
        }
        let mut output = self.run(&api, &[]).await?;

        // Credentials travel through the environment so they never show up
        // in a process listing or an error message.
        output.extend(
            self.run(
                &["auth"],
                &[
                    ("CF_USERNAME", request.credentials.username.as_str()),
                    ("CF_PASSWORD", request.credentials.password.as_str()),
                ],
            )
            .await?,
        );

        output.extend(
            self.run(&["target", "-o", request.org, "-s", request.space], &[])
                .await?,
        );
        Ok(output)
    }

    async fn exists(&self, app: &AppName) -> Result<bool, CourierError> {
        match self.run(&["app", app.as_str()], &[]).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn push(&self, app: &AppName, path: &Path, instances: u16) -> CourierResult {
        let path = path.to_string_lossy();
        let instances = instances.to_string();
        self.run(
            &["push", app.as_str(), "-p", &*path, "-i", instances.as_str()],
            &[],
        )
        .await
    }

    async fn rename(&self, from: &AppName, to: &AppName) -> CourierResult {
        self.run(&["rename", from.as_str(), to.as_str()], &[]).await
    }

    async fn start(&self, app: &AppName) -> CourierResult {
        self.run(&["start", app.as_str()], &[]).await
    }

    async fn stop(&self, app: &AppName) -> CourierResult {
        self.run(&["stop", app.as_str()], &[]).await
    }

    async fn delete(&self, app: &AppName) -> CourierResult {
        self.run(&["delete", app.as_str(), "-f"], &[]).await
    }

    async fn map_route(&self, app: &AppName, domain: &str, hostname: &str) -> CourierResult {
        self.run(&["map-route", app.as_str(), domain, "--hostname", hostname], &[])
            .await
    }

    async fn logout(&self) -> CourierResult {
        self.run(&["logout"], &[]).await
    }
}

/// Builds a `CfCli` with its own CF_HOME for every foundation.
#[derive(Debug, Clone)]
pub struct CfCliFactory {
    binary: PathBuf,
    timeout: Duration,
}

impl CfCliFactory {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn from_config(config: &CfConfig) -> Self {
        Self::new(config.binary.clone(), config.command_timeout)
    }
}

impl CourierFactory for CfCliFactory {
    fn build(&self) -> Result<Box<dyn Courier>, CourierError> {
        Ok(Box::new(CfCli::new(self.binary.clone(), self.timeout)?))
    }
}
