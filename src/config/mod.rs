// ABOUTME: Configuration types and parsing for cfdeploy.yml.
// ABOUTME: Handles YAML parsing, credential resolution, and environment lookup.

mod deserialize;
mod env_value;
mod environment;
mod init;

pub use env_value::EnvValue;
pub use environment::Environment;
pub use init::init_config;

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "cfdeploy.yml";
pub const CONFIG_FILENAME_ALT: &str = "cfdeploy.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".cfdeploy/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub environments: Vec<Environment>,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub cf: CfConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_username")]
    pub username: EnvValue,
    #[serde(default = "default_password")]
    pub password: EnvValue,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
        }
    }
}

fn default_username() -> EnvValue {
    EnvValue::from_env("CF_USERNAME")
}

fn default_password() -> EnvValue {
    EnvValue::from_env("CF_PASSWORD")
}

impl CredentialsConfig {
    pub fn resolve(&self) -> Result<Credentials> {
        Ok(Credentials {
            username: self.username.resolve()?,
            password: self.password.resolve()?,
        })
    }
}

/// Resolved platform credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CfConfig {
    #[serde(default = "default_cf_binary")]
    pub binary: PathBuf,

    /// Upper bound for any single cf command.
    #[serde(default = "default_command_timeout", with = "humantime_serde")]
    pub command_timeout: Duration,
}

impl Default for CfConfig {
    fn default() -> Self {
        Self {
            binary: default_cf_binary(),
            command_timeout: default_command_timeout(),
        }
    }
}

fn default_cf_binary() -> PathBuf {
    PathBuf::from("cf")
}

fn default_command_timeout() -> Duration {
    Duration::from_secs(600)
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Look up an environment by name.
    pub fn environment(&self, name: &str) -> Result<&Environment> {
        self.environments
            .iter()
            .find(|env| env.name == name)
            .ok_or_else(|| Error::UnknownEnvironment(name.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if self.environments.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one environment is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for env in &self.environments {
            if env.name.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "environment name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(env.name.as_str()) {
                return Err(Error::DuplicateEnvironment(env.name.clone()));
            }
            if env.instances == 0 {
                return Err(Error::InvalidConfig(format!(
                    "environment {} must run at least one instance",
                    env.name
                )));
            }
        }

        Ok(())
    }
}
