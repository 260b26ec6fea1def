// ABOUTME: Validated API endpoint of a single foundation.
// ABOUTME: Accepts http(s) URLs with a host; trailing slashes are normalised away.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FoundationUrlError {
    #[error("foundation URL cannot be empty")]
    Empty,

    #[error("foundation URL must start with http:// or https://: {0}")]
    UnsupportedScheme(String),

    #[error("foundation URL has no host: {0}")]
    MissingHost(String),

    #[error("foundation URL cannot contain whitespace: {0}")]
    Whitespace(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FoundationUrl(String);

impl FoundationUrl {
    pub fn parse(value: &str) -> Result<Self, FoundationUrlError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(FoundationUrlError::Empty);
        }

        if value.chars().any(char::is_whitespace) {
            return Err(FoundationUrlError::Whitespace(value.to_string()));
        }

        let rest = value
            .strip_prefix("https://")
            .or_else(|| value.strip_prefix("http://"))
            .ok_or_else(|| FoundationUrlError::UnsupportedScheme(value.to_string()))?;

        let host = rest.split('/').next().unwrap_or_default();
        if host.is_empty() {
            return Err(FoundationUrlError::MissingHost(value.to_string()));
        }

        Ok(Self(value.trim_end_matches('/').to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Host portion of the URL, used to label output and logs.
    pub fn host(&self) -> &str {
        let rest = self
            .0
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.0);
        rest.split('/').next().unwrap_or(rest)
    }
}

impl fmt::Display for FoundationUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
