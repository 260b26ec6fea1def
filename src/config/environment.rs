// ABOUTME: A named group of foundations deployed to as one unit.
// ABOUTME: Carries the ordered foundation list plus per-environment deployment policy.

use std::collections::HashMap;

use nonempty::NonEmpty;
use serde::Deserialize;

use super::deserialize::deserialize_foundations;
use crate::types::FoundationUrl;

#[derive(Debug, Clone, Deserialize)]
pub struct Environment {
    pub name: String,

    /// Foundations in deployment order; the first one is logged into alone
    /// before any other is contacted.
    #[serde(deserialize_with = "deserialize_foundations")]
    pub foundations: NonEmpty<FoundationUrl>,

    /// Shared domain new app versions get a route on.
    #[serde(default)]
    pub domain: Option<String>,

    #[serde(default)]
    pub skip_ssl: bool,

    /// Leave a failed push in place instead of restoring the previous version.
    #[serde(default)]
    pub disable_rollback: bool,

    /// Instance count used when a push doesn't ask for one.
    #[serde(default = "default_instances")]
    pub instances: u16,

    #[serde(default)]
    pub custom_params: HashMap<String, String>,
}

fn default_instances() -> u16 {
    1
}

impl Environment {
    pub fn new(name: impl Into<String>, foundations: NonEmpty<FoundationUrl>) -> Self {
        Environment {
            name: name.into(),
            foundations,
            domain: None,
            skip_ssl: false,
            disable_rollback: false,
            instances: default_instances(),
            custom_params: HashMap::new(),
        }
    }
}
