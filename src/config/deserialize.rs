// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates foundation URLs and requires at least one per environment.

use nonempty::NonEmpty;
use serde::Deserialize;

use crate::types::FoundationUrl;

pub fn deserialize_foundations<'de, D>(deserializer: D) -> Result<NonEmpty<FoundationUrl>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<String> = Vec::deserialize(deserializer)?;
    let foundations = values
        .iter()
        .map(|value| FoundationUrl::parse(value))
        .collect::<Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)?;

    NonEmpty::from_vec(foundations)
        .ok_or_else(|| serde::de::Error::custom("at least one foundation is required"))
}
