// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates image references and the fixture list.

use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::HashSet;

use super::FixtureConfig;

pub fn deserialize_image<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(serde::de::Error::custom("image cannot be empty"));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(serde::de::Error::custom(format!(
            "image cannot contain whitespace: {trimmed:?}"
        )));
    }
    Ok(trimmed.to_string())
}

pub fn deserialize_fixtures<'de, D>(deserializer: D) -> Result<NonEmpty<FixtureConfig>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let fixtures: Vec<FixtureConfig> = Vec::deserialize(deserializer)?;

    let mut seen = HashSet::new();
    for fixture in &fixtures {
        if !seen.insert(fixture.name.as_str()) {
            return Err(serde::de::Error::custom(format!(
                "duplicate fixture name: {}",
                fixture.name
            )));
        }
    }

    NonEmpty::from_vec(fixtures)
        .ok_or_else(|| serde::de::Error::custom("at least one fixture is required"))
}
