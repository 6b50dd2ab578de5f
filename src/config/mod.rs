// ABOUTME: Configuration types and parsing for dockfix.yml.
// ABOUTME: Handles YAML parsing, discovery and fixture lookup.

mod deserialize;
mod env_value;
mod fixture;
mod init;
mod readiness;
mod stop;

pub use env_value::{EnvValue, resolve_env_map};
pub use fixture::{FixtureConfig, ProbeConfig};
pub use init::init_config;
pub use readiness::{DEFAULT_PROBE_INTERVAL, ReadinessPolicy};
pub use stop::StopConfig;

use crate::error::{Error, Result};
use crate::runtime::RuntimeConfig;
use deserialize::deserialize_fixtures;
use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "dockfix.yml";
pub const CONFIG_FILENAME_ALT: &str = "dockfix.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".dockfix/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub readiness: ReadinessPolicy,

    #[serde(default)]
    pub stop: StopConfig,

    #[serde(deserialize_with = "deserialize_fixtures")]
    pub fixtures: NonEmpty<FixtureConfig>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
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

    pub fn fixture(&self, name: &str) -> Result<&FixtureConfig> {
        self.fixtures
            .iter()
            .find(|f| f.name.as_str() == name)
            .ok_or_else(|| Error::UnknownFixture(name.to_string()))
    }
}
