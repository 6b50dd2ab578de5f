// ABOUTME: Per-fixture configuration entries from dockfix.yml.
// ABOUTME: Converts an entry into a ContainerSpec and its readiness probe.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

use super::deserialize::deserialize_image;
use super::env_value::{EnvValue, resolve_env_map};
use crate::error::Result;
use crate::fixture::{ContainerSpec, TcpProbe};
use crate::types::{ContainerName, ContainerPort};

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureConfig {
    pub name: ContainerName,

    #[serde(deserialize_with = "deserialize_image")]
    pub image: String,

    pub port: ContainerPort,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub env: BTreeMap<String, EnvValue>,

    #[serde(default)]
    pub probe: ProbeConfig,
}

impl FixtureConfig {
    /// Build the launch spec, resolving environment references now.
    pub fn to_spec(&self) -> Result<ContainerSpec> {
        let env = resolve_env_map(&self.env)?;
        Ok(
            ContainerSpec::new(self.image.clone(), self.name.clone(), self.port)
                .args(self.args.iter().cloned())
                .envs(env),
        )
    }
}

/// TCP readiness probe settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Require the first bytes sent by the service to start with this.
    #[serde(default)]
    pub banner: Option<String>,

    #[serde(default = "default_connect_timeout", with = "humantime_serde")]
    pub connect_timeout: Duration,
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(2)
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            banner: None,
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl ProbeConfig {
    pub fn to_probe(&self) -> TcpProbe {
        let probe = TcpProbe::new().connect_timeout(self.connect_timeout);
        match &self.banner {
            Some(banner) => probe.banner(banner.clone()),
            None => probe,
        }
    }
}
