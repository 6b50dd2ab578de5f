// ABOUTME: Runtime client configuration for Docker and Podman.
// ABOUTME: Picks the client binary and host-discovery tool per runtime type.

use serde::{Deserialize, Serialize};

/// Environment variable naming the docker-machine VM that hosts containers.
pub const DEFAULT_MACHINE_ENV: &str = "DOCKER_MACHINE_NAME";

/// Host used when no discovery tool answers.
pub const LOOPBACK_HOST: &str = "localhost";

/// The container runtime type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeType {
    #[default]
    Docker,
    Podman,
}

impl RuntimeType {
    /// Default CLI client binary for this runtime.
    pub fn default_client(&self) -> &'static str {
        match self {
            RuntimeType::Docker => "docker",
            RuntimeType::Podman => "podman",
        }
    }

    /// Default tool answering `<tool> ip <machine>`, if the runtime has one.
    pub fn default_host_discovery(&self) -> Option<&'static str> {
        match self {
            RuntimeType::Docker => Some("docker-machine"),
            RuntimeType::Podman => None,
        }
    }
}

impl std::fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeType::Docker => write!(f, "docker"),
            RuntimeType::Podman => write!(f, "podman"),
        }
    }
}

/// How to reach the container runtime.
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    /// Runtime type; selects defaults for the fields below.
    #[serde(default)]
    pub runtime: RuntimeType,

    /// Explicit client binary (overrides the runtime default).
    #[serde(default)]
    pub client: Option<String>,

    /// Explicit host-discovery binary (overrides the runtime default).
    #[serde(default)]
    pub host_discovery: Option<String>,

    /// Set to false to skip host discovery entirely.
    #[serde(default = "default_discover_host")]
    pub discover_host: bool,

    /// Environment variable holding the machine name passed to discovery.
    #[serde(default = "default_machine_env")]
    pub machine_env: String,

    /// Host used when discovery is skipped or fails.
    #[serde(default = "default_fallback_host")]
    pub fallback_host: String,
}

fn default_discover_host() -> bool {
    true
}

fn default_machine_env() -> String {
    DEFAULT_MACHINE_ENV.to_string()
}

fn default_fallback_host() -> String {
    LOOPBACK_HOST.to_string()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            runtime: RuntimeType::default(),
            client: None,
            host_discovery: None,
            discover_host: default_discover_host(),
            machine_env: default_machine_env(),
            fallback_host: default_fallback_host(),
        }
    }
}

impl RuntimeConfig {
    pub fn for_runtime(runtime: RuntimeType) -> Self {
        RuntimeConfig {
            runtime,
            ..Default::default()
        }
    }

    /// The client binary to invoke.
    pub fn client_program(&self) -> &str {
        self.client
            .as_deref()
            .unwrap_or_else(|| self.runtime.default_client())
    }

    /// The host-discovery binary, or None when discovery is disabled.
    pub fn discovery_program(&self) -> Option<&str> {
        if !self.discover_host {
            return None;
        }
        self.host_discovery
            .as_deref()
            .or_else(|| self.runtime.default_host_discovery())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docker_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.client_program(), "docker");
        assert_eq!(config.discovery_program(), Some("docker-machine"));
        assert_eq!(config.machine_env, "DOCKER_MACHINE_NAME");
        assert_eq!(config.fallback_host, "localhost");
    }

    #[test]
    fn podman_has_no_discovery_tool() {
        let config = RuntimeConfig::for_runtime(RuntimeType::Podman);
        assert_eq!(config.client_program(), "podman");
        assert_eq!(config.discovery_program(), None);
    }

    #[test]
    fn explicit_client_overrides_runtime_default() {
        let config = RuntimeConfig {
            client: Some("/usr/local/bin/docker".to_string()),
            ..Default::default()
        };
        assert_eq!(config.client_program(), "/usr/local/bin/docker");
    }

    #[test]
    fn discovery_can_be_disabled() {
        let config = RuntimeConfig {
            discover_host: false,
            host_discovery: Some("docker-machine".to_string()),
            ..Default::default()
        };
        assert_eq!(config.discovery_program(), None);
    }
}
