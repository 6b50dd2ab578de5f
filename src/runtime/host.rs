// ABOUTME: Resolves the host on which published container ports are reachable.
// ABOUTME: Asks `<discovery> ip <machine>` and falls back to the loopback host.

use std::process::Stdio;
use tokio::process::Command;

use super::types::{DEFAULT_MACHINE_ENV, LOOPBACK_HOST, RuntimeConfig};

/// Finds the address of the machine running the containers.
///
/// Resolution never fails: a missing tool, a non-zero exit, an unset machine
/// variable or empty output all yield the fallback host.
#[derive(Debug, Clone)]
pub struct HostResolver {
    discovery: Option<String>,
    machine_env: String,
    machine: Option<String>,
    fallback: String,
}

impl HostResolver {
    pub fn new(discovery: Option<String>) -> Self {
        Self {
            discovery,
            machine_env: DEFAULT_MACHINE_ENV.to_string(),
            machine: None,
            fallback: LOOPBACK_HOST.to_string(),
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(config.discovery_program().map(str::to_string))
            .machine_env(&config.machine_env)
            .fallback(&config.fallback_host)
    }

    /// A resolver that always answers `host` without running anything.
    pub fn fixed(host: impl Into<String>) -> Self {
        Self::new(None).fallback(host)
    }

    pub fn machine_env(mut self, var: impl Into<String>) -> Self {
        self.machine_env = var.into();
        self
    }

    /// Pin the machine name instead of reading it from the environment.
    pub fn machine(mut self, name: impl Into<String>) -> Self {
        self.machine = Some(name.into());
        self
    }

    pub fn fallback(mut self, host: impl Into<String>) -> Self {
        self.fallback = host.into();
        self
    }

    pub fn fallback_host(&self) -> &str {
        &self.fallback
    }

    /// The machine name discovery would be asked about, if any.
    pub fn machine_name(&self) -> Option<String> {
        self.machine
            .clone()
            .or_else(|| std::env::var(&self.machine_env).ok())
            .filter(|name| !name.trim().is_empty())
    }

    pub async fn resolve(&self) -> String {
        let (Some(program), Some(machine)) = (self.discovery.as_deref(), self.machine_name())
        else {
            return self.fallback.clone();
        };

        match discover(program, &machine).await {
            Some(host) => {
                tracing::debug!(%host, %machine, "resolved container host");
                host
            }
            None => {
                tracing::debug!(%machine, fallback = %self.fallback, "host discovery failed");
                self.fallback.clone()
            }
        }
    }
}

impl Default for HostResolver {
    fn default() -> Self {
        Self::from_config(&RuntimeConfig::default())
    }
}

async fn discover(program: &str, machine: &str) -> Option<String> {
    let output = Command::new(program)
        .arg("ip")
        .arg(machine)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let host = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!host.is_empty()).then_some(host)
}
