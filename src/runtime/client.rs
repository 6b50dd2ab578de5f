// ABOUTME: Thin driver for the runtime's CLI client (docker/podman).
// ABOUTME: Builds `run` and `rm --force` argument vectors and executes them.

use snafu::ResultExt;
use std::process::Stdio;
use tokio::process::{Child, Command};

use super::error::{RemoveSnafu, RuntimeError, SpawnSnafu};
use super::types::RuntimeConfig;
use crate::fixture::ContainerSpec;
use crate::types::ContainerName;

/// Outcome of a forced removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The runtime removed a container with this name.
    Removed,
    /// The runtime reported there was nothing to remove.
    NotFound,
}

/// Drives one runtime client binary.
#[derive(Debug, Clone)]
pub struct RuntimeClient {
    program: String,
}

impl RuntimeClient {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(config.client_program())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Start `<client> run ...` in the background.
    ///
    /// Returns as soon as the child process exists; the service inside the
    /// container is not ready yet. Standard streams are detached so an idle
    /// child never blocks on a full pipe.
    pub fn spawn_run(&self, spec: &ContainerSpec, host_port: u16) -> Result<Child, RuntimeError> {
        let args = run_args(spec, host_port);
        tracing::debug!(program = %self.program, ?args, "starting runtime client");

        Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context(SpawnSnafu {
                program: self.program.as_str(),
                subcommand: "run",
            })
    }

    /// Run `<client> rm --force <name>` and wait for it.
    ///
    /// A "no such container" answer is reported as [`Removal::NotFound`]
    /// rather than an error.
    pub async fn remove(&self, name: &ContainerName) -> Result<Removal, RuntimeError> {
        let args = remove_args(name);
        tracing::debug!(program = %self.program, ?args, "removing container");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .context(SpawnSnafu {
                program: self.program.as_str(),
                subcommand: "rm",
            })?;

        if output.status.success() {
            return Ok(Removal::Removed);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.to_lowercase().contains("no such container") {
            tracing::debug!(%name, "nothing to remove");
            return Ok(Removal::NotFound);
        }

        RemoveSnafu {
            program: self.program.as_str(),
            name: name.as_str(),
            status: output.status,
            stderr,
        }
        .fail()
    }
}

/// Argument vector for `run`, in the order the runtime's parser expects:
/// extra args, name, environment, port publishing, then the image last.
pub fn run_args(spec: &ContainerSpec, host_port: u16) -> Vec<String> {
    let mut args = Vec::with_capacity(6 + spec.extra_args().len() + 2 * spec.environment().len());
    args.push("run".to_string());
    args.extend(spec.extra_args().iter().cloned());
    args.push(format!("--name={}", spec.name()));
    for (key, value) in spec.environment() {
        args.push("-e".to_string());
        args.push(format!("{key}={value}"));
    }
    args.push("-p".to_string());
    args.push(spec.port().publish_spec(host_port));
    args.push(spec.image().to_string());
    args
}

/// Argument vector for forced removal.
pub fn remove_args(name: &ContainerName) -> Vec<String> {
    vec!["rm".to_string(), "--force".to_string(), name.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RuntimeErrorKind;
    use crate::types::ContainerPort;

    fn name(value: &str) -> ContainerName {
        ContainerName::new(value).unwrap()
    }

    fn tcp(port: u16) -> ContainerPort {
        ContainerPort::tcp(port).unwrap()
    }

    #[test]
    fn run_args_follow_cli_order() {
        let spec = ContainerSpec::new("postgres:16", name("fixture-a"), tcp(5432))
            .arg("--rm")
            .arg("--shm-size=256m");

        assert_eq!(
            run_args(&spec, 49153),
            vec![
                "run",
                "--rm",
                "--shm-size=256m",
                "--name=fixture-a",
                "-p",
                "49153:5432",
                "postgres:16",
            ]
        );
    }

    #[test]
    fn run_args_carry_caller_env_only() {
        let spec = ContainerSpec::new("X", name("fixture-env"), tcp(5432))
            .env("POSTGRES_USER", "app")
            .env("POSTGRES_PASSWORD", "secret");

        let args = run_args(&spec, 40000);
        assert_eq!(
            args,
            vec![
                "run",
                "--name=fixture-env",
                "-e",
                "POSTGRES_PASSWORD=secret",
                "-e",
                "POSTGRES_USER=app",
                "-p",
                "40000:5432",
                "X",
            ]
        );
    }

    #[test]
    fn run_args_without_env_have_no_defaults() {
        let spec = ContainerSpec::new("X", name("bare"), tcp(80));
        assert!(!run_args(&spec, 1234).iter().any(|a| a == "-e"));
    }

    #[test]
    fn udp_ports_publish_with_suffix() {
        let port = ContainerPort::udp(53).unwrap();
        let spec = ContainerSpec::new("coredns/coredns", name("dns"), port);
        let args = run_args(&spec, 5353);
        assert!(args.contains(&"5353:53/udp".to_string()));
    }

    #[test]
    fn remove_args_force_by_name() {
        assert_eq!(remove_args(&name("fixture-a")), vec!["rm", "--force", "fixture-a"]);
    }

    #[tokio::test]
    async fn missing_client_is_a_spawn_error() {
        let client = RuntimeClient::new("/nonexistent/dockfix-client");
        let err = client.remove(&name("anything")).await.unwrap_err();
        assert_eq!(err.kind(), RuntimeErrorKind::ClientNotFound);

        let spec = ContainerSpec::new("X", name("anything"), tcp(80));
        let err = client.spawn_run(&spec, 1234).unwrap_err();
        assert_eq!(err.kind(), RuntimeErrorKind::ClientNotFound);
        assert!(err.to_string().contains("run"));
    }
}
