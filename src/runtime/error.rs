// ABOUTME: Runtime client error types with SNAFU pattern.
// ABOUTME: Separates client start failures from forced-removal failures.

use snafu::Snafu;
use std::process::ExitStatus;

/// Failure talking to the runtime's CLI client.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RuntimeError {
    #[snafu(display("failed to start `{program} {subcommand}`: {source}"))]
    Spawn {
        program: String,
        subcommand: String,
        source: std::io::Error,
    },

    #[snafu(display("`{program} rm --force {name}` failed ({status}): {stderr}"))]
    Remove {
        program: String,
        name: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// The client binary does not exist or is not on PATH.
    ClientNotFound,
    /// The client binary exists but could not be started.
    SpawnFailed,
    /// The runtime refused to remove the named container.
    RemoveFailed,
}

impl RuntimeError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> RuntimeErrorKind {
        match self {
            RuntimeError::Spawn { source, .. }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                RuntimeErrorKind::ClientNotFound
            }
            RuntimeError::Spawn { .. } => RuntimeErrorKind::SpawnFailed,
            RuntimeError::Remove { .. } => RuntimeErrorKind::RemoveFailed,
        }
    }
}
