// ABOUTME: Error types for fixture launch, readiness and shutdown.
// ABOUTME: Carries a kind() for callers that branch on the failure class.

use chrono::{DateTime, Utc};

use super::readiness::ReadinessError;
use crate::runtime::{PortError, RuntimeError};

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// Another fixture with this name is active in the same manager.
    #[error("fixture '{name}' is already active (since {since})")]
    NameInUse { name: String, since: DateTime<Utc> },

    #[error("could not allocate a host port: {0}")]
    Port(#[from] PortError),

    #[error("could not launch container: {0}")]
    Launch(#[from] RuntimeError),

    #[error("container never became ready: {0}")]
    Readiness(#[from] ReadinessError),

    #[error("shutdown wait cancelled")]
    ShutdownCancelled,
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureErrorKind {
    NameInUse,
    PortAllocation,
    Launch,
    NeverReady,
    ProcessExited,
    Cancelled,
    Io,
}

impl FixtureError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> FixtureErrorKind {
        match self {
            FixtureError::NameInUse { .. } => FixtureErrorKind::NameInUse,
            FixtureError::Port(_) => FixtureErrorKind::PortAllocation,
            FixtureError::Launch(_) => FixtureErrorKind::Launch,
            FixtureError::Readiness(source) => match source {
                ReadinessError::NeverReady { .. } => FixtureErrorKind::NeverReady,
                ReadinessError::ProcessExited { .. } => FixtureErrorKind::ProcessExited,
                ReadinessError::Cancelled { .. } => FixtureErrorKind::Cancelled,
                ReadinessError::Io(_) => FixtureErrorKind::Io,
            },
            FixtureError::ShutdownCancelled => FixtureErrorKind::Cancelled,
        }
    }
}
