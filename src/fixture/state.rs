// ABOUTME: Fixture state types for the type state pattern.
// ABOUTME: Live states own the runtime client process and the published address.

use chrono::{DateTime, Utc};
use tokio::process::Child;

use super::readiness::ReadyReport;

/// A running runtime client and where its container is reachable.
#[derive(Debug)]
pub struct Process {
    pub(crate) host: String,
    pub(crate) host_port: u16,
    pub(crate) child: Child,
    pub(crate) started_at: DateTime<Utc>,
}

impl Process {
    pub(crate) fn new(host: String, host_port: u16, child: Child) -> Self {
        Self {
            host,
            host_port,
            child,
            started_at: Utc::now(),
        }
    }

    /// `host:port` as handed to readiness probes and callers.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.host_port)
    }
}

/// Initial state: spec known, nothing started.
/// Available actions: `launch()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Unstarted;

/// Client spawned, container not yet confirmed reachable.
/// Available actions: `await_ready()`, `abort()`
#[derive(Debug)]
pub struct AwaitingReadiness(pub(crate) Process);

/// Readiness probe succeeded.
/// Available actions: `shutdown()`, `begin_shutdown()`, `abort()`
#[derive(Debug)]
pub struct Ready {
    pub(crate) process: Process,
    pub(crate) readiness: ReadyReport,
}

/// Interrupt and terminate signals sent, waiting for the client to exit.
/// Available actions: `wait_for_exit()`, `abort()`
#[derive(Debug)]
pub struct ShuttingDown(pub(crate) Process);

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::AwaitingReadiness {}
    impl Sealed for super::Ready {}
    impl Sealed for super::ShuttingDown {}
}

/// States that own a running client process.
pub trait Live: sealed::Sealed {
    fn process(&self) -> &Process;
    fn process_mut(&mut self) -> &mut Process;
}

impl Live for AwaitingReadiness {
    fn process(&self) -> &Process {
        &self.0
    }

    fn process_mut(&mut self) -> &mut Process {
        &mut self.0
    }
}

impl Live for Ready {
    fn process(&self) -> &Process {
        &self.process
    }

    fn process_mut(&mut self) -> &mut Process {
        &mut self.process
    }
}

impl Live for ShuttingDown {
    fn process(&self) -> &Process {
        &self.0
    }

    fn process_mut(&mut self) -> &mut Process {
        &mut self.0
    }
}
