// ABOUTME: Generic fixture struct parameterized by lifecycle state.
// ABOUTME: Live states expose the resolved address and process details.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::process::ExitStatus;

use super::registry::NameLease;
use super::spec::ContainerSpec;
use super::state::{Live, Ready};
use crate::config::StopConfig;
use crate::diagnostics::{Diagnostics, Warning};
use crate::runtime::RuntimeClient;
use crate::types::ContainerName;

/// A container fixture, parameterized by its current state.
///
/// The state type `S` carries the running client process once one exists,
/// so an address can only be asked of a fixture that actually has one.
/// Every transition consumes the fixture; a handle that is dropped without
/// `shutdown()` or `abort()` leaves the container running.
#[derive(Debug)]
pub struct Fixture<S> {
    pub(crate) spec: ContainerSpec,
    pub(crate) client: RuntimeClient,
    pub(crate) stop: StopConfig,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) lease: Option<NameLease>,
    pub(crate) state: S,
}

/// A fixture whose service answered its readiness probe.
pub type RunningFixture = Fixture<Ready>;

impl<S> Fixture<S> {
    pub fn name(&self) -> &ContainerName {
        self.spec.name()
    }

    pub fn image(&self) -> &str {
        self.spec.image()
    }

    pub fn args(&self) -> &[String] {
        self.spec.extra_args()
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        self.spec.environment()
    }

    pub fn spec(&self) -> &ContainerSpec {
        &self.spec
    }

    /// Non-fatal problems seen so far.
    pub fn warnings(&self) -> &[Warning] {
        self.diagnostics.warnings()
    }

    /// Move to a new state, keeping everything else.
    pub(crate) fn map_state<T>(self, f: impl FnOnce(S) -> T) -> Fixture<T> {
        Fixture {
            spec: self.spec,
            client: self.client,
            stop: self.stop,
            diagnostics: self.diagnostics,
            lease: self.lease,
            state: f(self.state),
        }
    }
}

impl<S: Live> Fixture<S> {
    /// `host:port` where the container's target port is published.
    pub fn addr(&self) -> String {
        self.state.process().addr()
    }

    pub fn host(&self) -> &str {
        &self.state.process().host
    }

    pub fn host_port(&self) -> u16 {
        self.state.process().host_port
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.state.process().started_at
    }

    /// OS pid of the runtime client, if it has not been reaped.
    pub fn pid(&self) -> Option<u32> {
        self.state.process().child.id()
    }
}

/// What happened when a fixture was torn down.
#[derive(Debug)]
pub struct ShutdownReport {
    pub name: ContainerName,
    /// Exit status of the runtime client, if it could be collected.
    pub exit_status: Option<ExitStatus>,
    /// Whether the forced removal succeeded.
    pub removed: bool,
    pub warnings: Vec<Warning>,
}

impl ShutdownReport {
    pub fn is_clean(&self) -> bool {
        self.removed && self.warnings.is_empty()
    }
}
