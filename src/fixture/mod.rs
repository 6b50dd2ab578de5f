// ABOUTME: Container fixture lifecycle using the type state pattern.
// ABOUTME: Exports the container spec, probes, readiness waiter, registry, states and manager.

mod error;
mod handle;
mod manager;
mod probe;
mod readiness;
mod registry;
mod signal;
mod spec;
mod state;
mod transitions;

pub use error::{FixtureError, FixtureErrorKind};
pub use handle::{Fixture, RunningFixture, ShutdownReport};
pub use manager::FixtureManager;
pub use probe::{FnProbe, ProbeError, ReadinessProbe, TcpProbe, probe_fn};
pub use readiness::{ReadinessError, ReadinessWaiter, ReadyReport};
pub use registry::{FixtureRegistry, NameLease};
pub use spec::ContainerSpec;
pub use state::{AwaitingReadiness, Live, Process, Ready, ShuttingDown, Unstarted};
pub use transitions::TransitionResult;
