// ABOUTME: Runtime plumbing: CLI client, host discovery and port allocation.
// ABOUTME: Everything that touches the container runtime or the host network lives here.

mod client;
mod error;
mod host;
mod port;
mod types;

pub use client::{Removal, RuntimeClient, remove_args, run_args};
pub use error::{RuntimeError, RuntimeErrorKind};
pub use host::HostResolver;
pub use port::{PortError, free_port, free_port_for};
pub use types::{DEFAULT_MACHINE_ENV, LOOPBACK_HOST, RuntimeConfig, RuntimeType};
