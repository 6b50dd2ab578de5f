// ABOUTME: Validated domain types for fixture specifications.
// ABOUTME: Container names and published ports are checked before reaching the runtime.

mod container_name;
mod container_port;

pub use container_name::{ContainerName, ContainerNameError};
pub use container_port::{ContainerPort, ParsePortError, Protocol};
