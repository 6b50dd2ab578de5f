// ABOUTME: Command module aggregator for the dockfix CLI.
// ABOUTME: Re-exports the fixture and runtime command handlers.

mod list;
mod runtime;
mod up;

pub use list::list;
pub use runtime::{host, port, remove};
pub use up::up;
