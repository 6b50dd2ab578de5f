// ABOUTME: Fixture shutdown configuration.
// ABOUTME: Controls the pause between the interrupt and terminate signals.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StopConfig {
    /// How long to wait for the runtime client to exit after SIGINT before
    /// sending SIGTERM. Zero sends both back to back.
    #[serde(default, with = "humantime_serde")]
    pub interrupt_grace: Duration,
}

impl StopConfig {
    pub fn interrupt_grace(mut self, grace: Duration) -> Self {
        self.interrupt_grace = grace;
        self
    }
}
