// ABOUTME: Readiness polling policy for launched fixtures.
// ABOUTME: Fixed interval between probes, optionally bounded by time or attempts.

use serde::Deserialize;
use std::time::Duration;

/// Default pause between two probe attempts.
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_millis(150);

/// How long and how often to probe a fixture before giving up.
///
/// Leaving both `timeout` and `max_attempts` unset polls forever; use
/// [`ReadinessPolicy::unbounded`] for that explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReadinessPolicy {
    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,

    /// Delay before the first probe.
    #[serde(default, with = "humantime_serde")]
    pub start_period: Duration,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Option<Duration>,

    #[serde(default)]
    pub max_attempts: Option<u32>,
}

fn default_interval() -> Duration {
    DEFAULT_PROBE_INTERVAL
}

fn default_timeout() -> Option<Duration> {
    Some(Duration::from_secs(120))
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        ReadinessPolicy {
            interval: default_interval(),
            start_period: Duration::ZERO,
            timeout: default_timeout(),
            max_attempts: None,
        }
    }
}

impl ReadinessPolicy {
    /// Probe at the default interval with no time or attempt limit.
    pub fn unbounded() -> Self {
        ReadinessPolicy {
            timeout: None,
            ..Default::default()
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn start_period(mut self, delay: Duration) -> Self {
        self.start_period = delay;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn is_bounded(&self) -> bool {
        self.timeout.is_some() || self.max_attempts.is_some()
    }
}
