// ABOUTME: Polls a readiness probe at a fixed interval until it succeeds.
// ABOUTME: Bounded by the policy, cancellable, and aware of an early process exit.

use std::process::ExitStatus;
use std::time::Duration;
use tokio::process::Child;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::probe::ReadinessProbe;
use crate::config::ReadinessPolicy;

/// How a successful wait went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyReport {
    /// Probe calls made, including the successful one.
    pub attempts: u32,
    /// Time from the start of the wait to the successful probe.
    pub elapsed: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum ReadinessError {
    #[error("not ready after {attempts} attempt(s) over {elapsed:?}: {last_error}")]
    NeverReady {
        attempts: u32,
        elapsed: Duration,
        last_error: String,
    },

    #[error("readiness wait cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },

    #[error("runtime client exited with {status} before the container became ready")]
    ProcessExited { status: ExitStatus, attempts: u32 },

    #[error("failed to check the runtime client: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs the probe loop for one address.
#[derive(Debug, Clone, Default)]
pub struct ReadinessWaiter {
    policy: ReadinessPolicy,
}

impl ReadinessWaiter {
    pub fn new(policy: ReadinessPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ReadinessPolicy {
        &self.policy
    }

    /// Probe `addr` until it reports success.
    ///
    /// The probe runs at least once and never again after succeeding; between
    /// failures the waiter sleeps `policy.interval`. When `process` is given,
    /// a non-zero exit ends the wait with [`ReadinessError::ProcessExited`];
    /// a clean exit (a detached run) only stops the process check.
    pub async fn wait(
        &self,
        addr: &str,
        probe: &dyn ReadinessProbe,
        cancel: &CancellationToken,
        mut process: Option<&mut Child>,
    ) -> Result<ReadyReport, ReadinessError> {
        let start = Instant::now();
        let deadline = self.policy.timeout.map(|timeout| start + timeout);
        let mut attempts = 0u32;

        if !self.policy.start_period.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => return Err(ReadinessError::Cancelled { attempts }),
                _ = tokio::time::sleep(self.policy.start_period) => {}
            }
        }

        loop {
            attempts += 1;

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ReadinessError::Cancelled { attempts }),
                result = probe.probe(addr) => result,
                _ = sleep_until(deadline) => Err("probe still running at the deadline".into()),
            };

            let last_error = match outcome {
                Ok(()) => {
                    return Ok(ReadyReport {
                        attempts,
                        elapsed: start.elapsed(),
                    });
                }
                Err(e) => e.to_string(),
            };
            tracing::debug!(%addr, attempts, error = %last_error, "not ready yet");

            let exited = match process.as_deref_mut() {
                Some(child) => child.try_wait()?,
                None => None,
            };
            if let Some(status) = exited {
                if !status.success() {
                    return Err(ReadinessError::ProcessExited { status, attempts });
                }
                // Detached clients exit 0 while the container keeps running.
                tracing::debug!(%addr, attempts, "runtime client detached, polling continues");
                process = None;
            }

            let attempts_exhausted = self.policy.max_attempts.is_some_and(|max| attempts >= max);
            let deadline_passed = deadline.is_some_and(|d| Instant::now() >= d);
            if attempts_exhausted || deadline_passed {
                return Err(ReadinessError::NeverReady {
                    attempts,
                    elapsed: start.elapsed(),
                    last_error,
                });
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(ReadinessError::Cancelled { attempts }),
                _ = tokio::time::sleep(self.policy.interval) => {}
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
