// ABOUTME: State transition methods for the fixture lifecycle.
// ABOUTME: Each method consumes self and returns the next state on success.

use std::io::ErrorKind;
use std::process::ExitStatus;
use tokio_util::sync::CancellationToken;

use super::Fixture;
use super::error::FixtureError;
use super::handle::ShutdownReport;
use super::probe::ReadinessProbe;
use super::readiness::{ReadinessWaiter, ReadyReport};
use super::registry::NameLease;
use super::signal::{StopSignal, send_signal};
use super::spec::ContainerSpec;
use super::state::{AwaitingReadiness, Live, Process, Ready, ShuttingDown, Unstarted};
use crate::config::{ReadinessPolicy, StopConfig};
use crate::diagnostics::{Diagnostics, Warning};
use crate::runtime::{HostResolver, Removal, RuntimeClient, free_port_for};

/// Result type for transitions that hand the fixture back on failure so the
/// caller can still tear it down.
pub type TransitionResult<T, S> = Result<Fixture<T>, (Fixture<S>, FixtureError)>;

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S: Live> Fixture<S> {
    /// Signal the client, recording a warning instead of failing.
    fn signal(&mut self, signal: StopSignal) {
        if let Err(e) = send_signal(&mut self.state.process_mut().child, signal) {
            let warning = Warning::signal(self.spec.name().as_str(), format!("{signal:?}: {e}"));
            self.diagnostics.warn(warning);
        }
    }

    /// Remove the container once the client is gone and build the report.
    async fn finish(mut self, status: std::io::Result<ExitStatus>) -> ShutdownReport {
        let name = self.spec.name().clone();

        let exit_status = match status {
            Ok(status) => Some(status),
            Err(e) => {
                self.diagnostics.warn(Warning::wait(name.as_str(), &e));
                None
            }
        };

        let removed = match self.client.remove(&name).await {
            Ok(Removal::Removed) => true,
            Ok(Removal::NotFound) => {
                tracing::debug!(fixture = %name, "container already gone");
                true
            }
            Err(e) => {
                self.diagnostics.warn(Warning::cleanup_removal(name.as_str(), &e));
                false
            }
        };

        // The name stays claimed until the container is gone.
        drop(self.lease);

        tracing::info!(fixture = %name, ?exit_status, removed, "fixture stopped");
        ShutdownReport {
            name,
            exit_status,
            removed,
            warnings: self.diagnostics.into_warnings(),
        }
    }

    /// Kill the client outright, wait for it and remove the container.
    ///
    /// Works from any state that owns a process; used when readiness fails
    /// or a graceful shutdown takes too long.
    pub async fn abort(mut self) -> ShutdownReport {
        tracing::info!(fixture = %self.name(), "aborting fixture");
        if let Err(e) = self.state.process_mut().child.start_kill() {
            // InvalidInput means the child was already reaped.
            if e.kind() != ErrorKind::InvalidInput {
                let warning = Warning::signal(self.spec.name().as_str(), format!("SIGKILL: {e}"));
                self.diagnostics.warn(warning);
            }
        }
        let status = self.state.process_mut().child.wait().await;
        self.finish(status).await
    }
}

// =============================================================================
// Unstarted -> AwaitingReadiness
// =============================================================================

impl Fixture<Unstarted> {
    pub fn new(spec: ContainerSpec, client: RuntimeClient) -> Self {
        Fixture {
            spec,
            client,
            stop: StopConfig::default(),
            diagnostics: Diagnostics::default(),
            lease: None,
            state: Unstarted,
        }
    }

    pub fn with_stop(mut self, stop: StopConfig) -> Self {
        self.stop = stop;
        self
    }

    pub(crate) fn with_lease(mut self, lease: NameLease) -> Self {
        self.lease = Some(lease);
        self
    }

    /// Start the container.
    ///
    /// Clears any runtime resource holding the same name, picks a free host
    /// port, resolves the host and spawns `<client> run`. Returns as soon as
    /// the client process exists. A failed stale removal is recorded as a
    /// warning and does not stop the launch.
    ///
    /// # Errors
    ///
    /// Returns an error if no port can be allocated or the client cannot be
    /// spawned. Nothing is left running in either case.
    pub async fn launch(
        mut self,
        resolver: &HostResolver,
    ) -> Result<Fixture<AwaitingReadiness>, FixtureError> {
        let name = self.spec.name().clone();

        match self.client.remove(&name).await {
            Ok(Removal::Removed) => tracing::info!(fixture = %name, "removed stale container"),
            Ok(Removal::NotFound) => {}
            Err(e) => self.diagnostics.warn(Warning::stale_removal(name.as_str(), &e)),
        }

        let host_port = free_port_for(self.spec.port().protocol()).await?;
        let host = resolver.resolve().await;
        let child = self.client.spawn_run(&self.spec, host_port)?;
        let process = Process::new(host, host_port, child);

        tracing::info!(
            fixture = %name,
            image = %self.spec.image(),
            addr = %process.addr(),
            "container starting"
        );
        Ok(self.map_state(|Unstarted| AwaitingReadiness(process)))
    }
}

// =============================================================================
// AwaitingReadiness -> Ready
// =============================================================================

impl Fixture<AwaitingReadiness> {
    /// Probe the published address until the service answers.
    ///
    /// # Errors
    ///
    /// Returns `(self, error)` on failure so the caller can `abort()`.
    #[must_use = "fixture state must be used"]
    pub async fn await_ready(
        mut self,
        probe: &dyn ReadinessProbe,
        policy: &ReadinessPolicy,
        cancel: &CancellationToken,
    ) -> TransitionResult<Ready, AwaitingReadiness> {
        let addr = self.addr();
        let waiter = ReadinessWaiter::new(policy.clone());

        let outcome = waiter
            .wait(&addr, probe, cancel, Some(&mut self.state.0.child))
            .await;

        match outcome {
            Ok(readiness) => {
                tracing::info!(
                    fixture = %self.name(),
                    %addr,
                    attempts = readiness.attempts,
                    elapsed = ?readiness.elapsed,
                    "fixture ready"
                );
                Ok(self.map_state(|AwaitingReadiness(process)| Ready { process, readiness }))
            }
            Err(e) => Err((self, e.into())),
        }
    }
}

// =============================================================================
// Ready -> ShuttingDown -> stopped
// =============================================================================

impl Fixture<Ready> {
    pub fn readiness(&self) -> ReadyReport {
        self.state.readiness
    }

    /// Send the interrupt and then the terminate signal.
    ///
    /// With a non-zero `interrupt_grace` the client gets that long to exit
    /// after the interrupt; the terminate signal follows regardless.
    pub async fn begin_shutdown(mut self) -> Fixture<ShuttingDown> {
        tracing::info!(fixture = %self.name(), "stopping fixture");
        self.signal(StopSignal::Interrupt);

        let grace = self.stop.interrupt_grace;
        if !grace.is_zero() {
            let child = &mut self.state.process.child;
            if let Ok(Ok(status)) = tokio::time::timeout(grace, child.wait()).await {
                tracing::debug!(fixture = %self.name(), %status, "client exited on interrupt");
            }
        }

        self.signal(StopSignal::Terminate);
        self.map_state(|Ready { process, .. }| ShuttingDown(process))
    }

    /// Stop the client, wait for it to exit and remove the container.
    ///
    /// Never fails: removal and signalling problems are reported as warnings
    /// in the returned report.
    pub async fn shutdown(self) -> ShutdownReport {
        self.begin_shutdown().await.wait().await
    }

    /// Like [`shutdown`](Self::shutdown), but the wait for exit can be cancelled.
    ///
    /// # Errors
    ///
    /// Returns the fixture with [`FixtureError::ShutdownCancelled`] so the
    /// caller can `abort()` it.
    pub async fn shutdown_with_cancel(
        self,
        cancel: &CancellationToken,
    ) -> Result<ShutdownReport, (Fixture<ShuttingDown>, FixtureError)> {
        self.begin_shutdown().await.wait_for_exit(cancel).await
    }
}

impl Fixture<ShuttingDown> {
    /// Wait for the client to exit, then remove the container.
    ///
    /// # Errors
    ///
    /// Returns `(self, ShutdownCancelled)` if `cancel` fires first.
    pub async fn wait_for_exit(
        mut self,
        cancel: &CancellationToken,
    ) -> Result<ShutdownReport, (Self, FixtureError)> {
        let exited = tokio::select! {
            _ = cancel.cancelled() => None,
            status = self.state.0.child.wait() => Some(status),
        };

        match exited {
            Some(status) => Ok(self.finish(status).await),
            None => Err((self, FixtureError::ShutdownCancelled)),
        }
    }

    async fn wait(mut self) -> ShutdownReport {
        let status = self.state.0.child.wait().await;
        self.finish(status).await
    }
}
