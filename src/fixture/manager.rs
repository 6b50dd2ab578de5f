// ABOUTME: Entry point for launching fixtures against one runtime.
// ABOUTME: Owns the client, host resolver, default policies and the name registry.

use tokio_util::sync::CancellationToken;

use super::error::FixtureError;
use super::handle::{Fixture, RunningFixture};
use super::probe::ReadinessProbe;
use super::registry::FixtureRegistry;
use super::spec::ContainerSpec;
use crate::config::{Config, ReadinessPolicy, StopConfig};
use crate::runtime::{HostResolver, RuntimeClient, RuntimeConfig};

/// Launches fixtures and keeps their names unique while they run.
#[derive(Debug, Clone)]
pub struct FixtureManager {
    client: RuntimeClient,
    resolver: HostResolver,
    readiness: ReadinessPolicy,
    stop: StopConfig,
    registry: FixtureRegistry,
}

impl FixtureManager {
    pub fn new(runtime: &RuntimeConfig) -> Self {
        Self {
            client: RuntimeClient::from_config(runtime),
            resolver: HostResolver::from_config(runtime),
            readiness: ReadinessPolicy::default(),
            stop: StopConfig::default(),
            registry: FixtureRegistry::new(),
        }
    }

    /// Build a manager from the runtime, readiness and stop sections of a config file.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.runtime)
            .with_readiness(config.readiness.clone())
            .with_stop(config.stop.clone())
    }

    pub fn with_client(mut self, client: RuntimeClient) -> Self {
        self.client = client;
        self
    }

    pub fn with_resolver(mut self, resolver: HostResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_readiness(mut self, policy: ReadinessPolicy) -> Self {
        self.readiness = policy;
        self
    }

    pub fn with_stop(mut self, stop: StopConfig) -> Self {
        self.stop = stop;
        self
    }

    pub fn client(&self) -> &RuntimeClient {
        &self.client
    }

    pub fn resolver(&self) -> &HostResolver {
        &self.resolver
    }

    pub fn readiness_policy(&self) -> &ReadinessPolicy {
        &self.readiness
    }

    pub fn registry(&self) -> &FixtureRegistry {
        &self.registry
    }

    /// Launch `spec` and wait until `probe` accepts its address.
    ///
    /// # Errors
    ///
    /// See [`launch_with_cancel`](Self::launch_with_cancel).
    pub async fn launch(
        &self,
        spec: ContainerSpec,
        probe: &dyn ReadinessProbe,
    ) -> Result<RunningFixture, FixtureError> {
        self.launch_with_cancel(spec, probe, &CancellationToken::new())
            .await
    }

    /// Launch `spec`, giving up early if `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NameInUse`] if this manager already runs a
    /// fixture with the same name, a launch error if no port or process could
    /// be obtained, or a readiness error. After a readiness error the client
    /// has been killed and the container removed.
    pub async fn launch_with_cancel(
        &self,
        spec: ContainerSpec,
        probe: &dyn ReadinessProbe,
        cancel: &CancellationToken,
    ) -> Result<RunningFixture, FixtureError> {
        let lease = self.registry.claim(spec.name())?;

        let pending = Fixture::new(spec, self.client.clone())
            .with_stop(self.stop.clone())
            .with_lease(lease)
            .launch(&self.resolver)
            .await?;

        match pending.await_ready(probe, &self.readiness, cancel).await {
            Ok(ready) => Ok(ready),
            Err((pending, e)) => {
                tracing::warn!(fixture = %pending.name(), error = %e, "fixture not ready, tearing down");
                let report = pending.abort().await;
                if !report.removed {
                    tracing::warn!(fixture = %report.name, "container may still exist");
                }
                Err(e)
            }
        }
    }
}
