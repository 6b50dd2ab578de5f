// ABOUTME: Diagnostics accumulator for non-fatal warnings during a fixture's life.
// ABOUTME: Removal and signalling failures land here instead of failing launch or shutdown.

/// Collects non-fatal warnings for one fixture.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(fixture = %warning.fixture, kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// A non-fatal problem observed while managing a fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub fixture: String,
    pub message: String,
}

impl Warning {
    fn new(kind: WarningKind, fixture: impl Into<String>, message: String) -> Self {
        Self {
            kind,
            fixture: fixture.into(),
            message,
        }
    }

    /// The pre-launch removal of a same-named container failed.
    pub fn stale_removal(fixture: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        let fixture = fixture.into();
        let message = format!("failed to remove stale container '{fixture}': {detail}");
        Self::new(WarningKind::StaleRemoval, fixture, message)
    }

    /// The post-shutdown removal failed; the container may still exist.
    pub fn cleanup_removal(fixture: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        let fixture = fixture.into();
        let message = format!("failed to remove container '{fixture}' after shutdown: {detail}");
        Self::new(WarningKind::CleanupRemoval, fixture, message)
    }

    /// Delivering a stop signal to the runtime client failed.
    pub fn signal(fixture: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        let fixture = fixture.into();
        let message = format!("failed to signal runtime client for '{fixture}': {detail}");
        Self::new(WarningKind::Signal, fixture, message)
    }

    /// Waiting for the runtime client to exit failed.
    pub fn wait(fixture: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        let fixture = fixture.into();
        let message = format!("failed to wait for runtime client of '{fixture}': {detail}");
        Self::new(WarningKind::Wait, fixture, message)
    }
}

/// Categories of warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Pre-launch forced removal failed (launch continued).
    StaleRemoval,
    /// Post-shutdown forced removal failed (container may leak).
    CleanupRemoval,
    /// Interrupt, terminate or kill could not be delivered.
    Signal,
    /// The exit status of the runtime client could not be collected.
    Wait,
}
