// ABOUTME: Readiness probes: caller-supplied checks against a fixture's address.
// ABOUTME: Includes a closure adapter and a TCP connect/banner probe.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

/// Failure reported by a probe. Any error type converts into it.
pub type ProbeError = Box<dyn std::error::Error + Send + Sync>;

/// Decides whether the service behind `addr` (`host:port`) is ready.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    async fn probe(&self, addr: &str) -> Result<(), ProbeError>;
}

/// Probe backed by a closure taking the address.
pub struct FnProbe<F>(F);

/// Wrap `f` as a [`ReadinessProbe`].
///
/// ```no_run
/// use dockfix::fixture::{ProbeError, probe_fn};
///
/// let probe = probe_fn(|addr: String| async move {
///     tokio::net::TcpStream::connect(addr).await?;
///     Ok::<(), ProbeError>(())
/// });
/// ```
pub fn probe_fn<F, Fut>(f: F) -> FnProbe<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), ProbeError>> + Send,
{
    FnProbe(f)
}

#[async_trait]
impl<F, Fut> ReadinessProbe for FnProbe<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), ProbeError>> + Send,
{
    async fn probe(&self, addr: &str) -> Result<(), ProbeError> {
        (self.0)(addr.to_string()).await
    }
}

/// Ready once a TCP connection succeeds, optionally after reading a banner.
///
/// Runtimes that publish ports through a userland proxy accept connections
/// before the service listens; a banner check waits for the service itself.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    connect_timeout: Duration,
    banner: Option<String>,
}

impl TcpProbe {
    pub fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(2),
            banner: None,
        }
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn banner(mut self, prefix: impl Into<String>) -> Self {
        self.banner = Some(prefix.into());
        self
    }
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadinessProbe for TcpProbe {
    async fn probe(&self, addr: &str) -> Result<(), ProbeError> {
        let mut stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| format!("connecting to {addr} timed out"))??;

        let Some(expected) = &self.banner else {
            return Ok(());
        };

        let mut buf = vec![0u8; expected.len().max(32)];
        let n = tokio::time::timeout(self.connect_timeout, stream.read(&mut buf))
            .await
            .map_err(|_| format!("no banner from {addr}"))??;

        let banner = String::from_utf8_lossy(&buf[..n]);
        if banner.starts_with(expected.as_str()) {
            Ok(())
        } else {
            Err(format!("unexpected banner from {addr}: {:?}", banner.trim_end()).into())
        }
    }
}
