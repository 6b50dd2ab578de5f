// ABOUTME: Ephemeral port allocation on the loopback interface.
// ABOUTME: Binds a throwaway socket of the right protocol to port 0 and reports what the OS assigned.

use tokio::net::{TcpListener, UdpSocket};

use crate::types::Protocol;

const LOOPBACK_ANY_PORT: &str = "127.0.0.1:0";

#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("failed to bind a {protocol} socket on {addr}: {source}")]
    Bind {
        protocol: Protocol,
        addr: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read the socket's local address: {0}")]
    LocalAddr(#[source] std::io::Error),
}

/// Return a TCP port that is unbound at the moment of the call.
pub async fn free_port() -> Result<u16, PortError> {
    free_port_for(Protocol::Tcp).await
}

/// Return a host port that is unbound for `protocol` at the moment of the call.
///
/// TCP and UDP port spaces are separate, so a UDP target is checked with a
/// UDP socket. No reservation is held afterwards: another process may take
/// the port before the container publishes it.
pub async fn free_port_for(protocol: Protocol) -> Result<u16, PortError> {
    let bind_error = |source| PortError::Bind {
        protocol,
        addr: LOOPBACK_ANY_PORT,
        source,
    };

    let addr = match protocol {
        Protocol::Tcp => TcpListener::bind(LOOPBACK_ANY_PORT)
            .await
            .map_err(bind_error)?
            .local_addr(),
        Protocol::Udp => UdpSocket::bind(LOOPBACK_ANY_PORT)
            .await
            .map_err(bind_error)?
            .local_addr(),
    };
    Ok(addr.map_err(PortError::LocalAddr)?.port())
}
