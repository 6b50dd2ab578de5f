// ABOUTME: Container-side port with protocol, as published through -p.
// ABOUTME: Parses "5432", "5432/tcp" and "53/udp"; deserializes from numbers or strings.

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParsePortError {
    #[error("port cannot be empty")]
    Empty,

    #[error("invalid port number: {0}")]
    InvalidNumber(String),

    #[error("port 0 cannot be published")]
    Zero,

    #[error("unsupported protocol: {0} (expected tcp or udp)")]
    UnknownProtocol(String),
}

/// Transport protocol of a published port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
        }
    }
}

/// A port inside the container that gets published to a free host port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerPort {
    port: u16,
    protocol: Protocol,
}

impl ContainerPort {
    /// Port 0 asks the OS for any port and can never be published.
    pub fn new(port: u16, protocol: Protocol) -> Result<Self, ParsePortError> {
        if port == 0 {
            return Err(ParsePortError::Zero);
        }
        Ok(Self { port, protocol })
    }

    pub fn tcp(port: u16) -> Result<Self, ParsePortError> {
        Self::new(port, Protocol::Tcp)
    }

    pub fn udp(port: u16) -> Result<Self, ParsePortError> {
        Self::new(port, Protocol::Udp)
    }

    pub fn parse(input: &str) -> Result<Self, ParsePortError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParsePortError::Empty);
        }

        let (number, protocol) = match input.split_once('/') {
            Some((number, "tcp")) => (number, Protocol::Tcp),
            Some((number, "udp")) => (number, Protocol::Udp),
            Some((_, other)) => return Err(ParsePortError::UnknownProtocol(other.to_string())),
            None => (input, Protocol::Tcp),
        };

        let port: u16 = number
            .parse()
            .map_err(|_| ParsePortError::InvalidNumber(number.to_string()))?;
        Self::new(port, protocol)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// The `-p` value publishing this port on `host_port`.
    pub fn publish_spec(&self, host_port: u16) -> String {
        match self.protocol {
            Protocol::Tcp => format!("{}:{}", host_port, self.port),
            Protocol::Udp => format!("{}:{}/udp", host_port, self.port),
        }
    }
}

impl FromStr for ContainerPort {
    type Err = ParsePortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ContainerPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.protocol {
            Protocol::Tcp => write!(f, "{}", self.port),
            Protocol::Udp => write!(f, "{}/udp", self.port),
        }
    }
}

impl<'de> Deserialize<'de> for ContainerPort {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PortEntry {
            Number(u16),
            Text(String),
        }

        match PortEntry::deserialize(deserializer)? {
            PortEntry::Number(port) => ContainerPort::tcp(port).map_err(serde::de::Error::custom),
            PortEntry::Text(s) => ContainerPort::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}
