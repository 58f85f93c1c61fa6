/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::ServerAddrParseError;

pub const DEFAULT_CONTROL_PORT: u16 = 21;

/// An FTP server endpoint as a (host, port) pair.
///
/// The host may be a domain name or an IP address literal, resolution is
/// left to the connection provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddr {
    host: String,
    port: u16,
}

impl ServerAddr {
    pub fn new(host: &str, port: u16) -> Result<Self, ServerAddrParseError> {
        if host.is_empty() {
            return Err(ServerAddrParseError::EmptyHost);
        }
        Ok(ServerAddr {
            host: host.to_string(),
            port,
        })
    }

    #[inline]
    pub fn host(&self) -> &str {
        self.host.as_str()
    }

    #[inline]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[inline]
    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }
}

impl From<SocketAddr> for ServerAddr {
    fn from(addr: SocketAddr) -> Self {
        ServerAddr {
            host: addr.ip().to_string(),
            port: addr.port(),
        }
    }
}

impl fmt::Display for ServerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for ServerAddr {
    type Err = ServerAddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(r) = s.strip_prefix('[') {
            let Some((host, r)) = r.split_once(']') else {
                return Err(ServerAddrParseError::InvalidFormat);
            };
            let port = match r.strip_prefix(':') {
                Some(p) => u16::from_str(p).map_err(|_| ServerAddrParseError::InvalidPort)?,
                None if r.is_empty() => 0,
                None => return Err(ServerAddrParseError::InvalidFormat),
            };
            ServerAddr::new(host, port)
        } else if let Some((host, p)) = s.rsplit_once(':') {
            if host.contains(':') {
                // bare IPv6 literal without brackets, no port field
                return ServerAddr::new(s, 0);
            }
            let port = u16::from_str(p).map_err(|_| ServerAddrParseError::InvalidPort)?;
            ServerAddr::new(host, port)
        } else {
            ServerAddr::new(s, 0)
        }
    }
}
