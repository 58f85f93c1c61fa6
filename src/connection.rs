/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

use std::io;
use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpSocket, TcpStream};

use crate::addr::ServerAddr;

/// Supplier of the control and data streams used by
/// [`FtpClient`](crate::FtpClient).
///
/// The data connection is requested once per transfer, after the server
/// advertised its passive endpoint. The host part of the advertised
/// endpoint is not trusted, implementations should connect to the peer
/// of the control connection at the advertised port.
#[async_trait]
pub trait FtpConnectionProvider<S, E, UD>
where
    S: AsyncRead + AsyncWrite,
    E: std::error::Error,
{
    async fn new_control_connection(&mut self, server: &ServerAddr, user_data: &UD)
    -> Result<S, E>;

    async fn new_data_connection(&mut self, server: &ServerAddr, user_data: &UD) -> Result<S, E>;
}

/// Direct TCP connection provider with an optional local bind address.
#[derive(Default)]
pub struct TcpConnectionProvider {
    bind_ip: Option<IpAddr>,
    remote_addr: Option<SocketAddr>,
}

impl TcpConnectionProvider {
    pub fn new() -> Self {
        TcpConnectionProvider::default()
    }

    pub fn set_bind_ip(&mut self, ip: IpAddr) {
        self.bind_ip = Some(ip);
    }

    fn new_socket_to(&self, peer: SocketAddr) -> io::Result<TcpSocket> {
        let socket = match peer {
            SocketAddr::V4(_) => TcpSocket::new_v4()?,
            SocketAddr::V6(_) => TcpSocket::new_v6()?,
        };
        if let Some(ip) = self.bind_ip {
            socket.bind(SocketAddr::new(ip, 0))?;
        }
        Ok(socket)
    }
}

#[async_trait]
impl FtpConnectionProvider<TcpStream, io::Error, ()> for TcpConnectionProvider {
    async fn new_control_connection(
        &mut self,
        server: &ServerAddr,
        _user_data: &(),
    ) -> io::Result<TcpStream> {
        let mut err = io::Error::new(io::ErrorKind::AddrNotAvailable, "no addr resolved");
        for addr in tokio::net::lookup_host(server.to_string()).await? {
            let socket = self.new_socket_to(addr)?;
            match socket.connect(addr).await {
                Ok(stream) => {
                    self.remote_addr = Some(addr);
                    return Ok(stream);
                }
                Err(e) => err = e,
            }
        }

        Err(err)
    }

    async fn new_data_connection(
        &mut self,
        server: &ServerAddr,
        _user_data: &(),
    ) -> io::Result<TcpStream> {
        match self.remote_addr {
            Some(addr) => {
                let data_addr = SocketAddr::new(addr.ip(), server.port());
                let socket = self.new_socket_to(data_addr)?;
                socket.connect(data_addr).await
            }
            None => Err(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "no connected control peer addr found",
            )),
        }
    }
}
