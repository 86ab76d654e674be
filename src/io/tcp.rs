use std::net::SocketAddr;

use log::{error, trace};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::error::{Error, Result};
use crate::io::buffer::Buffer;
use crate::io::connection::Connection;

/// TCP connection bound to the reactor that accepted or dialed it.
pub struct TcpConnection {
    stream: TcpStream,
    peer: SocketAddr,
}

impl TcpConnection {
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        TcpConnection { stream, peer }
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

impl std::fmt::Display for TcpConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TCP connection ({})", self.peer)
    }
}

impl Connection for TcpConnection {
    async fn read(&mut self, buffer: &mut Buffer, nbytes: usize) -> Result<usize> {
        let mut total = 0;
        while total < nbytes {
            let read = {
                let window = buffer.writable(nbytes - total);
                if window.is_empty() {
                    break;
                }
                self.stream.read(window).await
            };
            match read {
                Ok(0) if total == 0 => return Err(Error::Closed),
                Ok(0) => {
                    return Err(Error::Read {
                        reason: format!(
                            "{} closed after {} of {} bytes",
                            self, total, nbytes
                        ),
                    })
                }
                Ok(n) => {
                    buffer.inc_pos(n);
                    total += n;
                }
                Err(e) => {
                    error!("Unexpected error while reading from {}: {}", self, e);
                    return Err(Error::Read {
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(total)
    }

    async fn write(&mut self, buffer: &mut Buffer, nbytes: usize) -> Result<usize> {
        let mut total = 0;
        while total < nbytes {
            let written = {
                let window = buffer.readable(nbytes - total);
                if window.is_empty() {
                    break;
                }
                self.stream.write(window).await
            };
            match written {
                Ok(0) => {
                    return Err(Error::Write {
                        reason: format!("{} stopped accepting bytes", self),
                    })
                }
                Ok(n) => {
                    buffer.inc_pos(n);
                    total += n;
                }
                Err(e) => {
                    error!("Unexpected error while writing to {}: {}", self, e);
                    return Err(Error::Write {
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(total)
    }

    async fn close(&mut self) -> Result<()> {
        self.stream.shutdown().await.map_err(|e| Error::Write {
            reason: format!("shutdown of {} failed: {}", self, e),
        })
    }
}

/// TCP acceptor bound to an IPv4 port.
pub struct TcpAcceptor {
    listener: TcpListener,
}

impl TcpAcceptor {
    /// Binds `0.0.0.0:port`.
    pub async fn bind(port: u16) -> Result<Self> {
        let listener = TcpListener::bind(("0.0.0.0", port))
            .await
            .map_err(|e| Error::Accept {
                reason: format!("cannot bind port {}: {}", port, e),
            })?;
        Ok(TcpAcceptor { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().map_err(|e| Error::Accept {
            reason: e.to_string(),
        })
    }

    /// Waits for the next inbound connection.
    pub async fn accept(&self) -> Result<TcpConnection> {
        match self.listener.accept().await {
            Ok((stream, peer)) => {
                trace!("Accepted TCP connection from {}", peer);
                Ok(TcpConnection::new(stream, peer))
            }
            Err(e) => {
                error!("Unexpected error while accepting TCP connections: {}", e);
                Err(Error::Accept {
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// Resolves `host:port` into socket addresses.
pub async fn resolve(host: &str, port: u16) -> Result<impl Iterator<Item = SocketAddr> + use<'_>> {
    tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| Error::Resolve {
            reason: format!("cannot resolve {}:{}: {}", host, port, e),
        })
}

/// Resolves `host:port` and connects to the first reachable address.
pub async fn tcp_connect(host: &str, port: u16) -> Result<TcpConnection> {
    let mut last_error = None;
    for addr in resolve(host, port).await? {
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                let conn = TcpConnection::new(stream, addr);
                trace!("Established new {}", conn);
                return Ok(conn);
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(Error::Connect {
        reason: match last_error {
            Some(e) => format!("cannot connect to {}:{}: {}", host, port, e),
            None => format!("{}:{} did not resolve to any address", host, port),
        },
    })
}
