//! UDP transport.

use super::{Transport, extract_request_id};
use crate::error::{Error, Result};
use crate::util::bind_ephemeral_udp_socket;
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{Instant, timeout_at};

/// Largest datagram accepted from an agent.
const MAX_DATAGRAM: usize = 65535;

/// Connected UDP socket to one agent.
#[derive(Debug, Clone)]
pub struct UdpTransport {
    inner: Arc<UdpTransportInner>,
}

#[derive(Debug)]
struct UdpTransportInner {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpTransport {
    /// Bind an ephemeral socket of the target's address family and connect it.
    pub async fn connect(target: SocketAddr) -> Result<Self> {
        let io_error = |source| Error::Io {
            target: Some(target),
            source,
        };

        let socket = bind_ephemeral_udp_socket(target).await.map_err(io_error)?;
        socket.connect(target).await.map_err(io_error)?;
        let local_addr = socket.local_addr().map_err(io_error)?;

        tracing::debug!(target: "mibwalk::transport", { snmp.target = %target, snmp.local_addr = %local_addr }, "UDP transport connected");

        Ok(Self {
            inner: Arc::new(UdpTransportInner { socket, target }),
        })
    }
}

impl Transport for UdpTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        tracing::trace!(target: "mibwalk::transport", { snmp.target = %self.inner.target, snmp.bytes = data.len() }, "UDP send");
        self.inner.socket.send(data).await.map_err(|e| Error::Io {
            target: Some(self.inner.target),
            source: e,
        })?;
        Ok(())
    }

    async fn recv(&self, request_id: i32, recv_timeout: Duration) -> Result<Bytes> {
        let deadline = Instant::now() + recv_timeout;
        let mut buf = vec![0u8; MAX_DATAGRAM];

        loop {
            let len = match timeout_at(deadline, self.inner.socket.recv(&mut buf)).await {
                Ok(Ok(len)) => len,
                Ok(Err(e)) => {
                    return Err(Error::Io {
                        target: Some(self.inner.target),
                        source: e,
                    });
                }
                Err(_) => {
                    tracing::trace!(target: "mibwalk::transport", { snmp.target = %self.inner.target, snmp.request_id = request_id }, "UDP recv timeout");
                    return Err(Error::Timeout {
                        target: Some(self.inner.target),
                        elapsed: recv_timeout,
                        request_id,
                        retries: 0,
                    });
                }
            };

            let datagram = &buf[..len];
            match extract_request_id(datagram) {
                Some(id) if id != request_id => {
                    tracing::debug!(target: "mibwalk::transport", { snmp.target = %self.inner.target, snmp.request_id = request_id, stale_request_id = id }, "discarding stale response");
                }
                _ => {
                    tracing::trace!(target: "mibwalk::transport", { snmp.target = %self.inner.target, snmp.bytes = len }, "UDP recv complete");
                    return Ok(Bytes::copy_from_slice(datagram));
                }
            }
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.inner.target
    }
}
