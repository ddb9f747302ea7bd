//! SNMPv1/v2c over UDP.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tokio::sync::Mutex;
use tracing::{Span, instrument};

use super::{AgentSession, Community, Endpoint, SessionConfig, Target, UdpSessionBuilder};
use crate::error::{Error, ErrorStatus, Result};
use crate::message::CommunityMessage;
use crate::oid::Oid;
use crate::pdu::Pdu;
use crate::transport::{Transport, UdpTransport};
use crate::varbind::VarBind;
use crate::version::Version;

/// Session that sends community-based requests to real agents.
///
/// One connected socket is opened per endpoint on first use and reused for
/// every later request to it. Request IDs come from a single counter so a late
/// datagram from an earlier attempt can never be mistaken for the current reply.
#[derive(Debug)]
pub struct UdpSession {
    config: SessionConfig,
    transports: Mutex<HashMap<Endpoint, UdpTransport>>,
    next_request_id: AtomicI32,
}

impl UdpSession {
    /// Create a builder.
    pub fn builder() -> UdpSessionBuilder {
        UdpSessionBuilder::new()
    }

    pub(super) fn from_config(config: SessionConfig) -> Self {
        // start somewhere different on each run so replies meant for a
        // previous process are not accepted
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(1);
        Self {
            config,
            transports: Mutex::new(HashMap::new()),
            next_request_id: AtomicI32::new((seed & 0x3FFF_FFFF) as i32),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Request IDs are positive and never zero.
    fn next_request_id(&self) -> i32 {
        loop {
            let id = self.next_request_id.fetch_add(1, Ordering::Relaxed) & i32::MAX;
            if id != 0 {
                return id;
            }
        }
    }

    async fn transport_for(&self, endpoint: &Endpoint) -> Result<UdpTransport> {
        let mut transports = self.transports.lock().await;
        if let Some(transport) = transports.get(endpoint) {
            return Ok(transport.clone());
        }

        let addr = resolve(endpoint).await?;
        let transport = UdpTransport::connect(addr).await?;
        transports.insert(endpoint.clone(), transport.clone());
        Ok(transport)
    }

    pub(crate) async fn get_next_with<T: Transport>(
        &self,
        transport: &T,
        community: &Community,
        oid: &Oid,
    ) -> Result<Vec<VarBind>> {
        let pdu = Pdu::get_next(self.next_request_id(), oid);
        match self.exchange(transport, community, pdu).await {
            Ok(response) => Ok(response.varbinds),
            // SNMPv1 agents signal the end of the MIB view this way
            Err(Error::Snmp {
                status: ErrorStatus::NoSuchName,
                ..
            }) if self.config.version == Version::V1 => {
                tracing::debug!(target: "mibwalk::session", { snmp.oid = %oid }, "v1 noSuchName, end of MIB view");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    pub(crate) async fn get_bulk_with<T: Transport>(
        &self,
        transport: &T,
        community: &Community,
        oid: &Oid,
        max_records: u32,
    ) -> Result<Vec<VarBind>> {
        if self.config.version == Version::V1 {
            return Err(Error::GetBulkNotSupportedInV1);
        }
        let max_repetitions = i32::try_from(max_records).unwrap_or(i32::MAX);
        let pdu = Pdu::get_bulk(self.next_request_id(), oid, max_repetitions);
        Ok(self.exchange(transport, community, pdu).await?.varbinds)
    }

    /// Send a request and wait for its response, re-sending on timeout.
    #[instrument(
        level = "debug",
        target = "mibwalk::session",
        skip_all,
        fields(
            snmp.target = %transport.peer_addr(),
            snmp.request_id = pdu.request_id,
            snmp.pdu_type = %pdu.pdu_type,
            snmp.attempt = tracing::field::Empty,
            snmp.elapsed_ms = tracing::field::Empty,
        )
    )]
    async fn exchange<T: Transport>(
        &self,
        transport: &T,
        community: &Community,
        pdu: Pdu,
    ) -> Result<Pdu> {
        let start = Instant::now();
        let request_id = pdu.request_id;
        let data = CommunityMessage::new(self.config.version, community.to_bytes(), pdu).encode();
        let retry = &self.config.retry;

        let mut attempt = 0;
        loop {
            Span::current().record("snmp.attempt", attempt);
            if attempt > 0 {
                tracing::debug!(target: "mibwalk::session", "retrying request");
            }

            tracing::trace!(target: "mibwalk::session", { snmp.bytes = data.len() }, "sending request");
            transport.send(&data).await?;

            match transport.recv(request_id, self.config.timeout).await {
                Ok(response) => {
                    let result = self.check_response(transport.peer_addr(), request_id, response);
                    Span::current().record("snmp.elapsed_ms", start.elapsed().as_millis() as u64);
                    return result;
                }
                Err(e) if e.is_retriable() && attempt < retry.max_attempts => {
                    attempt += 1;
                    let delay = retry.delay_before(attempt);
                    if !delay.is_zero() {
                        tracing::debug!(target: "mibwalk::session", { delay_ms = delay.as_millis() as u64 }, "backing off");
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(e) if e.is_retriable() => {
                    let elapsed = start.elapsed();
                    Span::current().record("snmp.elapsed_ms", elapsed.as_millis() as u64);
                    tracing::debug!(target: "mibwalk::session", { retries = attempt }, "request timed out");
                    return Err(Error::Timeout {
                        target: Some(transport.peer_addr()),
                        elapsed,
                        request_id,
                        retries: attempt,
                    });
                }
                Err(e) => {
                    Span::current().record("snmp.elapsed_ms", start.elapsed().as_millis() as u64);
                    return Err(e);
                }
            }
        }
    }

    fn check_response(
        &self,
        peer: SocketAddr,
        request_id: i32,
        data: bytes::Bytes,
    ) -> Result<Pdu> {
        tracing::trace!(target: "mibwalk::session", { snmp.bytes = data.len() }, "received response");
        let response = CommunityMessage::decode(data)?;

        let expected = self.config.version;
        if response.version != expected {
            tracing::warn!(target: "mibwalk::session", { ?expected, actual = ?response.version, peer = %peer }, "version mismatch in response");
            return Err(Error::VersionMismatch {
                expected,
                actual: response.version,
            });
        }

        let pdu = response.into_pdu();
        if pdu.request_id != request_id {
            tracing::warn!(target: "mibwalk::session", { expected_request_id = request_id, actual_request_id = pdu.request_id, peer = %peer }, "request ID mismatch in response");
            return Err(Error::RequestIdMismatch {
                expected: request_id,
                actual: pdu.request_id,
            });
        }

        if pdu.is_error() {
            return Err(Error::Snmp {
                target: Some(peer),
                status: pdu.error_status_enum(),
                index: pdu.error_index.max(0) as u32,
                oid: pdu.error_oid(),
            });
        }

        Ok(pdu)
    }
}

impl AgentSession for UdpSession {
    async fn get_next(&self, target: &Target, oid: &Oid) -> Result<Vec<VarBind>> {
        let transport = self.transport_for(&target.endpoint).await?;
        self.get_next_with(&transport, &target.community, oid).await
    }

    async fn get_bulk(&self, target: &Target, oid: &Oid, max_records: u32) -> Result<Vec<VarBind>> {
        if self.config.version == Version::V1 {
            return Err(Error::GetBulkNotSupportedInV1);
        }
        let transport = self.transport_for(&target.endpoint).await?;
        self.get_bulk_with(&transport, &target.community, oid, max_records)
            .await
    }
}

/// Resolve an endpoint to the first address the resolver returns.
async fn resolve(endpoint: &Endpoint) -> Result<SocketAddr> {
    let io_error = |source| Error::Io {
        target: None,
        source,
    };
    let mut addrs = tokio::net::lookup_host((endpoint.host.as_str(), endpoint.port))
        .await
        .map_err(io_error)?;
    addrs.next().ok_or_else(|| {
        io_error(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} did not resolve to any address", endpoint),
        ))
    })
}
