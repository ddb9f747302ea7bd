//! Transport layer.
//!
//! A [`Transport`] moves encoded messages to one agent and back. The walk
//! only needs connected UDP; a mock is available to unit tests.

mod udp;

#[cfg(test)]
mod mock;

pub use udp::UdpTransport;

#[cfg(test)]
pub use mock::{MockResponse, MockTransport, ResponseBuilder};

use crate::error::Result;
use bytes::Bytes;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

/// Client-side transport to a single agent.
///
/// Implementations are cheap to clone (`Arc` inside) so a session can hand
/// out copies while keeping its own.
pub trait Transport: Send + Sync + Clone {
    /// Send request data to the agent.
    fn send(&self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Wait up to `timeout` for the response to `request_id`.
    ///
    /// Datagrams that carry a different request ID (late answers to an
    /// earlier attempt) are skipped rather than returned.
    fn recv(
        &self,
        request_id: i32,
        timeout: Duration,
    ) -> impl Future<Output = Result<Bytes>> + Send;

    /// The agent address.
    fn peer_addr(&self) -> SocketAddr;
}

/// Pull the request ID out of an encoded v1/v2c message without a full decode.
///
/// `SEQUENCE { version, community, PDU { request-id, ... } }`
pub(crate) fn extract_request_id(data: &[u8]) -> Option<i32> {
    let mut pos = expect_header(data, 0, 0x30)?.0;

    // version, community
    let (content, len) = expect_header(data, pos, 0x02)?;
    pos = content + len;
    let (content, len) = expect_header(data, pos, 0x04)?;
    pos = content + len;

    let pdu_tag = *data.get(pos)?;
    if !(0xA0..=0xA8).contains(&pdu_tag) {
        return None;
    }
    pos = read_length(data, pos + 1)?.0;

    let (content, len) = expect_header(data, pos, 0x02)?;
    let bytes = data.get(content..content + len)?;
    let first = *bytes.first()?;
    let seed: i32 = if first & 0x80 != 0 { -1 } else { 0 };
    Some(bytes.iter().fold(seed, |acc, &b| (acc << 8) | b as i32))
}

/// Check the tag at `pos` and return (content_start, content_len).
fn expect_header(data: &[u8], pos: usize, tag: u8) -> Option<(usize, usize)> {
    if *data.get(pos)? != tag {
        return None;
    }
    read_length(data, pos + 1)
}

/// Read a definite length at `pos`, returning (content_start, length).
fn read_length(data: &[u8], pos: usize) -> Option<(usize, usize)> {
    let (len, consumed) = crate::ber::decode_length(data.get(pos..)?, pos).ok()?;
    Some((pos + consumed, len))
}
