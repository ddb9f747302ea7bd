//! Mock transport for unit tests.
//!
//! Replays queued responses and records every request sent through it.

use super::{Transport, extract_request_id};
use crate::error::{Error, Result};
use crate::message::CommunityMessage;
use crate::oid::Oid;
use crate::pdu::Pdu;
use crate::value::Value;
use crate::varbind::VarBind;
use crate::version::Version;
use bytes::Bytes;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A queued reaction to the next `recv`.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this message with its request ID patched to match the request.
    Data(Bytes),
    /// Return this message untouched.
    RawData(Bytes),
    Timeout,
    IoError(String),
}

struct MockTransportInner {
    target: SocketAddr,
    responses: VecDeque<MockResponse>,
    requests: Vec<Bytes>,
    last_request_id: Option<i32>,
}

/// Scriptable transport.
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

impl MockTransport {
    pub fn new(target: SocketAddr) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockTransportInner {
                target,
                responses: VecDeque::new(),
                requests: Vec::new(),
                last_request_id: None,
            })),
        }
    }

    pub fn queue(&self, response: MockResponse) {
        self.inner.lock().unwrap().responses.push_back(response);
    }

    pub fn queue_response(&self, data: impl Into<Bytes>) {
        self.queue(MockResponse::Data(data.into()));
    }

    pub fn queue_timeout(&self) {
        self.queue(MockResponse::Timeout);
    }

    /// Every request sent so far, decoded.
    pub fn requests(&self) -> Vec<CommunityMessage> {
        self.inner
            .lock()
            .unwrap()
            .requests
            .iter()
            .map(|data| CommunityMessage::decode(data.clone()).unwrap())
            .collect()
    }

    fn patch_request_id(data: Bytes, request_id: i32) -> Bytes {
        match CommunityMessage::decode(data.clone()) {
            Ok(mut msg) => {
                msg.pdu.request_id = request_id;
                msg.encode()
            }
            Err(_) => data,
        }
    }
}

impl Transport for MockTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.last_request_id = extract_request_id(data);
        inner.requests.push(Bytes::copy_from_slice(data));
        Ok(())
    }

    async fn recv(&self, request_id: i32, timeout: Duration) -> Result<Bytes> {
        let (response, target, last_request_id) = {
            let mut inner = self.inner.lock().unwrap();
            (inner.responses.pop_front(), inner.target, inner.last_request_id)
        };

        let timed_out = Error::Timeout {
            target: Some(target),
            elapsed: timeout,
            request_id,
            retries: 0,
        };

        match response {
            Some(MockResponse::Data(data)) => Ok(match last_request_id {
                Some(id) => Self::patch_request_id(data, id),
                None => data,
            }),
            Some(MockResponse::RawData(data)) => Ok(data),
            Some(MockResponse::IoError(msg)) => Err(Error::Io {
                target: Some(target),
                source: std::io::Error::other(msg),
            }),
            Some(MockResponse::Timeout) | None => Err(timed_out),
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.inner.lock().unwrap().target
    }
}

/// Builds encoded Response messages.
pub struct ResponseBuilder {
    request_id: i32,
    version: Version,
    varbinds: Vec<VarBind>,
    error_status: i32,
    error_index: i32,
}

impl ResponseBuilder {
    pub fn new(request_id: i32) -> Self {
        Self {
            request_id,
            version: Version::V2c,
            varbinds: Vec::new(),
            error_status: 0,
            error_index: 0,
        }
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn varbind(mut self, oid: Oid, value: impl Into<Value>) -> Self {
        self.varbinds.push(VarBind::new(oid, value.into()));
        self
    }

    pub fn error(mut self, status: i32, index: i32) -> Self {
        self.error_status = status;
        self.error_index = index;
        self
    }

    pub fn build(self, community: &[u8]) -> Bytes {
        let mut pdu = Pdu::response(self.request_id, self.varbinds);
        pdu.error_status = self.error_status;
        pdu.error_index = self.error_index;
        CommunityMessage::new(self.version, Bytes::copy_from_slice(community), pdu).encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    #[tokio::test]
    async fn test_response_request_id_is_patched() {
        let mock = MockTransport::new("127.0.0.1:161".parse().unwrap());
        mock.queue_response(
            ResponseBuilder::new(0)
                .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), "core-sw1")
                .build(b"public"),
        );

        let request = CommunityMessage::new(
            Version::V2c,
            b"public".as_slice(),
            Pdu::get_next(77, &oid!(1, 3, 6, 1, 2, 1, 1, 4)),
        );
        mock.send(&request.encode()).await.unwrap();

        let data = mock.recv(77, Duration::from_secs(1)).await.unwrap();
        let reply = CommunityMessage::decode(data).unwrap();
        assert_eq!(reply.pdu.request_id, 77);
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_queue_times_out() {
        let mock = MockTransport::new("127.0.0.1:161".parse().unwrap());
        assert!(matches!(
            mock.recv(1, Duration::from_millis(10)).await,
            Err(Error::Timeout { .. })
        ));
    }
}
