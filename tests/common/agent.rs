//! In-process SNMP agent for testing.
//!
//! Answers GETNEXT and GETBULK from a sorted map over a real UDP socket.
//! Agents bind to ephemeral localhost ports and shut down cleanly on drop.

use crate::common::fixtures;

use bytes::Bytes;
use mibwalk::message::CommunityMessage;
use mibwalk::pdu::{Pdu, PduType};
use mibwalk::{Oid, Value, VarBind, Version};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::ops::Bound;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// noSuchName, the v1 way of saying "nothing after this OID".
const NO_SUCH_NAME: i32 = 2;

/// An in-process SNMP agent for testing.
///
/// Automatically starts on creation and stops on drop.
///
/// # Example
///
/// ```ignore
/// let agent = TestAgent::new().await;
/// let session = common::session(Version::V2c, Retry::none());
/// let varbinds = session.get_next(&common::target_for(&agent), &oid!(1, 3)).await?;
/// // Agent automatically stops when dropped
/// ```
pub struct TestAgent {
    addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    cancel: CancellationToken,
    _task: JoinHandle<()>,
}

impl TestAgent {
    /// Create an agent with default system MIB data.
    pub async fn new() -> Self {
        TestAgentBuilder::new().start().await
    }

    /// Create an agent with custom data.
    pub async fn with_data(data: BTreeMap<Oid, Value>) -> Self {
        TestAgentBuilder::new().data(data).start().await
    }

    pub fn builder() -> TestAgentBuilder {
        TestAgentBuilder::new()
    }

    /// Get the agent's listening address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Requests received so far, including dropped ones.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Explicitly stop the agent.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for TestAgent {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Builder for TestAgent with fault injection.
pub struct TestAgentBuilder {
    data: BTreeMap<Oid, Value>,
    community: Bytes,
    drop_first: usize,
    wrong_request_id: bool,
    echo_request_oid: bool,
}

impl TestAgentBuilder {
    pub fn new() -> Self {
        Self {
            data: fixtures::system_mib(),
            community: Bytes::from_static(b"public"),
            drop_first: 0,
            wrong_request_id: false,
            echo_request_oid: false,
        }
    }

    pub fn data(mut self, data: BTreeMap<Oid, Value>) -> Self {
        self.data = data;
        self
    }

    pub fn community(mut self, community: &'static [u8]) -> Self {
        self.community = Bytes::from_static(community);
        self
    }

    /// Silently drop the first `n` requests.
    pub fn drop_first(mut self, n: usize) -> Self {
        self.drop_first = n;
        self
    }

    /// Answer with a request ID that does not match the request.
    pub fn wrong_request_id(mut self) -> Self {
        self.wrong_request_id = true;
        self
    }

    /// Answer every request with the requested OID itself: a looping agent.
    pub fn echo_request_oid(mut self) -> Self {
        self.echo_request_oid = true;
        self
    }

    pub async fn start(self) -> TestAgent {
        let socket = UdpSocket::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test agent");
        let addr = socket.local_addr().expect("test agent address");
        let cancel = CancellationToken::new();
        let requests = Arc::new(AtomicUsize::new(0));

        let task = tokio::spawn(serve(
            socket,
            Arc::new(self),
            requests.clone(),
            cancel.clone(),
        ));

        TestAgent {
            addr,
            requests,
            cancel,
            _task: task,
        }
    }
}

impl Default for TestAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn serve(
    socket: UdpSocket,
    config: Arc<TestAgentBuilder>,
    requests: Arc<AtomicUsize>,
    cancel: CancellationToken,
) {
    let mut buf = vec![0u8; 65535];
    loop {
        let (len, peer) = tokio::select! {
            _ = cancel.cancelled() => return,
            received = socket.recv_from(&mut buf) => match received {
                Ok(received) => received,
                Err(_) => return,
            },
        };

        let count = requests.fetch_add(1, Ordering::SeqCst) + 1;
        if count <= config.drop_first {
            continue;
        }

        let Ok(request) = CommunityMessage::decode(Bytes::copy_from_slice(&buf[..len])) else {
            continue;
        };
        if request.community != config.community {
            continue;
        }

        if let Some(reply) = answer(&config, request) {
            let _ = socket.send_to(&reply.encode(), peer).await;
        }
    }
}

fn answer(config: &TestAgentBuilder, request: CommunityMessage) -> Option<CommunityMessage> {
    let version = request.version;
    let pdu = request.pdu;
    let oid = pdu.varbinds.first()?.oid.clone();

    let mut response = match pdu.pdu_type {
        PduType::GetNextRequest if config.echo_request_oid => {
            Pdu::response(pdu.request_id, vec![VarBind::new(oid, Value::Integer(0))])
        }
        PduType::GetNextRequest => match successors(&config.data, &oid).next() {
            Some((next, value)) => {
                Pdu::response(pdu.request_id, vec![VarBind::new(next.clone(), value.clone())])
            }
            None if version == Version::V1 => {
                let mut response = Pdu::response(pdu.request_id, pdu.varbinds.clone());
                response.error_status = NO_SUCH_NAME;
                response.error_index = 1;
                response
            }
            None => Pdu::response(pdu.request_id, vec![VarBind::new(oid, Value::EndOfMibView)]),
        },
        PduType::GetBulkRequest => {
            let max = pdu.max_repetitions().max(0) as usize;
            let mut varbinds: Vec<VarBind> = successors(&config.data, &oid)
                .take(max)
                .map(|(oid, value)| VarBind::new(oid.clone(), value.clone()))
                .collect();
            if varbinds.len() < max {
                let last = varbinds.last().map_or(oid, |vb| vb.oid.clone());
                varbinds.push(VarBind::new(last, Value::EndOfMibView));
            }
            Pdu::response(pdu.request_id, varbinds)
        }
        _ => return None,
    };

    if config.wrong_request_id {
        response.request_id = response.request_id.wrapping_add(1);
    }

    Some(CommunityMessage::new(version, request.community, response))
}

fn successors<'a>(
    data: &'a BTreeMap<Oid, Value>,
    oid: &Oid,
) -> impl Iterator<Item = (&'a Oid, &'a Value)> {
    data.range((Bound::Excluded(oid.clone()), Bound::Unbounded))
}
