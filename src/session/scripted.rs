//! Session that replays canned replies.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{AgentSession, Target};
use crate::error::{Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::varbind::VarBind;

/// One canned reply.
#[derive(Debug, Clone)]
pub enum Reply {
    /// A successful response carrying these varbinds.
    Varbinds(Vec<VarBind>),
    /// A response with this error-status; the index points at the first varbind.
    Status(ErrorStatus),
    /// No response at all.
    Timeout,
}

/// A request the session received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Next { oid: Oid },
    Bulk { oid: Oid, max_records: u32 },
}

impl Call {
    pub fn oid(&self) -> &Oid {
        match self {
            Self::Next { oid } | Self::Bulk { oid, .. } => oid,
        }
    }
}

/// Session that answers each request with the next queued [`Reply`].
///
/// Every request is recorded, whatever the reply. Once the queue is empty
/// every request times out.
#[derive(Debug, Default)]
pub struct ScriptedSession {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedSession {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, reply: Reply) {
        lock(&self.replies).push_back(reply);
    }

    /// Requests received so far, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    fn answer(&self, call: Call) -> Result<Vec<VarBind>> {
        lock(&self.calls).push(call);
        match lock(&self.replies).pop_front() {
            Some(Reply::Varbinds(varbinds)) => Ok(varbinds),
            Some(Reply::Status(status)) => Err(Error::Snmp {
                target: None,
                status,
                index: 1,
                oid: None,
            }),
            Some(Reply::Timeout) | None => Err(Error::Timeout {
                target: None,
                elapsed: Duration::ZERO,
                request_id: 0,
                retries: 0,
            }),
        }
    }
}

// a panicking test thread must not hide what was recorded
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AgentSession for ScriptedSession {
    async fn get_next(&self, _target: &Target, oid: &Oid) -> Result<Vec<VarBind>> {
        self.answer(Call::Next { oid: oid.clone() })
    }

    async fn get_bulk(
        &self,
        _target: &Target,
        oid: &Oid,
        max_records: u32,
    ) -> Result<Vec<VarBind>> {
        self.answer(Call::Bulk {
            oid: oid.clone(),
            max_records,
        })
    }
}
