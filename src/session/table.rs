//! In-memory agent.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{AgentSession, Target};
use crate::error::Result;
use crate::oid::Oid;
use crate::value::Value;
use crate::varbind::VarBind;

/// Session that answers from a sorted table instead of the network.
///
/// GETNEXT returns the first entry strictly after the requested OID, or an
/// `endOfMibView` varbind past the last one. GETBULK repeats that up to
/// `max_records` times and, like a real agent, appends `endOfMibView` when the
/// table runs out first. The target is ignored.
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use mibwalk::session::{AgentSession, Endpoint, TableSession, Target};
/// use mibwalk::{Value, oid};
///
/// let agent = TableSession::from_iter([
///     (oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("edge-router")),
///     (oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(4200)),
/// ]);
/// let target = Target::new(Endpoint::new("localhost", 161), "public");
///
/// let next = agent.get_next(&target, &oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)).await.unwrap();
/// assert_eq!(next[0].oid, oid!(1, 3, 6, 1, 2, 1, 1, 3, 0));
/// # }
/// ```
#[derive(Debug, Default)]
pub struct TableSession {
    table: BTreeMap<Oid, Value>,
    requests: AtomicUsize,
}

impl TableSession {
    pub fn new(table: BTreeMap<Oid, Value>) -> Self {
        Self {
            table,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn insert(&mut self, oid: Oid, value: Value) {
        self.table.insert(oid, value);
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of GETNEXT and GETBULK requests answered so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    fn after<'a>(&'a self, oid: &Oid) -> impl Iterator<Item = VarBind> + 'a {
        self.table
            .range((Bound::Excluded(oid.clone()), Bound::Unbounded))
            .map(|(oid, value)| VarBind::new(oid.clone(), value.clone()))
    }
}

impl FromIterator<(Oid, Value)> for TableSession {
    fn from_iter<I: IntoIterator<Item = (Oid, Value)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl AgentSession for TableSession {
    async fn get_next(&self, _target: &Target, oid: &Oid) -> Result<Vec<VarBind>> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let next = self
            .after(oid)
            .next()
            .unwrap_or_else(|| VarBind::new(oid.clone(), Value::EndOfMibView));
        Ok(vec![next])
    }

    async fn get_bulk(
        &self,
        _target: &Target,
        oid: &Oid,
        max_records: u32,
    ) -> Result<Vec<VarBind>> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let max = max_records as usize;
        let mut varbinds: Vec<VarBind> = self.after(oid).take(max).collect();
        if varbinds.len() < max {
            let last = varbinds.last().map_or_else(|| oid.clone(), |vb| vb.oid.clone());
            varbinds.push(VarBind::new(last, Value::EndOfMibView));
        }
        Ok(varbinds)
    }
}
