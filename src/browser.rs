//! Walk state for one interactive session.
//!
//! [`Browser`] ties a [`Fetcher`] to the state a user manipulates: the
//! cursor, the selected starting node, the target and the sink that shows
//! results. Selection changes arrive as [`BrowserEvent`]s. Both `handle` and
//! `fetch` take `&mut self`, so an event can never interleave with a fetch in
//! flight.

use tokio_util::sync::CancellationToken;

use crate::cursor::WalkCursor;
use crate::fetch::{FetchMode, FetchOutcome, Fetcher};
use crate::oid::Oid;
use crate::session::{AgentSession, Target};
use crate::sink::ResultSink;

/// Something the user did outside of fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    /// A new starting node was picked. The walk restarts there.
    Selected(Oid),
    /// The results view was cleared. The walk position is kept.
    Cleared,
}

/// Cursor, start, target and sink around a [`Fetcher`].
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use mibwalk::session::{Endpoint, TableSession, Target};
/// use mibwalk::{Browser, BrowserEvent, FetchMode, Fetcher, MemorySink, Value, oid};
/// use tokio_util::sync::CancellationToken;
///
/// let agent = TableSession::from_iter([
///     (oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("edge-router")),
///     (oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("edge.lab")),
/// ]);
/// let target = Target::new(Endpoint::new("localhost", 161), "public");
/// let mut browser = Browser::new(Fetcher::new(agent), target, MemorySink::new());
///
/// browser.handle(BrowserEvent::Selected(oid!(1, 3, 6, 1, 2, 1, 1)));
/// let cancel = CancellationToken::new();
/// browser.fetch(FetchMode::Next, &cancel).await;
/// browser.fetch(FetchMode::Next, &cancel).await;
///
/// assert_eq!(browser.sink().len(), 2);
/// assert_eq!(browser.sink().records()[1].value_text(), "edge.lab");
/// # }
/// ```
#[derive(Debug)]
pub struct Browser<S, K> {
    fetcher: Fetcher<S>,
    cursor: WalkCursor,
    start: Option<Oid>,
    target: Target,
    sink: K,
}

impl<S: AgentSession, K: ResultSink> Browser<S, K> {
    pub fn new(fetcher: Fetcher<S>, target: Target, sink: K) -> Self {
        Self {
            fetcher,
            cursor: WalkCursor::new(),
            start: None,
            target,
            sink,
        }
    }

    /// Set the starting node without touching the cursor or the sink.
    pub fn with_start(mut self, start: Oid) -> Self {
        self.start = Some(start);
        self
    }

    /// Apply a selection event.
    pub fn handle(&mut self, event: BrowserEvent) {
        match event {
            BrowserEvent::Selected(oid) => {
                tracing::debug!(target: "mibwalk::fetch", { snmp.oid = %oid }, "starting node selected");
                self.cursor.reset(Some(oid.clone()));
                self.start = Some(oid);
                self.sink.clear();
            }
            BrowserEvent::Cleared => self.sink.clear(),
        }
    }

    /// Run one fetch and append its records to the sink.
    ///
    /// Records decoded before an error are appended too; the error is left in
    /// the returned outcome for the caller to report.
    pub async fn fetch(&mut self, mode: FetchMode, cancel: &CancellationToken) -> FetchOutcome {
        let outcome = self
            .fetcher
            .fetch(
                mode,
                &mut self.cursor,
                &self.target,
                self.start.as_ref(),
                cancel,
            )
            .await;
        for record in &outcome.records {
            self.sink.append(record);
        }
        outcome
    }

    pub fn cursor(&self) -> &WalkCursor {
        &self.cursor
    }

    pub fn start(&self) -> Option<&Oid> {
        self.start.as_ref()
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Point later fetches at another agent. The walk position is kept.
    pub fn set_target(&mut self, target: Target) {
        self.target = target;
    }

    pub fn fetcher(&self) -> &Fetcher<S> {
        &self.fetcher
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }
}
