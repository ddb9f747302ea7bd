//! Fetch orchestrator: single-step and bulk walks.
//!
//! A [`Fetcher`] turns agent responses into [`Record`]s while keeping the walk
//! moving forward:
//!
//! - the effective start is the cursor if set, else the caller's start OID
//! - every record's OID must be strictly greater than the one before it,
//!   starting from the effective start
//! - `endOfMibView`, an empty response or (with [`WalkScope::Subtree`]) an OID
//!   outside the subtree ends the walk quietly
//! - a bulk fetch never returns more than `page_limit` records
//!
//! Fetches do not return `Err`. A failure is reported in
//! [`FetchOutcome::error`] next to whatever was decoded before it, and the
//! cursor stays on the last good record.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::cursor::WalkCursor;
use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::record::Record;
use crate::session::{AgentSession, Target};
use crate::value::Value;
use crate::varbind::VarBind;

/// Default maximum number of records returned by one bulk fetch.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// How far a walk is allowed to go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WalkScope {
    /// Keep following the agent's lexicographic order across subtree
    /// boundaries until the end of its MIB view (default).
    #[default]
    Lexicographic,
    /// Stop once the agent returns an OID outside this subtree.
    Subtree(Oid),
}

impl WalkScope {
    fn contains(&self, oid: &Oid) -> bool {
        match self {
            Self::Lexicographic => true,
            Self::Subtree(root) => oid.starts_with(root),
        }
    }
}

/// Orchestrator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Upper bound on records per bulk fetch (default: 10).
    pub page_limit: u32,
    pub scope: WalkScope,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            scope: WalkScope::default(),
        }
    }
}

impl FetchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.page_limit == 0 {
            return Err(Error::Config("page limit must be at least 1".into()));
        }
        Ok(())
    }
}

/// Which walk operation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// One GETNEXT, at most one record.
    Next,
    /// GETBULK until the page limit or the end of the walk.
    Bulk,
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next => f.write_str("next"),
            Self::Bulk => f.write_str("bulk"),
        }
    }
}

impl FromStr for FetchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "next" | "getnext" => Ok(Self::Next),
            "bulk" | "getbulk" => Ok(Self::Bulk),
            other => Err(Error::Config(format!(
                "unknown fetch mode {:?} (expected next or bulk)",
                other
            ))),
        }
    }
}

/// Result of one fetch: the records in walk order, plus the error that
/// stopped it early, if any.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub records: Vec<Record>,
    pub error: Option<Error>,
}

impl FetchOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Nothing came back and nothing went wrong: the walk is over.
    pub fn is_end_of_walk(&self) -> bool {
        self.records.is_empty() && self.error.is_none()
    }

    /// Drop partial records on error.
    pub fn into_result(self) -> Result<Vec<Record>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.records),
        }
    }
}

/// What a single varbind means for the walk.
enum Step {
    Record(Record),
    End,
}

/// Runs walks against an [`AgentSession`].
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use mibwalk::session::{Endpoint, TableSession, Target};
/// use mibwalk::{Fetcher, Value, WalkCursor, oid};
/// use tokio_util::sync::CancellationToken;
///
/// let agent = TableSession::from_iter([
///     (oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("edge-router")),
///     (oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("edge.lab")),
/// ]);
/// let fetcher = Fetcher::new(agent);
/// let target = Target::new(Endpoint::new("localhost", 161), "public");
/// let mut cursor = WalkCursor::new();
///
/// let outcome = fetcher
///     .fetch_bulk(&mut cursor, &target, Some(&oid!(1, 3, 6, 1, 2, 1, 1)), &CancellationToken::new())
///     .await;
/// assert!(outcome.is_ok());
/// assert_eq!(outcome.records.len(), 2);
/// assert_eq!(cursor.current(), Some(&oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)));
/// # }
/// ```
#[derive(Debug)]
pub struct Fetcher<S> {
    session: S,
    config: FetchConfig,
}

impl<S: AgentSession> Fetcher<S> {
    /// Fetcher with the default page limit and lexicographic scope.
    pub fn new(session: S) -> Self {
        Self {
            session,
            config: FetchConfig::default(),
        }
    }

    pub fn with_config(session: S, config: FetchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { session, config })
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Run the operation selected by `mode`.
    pub async fn fetch(
        &self,
        mode: FetchMode,
        cursor: &mut WalkCursor,
        target: &Target,
        start: Option<&Oid>,
        cancel: &CancellationToken,
    ) -> FetchOutcome {
        match mode {
            FetchMode::Next => self.fetch_next(cursor, target, start, cancel).await,
            FetchMode::Bulk => self.fetch_bulk(cursor, target, start, cancel).await,
        }
    }

    /// One GETNEXT from the effective start.
    ///
    /// Returns at most one record. The cursor moves only if a record is
    /// returned.
    #[instrument(
        level = "debug",
        target = "mibwalk::fetch",
        skip_all,
        fields(snmp.target = %target.endpoint, snmp.mode = "next")
    )]
    pub async fn fetch_next(
        &self,
        cursor: &mut WalkCursor,
        target: &Target,
        start: Option<&Oid>,
        cancel: &CancellationToken,
    ) -> FetchOutcome {
        let from = match effective_start(cursor, start) {
            Ok(oid) => oid,
            Err(e) => return finish(target, Vec::new(), Some(e)),
        };

        let varbinds = match cancellable(cancel, self.session.get_next(target, &from)).await {
            Ok(varbinds) => varbinds,
            Err(e) => return finish(target, Vec::new(), Some(e)),
        };

        let Some(varbind) = varbinds.first() else {
            tracing::debug!(target: "mibwalk::fetch", { snmp.oid = %from }, "empty response, end of walk");
            return finish(target, Vec::new(), None);
        };

        match self.step(&from, varbind, target) {
            Ok(Step::Record(record)) => {
                cursor.advance(record.oid().clone());
                finish(target, vec![record], None)
            }
            Ok(Step::End) => finish(target, Vec::new(), None),
            Err(e) => finish(target, Vec::new(), Some(e)),
        }
    }

    /// GETBULK until `page_limit` records are collected or the walk ends.
    ///
    /// Each request asks for the number of records still missing from the
    /// page. The cursor advances after every record, so on error it points at
    /// the last record returned.
    #[instrument(
        level = "debug",
        target = "mibwalk::fetch",
        skip_all,
        fields(snmp.target = %target.endpoint, snmp.mode = "bulk", snmp.page_limit = self.config.page_limit)
    )]
    pub async fn fetch_bulk(
        &self,
        cursor: &mut WalkCursor,
        target: &Target,
        start: Option<&Oid>,
        cancel: &CancellationToken,
    ) -> FetchOutcome {
        let mut last = match effective_start(cursor, start) {
            Ok(oid) => oid,
            Err(e) => return finish(target, Vec::new(), Some(e)),
        };

        let limit = self.config.page_limit as usize;
        let mut records = Vec::with_capacity(limit);

        while records.len() < limit {
            let remaining = (limit - records.len()) as u32;
            tracing::trace!(target: "mibwalk::fetch", { snmp.oid = %last, snmp.max_repetitions = remaining }, "requesting batch");

            let varbinds =
                match cancellable(cancel, self.session.get_bulk(target, &last, remaining)).await {
                    Ok(varbinds) => varbinds,
                    Err(e) => return finish(target, records, Some(e)),
                };

            if varbinds.is_empty() {
                tracing::debug!(target: "mibwalk::fetch", { snmp.oid = %last }, "empty response, end of walk");
                break;
            }

            for varbind in &varbinds {
                match self.step(&last, varbind, target) {
                    Ok(Step::Record(record)) => {
                        last = record.oid().clone();
                        cursor.advance(last.clone());
                        records.push(record);
                        if records.len() == limit {
                            return finish(target, records, None);
                        }
                    }
                    Ok(Step::End) => return finish(target, records, None),
                    Err(e) => return finish(target, records, Some(e)),
                }
            }
        }

        finish(target, records, None)
    }

    /// Classify one returned varbind against the previous OID.
    fn step(&self, previous: &Oid, varbind: &VarBind, target: &Target) -> Result<Step> {
        if matches!(varbind.value, Value::EndOfMibView) {
            tracing::debug!(target: "mibwalk::fetch", { snmp.oid = %varbind.oid }, "end of MIB view");
            return Ok(Step::End);
        }
        if varbind.oid <= *previous {
            return Err(Error::NonIncreasingOid {
                previous: previous.clone(),
                current: varbind.oid.clone(),
            });
        }
        if !self.config.scope.contains(&varbind.oid) {
            tracing::debug!(target: "mibwalk::fetch", { snmp.oid = %varbind.oid }, "left walk subtree");
            return Ok(Step::End);
        }
        Ok(Step::Record(Record::from_varbind(varbind, &target.endpoint)))
    }
}

/// Cursor if set, otherwise the caller's start. Neither, or an OID that
/// cannot be encoded, fails before any request is sent.
fn effective_start(cursor: &WalkCursor, start: Option<&Oid>) -> Result<Oid> {
    let oid = cursor
        .current()
        .or(start)
        .filter(|oid| !oid.is_empty())
        .ok_or(Error::MissingStartOid)?;
    oid.validate()?;
    Ok(oid.clone())
}

/// Await an agent call unless the fetch is cancelled first.
async fn cancellable<F>(cancel: &CancellationToken, call: F) -> Result<Vec<VarBind>>
where
    F: Future<Output = Result<Vec<VarBind>>>,
{
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = call => result,
    }
}

fn finish(target: &Target, records: Vec<Record>, error: Option<Error>) -> FetchOutcome {
    match &error {
        Some(e) => {
            tracing::warn!(target: "mibwalk::fetch", { snmp.target = %target.endpoint, records = records.len(), class = %e.class(), error = %e }, "fetch stopped");
        }
        None => {
            tracing::debug!(target: "mibwalk::fetch", { records = records.len() }, "fetch complete");
        }
    }
    FetchOutcome { records, error }
}
