//! Walk position carried between fetches.

use crate::oid::Oid;

/// The last identifier a walk returned.
///
/// A fresh cursor is unset, so the first fetch starts from the caller's
/// starting OID. Every record a fetch produces moves the cursor to that
/// record's OID; selecting a new node replaces it outright.
///
/// ```
/// use mibwalk::{WalkCursor, oid};
///
/// let mut cursor = WalkCursor::new();
/// assert_eq!(cursor.current(), None);
///
/// cursor.advance(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0));
/// assert_eq!(cursor.current(), Some(&oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)));
///
/// cursor.reset(Some(oid!(1, 3, 6, 1, 2, 1, 2)));
/// assert_eq!(cursor.current(), Some(&oid!(1, 3, 6, 1, 2, 1, 2)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkCursor {
    last: Option<Oid>,
}

impl WalkCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor positioned at `oid`, as if a fetch had just returned it.
    pub fn at(oid: Oid) -> Self {
        Self { last: Some(oid) }
    }

    pub fn current(&self) -> Option<&Oid> {
        self.last.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.last.is_some()
    }

    /// Record that `to` was just returned.
    pub fn advance(&mut self, to: Oid) {
        tracing::trace!(target: "mibwalk::fetch", { snmp.oid = %to }, "cursor advanced");
        self.last = Some(to);
    }

    /// Drop the walk position, optionally restarting at `to`.
    pub fn reset(&mut self, to: Option<Oid>) {
        self.last = to;
    }
}
