//! Property-based tests for mibwalk.
//!
//! Walk properties run against in-memory agents on a shared runtime; the
//! decoder and OID properties run in isolation.

use bytes::Bytes;
use mibwalk::session::{Endpoint, Reply, ScriptedSession, TableSession, Target};
use mibwalk::{
    Browser, BrowserEvent, ErrorStatus, FetchConfig, FetchMode, Fetcher, MemorySink, Oid, Value,
    VarBind, WalkCursor, WalkScope, display, oid,
};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

// =============================================================================
// Shared Test Environment
// =============================================================================

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    RUNTIME
        .get_or_init(|| Runtime::new().expect("failed to create runtime"))
        .block_on(future)
}

fn target() -> Target {
    Target::new(Endpoint::new("127.0.0.1", 161), "public")
}

fn fetcher<S: mibwalk::AgentSession>(session: S, page_limit: u32) -> Fetcher<S> {
    let config = FetchConfig {
        page_limit,
        scope: WalkScope::Lexicographic,
    };
    Fetcher::with_config(session, config).expect("valid page limit")
}

// =============================================================================
// Strategies
// =============================================================================

/// OIDs under 1.3.6.1 with short, low-numbered tails so tables overlap.
fn arb_oid() -> impl Strategy<Value = Oid> {
    prop::collection::vec(0u32..20, 1..6)
        .prop_map(|tail| Oid::new([1, 3, 6, 1].into_iter().chain(tail)))
}

fn arb_bytes() -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..64).prop_map(Bytes::from)
}

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(Value::Integer),
        arb_bytes().prop_map(Value::OctetString),
        Just(Value::Null),
        arb_oid().prop_map(Value::ObjectIdentifier),
        any::<[u8; 4]>().prop_map(Value::IpAddress),
        any::<u32>().prop_map(Value::Counter32),
        any::<u32>().prop_map(Value::Gauge32),
        any::<u32>().prop_map(Value::TimeTicks),
        arb_bytes().prop_map(Value::Opaque),
        any::<u64>().prop_map(Value::Counter64),
        Just(Value::NoSuchObject),
        Just(Value::NoSuchInstance),
        Just(Value::EndOfMibView),
        (any::<u8>(), arb_bytes()).prop_map(|(tag, data)| Value::Unknown { tag, data }),
    ]
}

/// Agent data without exception values, which never appear as stored objects.
fn arb_table() -> impl Strategy<Value = BTreeMap<Oid, Value>> {
    prop::collection::btree_map(arb_oid(), any::<i32>().prop_map(Value::Integer), 0..40)
}

fn arb_mode() -> impl Strategy<Value = FetchMode> {
    prop_oneof![Just(FetchMode::Next), Just(FetchMode::Bulk)]
}

// =============================================================================
// Walk properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The cursor only moves forward, and always to the last record returned.
    #[test]
    fn cursor_is_monotonic(
        table in arb_table(),
        start in arb_oid(),
        page_limit in 1u32..15,
        modes in prop::collection::vec(arb_mode(), 1..12),
    ) {
        let fetcher = fetcher(TableSession::from_iter(table), page_limit);
        let cancel = CancellationToken::new();
        let mut cursor = WalkCursor::new();

        for mode in modes {
            let before = cursor.current().cloned();
            let outcome =
                block_on(fetcher.fetch(mode, &mut cursor, &target(), Some(&start), &cancel));
            prop_assert!(outcome.is_ok());

            match outcome.records.last() {
                Some(last) => prop_assert_eq!(cursor.current(), Some(last.oid())),
                None => prop_assert_eq!(cursor.current(), before.as_ref()),
            }
            if let (Some(before), Some(after)) = (before.as_ref(), cursor.current()) {
                if outcome.records.is_empty() {
                    prop_assert_eq!(after, before);
                } else {
                    prop_assert!(after > before);
                }
            }
        }
    }

    /// A bulk fetch never returns more than the page limit.
    #[test]
    fn bulk_respects_page_limit(
        table in arb_table(),
        page_limit in 1u32..15,
    ) {
        let len = table.len();
        let fetcher = fetcher(TableSession::from_iter(table), page_limit);
        let mut cursor = WalkCursor::new();

        let outcome = block_on(fetcher.fetch_bulk(
            &mut cursor,
            &target(),
            Some(&oid!(1, 3)),
            &CancellationToken::new(),
        ));

        prop_assert!(outcome.is_ok());
        prop_assert_eq!(outcome.records.len(), len.min(page_limit as usize));
    }

    /// Records come back in strictly increasing order, after the start.
    #[test]
    fn records_move_forward(
        table in arb_table(),
        start in arb_oid(),
        page_limit in 1u32..15,
    ) {
        let expected: Vec<Oid> = table
            .keys()
            .filter(|oid| **oid > start)
            .take(page_limit as usize)
            .cloned()
            .collect();
        let fetcher = fetcher(TableSession::from_iter(table), page_limit);
        let mut cursor = WalkCursor::new();

        let outcome = block_on(fetcher.fetch_bulk(
            &mut cursor,
            &target(),
            Some(&start),
            &CancellationToken::new(),
        ));

        let oids: Vec<Oid> = outcome.records.iter().map(|r| r.oid().clone()).collect();
        prop_assert!(oids.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(oids, expected);
    }

    /// After a selection, fetches behave as in a fresh browser.
    #[test]
    fn selection_forgets_earlier_walks(
        table in arb_table(),
        earlier in arb_oid(),
        selected in arb_oid(),
        history in prop::collection::vec(arb_mode(), 0..6),
        mode in arb_mode(),
    ) {
        let cancel = CancellationToken::new();
        let mut used = Browser::new(
            fetcher(TableSession::from_iter(table.clone()), 4),
            target(),
            MemorySink::new(),
        );
        let mut fresh = Browser::new(
            fetcher(TableSession::from_iter(table), 4),
            target(),
            MemorySink::new(),
        );

        used.handle(BrowserEvent::Selected(earlier));
        for step in history {
            block_on(used.fetch(step, &cancel));
        }
        used.handle(BrowserEvent::Selected(selected.clone()));
        fresh.handle(BrowserEvent::Selected(selected));

        let a = block_on(used.fetch(mode, &cancel));
        let b = block_on(fresh.fetch(mode, &cancel));

        let oids = |records: &[mibwalk::Record]| -> Vec<Oid> {
            records.iter().map(|r| r.oid().clone()).collect()
        };
        prop_assert_eq!(oids(&a.records), oids(&b.records));
        prop_assert_eq!(used.cursor(), fresh.cursor());
        prop_assert_eq!(used.sink().len(), fresh.sink().len());
    }

    /// Records decoded before an error are kept, and the cursor stays on the last.
    #[test]
    fn error_keeps_partial_page(count in 1usize..10) {
        let varbinds: Vec<VarBind> = (1..=count as u32)
            .map(|i| VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, i, 0), Value::Integer(i as i32)))
            .collect();
        let last = varbinds[count - 1].oid.clone();
        let session = ScriptedSession::new([
            Reply::Varbinds(varbinds),
            Reply::Status(ErrorStatus::GenErr),
        ]);
        let fetcher = fetcher(session, 10);
        let mut cursor = WalkCursor::new();

        let outcome = block_on(fetcher.fetch_bulk(
            &mut cursor,
            &target(),
            Some(&oid!(1, 3, 6, 1, 2, 1, 1)),
            &CancellationToken::new(),
        ));

        prop_assert_eq!(outcome.records.len(), count);
        prop_assert!(outcome.error.is_some());
        prop_assert_eq!(cursor.current(), Some(&last));
    }
}

// =============================================================================
// Decoder and OID properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Every value renders to non-empty text with a type name.
    #[test]
    fn decoder_is_total(value in arb_value()) {
        let shown = display::decode(&value);
        prop_assert!(!shown.text.is_empty());
        prop_assert!(!shown.type_tag.is_empty());
        prop_assert_eq!(shown.type_tag, value.type_name());
    }

    /// OID ordering matches ordering of the arc sequences.
    #[test]
    fn oid_order_is_lexicographic(a in arb_oid(), b in arb_oid()) {
        prop_assert_eq!(a.cmp(&b), a.arcs().cmp(b.arcs()));
    }

    #[test]
    fn oid_display_parse_roundtrip(oid in arb_oid()) {
        let parsed = Oid::parse(&oid.to_string()).unwrap();
        prop_assert_eq!(parsed, oid);
    }
}

// =============================================================================
// Fixed cases
// =============================================================================

#[test]
fn single_next_builds_the_expected_record() {
    let session = ScriptedSession::new([Reply::Varbinds(vec![VarBind::new(
        oid!(1, 3, 6, 1, 2, 1, 1, 2),
        Value::from("myRouter"),
    )])]);
    let fetcher = fetcher(session, 10);
    let mut cursor = WalkCursor::new();

    let outcome = block_on(fetcher.fetch_next(
        &mut cursor,
        &target(),
        Some(&oid!(1, 3, 6, 1, 2, 1, 1, 1)),
        &CancellationToken::new(),
    ));

    assert!(outcome.is_ok());
    assert_eq!(outcome.records.len(), 1);
    let record = &outcome.records[0];
    assert_eq!(record.oid(), &oid!(1, 3, 6, 1, 2, 1, 1, 2));
    assert_eq!(record.display_name(), "2");
    assert_eq!(record.value_text(), "myRouter");
    assert_eq!(record.value_type(), "OctetString");
    assert_eq!(cursor.current(), Some(&oid!(1, 3, 6, 1, 2, 1, 1, 2)));
}

#[test]
fn empty_tree_ends_both_operations() {
    let fetcher = fetcher(TableSession::default(), 10);
    let cancel = CancellationToken::new();

    for mode in [FetchMode::Next, FetchMode::Bulk] {
        let mut cursor = WalkCursor::new();
        let start = oid!(1, 3);
        let outcome = block_on(fetcher.fetch(mode, &mut cursor, &target(), Some(&start), &cancel));
        assert!(outcome.is_end_of_walk(), "{}", mode);
        assert!(!cursor.is_set());
    }
}
