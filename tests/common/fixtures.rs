//! Standard test fixtures with realistic MIB data.

use mibwalk::{Oid, Value, oid};
use std::collections::BTreeMap;

// =============================================================================
// MIB data fixtures
// =============================================================================

/// Standard system MIB entries (1.3.6.1.2.1.1).
///
/// sysDescr.0 through sysServices.0, seven entries.
pub fn system_mib() -> BTreeMap<Oid, Value> {
    let mut data = BTreeMap::new();

    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 1, 0),
        Value::OctetString("Test SNMP Agent".into()),
    );
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 2, 0),
        Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1, 99999)),
    );
    data.insert(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(123456));
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 4, 0),
        Value::OctetString("admin@test.local".into()),
    );
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 5, 0),
        Value::OctetString("myRouter".into()),
    );
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 6, 0),
        Value::OctetString("Test Lab".into()),
    );
    data.insert(oid!(1, 3, 6, 1, 2, 1, 1, 7, 0), Value::Integer(72));

    data
}

/// Interface table entries (1.3.6.1.2.1.2).
///
/// `count` rows of ifIndex, ifDescr, ifType, ifSpeed and ifPhysAddress,
/// plus ifNumber.0.
pub fn interface_table(count: usize) -> BTreeMap<Oid, Value> {
    let mut data = BTreeMap::new();

    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 2, 1, 0),
        Value::Integer(count as i32),
    );

    for i in 1..=count {
        let idx = i as u32;

        data.insert(
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 1, idx),
            Value::Integer(i as i32),
        );
        data.insert(
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, idx),
            Value::OctetString(format!("eth{}", i - 1).into()),
        );
        // ethernetCsmacd(6)
        data.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 3, idx), Value::Integer(6));
        data.insert(
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 5, idx),
            Value::Gauge32(1_000_000_000),
        );
        data.insert(
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 6, idx),
            Value::OctetString(vec![0x00, 0x11, 0x22, 0x33, 0x44, i as u8].into()),
        );
    }

    data
}

/// Combine multiple fixture sets.
pub fn combined(fixtures: impl IntoIterator<Item = BTreeMap<Oid, Value>>) -> BTreeMap<Oid, Value> {
    let mut result = BTreeMap::new();
    for fixture in fixtures {
        result.extend(fixture);
    }
    result
}

// =============================================================================
// OID helper functions
// =============================================================================

/// sysDescr.0
pub fn sys_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
}

/// sysName.0
pub fn sys_name() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)
}

/// sysServices.0
pub fn sys_services() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 7, 0)
}

/// System subtree root: 1.3.6.1.2.1.1
pub fn system_subtree() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1)
}

/// Interfaces subtree root: 1.3.6.1.2.1.2
pub fn interfaces_subtree() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2)
}
