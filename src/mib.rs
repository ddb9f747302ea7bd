//! Well-known MIB-II nodes.
//!
//! A fixed table of the `system`, `ip` and `udp` groups, used to pick a
//! starting point by name and to label records. There is no MIB-file parser.

use crate::error::{Error, OidErrorKind, Result};
use crate::oid::Oid;

/// One named node of the built-in tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MibNode {
    pub name: &'static str,
    pub arcs: &'static [u32],
    /// Nesting level below the group roots (roots are 0).
    pub depth: usize,
}

impl MibNode {
    pub fn oid(&self) -> Oid {
        Oid::from_slice(self.arcs)
    }
}

const fn node(name: &'static str, arcs: &'static [u32], depth: usize) -> MibNode {
    MibNode { name, arcs, depth }
}

/// The built-in tree in display order.
pub static NODES: &[MibNode] = &[
    node("system", &[1, 3, 6, 1, 2, 1, 1], 0),
    node("sysDescr", &[1, 3, 6, 1, 2, 1, 1, 1], 1),
    node("sysObjectID", &[1, 3, 6, 1, 2, 1, 1, 2], 1),
    node("sysUpTime", &[1, 3, 6, 1, 2, 1, 1, 3], 1),
    node("sysContact", &[1, 3, 6, 1, 2, 1, 1, 4], 1),
    node("sysName", &[1, 3, 6, 1, 2, 1, 1, 5], 1),
    node("sysLocation", &[1, 3, 6, 1, 2, 1, 1, 6], 1),
    node("sysServices", &[1, 3, 6, 1, 2, 1, 1, 7], 1),
    node("ip", &[1, 3, 6, 1, 2, 1, 4], 0),
    node("ipForwarding", &[1, 3, 6, 1, 2, 1, 4, 1], 1),
    node("ipDefaultTTL", &[1, 3, 6, 1, 2, 1, 4, 2], 1),
    node("ipInReceives", &[1, 3, 6, 1, 2, 1, 4, 3], 1),
    node("ipInHdrErrors", &[1, 3, 6, 1, 2, 1, 4, 4], 1),
    node("ipInAddrErrors", &[1, 3, 6, 1, 2, 1, 4, 5], 1),
    node("ipForwDatagrams", &[1, 3, 6, 1, 2, 1, 4, 6], 1),
    node("ipInUnknownProtos", &[1, 3, 6, 1, 2, 1, 4, 7], 1),
    node("ipInDiscards", &[1, 3, 6, 1, 2, 1, 4, 8], 1),
    node("ipInDelivers", &[1, 3, 6, 1, 2, 1, 4, 9], 1),
    node("ipOutRequests", &[1, 3, 6, 1, 2, 1, 4, 10], 1),
    node("ipOutDiscards", &[1, 3, 6, 1, 2, 1, 4, 11], 1),
    node("ipOutNoRoutes", &[1, 3, 6, 1, 2, 1, 4, 12], 1),
    node("ipReasmTimeout", &[1, 3, 6, 1, 2, 1, 4, 13], 1),
    node("ipRouteTable", &[1, 3, 6, 1, 2, 1, 4, 21], 1),
    node("ipRouteDest", &[1, 3, 6, 1, 2, 1, 4, 21, 1, 1], 2),
    node("ipRouteIfIndex", &[1, 3, 6, 1, 2, 1, 4, 21, 1, 2], 2),
    node("ipRouteMetric1", &[1, 3, 6, 1, 2, 1, 4, 21, 1, 3], 2),
    node("ipRouteNextHop", &[1, 3, 6, 1, 2, 1, 4, 21, 1, 4], 2),
    node("ipRouteType", &[1, 3, 6, 1, 2, 1, 4, 21, 1, 7], 2),
    node("ipRouteProto", &[1, 3, 6, 1, 2, 1, 4, 21, 1, 8], 2),
    node("ipRouteAge", &[1, 3, 6, 1, 2, 1, 4, 21, 1, 9], 2),
    node("ipRouteMask", &[1, 3, 6, 1, 2, 1, 4, 21, 1, 11], 2),
    node("udp", &[1, 3, 6, 1, 2, 1, 7], 0),
    node("udpInDatagrams", &[1, 3, 6, 1, 2, 1, 7, 1], 1),
    node("udpNoPorts", &[1, 3, 6, 1, 2, 1, 7, 2], 1),
    node("udpInErrors", &[1, 3, 6, 1, 2, 1, 7, 3], 1),
    node("udpOutDatagrams", &[1, 3, 6, 1, 2, 1, 7, 4], 1),
    node("udpTable", &[1, 3, 6, 1, 2, 1, 7, 5], 1),
];

/// Find a node by name, ignoring ASCII case.
pub fn lookup(name: &str) -> Option<&'static MibNode> {
    NODES.iter().find(|n| n.name.eq_ignore_ascii_case(name))
}

/// Turn user input into an OID.
///
/// Accepts dotted numeric OIDs, node names, and node names followed by
/// numeric instance arcs.
///
/// ```
/// use mibwalk::mib;
///
/// assert_eq!(mib::resolve("sysName").unwrap().to_string(), "1.3.6.1.2.1.1.5");
/// assert_eq!(mib::resolve("sysUpTime.0").unwrap().to_string(), "1.3.6.1.2.1.1.3.0");
/// assert_eq!(mib::resolve(".1.3.6.1.2.1.7").unwrap().to_string(), "1.3.6.1.2.1.7");
/// assert!(mib::resolve("ifTable").is_err());
/// ```
pub fn resolve(input: &str) -> Result<Oid> {
    let input = input.trim();
    if input.is_empty() || input.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return Oid::parse(input);
    }

    let (name, suffix) = input.split_once('.').unwrap_or((input, ""));
    let node = lookup(name)
        .ok_or_else(|| Error::invalid_oid_with_input(OidErrorKind::UnknownName, input))?;
    if suffix.is_empty() {
        return Ok(node.oid());
    }

    let instance = Oid::parse(suffix)?;
    let mut arcs = node.arcs.to_vec();
    arcs.extend_from_slice(instance.arcs());
    Ok(Oid::new(arcs))
}

/// Symbolic form of `oid` using the deepest known node it falls under,
/// e.g. `sysDescr.0`.
pub fn name_of(oid: &Oid) -> Option<String> {
    let node = NODES
        .iter()
        .filter(|n| oid.arcs().starts_with(n.arcs))
        .max_by_key(|n| n.arcs.len())?;

    let rest = &oid.arcs()[node.arcs.len()..];
    let mut name = node.name.to_string();
    for arc in rest {
        name.push('.');
        name.push_str(&arc.to_string());
    }
    Some(name)
}
