//! Value decoder: turns any wire value into text for the results table.
//!
//! [`decode`] is total. Every [`Value`], including ones the BER layer could
//! only keep as [`Value::Unknown`], produces a non-empty string and the name
//! of its wire type.

use std::fmt::Write as _;
use std::net::Ipv4Addr;

use crate::value::Value;

/// Display form of a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayValue {
    /// Human-readable rendering, never empty.
    pub text: String,
    /// Wire type name, e.g. `"OctetString"` or `"Counter32"`.
    pub type_tag: &'static str,
}

/// Rendering used when a value has no visible content.
pub const EMPTY_TEXT: &str = "\"\"";

/// Decode a wire value into its display text and type tag.
///
/// ```
/// use mibwalk::{Value, display};
///
/// let shown = display::decode(&Value::IpAddress([192, 0, 2, 7]));
/// assert_eq!(shown.text, "192.0.2.7");
/// assert_eq!(shown.type_tag, "IpAddress");
///
/// let shown = display::decode(&Value::from(""));
/// assert_eq!(shown.text, "\"\"");
/// ```
pub fn decode(value: &Value) -> DisplayValue {
    let text = match value {
        Value::IpAddress(addr) => Ipv4Addr::from(*addr).to_string(),
        Value::OctetString(data) => octet_string(data),
        Value::Opaque(data) => dotted_decimal(data),
        other => other.to_string(),
    };

    DisplayValue {
        text: if text.is_empty() {
            EMPTY_TEXT.to_string()
        } else {
            text
        },
        type_tag: value.type_name(),
    }
}

/// Text if the bytes are printable UTF-8, hex otherwise.
fn octet_string(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(s) if s.chars().all(|c| !c.is_control() || matches!(c, '\t' | '\r' | '\n')) => {
            s.to_string()
        }
        _ => format!("0x{}", hex(data)),
    }
}

/// Each byte in decimal, joined with dots.
fn dotted_decimal(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 4);
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        let _ = write!(out, "{}", byte);
    }
    out
}

/// Lowercase hex without separators.
pub(crate) fn hex(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for byte in data {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}
