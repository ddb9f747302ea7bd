//! BER encoding.
//!
//! [`EncodeBuf`] grows backwards: content is pushed before its header, so
//! every length is known when it is written and nothing has to be shifted.
//! Push fields of a SEQUENCE in reverse order.

use super::length::encode_length;
use super::tag;
use crate::oid::Oid;
use bytes::Bytes;

/// Reverse-order BER output buffer.
#[derive(Debug, Default)]
pub struct EncodeBuf {
    // bytes are stored last-to-first and flipped in `finish`
    buf: Vec<u8>,
}

impl EncodeBuf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Prepend raw content octets.
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.buf.extend(data.iter().rev());
    }

    pub fn push_tag(&mut self, tag: u8) {
        self.buf.push(tag);
    }

    pub fn push_length(&mut self, len: usize) {
        let (octets, used) = encode_length(len);
        self.buf.extend_from_slice(&octets[..used]);
    }

    /// Prepend a complete TLV with the given content.
    pub fn push_tlv(&mut self, tag: u8, content: &[u8]) {
        self.push_bytes(content);
        self.push_length(content.len());
        self.push_tag(tag);
    }

    /// Prepend a constructed TLV whose content is written by `f`.
    pub fn push_constructed(&mut self, tag: u8, f: impl FnOnce(&mut Self)) {
        let start = self.buf.len();
        f(self);
        let content_len = self.buf.len() - start;
        self.push_length(content_len);
        self.push_tag(tag);
    }

    pub fn push_sequence(&mut self, f: impl FnOnce(&mut Self)) {
        self.push_constructed(tag::universal::SEQUENCE, f);
    }

    pub fn push_integer(&mut self, value: i32) {
        self.push_signed_with_tag(tag::universal::INTEGER, value);
    }

    fn push_signed_with_tag(&mut self, tag: u8, value: i32) {
        let bytes = value.to_be_bytes();
        // drop redundant sign octets, keeping at least one
        let mut start = 0;
        while start < 3 {
            let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
                || (bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0);
            if !redundant {
                break;
            }
            start += 1;
        }
        self.push_tlv(tag, &bytes[start..]);
    }

    /// Prepend an unsigned value under an application tag (Counter32, Gauge32, TimeTicks, Counter64).
    pub fn push_unsigned(&mut self, tag: u8, value: u64) {
        let bytes = value.to_be_bytes();
        let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len() - 1);
        let content = &bytes[first..];
        if content[0] & 0x80 != 0 {
            self.push_bytes(content);
            self.buf.push(0x00);
            self.push_length(content.len() + 1);
            self.push_tag(tag);
        } else {
            self.push_tlv(tag, content);
        }
    }

    pub fn push_octet_string(&mut self, data: &[u8]) {
        self.push_tlv(tag::universal::OCTET_STRING, data);
    }

    pub fn push_null(&mut self) {
        self.push_tlv(tag::universal::NULL, &[]);
    }

    pub fn push_oid(&mut self, oid: &Oid) {
        self.push_tlv(tag::universal::OBJECT_IDENTIFIER, &oid.to_ber_smallvec());
    }

    /// Consume the buffer, returning the encoded bytes in wire order.
    pub fn finish(mut self) -> Bytes {
        self.buf.reverse();
        Bytes::from(self.buf)
    }
}
