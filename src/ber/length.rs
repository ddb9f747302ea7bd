//! BER length encoding and decoding (X.690 Section 8.1.3).
//!
//! Short form for lengths up to 127, long form otherwise. Indefinite length
//! is rejected; SNMP never uses it.

use crate::error::{DecodeErrorKind, Error, Result};

/// Largest length accepted while decoding.
///
/// Far above any real SNMP message, low enough that a corrupt header cannot
/// make us slice past sanity.
pub const MAX_LENGTH: usize = 0x200000;

/// Encode a length, returning the octets in reverse order and how many are used.
///
/// The reverse order suits [`EncodeBuf`](super::EncodeBuf), which writes back to front.
pub fn encode_length(len: usize) -> ([u8; 5], usize) {
    let mut buf = [0u8; 5];

    if len <= 127 {
        buf[0] = len as u8;
        return (buf, 1);
    }

    let mut remaining = len;
    let mut count = 0;
    while remaining > 0 && count < 4 {
        buf[count] = remaining as u8;
        remaining >>= 8;
        count += 1;
    }
    buf[count] = 0x80 | count as u8;
    (buf, count + 1)
}

/// Decode a length, returning (length, bytes_consumed).
///
/// `base_offset` is only used to report error positions.
pub fn decode_length(data: &[u8], base_offset: usize) -> Result<(usize, usize)> {
    let Some(&first) = data.first() else {
        return Err(Error::decode(base_offset, DecodeErrorKind::TruncatedData));
    };

    if first == 0x80 {
        return Err(Error::decode(base_offset, DecodeErrorKind::IndefiniteLength));
    }

    if first & 0x80 == 0 {
        return Ok((first as usize, 1));
    }

    let num_octets = (first & 0x7F) as usize;
    if num_octets > 4 {
        return Err(Error::decode(
            base_offset,
            DecodeErrorKind::LengthTooLong { octets: num_octets },
        ));
    }

    let Some(octets) = data.get(1..1 + num_octets) else {
        return Err(Error::decode(base_offset, DecodeErrorKind::TruncatedData));
    };

    let len = octets
        .iter()
        .fold(0usize, |acc, &byte| (acc << 8) | byte as usize);

    if len > MAX_LENGTH {
        return Err(Error::decode(
            base_offset,
            DecodeErrorKind::LengthExceedsMax {
                length: len,
                max: MAX_LENGTH,
            },
        ));
    }

    Ok((len, 1 + num_octets))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward(len: usize) -> Vec<u8> {
        let (buf, used) = encode_length(len);
        buf[..used].iter().rev().copied().collect()
    }

    #[test]
    fn short_and_long_forms() {
        assert_eq!(forward(0), vec![0x00]);
        assert_eq!(forward(127), vec![0x7F]);
        assert_eq!(forward(128), vec![0x81, 0x80]);
        assert_eq!(forward(256), vec![0x82, 0x01, 0x00]);
        assert_eq!(forward(0x010000), vec![0x83, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn decode_matches_encode() {
        for len in [0, 1, 127, 128, 255, 256, 65535, 65536, MAX_LENGTH] {
            let bytes = forward(len);
            assert_eq!(decode_length(&bytes, 0).unwrap(), (len, bytes.len()));
        }
    }

    #[test]
    fn rejects_indefinite_and_oversized() {
        assert!(decode_length(&[0x80], 0).is_err());
        assert!(decode_length(&[0x85, 1, 2, 3, 4, 5], 0).is_err());
        assert!(decode_length(&[0x82, 0x01], 0).is_err());
        assert!(decode_length(&[0x84, 0x7F, 0xFF, 0xFF, 0xFF], 0).is_err());
        assert!(decode_length(&[], 0).is_err());
    }
}
