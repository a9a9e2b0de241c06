#![doc = r#"
Variable length quantities.

Delta-times and meta/sysex payload lengths are stored 7 bits per byte,
most significant group first. Every byte except the last has its top bit set.
At most four bytes are read, so the largest value is `0x0FFF_FFFF`.
"#]

use crate::{RangeError, reader::ReaderErrorKind, Truncation};

/// The largest value representable in four bytes.
pub const MAX_VLQ: u32 = 0x0FFF_FFFF;

const MAX_VLQ_BYTES: u32 = 4;

/// Decode a quantity from the start of `bytes`.
///
/// Returns the value and the number of bytes it used.
pub fn decode(bytes: &[u8]) -> Result<(u32, u32), ReaderErrorKind> {
    let mut value: u32 = 0;
    for n in 0..MAX_VLQ_BYTES {
        let byte = *bytes
            .get(n as usize)
            .ok_or(Truncation::EndOfInput)?;
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok((value, n + 1));
        }
    }
    Err(RangeError::VlqTooLong.into())
}

/// Encode `value` with as few bytes as possible.
///
/// Returns `None` for values above [`MAX_VLQ`].
pub fn encode(value: u32) -> Option<alloc::vec::Vec<u8>> {
    if value > MAX_VLQ {
        return None;
    }
    let mut out = alloc::vec![(value & 0x7F) as u8];
    let mut rest = value >> 7;
    while rest > 0 {
        out.insert(0, ((rest & 0x7F) as u8) | 0x80);
        rest >>= 7;
    }
    Some(out)
}

#[test]
fn decode_known_values() {
    use pretty_assertions::assert_eq;
    assert_eq!(decode(&[0x00]).unwrap(), (0, 1));
    assert_eq!(decode(&[0x7F]).unwrap(), (0x7F, 1));
    assert_eq!(decode(&[0x81, 0x00]).unwrap(), (0x80, 2));
    assert_eq!(decode(&[0xC0, 0x00]).unwrap(), (0x2000, 2));
    assert_eq!(decode(&[0xFF, 0xFF, 0x7F]).unwrap(), (0x1F_FFFF, 3));
    assert_eq!(decode(&[0xFF, 0xFF, 0xFF, 0x7F]).unwrap(), (MAX_VLQ, 4));
    // trailing bytes are left alone
    assert_eq!(decode(&[0x60, 0x90, 0x3C]).unwrap(), (0x60, 1));
}

#[test]
fn decode_rejects_fifth_byte() {
    use pretty_assertions::assert_eq;
    let err = decode(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F]).unwrap_err();
    assert_eq!(err, ReaderErrorKind::Range(RangeError::VlqTooLong));
}

#[test]
fn decode_rejects_unterminated_input() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        decode(&[0x81, 0x80]).unwrap_err(),
        ReaderErrorKind::Truncated(Truncation::EndOfInput)
    );
    assert_eq!(
        decode(&[]).unwrap_err(),
        ReaderErrorKind::Truncated(Truncation::EndOfInput)
    );
}

#[test]
fn encode_is_minimal_and_decodes_back() {
    use pretty_assertions::assert_eq;
    let boundaries = [
        (0, 1),
        (0x7F, 1),
        (0x80, 2),
        (0x3FFF, 2),
        (0x4000, 3),
        (0x1F_FFFF, 3),
        (0x20_0000, 4),
        (MAX_VLQ, 4),
    ];
    for (value, len) in boundaries {
        let bytes = encode(value).unwrap();
        assert_eq!(bytes.len(), len, "length of {value:#X}");
        assert_eq!(decode(&bytes).unwrap(), (value, len as u32));
    }
    assert_eq!(encode(MAX_VLQ + 1), None);
}

#[test]
fn encode_decode_sweep() {
    // every 7-bit group boundary and a stride across the full range
    let mut value = 0u32;
    while value <= MAX_VLQ {
        let bytes = encode(value).unwrap();
        assert_eq!(decode(&bytes).unwrap().0, value);
        value += 4099;
    }
}
