//! Remaining Length encoding
//!
//! The Remaining Length of the fixed header is a base-128 integer: 7 bits of
//! value per byte, least significant group first, with the high bit of each
//! byte set when another byte follows. At most 4 bytes are allowed:
//!
//! - 0-127: 1 byte
//! - 128-16383: 2 bytes
//! - 16384-2097151: 3 bytes
//! - 2097152-268435455: 4 bytes

use std::{
    io::{Read, Write},
    slice,
};

use byteorder::WriteBytesExt;

use crate::common::{DecodeError, EncodeError};

/// Largest value a 4-byte Remaining Length can carry
pub const MAX_REMAINING_LENGTH: u32 = 268_435_455;

/// Maximum bytes of an encoded Remaining Length
pub const MAX_LEN_BYTES: usize = 4;

/// Number of bytes `value` takes once encoded
#[inline]
pub fn remaining_length_len(value: u32) -> u32 {
    if value >= 2_097_152 {
        4
    } else if value >= 16_384 {
        3
    } else if value >= 128 {
        2
    } else {
        1
    }
}

/// Writes `value` as a Remaining Length and returns the bytes written.
///
/// Fails with [`EncodeError::CapacityExceeded`] before writing anything if the
/// value would need a fifth byte.
///
/// ```rust
/// use mqtt_wire_kit::common::varint::encode_length;
///
/// let mut buf = Vec::new();
/// assert_eq!(encode_length(&mut buf, 321).unwrap(), 2);
/// assert_eq!(buf, [0xc1, 0x02]);
/// ```
pub fn encode_length<W: Write>(writer: &mut W, value: u32) -> Result<usize, EncodeError> {
    if value > MAX_REMAINING_LENGTH {
        return Err(EncodeError::CapacityExceeded(value));
    }

    let mut cur = value;
    let mut written = 0;
    loop {
        let mut byte = (cur & 0x7F) as u8;
        cur >>= 7;

        if cur > 0 {
            byte |= 0x80;
        }

        writer.write_u8(byte)?;
        written += 1;

        if cur == 0 {
            break;
        }
    }

    Ok(written)
}

/// Reads a Remaining Length, advancing `reader` past it.
///
/// ```rust
/// use mqtt_wire_kit::common::varint::decode_length;
///
/// let buf = [0x80, 0x01, 0xff];
/// let mut cursor = &buf[..];
/// assert_eq!(decode_length(&mut cursor).unwrap(), 128);
/// assert_eq!(cursor, [0xff]);
/// ```
pub fn decode_length<R: Read>(reader: &mut R) -> Result<u32, DecodeError> {
    let mut byte = 0u8;
    let mut value = 0u32;

    for i in 0..MAX_LEN_BYTES {
        reader.read_exact(slice::from_mut(&mut byte))?;
        value |= (u32::from(byte) & 0x7F) << (7 * i);

        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }

    Err(DecodeError::MalformedLength)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_varint_round_trip_boundaries() {
        let cases = [
            (0, 1),
            (1, 1),
            (127, 1),
            (128, 2),
            (16_383, 2),
            (16_384, 3),
            (2_097_151, 3),
            (2_097_152, 4),
            (268_435_455, 4),
        ];

        for (value, len) in cases {
            let mut buf = Vec::new();
            let written = encode_length(&mut buf, value).unwrap();
            assert_eq!(written, len, "bytes written for {value}");
            assert_eq!(buf.len(), len);
            assert_eq!(remaining_length_len(value) as usize, len);

            let mut cursor = &buf[..];
            assert_eq!(decode_length(&mut cursor).unwrap(), value);
            assert!(cursor.is_empty());
        }
    }

    #[test]
    fn test_encode_max_value_hex() {
        let mut buf = Vec::new();
        encode_length(&mut buf, MAX_REMAINING_LENGTH).unwrap();
        assert_eq!(buf, b"\xff\xff\xff\x7f");
    }

    #[test]
    fn test_encode_overflow_writes_nothing() {
        let mut buf = Vec::new();
        let err = encode_length(&mut buf, 268_435_456).unwrap_err();
        assert!(matches!(err, EncodeError::CapacityExceeded(268_435_456)));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_five_bytes_is_malformed() {
        let stream = b"\x80\x80\x80\x80\x01";
        let mut cursor = &stream[..];
        let err = decode_length(&mut cursor).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedLength));
        // the fifth byte is never read
        assert_eq!(cursor, b"\x01");
    }

    #[test]
    fn test_decode_unterminated_is_truncated() {
        let stream = b"\xff\xff";
        let mut cursor = &stream[..];
        assert!(matches!(
            decode_length(&mut cursor),
            Err(DecodeError::TruncatedBody)
        ));
    }
}
