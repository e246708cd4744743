//! Protocol level header

use std::io::{Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt};

use crate::common::{DecodeError, Decodable, EncodeError, Encodable, ProtocolViolation};

pub const SPEC_3_1_1: u8 = 0x04;

/// Protocol level in MQTT (`0x04` in v3.1.1)
#[derive(Debug, Eq, PartialEq, Copy, Clone, Default)]
#[repr(u8)]
pub enum ProtocolLevel {
    #[default]
    Version311 = SPEC_3_1_1,
}

impl TryFrom<u8> for ProtocolLevel {
    type Error = ProtocolViolation;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            SPEC_3_1_1 => Ok(ProtocolLevel::Version311),
            lvl => Err(ProtocolViolation::UnsupportedProtocolLevel(lvl)),
        }
    }
}

impl Encodable for ProtocolLevel {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        writer.write_u8(*self as u8).map_err(From::from)
    }

    fn encoded_length(&self) -> u32 {
        1
    }
}

impl Decodable for ProtocolLevel {
    type Cond = ();

    fn decode_with<R: Read>(reader: &mut R, _rest: ()) -> Result<ProtocolLevel, DecodeError> {
        let level = reader.read_u8()?;
        ProtocolLevel::try_from(level).map_err(From::from)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_only_3_1_1_is_accepted() {
        assert_eq!(
            ProtocolLevel::decode(&mut &b"\x04"[..]).unwrap(),
            ProtocolLevel::Version311
        );

        for level in [0x03, 0x05] {
            let err = ProtocolLevel::decode(&mut &[level][..]).unwrap_err();
            assert!(matches!(
                err,
                DecodeError::ProtocolViolation(ProtocolViolation::UnsupportedProtocolLevel(l)) if l == level
            ));
        }
    }
}
