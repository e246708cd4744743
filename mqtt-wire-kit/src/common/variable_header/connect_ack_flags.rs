use std::{
    fmt::Display,
    io::{Read, Write},
};

use byteorder::{ReadBytesExt, WriteBytesExt};

use crate::common::{DecodeError, Decodable, EncodeError, Encodable, ProtocolViolation};

/// Flags in `CONNACK` packet
///
/// Bit 0 is Session Present, bits 7-1 are reserved and must be 0.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Default)]
pub struct ConnackFlags {
    pub session_present: bool,
}

impl ConnackFlags {
    pub fn empty() -> Self {
        Self {
            session_present: false,
        }
    }
}

impl Encodable for ConnackFlags {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        let code = self.session_present as u8;
        writer.write_u8(code).map_err(From::from)
    }

    fn encoded_length(&self) -> u32 {
        1
    }
}

impl Decodable for ConnackFlags {
    type Cond = ();

    fn decode_with<R: Read>(reader: &mut R, _rest: ()) -> Result<Self, DecodeError> {
        let code = reader.read_u8()?;
        if code & !1 != 0 {
            return Err(ProtocolViolation::InvalidReservedFlag.into());
        }

        Ok(Self {
            session_present: code == 1,
        })
    }
}

impl Display for ConnackFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{session_present: {}}}", self.session_present)
    }
}
