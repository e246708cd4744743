//! Fixed header in MQTT

use std::{
    fmt::Display,
    io::{Read, Write},
};

use byteorder::{ReadBytesExt, WriteBytesExt};

use crate::common::{
    varint::{decode_length, encode_length, remaining_length_len},
    DecodeError, Decodable, EncodeError, Encodable,
};

use super::PacketType;

/// Fixed header for each MQTT control packet
///
/// Format:
///
/// ```plain
/// 7                          3       2     1     0
/// +--------------------------+-------+-----------+--------+
/// | MQTT Control Packet Type | DUP   | QoS       | RETAIN |
/// +--------------------------+-------+-----------+--------+
/// | Remaining Length (1-4 bytes) ...                      |
/// +-------------------------------------------------------+
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FixedHeader {
    /// Packet Type
    pub packet_type: PacketType,

    /// The Remaining Length is the number of bytes remaining within the current packet,
    /// including data in the variable header and the payload. The Remaining Length does
    /// not include the bytes used to encode the Remaining Length.
    pub remaining_length: u32,
}

impl FixedHeader {
    pub fn new(packet_type: PacketType, remaining_length: u32) -> Self {
        Self {
            packet_type,
            remaining_length,
        }
    }
}

impl Encodable for FixedHeader {
    /// Fails with [`EncodeError::CapacityExceeded`] when the Remaining Length does not fit in
    /// 4 bytes
    fn encode<W: Write>(&self, wr: &mut W) -> Result<(), EncodeError> {
        wr.write_u8(self.packet_type.into())?;
        encode_length(wr, self.remaining_length)?;
        Ok(())
    }

    fn encoded_length(&self) -> u32 {
        1 + remaining_length_len(self.remaining_length)
    }
}

impl Decodable for FixedHeader {
    type Cond = ();

    fn decode_with<R: Read>(rdr: &mut R, _rest: ()) -> Result<Self, DecodeError> {
        let type_val = rdr.read_u8()?;
        let packet_type = PacketType::try_from(type_val)?;
        let remaining_length = decode_length(rdr)?;

        Ok(Self::new(packet_type, remaining_length))
    }
}

impl Display for FixedHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{packet_type: {}, remaining_length: {}}}",
            self.packet_type, self.remaining_length
        )
    }
}
