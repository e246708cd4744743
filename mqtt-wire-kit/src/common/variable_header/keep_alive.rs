use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::common::{DecodeError, Decodable, EncodeError, Encodable};

/// Keep alive time interval, in seconds
#[derive(Debug, Eq, PartialEq, Copy, Clone, Default)]
pub struct KeepAlive(pub u16);

impl Encodable for KeepAlive {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        writer.write_u16::<BigEndian>(self.0).map_err(From::from)
    }

    fn encoded_length(&self) -> u32 {
        2
    }
}

impl Decodable for KeepAlive {
    type Cond = ();

    fn decode_with<R: Read>(reader: &mut R, _rest: ()) -> Result<Self, DecodeError> {
        reader
            .read_u16::<BigEndian>()
            .map(KeepAlive)
            .map_err(From::from)
    }
}
