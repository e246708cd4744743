use std::{
    fmt::Display,
    io::{Read, Write},
    marker::Sized,
};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::common::{DecodeError, EncodeError};

/// Largest length a 2-byte length prefix can describe
pub const MAX_PREFIXED_LEN: usize = u16::MAX as usize;

pub trait Encodable {
    /// Encodes to writer
    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError>;
    /// Length of bytes after encoded
    fn encoded_length(&self) -> u32;
}

impl<T: Encodable> Encodable for Option<T> {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        if let Some(this) = self {
            this.encode(writer)?
        }
        Ok(())
    }

    fn encoded_length(&self) -> u32 {
        self.as_ref().map_or(0, |x| x.encoded_length())
    }
}

/// Writes a 2-byte big-endian length followed by the bytes
fn encode_prefixed<W: Write>(bytes: &[u8], writer: &mut W) -> Result<(), EncodeError> {
    if bytes.len() > MAX_PREFIXED_LEN {
        return Err(EncodeError::StringTooLong(bytes.len()));
    }

    writer.write_u16::<BigEndian>(bytes.len() as u16)?;
    writer.write_all(bytes)?;
    Ok(())
}

impl Encodable for &str {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        encode_prefixed(self.as_bytes(), writer)
    }

    fn encoded_length(&self) -> u32 {
        2 + self.len() as u32
    }
}

impl Encodable for String {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        (&self[..]).encode(writer)
    }

    fn encoded_length(&self) -> u32 {
        (&self[..]).encoded_length()
    }
}

/// Raw bytes, written without a length prefix
impl Encodable for &[u8] {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        writer.write_all(self).map_err(From::from)
    }

    fn encoded_length(&self) -> u32 {
        self.len() as u32
    }
}

impl Encodable for Vec<u8> {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        (&self[..]).encode(writer)
    }

    fn encoded_length(&self) -> u32 {
        (&self[..]).encoded_length()
    }
}

/// Methods for decoding bytes to an Object according to MQTT specification
pub trait Decodable: Sized {
    type Cond;

    /// Decodes object from reader
    fn decode<R: Read>(reader: &mut R) -> Result<Self, DecodeError>
    where
        Self::Cond: Default,
    {
        Self::decode_with(reader, Default::default())
    }

    /// Decodes object with additional data (or hints)
    fn decode_with<R: Read>(reader: &mut R, cond: Self::Cond) -> Result<Self, DecodeError>;
}

impl Decodable for String {
    type Cond = ();

    fn decode_with<R: Read>(reader: &mut R, _rest: ()) -> Result<String, DecodeError> {
        let VarBytes(buf) = VarBytes::decode(reader)?;

        String::from_utf8(buf).map_err(From::from)
    }
}

impl Decodable for Vec<u8> {
    type Cond = u32;

    /// Reads exactly `length` raw bytes
    fn decode_with<R: Read>(reader: &mut R, length: u32) -> Result<Self, DecodeError> {
        let mut buf = Vec::new();
        reader.take(length.into()).read_to_end(&mut buf)?;
        if buf.len() < length as usize {
            return Err(DecodeError::TruncatedBody);
        }
        Ok(buf)
    }
}

/// Bytes that encoded with length
#[derive(Debug, Eq, PartialEq, Clone, Default)]
pub struct VarBytes(pub Vec<u8>);

impl Encodable for VarBytes {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        encode_prefixed(&self.0, writer)
    }

    fn encoded_length(&self) -> u32 {
        2 + self.0.len() as u32
    }
}

impl Decodable for VarBytes {
    type Cond = ();

    fn decode_with<R: Read>(reader: &mut R, _: ()) -> Result<Self, DecodeError> {
        let length = reader.read_u16::<BigEndian>()?;
        Vec::<u8>::decode_with(reader, length.into()).map(Self)
    }
}

impl From<Vec<u8>> for VarBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Display for VarBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) if s.chars().all(|c| c.is_ascii_graphic() || c == ' ') => {
                write!(f, "{}", s)
            }
            _ => {
                write!(f, "[")?;
                let mut iter = self.0.iter();
                if let Some(first) = iter.next() {
                    write!(f, "{}", first)?;
                    for byte in iter {
                        write!(f, ", {}", byte)?;
                    }
                }
                write!(f, "]")
            }
        }
    }
}
