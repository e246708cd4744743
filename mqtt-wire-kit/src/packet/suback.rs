//! SUBACK

use std::{
    fmt::Display,
    io::{Read, Write},
};

use byteorder::{ReadBytesExt, WriteBytesExt};

use crate::{
    common::{
        packet::DecodablePacket, DecodeError, Decodable, EncodeError, Encodable,
        PacketIdentifier, ProtocolViolation, QualityOfService,
    },
    control::{ControlType, FixedHeader, PacketType},
};

/// Subscribe code
#[repr(u8)]
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum SubscribeReturnCode {
    MaximumQoSLevel0 = 0x00,
    MaximumQoSLevel1 = 0x01,
    MaximumQoSLevel2 = 0x02,
    Failure = 0x80,
}

impl From<QualityOfService> for SubscribeReturnCode {
    fn from(qos: QualityOfService) -> Self {
        match qos {
            QualityOfService::Level0 => SubscribeReturnCode::MaximumQoSLevel0,
            QualityOfService::Level1 => SubscribeReturnCode::MaximumQoSLevel1,
            QualityOfService::Level2 => SubscribeReturnCode::MaximumQoSLevel2,
        }
    }
}

impl TryFrom<u8> for SubscribeReturnCode {
    type Error = ProtocolViolation;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0x00 => Ok(SubscribeReturnCode::MaximumQoSLevel0),
            0x01 => Ok(SubscribeReturnCode::MaximumQoSLevel1),
            0x02 => Ok(SubscribeReturnCode::MaximumQoSLevel2),
            0x80 => Ok(SubscribeReturnCode::Failure),
            code => Err(ProtocolViolation::InvalidSubscribeReturnCode(code)),
        }
    }
}

impl Display for SubscribeReturnCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// `SUBACK` packet
///
/// Return codes are listed in the order of the filters of the `SUBSCRIBE` being answered.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct SubackPacket {
    fixed_header: FixedHeader,
    packet_identifier: PacketIdentifier,
    payload: SubackPacketPayload,
}

encodable_packet!(SubackPacket(packet_identifier, payload));

impl SubackPacket {
    pub fn new(pkid: u16, return_codes: Vec<SubscribeReturnCode>) -> Self {
        let mut pkt = Self {
            fixed_header: FixedHeader::new(
                PacketType::with_default(ControlType::SubscribeAcknowledgement),
                0,
            ),
            packet_identifier: PacketIdentifier(pkid),
            payload: SubackPacketPayload::new(return_codes),
        };
        pkt.fix_header_remaining_len();
        pkt
    }

    pub fn packet_identifier(&self) -> u16 {
        self.packet_identifier.0
    }

    pub fn set_packet_identifier(&mut self, pkid: u16) {
        self.packet_identifier.0 = pkid;
    }

    pub fn return_codes(&self) -> &[SubscribeReturnCode] {
        &self.payload.return_codes[..]
    }

    pub fn release(&mut self) {
        self.payload.return_codes = Vec::new();
        self.fix_header_remaining_len();
    }
}

impl DecodablePacket for SubackPacket {
    type F = FixedHeader;

    fn decode_packet<R: Read>(reader: &mut R, fixed_header: Self::F) -> Result<Self, DecodeError> {
        let packet_identifier = PacketIdentifier::decode(reader)?;
        let payload_len = fixed_header
            .remaining_length
            .checked_sub(packet_identifier.encoded_length())
            .ok_or(DecodeError::TruncatedBody)?;
        let payload = SubackPacketPayload::decode_with(reader, payload_len)?;
        Ok(Self {
            fixed_header,
            packet_identifier,
            payload,
        })
    }
}

impl Display for SubackPacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{fixed_header: {}, packet_identifier: {}, payload: {}}}",
            self.fixed_header, self.packet_identifier, self.payload
        )
    }
}

#[derive(Debug, Eq, PartialEq, Clone)]
struct SubackPacketPayload {
    return_codes: Vec<SubscribeReturnCode>,
}

impl SubackPacketPayload {
    fn new(codes: Vec<SubscribeReturnCode>) -> Self {
        Self {
            return_codes: codes,
        }
    }
}

impl Encodable for SubackPacketPayload {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        for code in self.return_codes.iter() {
            writer.write_u8(*code as u8)?;
        }

        Ok(())
    }

    fn encoded_length(&self) -> u32 {
        self.return_codes.len() as u32
    }
}

impl Decodable for SubackPacketPayload {
    type Cond = u32;

    fn decode_with<R: Read>(reader: &mut R, payload_len: u32) -> Result<Self, DecodeError> {
        let mut codes = Vec::new();

        for _ in 0..payload_len {
            codes.push(SubscribeReturnCode::try_from(reader.read_u8()?)?);
        }

        Ok(Self::new(codes))
    }
}

impl Display for SubackPacketPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{return_codes: [")?;
        let mut iter = self.return_codes.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
            for code in iter {
                write!(f, ", {}", code)?;
            }
        }
        write!(f, "]}}")
    }
}
