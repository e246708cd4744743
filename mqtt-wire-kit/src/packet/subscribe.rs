//! SUBSCRIBE

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

/// `SUBSCRIBE` packet
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct SubscribePacket {
    fixed_header: FixedHeader,
    packet_identifier: PacketIdentifier,
    payload: SubscribePacketPayload,
}

encodable_packet!(SubscribePacket(packet_identifier, payload));

impl SubscribePacket {
    pub fn new(pkid: u16, subscribes: Vec<(String, QualityOfService)>) -> Self {
        let mut pkt = Self {
            fixed_header: FixedHeader::new(PacketType::with_default(ControlType::Subscribe), 0),
            packet_identifier: PacketIdentifier(pkid),
            payload: SubscribePacketPayload::new(subscribes),
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

    pub fn subscribes(&self) -> &[(String, QualityOfService)] {
        &self.payload.subscribes[..]
    }

    pub fn release(&mut self) {
        self.payload.subscribes = Vec::new();
        self.fix_header_remaining_len();
    }
}

impl DecodablePacket for SubscribePacket {
    type F = FixedHeader;

    fn decode_packet<R: Read>(reader: &mut R, fixed_header: Self::F) -> Result<Self, DecodeError> {
        let packet_identifier: PacketIdentifier = PacketIdentifier::decode(reader)?;
        let payload_len = fixed_header
            .remaining_length
            .checked_sub(packet_identifier.encoded_length())
            .ok_or(DecodeError::TruncatedBody)?;
        let payload = SubscribePacketPayload::decode_with(reader, payload_len)?;
        Ok(Self {
            fixed_header,
            packet_identifier,
            payload,
        })
    }
}

impl Display for SubscribePacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{fixed_header: {}, packet_identifier: {}, payload: {}}}",
            self.fixed_header, self.packet_identifier, self.payload
        )
    }
}

/// Payload of subscribe packet
#[derive(Debug, Eq, PartialEq, Clone)]
struct SubscribePacketPayload {
    subscribes: Vec<(String, QualityOfService)>,
}

impl SubscribePacketPayload {
    fn new(subs: Vec<(String, QualityOfService)>) -> Self {
        Self { subscribes: subs }
    }
}

impl Encodable for SubscribePacketPayload {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        if self.subscribes.is_empty() {
            return Err(ProtocolViolation::EmptyTopicList(ControlType::Subscribe).into());
        }

        for (filter, qos) in self.subscribes.iter() {
            filter.encode(writer)?;
            writer.write_u8(*qos as u8)?;
        }

        Ok(())
    }

    fn encoded_length(&self) -> u32 {
        self.subscribes
            .iter()
            .fold(0, |b, a| b + a.0.encoded_length() + 1)
    }
}

impl Decodable for SubscribePacketPayload {
    type Cond = u32;

    fn decode_with<R: Read>(reader: &mut R, mut payload_len: u32) -> Result<Self, DecodeError> {
        // [MQTT-3.8.3-3]
        if payload_len == 0 {
            return Err(ProtocolViolation::EmptyTopicList(ControlType::Subscribe).into());
        }

        let mut subs = Vec::new();

        while payload_len > 0 {
            let filter = String::decode(reader)?;
            let qos = QualityOfService::try_from(reader.read_u8()?)?;

            payload_len = payload_len
                .checked_sub(filter.encoded_length() + 1)
                .ok_or(DecodeError::TruncatedBody)?;
            subs.push((filter, qos));
        }

        Ok(Self::new(subs))
    }
}

impl Display for SubscribePacketPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{subscribes: [")?;
        let mut iter = self.subscribes.iter();
        if let Some(first) = iter.next() {
            write!(f, "({}, {})", first.0, first.1)?;
            for subscribe in iter {
                write!(f, ", ({}, {})", subscribe.0, subscribe.1)?;
            }
        }
        write!(f, "]}}")
    }
}
