//! UNSUBSCRIBE

use std::{
    fmt::Display,
    io::{Read, Write},
};

use crate::{
    common::{
        packet::DecodablePacket, DecodeError, Decodable, EncodeError, Encodable,
        PacketIdentifier, ProtocolViolation,
    },
    control::{ControlType, FixedHeader, PacketType},
};

/// `UNSUBSCRIBE` packet
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct UnsubscribePacket {
    fixed_header: FixedHeader,
    packet_identifier: PacketIdentifier,
    payload: UnsubscribePacketPayload,
}

encodable_packet!(UnsubscribePacket(packet_identifier, payload));

impl UnsubscribePacket {
    pub fn new(pkid: u16, topics: Vec<String>) -> Self {
        let mut pkt = Self {
            fixed_header: FixedHeader::new(PacketType::with_default(ControlType::Unsubscribe), 0),
            packet_identifier: PacketIdentifier(pkid),
            payload: UnsubscribePacketPayload::new(topics),
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

    pub fn topic_filters(&self) -> &[String] {
        &self.payload.topic_filters[..]
    }

    pub fn release(&mut self) {
        self.payload.topic_filters = Vec::new();
        self.fix_header_remaining_len();
    }
}

impl DecodablePacket for UnsubscribePacket {
    type F = FixedHeader;

    fn decode_packet<R: Read>(reader: &mut R, fixed_header: Self::F) -> Result<Self, DecodeError> {
        let packet_identifier: PacketIdentifier = PacketIdentifier::decode(reader)?;
        let payload_len = fixed_header
            .remaining_length
            .checked_sub(packet_identifier.encoded_length())
            .ok_or(DecodeError::TruncatedBody)?;
        let payload = UnsubscribePacketPayload::decode_with(reader, payload_len)?;
        Ok(Self {
            fixed_header,
            packet_identifier,
            payload,
        })
    }
}

impl Display for UnsubscribePacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{fixed_header: {}, packet_identifier: {}, payload: {}}}",
            self.fixed_header, self.packet_identifier, self.payload
        )
    }
}

#[derive(Debug, Eq, PartialEq, Clone)]
struct UnsubscribePacketPayload {
    topic_filters: Vec<String>,
}

impl UnsubscribePacketPayload {
    fn new(topic_filters: Vec<String>) -> Self {
        Self { topic_filters }
    }
}

impl Encodable for UnsubscribePacketPayload {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        if self.topic_filters.is_empty() {
            return Err(ProtocolViolation::EmptyTopicList(ControlType::Unsubscribe).into());
        }

        for filter in self.topic_filters.iter() {
            filter.encode(writer)?;
        }

        Ok(())
    }

    fn encoded_length(&self) -> u32 {
        self.topic_filters
            .iter()
            .fold(0, |b, a| b + a.encoded_length())
    }
}

impl Decodable for UnsubscribePacketPayload {
    type Cond = u32;

    fn decode_with<R: Read>(reader: &mut R, mut payload_len: u32) -> Result<Self, DecodeError> {
        // [MQTT-3.10.3-2]
        if payload_len == 0 {
            return Err(ProtocolViolation::EmptyTopicList(ControlType::Unsubscribe).into());
        }

        let mut filters = Vec::new();

        while payload_len > 0 {
            let filter = String::decode(reader)?;
            payload_len = payload_len
                .checked_sub(filter.encoded_length())
                .ok_or(DecodeError::TruncatedBody)?;
            filters.push(filter);
        }

        Ok(Self::new(filters))
    }
}

impl Display for UnsubscribePacketPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{topic_filters: [")?;
        let mut iter = self.topic_filters.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
            for filter in iter {
                write!(f, ", {}", filter)?;
            }
        }
        write!(f, "]}}")
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use crate::common::{encodable::Encodable, packet::EncodablePacket};

    use super::*;

    #[test]
    fn test_unsubscribe_packet_encode_hex() {
        let packet = UnsubscribePacket::new(40304, vec!["a/b".to_owned()]);

        let expected = b"\xa2\x07\x9d\x70\x00\x03\x61\x2f\x62";

        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();

        assert_eq!(&expected[..], &buf[..]);
    }

    #[test]
    fn test_unsubscribe_packet_decode_hex() {
        let encoded_data = b"\xa2\x0c\x9d\x71\x00\x03\x61\x2f\x63\x00\x03\x61\x2f\x23";

        let mut buf = Cursor::new(&encoded_data[..]);
        let packet = UnsubscribePacket::decode(&mut buf).unwrap();

        let expected = UnsubscribePacket::new(40305, vec!["a/c".to_owned(), "a/#".to_owned()]);

        assert_eq!(expected, packet);
    }

    #[test]
    fn test_unsubscribe_packet_empty() {
        let err = UnsubscribePacket::decode(&mut &b"\xa2\x02\x00\x01"[..]).unwrap_err();

        assert!(matches!(
            err,
            DecodeError::ProtocolViolation(ProtocolViolation::EmptyTopicList(
                ControlType::Unsubscribe
            ))
        ));
    }

    #[test]
    fn test_unsubscribe_packet_encode_empty() {
        let packet = UnsubscribePacket::new(1, vec![]);

        let mut buf = Vec::new();
        let err = packet.encode(&mut buf).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::ProtocolViolation(ProtocolViolation::EmptyTopicList(
                ControlType::Unsubscribe
            ))
        ));
    }

    #[test]
    fn test_unsubscribe_packet_filter_past_remaining_length() {
        let err = UnsubscribePacket::decode(&mut &b"\xa2\x06\x00\x01\x00\x05abXYZ"[..])
            .unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedBody));
    }

    #[test]
    fn test_unsubscribe_packet_release() {
        let mut packet = UnsubscribePacket::new(1, vec!["x".to_owned(), "y".to_owned()]);
        packet.release();
        packet.release();

        assert!(packet.topic_filters().is_empty());
        assert_eq!(packet.fixed_header().remaining_length, 2);
    }

    #[test]
    fn test_display_unsubscribe_packet() {
        let packet = UnsubscribePacket::new(12, vec!["a".to_owned(), "b/c".to_owned()]);

        assert_eq!(
            packet.to_string(),
            "{fixed_header: {packet_type: UNSUBSCRIBE, remaining_length: 10}, packet_identifier: 12, payload: {topic_filters: [a, b/c]}}"
        );
    }
}
