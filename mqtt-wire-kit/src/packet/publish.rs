//! PUBLISH

use std::{fmt::Display, io::Read};

use crate::{
    common::{
        encodable::VarBytes, packet::DecodablePacket, qos::QoSWithPacketIdentifier, DecodeError,
        Decodable, Encodable, PacketIdentifier,
    },
    control::{FixedHeader, PacketType},
};

const DUP: u8 = 0b1000;
const QOS_MASK: u8 = 0b0110;
const RETAIN: u8 = 0b0001;

/// `PUBLISH` packet
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct PublishPacket {
    fixed_header: FixedHeader,
    topic_name: String,
    packet_identifier: Option<PacketIdentifier>,
    payload: Vec<u8>,
}

encodable_packet!(PublishPacket(topic_name, packet_identifier, payload));

impl PublishPacket {
    pub fn new<T: Into<String>, P: Into<Vec<u8>>>(
        topic_name: T,
        qos: QoSWithPacketIdentifier,
        payload: P,
    ) -> Self {
        let (qos, pkid) = qos.split();
        let mut pkt = Self {
            fixed_header: FixedHeader::new(PacketType::publish(qos), 0),
            topic_name: topic_name.into(),
            packet_identifier: pkid.map(PacketIdentifier),
            payload: payload.into(),
        };
        pkt.fix_header_remaining_len();
        pkt
    }

    pub fn set_dup(&mut self, dup: bool) {
        self.fixed_header
            .packet_type
            .update_flags(|flags| (flags & !DUP) | if dup { DUP } else { 0 })
    }

    pub fn dup(&self) -> bool {
        self.fixed_header.packet_type.dup()
    }

    pub fn set_qos(&mut self, qos: QoSWithPacketIdentifier) {
        let (qos, pkid) = qos.split();
        self.fixed_header
            .packet_type
            .update_flags(|flags| (flags & !QOS_MASK) | ((qos as u8) << 1));
        self.packet_identifier = pkid.map(PacketIdentifier);
        self.fix_header_remaining_len();
    }

    pub fn qos(&self) -> QoSWithPacketIdentifier {
        match self.packet_identifier {
            None => QoSWithPacketIdentifier::Level0,
            Some(pkid) => QoSWithPacketIdentifier::new(self.fixed_header.packet_type.qos(), pkid.0),
        }
    }

    pub fn set_retain(&mut self, ret: bool) {
        self.fixed_header
            .packet_type
            .update_flags(|flags| (flags & !RETAIN) | ret as u8)
    }

    pub fn retain(&self) -> bool {
        self.fixed_header.packet_type.retain()
    }

    pub fn set_topic_name<T: Into<String>>(&mut self, topic_name: T) {
        self.topic_name = topic_name.into();
        self.fix_header_remaining_len();
    }

    pub fn topic_name(&self) -> &str {
        &self.topic_name
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn set_payload<P: Into<Vec<u8>>>(&mut self, payload: P) {
        self.payload = payload.into();
        self.fix_header_remaining_len();
    }

    /// Drops topic and payload. Header flags and packet identifier stay.
    pub fn release(&mut self) {
        self.topic_name = String::new();
        self.payload = Vec::new();
        self.fix_header_remaining_len();
    }
}

impl DecodablePacket for PublishPacket {
    type F = FixedHeader;

    fn decode_packet<R: Read>(reader: &mut R, fixed_header: Self::F) -> Result<Self, DecodeError> {
        let topic_name = String::decode(reader)?;

        let packet_identifier = if fixed_header.packet_type.flags() & QOS_MASK != 0 {
            Some(PacketIdentifier::decode(reader)?)
        } else {
            None
        };

        let vhead_len = topic_name.encoded_length() + packet_identifier.encoded_length();
        let payload_len = fixed_header
            .remaining_length
            .checked_sub(vhead_len)
            .ok_or(DecodeError::TruncatedBody)?;

        let payload = Vec::<u8>::decode_with(reader, payload_len)?;

        Ok(Self {
            fixed_header,
            topic_name,
            packet_identifier,
            payload,
        })
    }
}

impl Display for PublishPacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{fixed_header: {}, topic_name: {}",
            self.fixed_header, self.topic_name
        )?;
        match self.packet_identifier {
            Some(packet_identifier) => write!(f, ", packet_identifier: {packet_identifier}")?,
            None => write!(f, ", packet_identifier: None")?,
        };
        write!(f, ", payload: {}}}", VarBytes(self.payload.clone()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use std::io::Cursor;

    use crate::common::{packet::EncodablePacket, Encodable, QualityOfService};

    #[test]
    fn test_publish_packet_basic() {
        let packet = PublishPacket::new(
            "a/b",
            QoSWithPacketIdentifier::Level2(10),
            b"Hello world!".to_vec(),
        );

        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();

        let mut decode_buf = Cursor::new(buf);
        let decoded = PublishPacket::decode(&mut decode_buf).unwrap();

        assert_eq!(packet, decoded);
    }

    #[test]
    fn test_publish_packet_encode_hex() {
        let packet =
            PublishPacket::new("a/b", QoSWithPacketIdentifier::Level1(7), vec![0x01, 0x02]);

        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();

        assert_eq!(&b"\x32\x09\x00\x03a/b\x00\x07\x01\x02"[..], &buf[..]);
        assert_eq!(packet.encoded_length(), 11);
    }

    #[test]
    fn test_publish_packet_decode_qos0() {
        let encoded = b"\x30\x07\x00\x03a/bhi";
        let packet = PublishPacket::decode(&mut &encoded[..]).unwrap();

        assert_eq!(packet.qos(), QoSWithPacketIdentifier::Level0);
        assert_eq!(packet.topic_name(), "a/b");
        assert_eq!(packet.payload(), b"hi");
    }

    #[test]
    fn test_publish_packet_empty_payload() {
        let encoded = b"\x34\x07\x00\x03a/b\x12\x34";
        let packet = PublishPacket::decode(&mut &encoded[..]).unwrap();

        assert_eq!(packet.qos(), QoSWithPacketIdentifier::Level2(0x1234));
        assert!(packet.payload().is_empty());
    }

    #[test]
    fn test_publish_packet_flags() {
        let mut packet = PublishPacket::new("t", QoSWithPacketIdentifier::Level1(1), vec![]);
        assert!(!packet.dup());
        assert!(!packet.retain());

        packet.set_dup(true);
        packet.set_retain(true);
        assert!(packet.dup());
        assert!(packet.retain());
        assert_eq!(u8::from(packet.fixed_header().packet_type), 0x3b);

        packet.set_dup(false);
        assert!(!packet.dup());
        assert!(packet.retain());
    }

    #[test]
    fn test_publish_packet_set_qos() {
        let mut packet = PublishPacket::new("t", QoSWithPacketIdentifier::Level0, b"x".to_vec());
        assert_eq!(packet.fixed_header().remaining_length, 4);

        packet.set_qos(QoSWithPacketIdentifier::Level2(9));
        assert_eq!(packet.fixed_header().packet_type.qos(), QualityOfService::Level2);
        assert_eq!(packet.fixed_header().remaining_length, 6);
        assert_eq!(packet.qos(), QoSWithPacketIdentifier::Level2(9));

        packet.set_qos(QoSWithPacketIdentifier::Level0);
        assert_eq!(packet.fixed_header().remaining_length, 4);
    }

    #[test]
    fn test_publish_packet_release() {
        let mut packet = PublishPacket::new("a/b", QoSWithPacketIdentifier::Level1(7), vec![1, 2]);
        packet.release();

        assert_eq!(packet.topic_name(), "");
        assert!(packet.payload().is_empty());
        assert_eq!(packet.fixed_header().remaining_length, 4);
        assert_eq!(packet.qos(), QoSWithPacketIdentifier::Level1(7));
    }

    #[test]
    fn test_display_publish_packet() {
        let packet = PublishPacket::new("a/b", QoSWithPacketIdentifier::Level1(7), b"hi".to_vec());

        assert_eq!(
            packet.to_string(),
            "{fixed_header: {packet_type: PUBLISH, remaining_length: 9}, topic_name: a/b, packet_identifier: 7, payload: hi}"
        );
    }
}
