//! PUBACK, PUBREC, PUBREL, PUBCOMP and UNSUBACK

use std::{fmt::Display, io::Read};

use crate::{
    common::{packet::DecodablePacket, DecodeError, Decodable, PacketIdentifier},
    control::{ControlType, FixedHeader, PacketType},
};

/// Acknowledgement whose body is a packet identifier and nothing else
///
/// The fixed header tells `PUBACK`, `PUBREC`, `PUBREL`, `PUBCOMP` and `UNSUBACK` apart.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct AckPacket {
    fixed_header: FixedHeader,
    packet_identifier: PacketIdentifier,
}

encodable_packet!(AckPacket(packet_identifier));

impl AckPacket {
    /// Returns `None` unless `control_type` is one of the five acknowledgements
    pub fn new(control_type: ControlType, pkid: u16) -> Option<Self> {
        control_type
            .is_ack()
            .then(|| Self::new_unchecked(control_type, pkid))
    }

    fn new_unchecked(control_type: ControlType, pkid: u16) -> Self {
        Self {
            fixed_header: FixedHeader::new(PacketType::with_default(control_type), 2),
            packet_identifier: PacketIdentifier(pkid),
        }
    }

    pub fn puback(pkid: u16) -> Self {
        Self::new_unchecked(ControlType::PublishAcknowledgement, pkid)
    }

    pub fn pubrec(pkid: u16) -> Self {
        Self::new_unchecked(ControlType::PublishReceived, pkid)
    }

    pub fn pubrel(pkid: u16) -> Self {
        Self::new_unchecked(ControlType::PublishRelease, pkid)
    }

    pub fn pubcomp(pkid: u16) -> Self {
        Self::new_unchecked(ControlType::PublishComplete, pkid)
    }

    pub fn unsuback(pkid: u16) -> Self {
        Self::new_unchecked(ControlType::UnsubscribeAcknowledgement, pkid)
    }

    pub fn control_type(&self) -> ControlType {
        self.fixed_header.packet_type.control_type()
    }

    pub fn packet_identifier(&self) -> u16 {
        self.packet_identifier.0
    }

    pub fn set_packet_identifier(&mut self, pkid: u16) {
        self.packet_identifier.0 = pkid;
    }
}

impl DecodablePacket for AckPacket {
    type F = FixedHeader;

    fn decode_packet<R: Read>(reader: &mut R, fixed_header: Self::F) -> Result<Self, DecodeError> {
        let packet_identifier = PacketIdentifier::decode(reader)?;
        Ok(Self {
            fixed_header,
            packet_identifier,
        })
    }
}

impl Display for AckPacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{fixed_header: {}, packet_identifier: {}}}",
            self.fixed_header, self.packet_identifier
        )
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use crate::common::{encodable::Encodable, MQTT_ACK_LEN};

    use super::*;

    #[test]
    fn test_ack_packet_encode_hex() {
        let cases = [
            (AckPacket::puback(40306), b"\x40\x02\x9d\x72"),
            (AckPacket::pubrec(40306), b"\x50\x02\x9d\x72"),
            (AckPacket::pubrel(40306), b"\x60\x02\x9d\x72"),
            (AckPacket::pubcomp(40306), b"\x70\x02\x9d\x72"),
            (AckPacket::unsuback(40306), b"\xb0\x02\x9d\x72"),
        ];

        for (packet, expected) in cases {
            let mut buf = Vec::new();
            packet.encode(&mut buf).unwrap();

            assert_eq!(&expected[..], &buf[..]);
            assert_eq!(buf.len(), MQTT_ACK_LEN);
        }
    }

    #[test]
    fn test_ack_packet_decode_hex() {
        let encoded_data = b"\x40\x02\x9d\x73";

        let mut buf = Cursor::new(&encoded_data[..]);
        let packet = AckPacket::decode(&mut buf).unwrap();

        assert_eq!(AckPacket::puback(40307), packet);
    }

    #[test]
    fn test_pubrel_with_required_flags() {
        let packet = AckPacket::decode(&mut &b"\x62\x02\x9d\x74"[..]).unwrap();

        assert_eq!(packet.control_type(), ControlType::PublishRelease);
        assert_eq!(packet.packet_identifier(), 40308);

        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        assert_eq!(&buf[..], b"\x62\x02\x9d\x74");
    }

    #[test]
    fn test_ack_packet_new() {
        assert_eq!(
            AckPacket::new(ControlType::PublishComplete, 1),
            Some(AckPacket::pubcomp(1))
        );
        assert_eq!(AckPacket::new(ControlType::Subscribe, 1), None);
        assert_eq!(AckPacket::new(ControlType::SubscribeAcknowledgement, 1), None);
    }

    #[test]
    fn test_ack_packet_truncated() {
        let err = AckPacket::decode(&mut &b"\x40\x02\x9d"[..]).unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedBody));
    }

    #[test]
    fn test_display_ack_packet() {
        assert_eq!(
            AckPacket::unsuback(5).to_string(),
            "{fixed_header: {packet_type: UNSUBACK, remaining_length: 2}, packet_identifier: 5}"
        );
    }
}
