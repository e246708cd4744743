//! CONNACK

use std::{fmt::Display, io::Read};

use crate::{
    common::{packet::DecodablePacket, ConnackFlags, DecodeError, Decodable},
    control::{variable_header::ConnectReturnCode, ControlType, FixedHeader, PacketType},
};

/// `CONNACK` packet
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct ConnackPacket {
    fixed_header: FixedHeader,
    flags: ConnackFlags,
    ret_code: ConnectReturnCode,
}

encodable_packet!(ConnackPacket(flags, ret_code));

impl ConnackPacket {
    pub fn new(session_present: bool, ret_code: ConnectReturnCode) -> ConnackPacket {
        ConnackPacket {
            fixed_header: FixedHeader::new(
                PacketType::with_default(ControlType::ConnectAcknowledgement),
                2,
            ),
            flags: ConnackFlags { session_present },
            ret_code,
        }
    }

    pub fn connack_flags(&self) -> ConnackFlags {
        self.flags
    }

    pub fn session_present(&self) -> bool {
        self.flags.session_present
    }

    pub fn connect_return_code(&self) -> ConnectReturnCode {
        self.ret_code
    }
}

impl DecodablePacket for ConnackPacket {
    type F = FixedHeader;

    fn decode_packet<R: Read>(reader: &mut R, fixed_header: Self::F) -> Result<Self, DecodeError> {
        let flags: ConnackFlags = Decodable::decode(reader)?;
        let code: ConnectReturnCode = Decodable::decode(reader)?;

        Ok(ConnackPacket {
            fixed_header,
            flags,
            ret_code: code,
        })
    }
}

impl Display for ConnackPacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{fixed_header: {}, flags: {}, ret_code: {}}}",
            self.fixed_header, self.flags, self.ret_code
        )
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use crate::common::{encodable::Encodable, ProtocolViolation};

    use super::*;

    #[test]
    fn test_connack_packet_encode_hex() {
        let packet = ConnackPacket::new(true, ConnectReturnCode::ConnectionAccepted);

        let expected = b"\x20\x02\x01\x00";

        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();

        assert_eq!(&expected[..], &buf[..]);
    }

    #[test]
    fn test_connack_packet_decode_hex() {
        let encoded_data = b"\x20\x02\x00\x05";

        let mut buf = Cursor::new(&encoded_data[..]);
        let packet = ConnackPacket::decode(&mut buf).unwrap();

        let expected = ConnackPacket::new(false, ConnectReturnCode::NotAuthorized);

        assert_eq!(expected, packet);
        assert!(!packet.session_present());
    }

    #[test]
    fn test_connack_reserved_return_code() {
        let packet = ConnackPacket::decode(&mut &b"\x20\x02\x00\x09"[..]).unwrap();
        assert_eq!(packet.connect_return_code(), ConnectReturnCode::Reserved(9));
    }

    #[test]
    fn test_connack_reserved_flags() {
        let err = ConnackPacket::decode(&mut &b"\x20\x02\x02\x00"[..]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::ProtocolViolation(ProtocolViolation::InvalidReservedFlag)
        ));
    }
}
