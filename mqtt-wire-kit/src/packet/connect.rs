//! CONNECT

use std::io::{Read, Write};

use crate::{
    common::{
        encodable::VarBytes, packet::DecodablePacket, ConnectFlags, DecodeError, Decodable,
        EncodeError, Encodable, KeepAlive, ProtocolLevel, ProtocolName, QualityOfService,
    },
    control::{ControlType, FixedHeader, PacketType},
};

/// `CONNECT` packet
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct ConnectPacket {
    fixed_header: FixedHeader,
    protocol_name: ProtocolName,
    protocol_level: ProtocolLevel,
    flags: ConnectFlags,
    keep_alive: KeepAlive,
    payload: ConnectPacketPayload,
}

encodable_packet!(ConnectPacket(
    protocol_name,
    protocol_level,
    flags,
    keep_alive,
    payload
));

impl ConnectPacket {
    pub fn new<C>(client_identifier: C) -> Self
    where
        C: Into<String>,
    {
        let mut pkt = Self {
            fixed_header: FixedHeader::new(PacketType::with_default(ControlType::Connect), 0),
            protocol_name: ProtocolName::default(),
            protocol_level: ProtocolLevel::Version311,
            flags: ConnectFlags::empty(),
            keep_alive: KeepAlive(0),
            payload: ConnectPacketPayload::new(client_identifier.into()),
        };

        pkt.fix_header_remaining_len();

        pkt
    }

    pub fn set_keep_alive(&mut self, keep_alive: u16) {
        self.keep_alive = KeepAlive(keep_alive);
    }

    pub fn set_username(&mut self, username: Option<String>) {
        self.flags.username = username.is_some();
        self.payload.username = username;
        self.fix_header_remaining_len();
    }

    /// Sets the password. A server rejects a password sent without a username.
    pub fn set_password(&mut self, password: Option<Vec<u8>>) {
        self.flags.password = password.is_some();
        self.payload.password = password.map(VarBytes);
        self.fix_header_remaining_len();
    }

    /// Sets the will. Will QoS and Will Retain flags follow the will, and are cleared with it.
    pub fn set_will(&mut self, will_message: Option<LastWill>) {
        let (flag, qos, retain) = will_message
            .as_ref()
            .map_or((false, QualityOfService::Level0, false), |w| {
                (true, w.qos, w.retain)
            });
        self.flags.will_flag = flag;
        self.flags.will_qos = qos as u8;
        self.flags.will_retain = retain;

        self.payload.last_will = will_message;

        self.fix_header_remaining_len();
    }

    pub fn set_client_identifier<I: Into<String>>(&mut self, id: I) {
        self.payload.client_identifier = id.into();
        self.fix_header_remaining_len();
    }

    pub fn set_clean_session(&mut self, clean_session: bool) {
        self.flags.clean_session = clean_session;
    }

    pub fn username(&self) -> Option<&str> {
        self.payload.username.as_deref()
    }

    pub fn password(&self) -> Option<&[u8]> {
        self.payload.password.as_ref().map(|x| &x.0[..])
    }

    pub fn will(&self) -> Option<&LastWill> {
        self.payload.last_will.as_ref()
    }

    pub fn will_retain(&self) -> bool {
        self.flags.will_retain
    }

    pub fn will_qos(&self) -> QualityOfService {
        QualityOfService::try_from(self.flags.will_qos).unwrap_or_default()
    }

    pub fn client_identifier(&self) -> &str {
        &self.payload.client_identifier[..]
    }

    pub fn protocol_name(&self) -> &str {
        &self.protocol_name.0
    }

    pub fn protocol_level(&self) -> ProtocolLevel {
        self.protocol_level
    }

    pub fn flags(&self) -> ConnectFlags {
        self.flags
    }

    pub fn clean_session(&self) -> bool {
        self.flags.clean_session
    }

    pub fn keep_alive(&self) -> u16 {
        self.keep_alive.0
    }

    /// Drops the client identifier, will, username and password together with their flags
    pub fn release(&mut self) {
        self.payload.client_identifier = String::new();
        self.set_will(None);
        self.set_username(None);
        self.set_password(None);
    }
}

impl DecodablePacket for ConnectPacket {
    type F = FixedHeader;

    fn decode_packet<R: Read>(reader: &mut R, fixed_header: Self::F) -> Result<Self, DecodeError> {
        let protocol_name: ProtocolName = Decodable::decode(reader)?;
        let protocol_level: ProtocolLevel = Decodable::decode(reader)?;
        let flags: ConnectFlags = Decodable::decode(reader)?;
        let keep_alive: KeepAlive = Decodable::decode(reader)?;
        let payload = ConnectPacketPayload::decode_with(reader, flags)?;

        Ok(Self {
            fixed_header,
            protocol_name,
            protocol_level,
            flags,
            keep_alive,
            payload,
        })
    }
}

/// Payloads for connect packet
#[derive(Debug, Eq, PartialEq, Clone)]
struct ConnectPacketPayload {
    client_identifier: String,
    last_will: Option<LastWill>,
    username: Option<String>,
    password: Option<VarBytes>,
}

impl ConnectPacketPayload {
    fn new(client_identifier: String) -> Self {
        ConnectPacketPayload {
            client_identifier,
            last_will: None,
            username: None,
            password: None,
        }
    }
}

impl Encodable for ConnectPacketPayload {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        self.client_identifier.encode(writer)?;
        self.last_will.encode(writer)?;
        self.username.encode(writer)?;
        self.password.encode(writer)
    }

    fn encoded_length(&self) -> u32 {
        self.client_identifier.encoded_length()
            + self.last_will.encoded_length()
            + self.username.encoded_length()
            + self.password.encoded_length()
    }
}

impl Decodable for ConnectPacketPayload {
    type Cond = ConnectFlags;

    fn decode_with<R: Read>(reader: &mut R, flags: ConnectFlags) -> Result<Self, DecodeError> {
        let client_identifier = String::decode(reader)?;

        let last_will = if flags.will_flag {
            let topic = String::decode(reader)?;
            let message = VarBytes::decode(reader)?;
            Some(LastWill {
                topic,
                message,
                qos: QualityOfService::try_from(flags.will_qos)?,
                retain: flags.will_retain,
            })
        } else {
            None
        };
        let username = if flags.username {
            Some(String::decode(reader)?)
        } else {
            None
        };
        let password = if flags.password {
            Some(VarBytes::decode(reader)?)
        } else {
            None
        };

        Ok(Self {
            client_identifier,
            last_will,
            username,
            password,
        })
    }
}

/// Will message of a `CONNECT`
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct LastWill {
    topic: String,
    message: VarBytes,
    qos: QualityOfService,
    retain: bool,
}

impl LastWill {
    pub fn new<S: Into<String>>(topic: S, msg: Vec<u8>) -> Self {
        Self {
            topic: topic.into(),
            message: VarBytes(msg),
            qos: QualityOfService::Level0,
            retain: false,
        }
    }

    pub fn set_qos(&mut self, qos: QualityOfService) {
        self.qos = qos;
    }

    pub fn set_retain(&mut self, retain: bool) {
        self.retain = retain;
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn message(&self) -> &[u8] {
        &self.message.0
    }

    pub fn qos(&self) -> QualityOfService {
        self.qos
    }

    pub fn retain(&self) -> bool {
        self.retain
    }
}

impl Encodable for LastWill {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        self.topic.encode(writer)?;
        self.message.encode(writer)
    }

    fn encoded_length(&self) -> u32 {
        self.topic.encoded_length() + self.message.encoded_length()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use std::io::Cursor;

    use crate::common::{packet::EncodablePacket, Decodable, Encodable, ProtocolViolation};

    const FULL: &[u8] = b"\x10\x19\x00\x04MQTT\x04\xee\x00\x3c\
        \x00\x01c\x00\x01w\x00\x01m\x00\x01u\x00\x01p";

    fn full_packet() -> ConnectPacket {
        let mut will = LastWill::new("w", b"m".to_vec());
        will.set_qos(QualityOfService::Level1);
        will.set_retain(true);

        let mut packet = ConnectPacket::new("c");
        packet.set_clean_session(true);
        packet.set_keep_alive(60);
        packet.set_will(Some(will));
        packet.set_username(Some("u".to_owned()));
        packet.set_password(Some(b"p".to_vec()));
        packet
    }

    #[test]
    fn test_connect_packet_encode_basic() {
        let packet = ConnectPacket::new("12345".to_owned());
        let expected = b"\x10\x11\x00\x04MQTT\x04\x00\x00\x00\x00\x0512345";

        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();

        assert_eq!(&expected[..], &buf[..]);
    }

    #[test]
    fn test_connect_packet_decode_basic() {
        let encoded_data = b"\x10\x11\x00\x04MQTT\x04\x00\x00\x00\x00\x0512345";

        let mut buf = Cursor::new(&encoded_data[..]);
        let packet = ConnectPacket::decode(&mut buf).unwrap();

        assert_eq!(packet, ConnectPacket::new("12345"));
        assert_eq!(packet.will(), None);
        assert_eq!(packet.username(), None);
        assert_eq!(packet.password(), None);
    }

    #[test]
    fn test_connect_packet_encode_full() {
        let mut buf = Vec::new();
        full_packet().encode(&mut buf).unwrap();

        assert_eq!(FULL, &buf[..]);
    }

    #[test]
    fn test_connect_packet_decode_full() {
        let packet = ConnectPacket::decode(&mut &FULL[..]).unwrap();

        assert_eq!(packet.client_identifier(), "c");
        assert_eq!(packet.keep_alive(), 60);
        assert!(packet.clean_session());
        let will = packet.will().unwrap();
        assert_eq!(will.topic(), "w");
        assert_eq!(will.message(), b"m");
        assert_eq!(will.qos(), QualityOfService::Level1);
        assert!(will.retain());
        assert_eq!(packet.will_qos(), QualityOfService::Level1);
        assert_eq!(packet.username(), Some("u"));
        assert_eq!(packet.password(), Some(&b"p"[..]));

        assert_eq!(packet, full_packet());
    }

    #[test]
    fn test_connect_packet_decode_missing_will() {
        // will flag set but the body ends after the client identifier
        let encoded = b"\x10\x0f\x00\x04MQTT\x04\x04\x00\x00\x00\x03abc";
        let err = ConnectPacket::decode(&mut &encoded[..]).unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedBody));
    }

    #[test]
    fn test_connect_packet_decode_bad_protocol() {
        let encoded = b"\x10\x11\x00\x06MQIsdp\x03\x00\x00\x00\x00\x0312a";
        let err = ConnectPacket::decode(&mut &encoded[..]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::ProtocolViolation(ProtocolViolation::InvalidProtocolName(ref name)) if name == "MQIsdp"
        ));

        let encoded = b"\x10\x0f\x00\x04MQTT\x05\x00\x00\x00\x00\x0312a";
        let err = ConnectPacket::decode(&mut &encoded[..]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::ProtocolViolation(ProtocolViolation::UnsupportedProtocolLevel(5))
        ));
    }

    #[test]
    fn test_connect_packet_encode_password_without_username() {
        let mut packet = ConnectPacket::new("c");
        packet.set_password(Some(b"p".to_vec()));

        let mut buf = Vec::new();
        let err = packet.encode(&mut buf).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::ProtocolViolation(ProtocolViolation::PasswordWithoutUsername)
        ));

        packet.set_username(Some("u".to_owned()));
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        assert_eq!(ConnectPacket::decode(&mut &buf[..]).unwrap(), packet);
    }

    #[test]
    fn test_connect_packet_release() {
        let mut packet = full_packet();
        packet.release();

        assert_eq!(packet.client_identifier(), "");
        assert_eq!(packet.will(), None);
        assert_eq!(packet.username(), None);
        assert_eq!(packet.password(), None);
        assert!(!packet.flags().will_retain);
        assert_eq!(packet.flags().will_qos, 0);
        assert_eq!(packet.fixed_header().remaining_length, 12);
        assert!(packet.clean_session());

        let released = packet.clone();
        packet.release();
        assert_eq!(packet, released);
    }
}
