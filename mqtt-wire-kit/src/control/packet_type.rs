//! Packet types

use std::fmt::Display;

use crate::common::{DecodeError, ProtocolViolation, QualityOfService};

const DUP: u8 = 0b1000;
const QOS_MASK: u8 = 0b0110;
const RETAIN: u8 = 0b0001;

/// First header byte of the fixed replies
pub mod stud {
    pub const CONNACK_BYTE: u8 = 0x20;
    pub const PUBLISH_BYTE: u8 = 0x30;
    pub const PUBACK_BYTE: u8 = 0x40;
    pub const PUBREC_BYTE: u8 = 0x50;
    pub const PUBREL_BYTE: u8 = 0x60;
    pub const PUBCOMP_BYTE: u8 = 0x70;
    pub const SUBACK_BYTE: u8 = 0x90;
    pub const UNSUBACK_BYTE: u8 = 0xB0;
    pub const PINGRESP_BYTE: u8 = 0xD0;
}

/// Packet type
// INVARIANT: the high 4 bits of the byte must be a valid control type and the QoS bits are not 3
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct PacketType(u8);

/// Defined control types
#[repr(u8)]
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ControlType {
    /// Client request to connect to Server
    Connect = value::CONNECT,
    /// Connect acknowledgment
    ConnectAcknowledgement = value::CONNACK,
    /// Publish message
    Publish = value::PUBLISH,
    /// Publish acknowledgment
    PublishAcknowledgement = value::PUBACK,
    /// Publish received (assured delivery part 1)
    PublishReceived = value::PUBREC,
    /// Publish release (assured delivery part 2)
    PublishRelease = value::PUBREL,
    /// Publish complete (assured delivery part 3)
    PublishComplete = value::PUBCOMP,
    /// Client subscribe request
    Subscribe = value::SUBSCRIBE,
    /// Subscribe acknowledgment
    SubscribeAcknowledgement = value::SUBACK,
    /// Unsubscribe request
    Unsubscribe = value::UNSUBSCRIBE,
    /// Unsubscribe acknowledgment
    UnsubscribeAcknowledgement = value::UNSUBACK,
    /// PING request
    PingRequest = value::PINGREQ,
    /// PING response
    PingResponse = value::PINGRESP,
    /// Client is disconnecting
    Disconnect = value::DISCONNECT,
}

impl ControlType {
    /// Flags emitted when a packet of this type is built locally. These are the stud bytes'
    /// low nibbles, except that requests a client sends carry the `0b0010` the protocol asks
    /// for.
    #[inline]
    fn default_flags(self) -> u8 {
        match self {
            ControlType::Subscribe => 0b0010,
            ControlType::Unsubscribe => 0b0010,
            _ => 0,
        }
    }

    /// Fixed header flags may be non-zero. All other types require `0b0000`.
    #[inline]
    fn carries_flags(self) -> bool {
        matches!(
            self,
            ControlType::Publish
                | ControlType::PublishRelease
                | ControlType::Subscribe
                | ControlType::Unsubscribe
        )
    }

    /// Body is a packet identifier and nothing else
    #[inline]
    pub fn is_ack(self) -> bool {
        matches!(
            self,
            ControlType::PublishAcknowledgement
                | ControlType::PublishReceived
                | ControlType::PublishRelease
                | ControlType::PublishComplete
                | ControlType::UnsubscribeAcknowledgement
        )
    }

    /// Packet has no variable header and no payload
    #[inline]
    pub fn is_header_only(self) -> bool {
        matches!(
            self,
            ControlType::PingRequest | ControlType::PingResponse | ControlType::Disconnect
        )
    }
}

impl PacketType {
    /// Creates a packet type. Fails if the QoS bits of `flags` hold 3, or if `flags` is
    /// non-zero for a type whose flags are reserved.
    pub fn new(t: ControlType, flags: u8) -> Result<Self, ProtocolViolation> {
        let qos = (flags & QOS_MASK) >> 1;
        QualityOfService::try_from(qos)?;
        if flags & 0x0F != 0 && !t.carries_flags() {
            return Err(ProtocolViolation::InvalidReservedFlag);
        }
        Ok(Self::new_unchecked(t, flags))
    }

    #[inline]
    fn new_unchecked(t: ControlType, flags: u8) -> Self {
        Self((t as u8) << 4 | (flags & 0x0F))
    }

    /// Creates a packet type with default flags
    #[inline]
    pub fn with_default(t: ControlType) -> Self {
        let flags = t.default_flags();
        Self::new_unchecked(t, flags)
    }

    pub(crate) fn publish(qos: QualityOfService) -> Self {
        Self::new_unchecked(ControlType::Publish, (qos as u8) << 1)
    }

    #[inline]
    pub(crate) fn update_flags(&mut self, upd: impl FnOnce(u8) -> u8) {
        let flags = upd(self.flags());
        self.0 = (self.0 & !0x0F) | (flags & 0x0F)
    }

    #[inline]
    pub fn control_type(self) -> ControlType {
        // the invariant rules out the fallback
        get_control_type(self.0 >> 4).unwrap_or(ControlType::Connect)
    }

    #[inline]
    pub fn flags(self) -> u8 {
        self.0 & 0x0F
    }

    #[inline]
    pub fn dup(self) -> bool {
        self.0 & DUP != 0
    }

    #[inline]
    pub fn qos(self) -> QualityOfService {
        match (self.0 & QOS_MASK) >> 1 {
            1 => QualityOfService::Level1,
            2 => QualityOfService::Level2,
            _ => QualityOfService::Level0,
        }
    }

    #[inline]
    pub fn retain(self) -> bool {
        self.0 & RETAIN != 0
    }
}

impl From<PacketType> for u8 {
    fn from(value: PacketType) -> Self {
        value.0
    }
}

impl From<&PacketType> for u8 {
    fn from(value: &PacketType) -> Self {
        value.0
    }
}

impl TryFrom<u8> for PacketType {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let type_val = value >> 4;
        let flags = value & 0x0F;

        let control_type =
            get_control_type(type_val).ok_or(DecodeError::MalformedHeader(type_val))?;
        Ok(PacketType::new(control_type, flags)?)
    }
}

#[inline]
fn get_control_type(val: u8) -> Option<ControlType> {
    let typ = match val {
        value::CONNECT => ControlType::Connect,
        value::CONNACK => ControlType::ConnectAcknowledgement,
        value::PUBLISH => ControlType::Publish,
        value::PUBACK => ControlType::PublishAcknowledgement,
        value::PUBREC => ControlType::PublishReceived,
        value::PUBREL => ControlType::PublishRelease,
        value::PUBCOMP => ControlType::PublishComplete,
        value::SUBSCRIBE => ControlType::Subscribe,
        value::SUBACK => ControlType::SubscribeAcknowledgement,
        value::UNSUBSCRIBE => ControlType::Unsubscribe,
        value::UNSUBACK => ControlType::UnsubscribeAcknowledgement,
        value::PINGREQ => ControlType::PingRequest,
        value::PINGRESP => ControlType::PingResponse,
        value::DISCONNECT => ControlType::Disconnect,
        _ => return None,
    };
    Some(typ)
}

impl Display for PacketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.control_type() {
            ControlType::Connect => write!(f, "CONNECT"),
            ControlType::ConnectAcknowledgement => write!(f, "CONNACK"),
            ControlType::Publish => write!(f, "PUBLISH"),
            ControlType::PublishAcknowledgement => write!(f, "PUBACK"),
            ControlType::PublishReceived => write!(f, "PUBREC"),
            ControlType::PublishRelease => write!(f, "PUBREL"),
            ControlType::PublishComplete => write!(f, "PUBCOMP"),
            ControlType::Subscribe => write!(f, "SUBSCRIBE"),
            ControlType::SubscribeAcknowledgement => write!(f, "SUBACK"),
            ControlType::Unsubscribe => write!(f, "UNSUBSCRIBE"),
            ControlType::UnsubscribeAcknowledgement => write!(f, "UNSUBACK"),
            ControlType::PingRequest => write!(f, "PINGREQ"),
            ControlType::PingResponse => write!(f, "PINGRESP"),
            ControlType::Disconnect => write!(f, "DISCONNECT"),
        }
    }
}

mod value {
    pub const CONNECT: u8 = 1;
    pub const CONNACK: u8 = 2;
    pub const PUBLISH: u8 = 3;
    pub const PUBACK: u8 = 4;
    pub const PUBREC: u8 = 5;
    pub const PUBREL: u8 = 6;
    pub const PUBCOMP: u8 = 7;
    pub const SUBSCRIBE: u8 = 8;
    pub const SUBACK: u8 = 9;
    pub const UNSUBSCRIBE: u8 = 10;
    pub const UNSUBACK: u8 = 11;
    pub const PINGREQ: u8 = 12;
    pub const PINGRESP: u8 = 13;
    pub const DISCONNECT: u8 = 14;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_stud_bytes() {
        let cases = [
            (ControlType::ConnectAcknowledgement, stud::CONNACK_BYTE),
            (ControlType::Publish, stud::PUBLISH_BYTE),
            (ControlType::PublishAcknowledgement, stud::PUBACK_BYTE),
            (ControlType::PublishReceived, stud::PUBREC_BYTE),
            (ControlType::PublishRelease, stud::PUBREL_BYTE),
            (ControlType::PublishComplete, stud::PUBCOMP_BYTE),
            (ControlType::SubscribeAcknowledgement, stud::SUBACK_BYTE),
            (ControlType::UnsubscribeAcknowledgement, stud::UNSUBACK_BYTE),
            (ControlType::PingResponse, stud::PINGRESP_BYTE),
        ];

        for (t, byte) in cases {
            assert_eq!(u8::from(PacketType::with_default(t)), byte, "{t:?}");
        }
    }

    #[test]
    fn test_header_bits() {
        let ty = PacketType::try_from(0x3d).unwrap();
        assert_eq!(ty.control_type(), ControlType::Publish);
        assert!(ty.dup());
        assert_eq!(ty.qos(), QualityOfService::Level2);
        assert!(ty.retain());

        let ty = PacketType::try_from(0x82).unwrap();
        assert_eq!(ty.control_type(), ControlType::Subscribe);
        assert!(!ty.dup());
        assert_eq!(ty.qos(), QualityOfService::Level1);
        assert!(!ty.retain());
    }

    #[test]
    fn test_reserved_types() {
        for byte in [0x00, 0x0f, 0xf0, 0xff] {
            assert!(matches!(
                PacketType::try_from(byte),
                Err(DecodeError::MalformedHeader(t)) if t == byte >> 4
            ));
        }
    }

    #[test]
    fn test_reserved_flags_rejected() {
        for byte in [0x13, 0x21, 0x4b, 0x52, 0x71, 0x98, 0xb2, 0xc1, 0xd4, 0xe8] {
            assert!(
                matches!(
                    PacketType::try_from(byte),
                    Err(DecodeError::ProtocolViolation(
                        ProtocolViolation::InvalidReservedFlag
                    ))
                ),
                "{byte:#04x}"
            );
        }

        for byte in [0x3b, 0x60, 0x62, 0x82, 0xa2] {
            assert!(PacketType::try_from(byte).is_ok(), "{byte:#04x}");
        }
    }

    #[test]
    fn test_qos_3_is_violation() {
        assert!(matches!(
            PacketType::try_from(0x36),
            Err(DecodeError::ProtocolViolation(
                ProtocolViolation::InvalidQualityOfService(3)
            ))
        ));
    }

    #[test]
    fn test_update_flags() {
        let mut ty = PacketType::publish(QualityOfService::Level1);
        ty.update_flags(|flags| flags | DUP | RETAIN);
        assert_eq!(u8::from(ty), 0x3b);
        assert_eq!(ty.to_string(), "PUBLISH");
    }
}
