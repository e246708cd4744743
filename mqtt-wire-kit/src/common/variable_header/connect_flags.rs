//! Connect flags

use std::{
    fmt::Display,
    io::{Read, Write},
};

use byteorder::{ReadBytesExt, WriteBytesExt};

use crate::common::{
    DecodeError, Decodable, EncodeError, Encodable, ProtocolViolation, QualityOfService,
};

const USERNAME: u8 = 0b1000_0000;
const PASSWORD: u8 = 0b0100_0000;
const WILL_RETAIN: u8 = 0b0010_0000;
const WILL_QOS_MASK: u8 = 0b0001_1000;
const WILL_QOS_SHIFT: u8 = 3;
const WILL_FLAG: u8 = 0b0000_0100;
const CLEAN_SESSION: u8 = 0b0000_0010;
const RESERVED: u8 = 0b0000_0001;

/// Flags for `CONNECT` packet
///
/// ```plain
///     7          6          5          4   3      2        1         0
/// +----------+----------+-------------+----------+------+---------+----------+
/// | Username | Password | Will Retain | Will QoS | Will | Clean   | Reserved |
/// |          |          |             |          |      | Session |          |
/// +----------+----------+-------------+----------+------+---------+----------+
/// ```
#[derive(Debug, Eq, PartialEq, Copy, Clone, Default)]
pub struct ConnectFlags {
    pub username: bool,
    pub password: bool,
    pub will_retain: bool,
    pub will_qos: u8,
    pub will_flag: bool,
    pub clean_session: bool,
    // We never use this, but must decode because brokers must verify it's zero per [MQTT-3.1.2-3]
    pub reserved: bool,
}

impl ConnectFlags {
    pub fn empty() -> Self {
        Self::default()
    }

    fn to_byte(self) -> u8 {
        let mut code = 0u8;
        if self.username {
            code |= USERNAME;
        }
        if self.password {
            code |= PASSWORD;
        }
        if self.will_retain {
            code |= WILL_RETAIN;
        }
        code |= (self.will_qos << WILL_QOS_SHIFT) & WILL_QOS_MASK;
        if self.will_flag {
            code |= WILL_FLAG;
        }
        if self.clean_session {
            code |= CLEAN_SESSION;
        }
        if self.reserved {
            code |= RESERVED;
        }
        code
    }

    /// Rules both sides of the wire hold the flags to
    fn validate(self) -> Result<(), ProtocolViolation> {
        // [MQTT-3.1.2-3]
        if self.reserved {
            return Err(ProtocolViolation::InvalidReservedFlag);
        }
        QualityOfService::try_from(self.will_qos)?;
        // [MQTT-3.1.2-13], [MQTT-3.1.2-15]
        if !self.will_flag && (self.will_qos != 0 || self.will_retain) {
            return Err(ProtocolViolation::InvalidWillFlags);
        }
        // [MQTT-3.1.2-22]
        if self.password && !self.username {
            return Err(ProtocolViolation::PasswordWithoutUsername);
        }
        Ok(())
    }
}

impl Encodable for ConnectFlags {
    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        self.validate()?;
        writer.write_u8(self.to_byte()).map_err(From::from)
    }

    fn encoded_length(&self) -> u32 {
        1
    }
}

impl Decodable for ConnectFlags {
    type Cond = ();

    fn decode_with<R: Read>(reader: &mut R, _rest: ()) -> Result<Self, DecodeError> {
        let code = reader.read_u8()?;
        let flags = Self {
            username: code & USERNAME != 0,
            password: code & PASSWORD != 0,
            will_retain: code & WILL_RETAIN != 0,
            will_qos: (code & WILL_QOS_MASK) >> WILL_QOS_SHIFT,
            will_flag: code & WILL_FLAG != 0,
            clean_session: code & CLEAN_SESSION != 0,
            reserved: code & RESERVED != 0,
        };
        flags.validate()?;

        Ok(flags)
    }
}

impl Display for ConnectFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{username: {}, password: {}, will_retain: {}, will_qos: {}, will_flag: {}, clean_session: {}}}",
            self.username,
            self.password,
            self.will_retain,
            self.will_qos,
            self.will_flag,
            self.clean_session
        )
    }
}
