//! PINGREQ, PINGRESP and DISCONNECT

use std::io::Read;

use crate::{
    common::{packet::DecodablePacket, DecodeError},
    control::{ControlType, FixedHeader, PacketType},
};

/// Packet made of a fixed header alone
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct HeaderPacket {
    fixed_header: FixedHeader,
}

encodable_packet!(HeaderPacket());

impl HeaderPacket {
    /// Returns `None` unless `control_type` is `PINGREQ`, `PINGRESP` or `DISCONNECT`
    pub fn new(control_type: ControlType) -> Option<Self> {
        control_type
            .is_header_only()
            .then(|| Self::new_unchecked(control_type))
    }

    fn new_unchecked(control_type: ControlType) -> Self {
        Self {
            fixed_header: FixedHeader::new(PacketType::with_default(control_type), 0),
        }
    }

    pub fn pingreq() -> Self {
        Self::new_unchecked(ControlType::PingRequest)
    }

    pub fn pingresp() -> Self {
        Self::new_unchecked(ControlType::PingResponse)
    }

    pub fn disconnect() -> Self {
        Self::new_unchecked(ControlType::Disconnect)
    }

    pub fn control_type(&self) -> ControlType {
        self.fixed_header.packet_type.control_type()
    }
}

impl DecodablePacket for HeaderPacket {
    type F = FixedHeader;

    fn decode_packet<R: Read>(_reader: &mut R, fixed_header: Self::F) -> Result<Self, DecodeError> {
        Ok(HeaderPacket { fixed_header })
    }
}
