pub use self::{
    connect_ack_flags::ConnackFlags,
    connect_flags::ConnectFlags,
    keep_alive::KeepAlive,
    packet_identifier::PacketIdentifier,
    protocol_level::ProtocolLevel,
    protocol_name::ProtocolName,
};

pub mod connect_ack_flags;
pub mod connect_flags;
pub mod keep_alive;
pub mod packet_identifier;
pub mod protocol_level;
pub mod protocol_name;
