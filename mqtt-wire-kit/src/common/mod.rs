pub use self::{
    encodable::{Decodable, Encodable, VarBytes},
    error::{DecodeError, EncodeError, ProtocolViolation},
    qos::{QoSWithPacketIdentifier, QualityOfService},
    varint::{decode_length, encode_length, MAX_REMAINING_LENGTH},
    variable_header::*,
};

pub mod encodable;
pub mod error;
pub mod packet;
pub mod qos;
pub mod varint;
pub mod variable_header;

/// Minimum frame: one type/flags byte plus a one byte Remaining Length
pub const MQTT_HEADER_LEN: usize = 2;
/// Frame of a generic acknowledgement: header byte, Remaining Length 2 and a packet identifier
pub const MQTT_ACK_LEN: usize = 4;
